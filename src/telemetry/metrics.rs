use std::collections::VecDeque;

use serde::Serialize;

use super::event::{AggregationMode, FleetEvent, RejectionKind};
use crate::fleet::Alert;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub ingest_stats: IngestStats,
    pub writer_stats: WriterStats,
    pub aggregation_stats: AggregationStats,
    pub alert_stats: AlertStats,
    pub sessions_completed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestStats {
    pub loaded: u64,
    pub rejected: u64,
    pub malformed: u64,
    pub invalid_field: u64,
    pub duplicate_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WriterStats {
    pub started: u64,
    pub stopped: u64,
    pub total_updates: u64,
    pub avg_updates_per_writer: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationStats {
    pub baseline_windows: u64,
    pub concurrent_windows: u64,
    pub total_passes: u64,
    pub total_elapsed_us: u64,
    pub avg_pass_us: f64,
    pub failures: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertStats {
    pub overheating: u64,
    pub low_fuel: u64,
}

/// Folds a full event history into a snapshot.
pub fn compute_snapshot(events: &VecDeque<FleetEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    for event in events {
        snap.apply(event);
    }
    snap.finish()
}

impl TelemetrySnapshot {
    /// Counts one event. Averages stay stale until `finish`.
    pub fn apply(&mut self, event: &FleetEvent) {
        match event {
            FleetEvent::RecordLoaded { .. } => self.ingest_stats.loaded += 1,
            FleetEvent::RecordRejected { kind, .. } => {
                self.ingest_stats.rejected += 1;
                match kind {
                    RejectionKind::Malformed => self.ingest_stats.malformed += 1,
                    RejectionKind::InvalidField => self.ingest_stats.invalid_field += 1,
                    RejectionKind::DuplicateId => self.ingest_stats.duplicate_id += 1,
                }
            }
            FleetEvent::WriterStarted { .. } => self.writer_stats.started += 1,
            FleetEvent::WriterStopped { updates, .. } => {
                self.writer_stats.stopped += 1;
                self.writer_stats.total_updates += updates;
            }
            FleetEvent::AggregationWindow { mode, passes, elapsed_us } => {
                match mode {
                    AggregationMode::Baseline => self.aggregation_stats.baseline_windows += 1,
                    AggregationMode::Concurrent => self.aggregation_stats.concurrent_windows += 1,
                }
                self.aggregation_stats.total_passes += passes;
                self.aggregation_stats.total_elapsed_us += elapsed_us;
            }
            FleetEvent::AggregationFailed { .. } => self.aggregation_stats.failures += 1,
            FleetEvent::AlertRaised { alert, .. } => match alert {
                Alert::CriticalOverheating => self.alert_stats.overheating += 1,
                Alert::LowFuelWarning => self.alert_stats.low_fuel += 1,
            },
            FleetEvent::SessionCompleted { .. } => self.sessions_completed += 1,
        }
    }

    /// Fills in the averages from the counters.
    pub fn finish(mut self) -> Self {
        self.writer_stats.avg_updates_per_writer = if self.writer_stats.stopped > 0 {
            self.writer_stats.total_updates as f64 / self.writer_stats.stopped as f64
        } else {
            0.0
        };
        self.aggregation_stats.avg_pass_us = if self.aggregation_stats.total_passes > 0 {
            self.aggregation_stats.total_elapsed_us as f64
                / self.aggregation_stats.total_passes as f64
        } else {
            0.0
        };
        self
    }
}
