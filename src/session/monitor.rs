use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::report::{PerformanceComparison, SessionReport, WindowTiming};
use crate::config::MonitorConfig;
use crate::fleet::{
    Access, Aggregator, Fleet, FleetError, Statistic, Unsynchronized, VehicleId, WriterPool,
};
use crate::ingest::{IngestError, IngestReport, ParsedRecord};
use crate::telemetry::{AggregationMode, FleetEvent, SharedRecorder};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error("aggregation worker failed: {0}")]
    Worker(#[from] JoinError),
}

/// Drives one monitoring session: build the fleet, run writers against it
/// while measuring aggregation, stop them, report.
///
/// Loading needs `&mut self` and running borrows `&self`, so membership
/// cannot change while a run is in flight.
pub struct FleetMonitor {
    session_id: Uuid,
    config: MonitorConfig,
    fleet: Arc<Fleet>,
    // Kept to rebuild the unsynchronized baseline on a blocking thread.
    records: Vec<ParsedRecord>,
    ids: HashSet<VehicleId>,
    rejected: usize,
    recorder: SharedRecorder,
}

impl FleetMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        let recorder = SharedRecorder::new(config.event_capacity);
        Self {
            session_id: Uuid::new_v4(),
            config,
            fleet: Arc::new(Fleet::new()),
            records: Vec::new(),
            ids: HashSet::new(),
            rejected: 0,
            recorder,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn fleet(&self) -> &Arc<Fleet> {
        &self.fleet
    }

    pub fn recorder(&self) -> &SharedRecorder {
        &self.recorder
    }

    /// Build phase. Appends every accepted record; ids already present from
    /// an earlier load are rejected as duplicates. Returns how many were added.
    pub fn load(&mut self, report: IngestReport) -> usize {
        let mut rejected = report.rejected;
        let mut added = 0;

        for record in report.records {
            if !self.ids.insert(record.id) {
                let err = IngestError::DuplicateId {
                    line: record.line,
                    id: record.id,
                };
                warn!(line = record.line, "Skipping telemetry line: {}", err);
                rejected.push(err);
                continue;
            }
            self.fleet.add(record.into_record());
            self.recorder.record(FleetEvent::RecordLoaded {
                vehicle_id: record.id,
            });
            self.records.push(record);
            added += 1;
        }

        for err in &rejected {
            self.recorder.record(FleetEvent::RecordRejected {
                line: err.line(),
                kind: err.into(),
            });
        }
        self.rejected += rejected.len();

        info!(loaded = added, rejected = rejected.len(), "Fleet built");
        added
    }

    pub fn loaded(&self) -> usize {
        self.records.len()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Simulate-and-measure phase. Fails with `EmptyFleet` before spawning
    /// anything when no records were loaded.
    pub async fn run(&self) -> Result<SessionReport, MonitorError> {
        let span = info_span!("session", id = %self.session_id);
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<SessionReport, MonitorError> {
        if let Err(e) = Aggregator::new(self.fleet.as_ref()).average_speed() {
            self.record_failure(&e);
            return Err(e.into());
        }

        let cancel = CancellationToken::new();
        let pool = WriterPool::spawn(
            self.fleet.handles(),
            self.config.ranges,
            self.config.pacing(),
            cancel,
        )
        .with_recorder(self.recorder.clone());
        let writers = pool.len();
        let started = Instant::now();
        info!(writers, pacing_ms = self.config.pacing_ms, "Writers started");

        // Writers must be joined even when measuring fails.
        let measured = self.measure_windows().await;
        let remaining = self.config.window().saturating_sub(started.elapsed());
        if measured.is_ok() && !remaining.is_zero() {
            tokio::time::sleep(remaining).await;
        }
        let summaries = pool.shutdown().await;
        info!(writers = summaries.len(), "Writers stopped");
        let performance = measured?;

        let aggregator = Aggregator::new(self.fleet.as_ref());
        let stats = aggregator.stats().inspect_err(|e| self.record_failure(e))?;
        let alerts = aggregator.alerts(&self.config.thresholds);
        for vehicle in &alerts {
            for alert in &vehicle.alerts {
                self.recorder.record(FleetEvent::AlertRaised {
                    vehicle_id: vehicle.vehicle_id,
                    alert: *alert,
                });
            }
        }

        self.recorder.record(FleetEvent::SessionCompleted {
            vehicles: stats.vehicles,
        });

        Ok(SessionReport {
            session_id: self.session_id,
            loaded: self.loaded(),
            rejected: self.rejected,
            performance,
            stats,
            alerts,
            writers,
            writer_updates: summaries.iter().map(|s| s.updates).sum(),
            telemetry: self.recorder.snapshot(),
        })
    }

    /// Times the unsynchronized baseline, then the live fleet, each on a
    /// blocking thread so the tight loop never stalls the writers' workers.
    async fn measure_windows(&self) -> Result<PerformanceComparison, MonitorError> {
        let iterations = self.config.measure_iterations;

        let records = self.records.clone();
        let baseline = tokio::task::spawn_blocking(move || {
            let fleet: Fleet<Unsynchronized> = Fleet::new();
            for record in records {
                fleet.add(record.into_record());
            }
            measure(&fleet, iterations)
        })
        .await?;
        let baseline = self.finish_window(AggregationMode::Baseline, iterations, baseline)?;

        let fleet = Arc::clone(&self.fleet);
        let concurrent =
            tokio::task::spawn_blocking(move || measure(fleet.as_ref(), iterations)).await?;
        let concurrent = self.finish_window(AggregationMode::Concurrent, iterations, concurrent)?;

        info!(
            baseline_ms = baseline.elapsed_ms,
            concurrent_ms = concurrent.elapsed_ms,
            iterations,
            "Aggregation measured"
        );
        Ok(PerformanceComparison {
            baseline,
            concurrent,
        })
    }

    fn finish_window(
        &self,
        mode: AggregationMode,
        passes: u64,
        result: Result<Duration, FleetError>,
    ) -> Result<WindowTiming, FleetError> {
        match result {
            Ok(elapsed) => {
                self.recorder.record(FleetEvent::AggregationWindow {
                    mode,
                    passes,
                    elapsed_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                });
                Ok(WindowTiming::new(passes, elapsed))
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    fn record_failure(&self, err: &FleetError) {
        let FleetError::EmptyFleet { statistic } = *err;
        self.recorder.record(FleetEvent::AggregationFailed { statistic });
    }
}

/// `passes` rounds of all three averages.
pub fn measure<A: Access>(fleet: &Fleet<A>, passes: u64) -> Result<Duration, FleetError> {
    let aggregator = Aggregator::new(fleet);
    let start = Instant::now();
    let mut checksum = 0.0;
    for _ in 0..passes {
        checksum += aggregator.average(Statistic::Speed)?;
        checksum += aggregator.average(Statistic::Temperature)?;
        checksum += aggregator.average(Statistic::Fuel)?;
    }
    std::hint::black_box(checksum);
    Ok(start.elapsed())
}
