use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::fleet::{FleetStats, VehicleAlerts};
use crate::telemetry::TelemetrySnapshot;

/// Elapsed time for one aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowTiming {
    pub passes: u64,
    pub elapsed_ms: f64,
}

impl WindowTiming {
    pub fn new(passes: u64, elapsed: Duration) -> Self {
        Self {
            passes,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Unsynchronized baseline against the live, locked fleet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceComparison {
    pub baseline: WindowTiming,
    pub concurrent: WindowTiming,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub loaded: usize,
    pub rejected: usize,
    pub performance: PerformanceComparison,
    /// Averages after every writer has stopped.
    pub stats: FleetStats,
    pub alerts: Vec<VehicleAlerts>,
    pub writers: usize,
    pub writer_updates: u64,
    pub telemetry: TelemetrySnapshot,
}
