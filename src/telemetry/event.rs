use serde::{Deserialize, Serialize};

use crate::fleet::{Alert, Statistic, VehicleId};
use crate::ingest::IngestError;

// Allowed: IDs, Line Numbers, Durations, Counts, Enums
// Forbidden: Raw input lines, parse error text

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FleetEvent {
    RecordLoaded {
        vehicle_id: VehicleId,
    },

    RecordRejected {
        line: usize,
        kind: RejectionKind,
    },

    WriterStarted {
        vehicle_id: VehicleId,
    },

    WriterStopped {
        vehicle_id: VehicleId,
        updates: u64,
    },

    AggregationWindow {
        mode: AggregationMode,
        passes: u64,
        elapsed_us: u64,
    },

    AggregationFailed {
        statistic: Statistic,
    },

    AlertRaised {
        vehicle_id: VehicleId,
        alert: Alert,
    },

    SessionCompleted {
        vehicles: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionKind {
    Malformed,
    InvalidField,
    DuplicateId,
}

/// Which fleet an aggregation window ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationMode {
    /// Unsynchronized records, no writers.
    Baseline,
    /// Locked records with writers running.
    Concurrent,
}

impl From<&IngestError> for RejectionKind {
    fn from(err: &IngestError) -> Self {
        match err {
            IngestError::Malformed { .. } => RejectionKind::Malformed,
            IngestError::InvalidField { .. } => RejectionKind::InvalidField,
            IngestError::DuplicateId { .. } => RejectionKind::DuplicateId,
        }
    }
}
