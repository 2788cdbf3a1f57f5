//! Concurrent telemetry aggregation core.
//!
//! # LOCKING DISCIPLINE
//! - Each record's readings sit behind that record's own lock, taken for a
//!   single field access at a time.
//! - The fleet's membership lock is taken only to append or to clone the
//!   member handles. It is **never** held while a record lock is held.
//! - No lock is held across an `.await`.
//!
//! Membership is built first, then frozen while writers run.

pub mod aggregator;
pub mod collection;
pub mod error;
pub mod record;
pub mod writer;

pub use aggregator::{
    check_alerts, check_alerts_with, Aggregator, Alert, AlertThresholds, FleetStats, Statistic,
    VehicleAlerts,
};
pub use collection::{Fleet, FleetSnapshot, RecordHandle};
pub use error::FleetError;
pub use record::{Access, Locked, Readings, TelemetryRecord, Unsynchronized, VehicleId};
pub use writer::{
    RandomReadings, ReadingRanges, ReadingSource, ValueRange, WriterPool, WriterSummary, WriterTask,
};
