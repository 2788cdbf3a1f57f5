//! Run instrumentation.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read by the aggregation core or by writer tasks.
//! It exists solely for reporting and verification.
//!
//! # CONTENT INVARIANT
//! Events must **NEVER** contain raw input lines.
//! Only vehicle ids, line numbers, kinds, durations and counts are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{AggregationMode, FleetEvent, RejectionKind};
pub use metrics::{compute_snapshot, TelemetrySnapshot};
pub use recorder::{SharedRecorder, TelemetryRecorder};
