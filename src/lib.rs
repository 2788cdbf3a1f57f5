pub mod config;
pub mod fleet;
pub mod ingest;
pub mod session;
pub mod telemetry;

// Re-exports for the binary and integration tests
pub use config::MonitorConfig;
pub use fleet::{Aggregator, Alert, Fleet, FleetError, TelemetryRecord};
pub use session::FleetMonitor;
