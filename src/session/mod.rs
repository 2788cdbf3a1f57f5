pub mod monitor;
pub mod report;

pub use monitor::{measure, FleetMonitor, MonitorError};
pub use report::{PerformanceComparison, SessionReport, WindowTiming};
