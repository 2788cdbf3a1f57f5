use thiserror::Error;

use super::aggregator::Statistic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FleetError {
    /// No records to average over. Recoverable: report and skip, or wait for data.
    #[error("fleet is empty, cannot compute average {statistic}")]
    EmptyFleet { statistic: Statistic },
}
