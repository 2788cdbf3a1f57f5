use thiserror::Error;

use crate::fleet::VehicleId;

/// Per-line ingestion failures. Each one drops a single line; none abort a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("line {line}: malformed record: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: invalid field: {reason}")]
    InvalidField { line: usize, reason: String },

    #[error("line {line}: duplicate vehicle id {id}")]
    DuplicateId { line: usize, id: VehicleId },
}

impl IngestError {
    /// 1-based line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            IngestError::Malformed { line, .. }
            | IngestError::InvalidField { line, .. }
            | IngestError::DuplicateId { line, .. } => *line,
        }
    }
}
