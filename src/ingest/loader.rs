use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use super::error::IngestError;
use super::parser::{parse_line, ParsedRecord};

/// Outcome of loading one input source.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Accepted records in input order.
    pub records: Vec<ParsedRecord>,
    /// One entry per dropped line.
    pub rejected: Vec<IngestError>,
    /// Lines seen, blank ones included.
    pub lines_read: usize,
}

impl IngestReport {
    pub fn loaded(&self) -> usize {
        self.records.len()
    }

    pub fn skipped(&self) -> usize {
        self.rejected.len()
    }
}

/// Reads every line, dropping bad ones with a diagnostic. Only an I/O
/// failure of the reader itself aborts the load.
pub fn load_from_reader<R: BufRead>(reader: R) -> io::Result<IngestReport> {
    let mut report = IngestReport::default();
    let mut seen = HashSet::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        report.lines_read = line_no;

        if line.trim().is_empty() {
            continue;
        }

        let parsed = parse_line(&line, line_no).and_then(|record| {
            if seen.insert(record.id) {
                Ok(record)
            } else {
                Err(IngestError::DuplicateId {
                    line: line_no,
                    id: record.id,
                })
            }
        });

        match parsed {
            Ok(record) => report.records.push(record),
            Err(e) => {
                warn!(line = line_no, "Skipping telemetry line: {}", e);
                report.rejected.push(e);
            }
        }
    }

    debug!(
        loaded = report.loaded(),
        skipped = report.skipped(),
        "Ingestion finished"
    );
    Ok(report)
}

pub fn load_from_path(path: impl AsRef<Path>) -> io::Result<IngestReport> {
    let file = File::open(path)?;
    load_from_reader(BufReader::new(file))
}
