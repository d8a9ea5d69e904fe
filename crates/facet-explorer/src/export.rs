//! CSV and JSON export of evaluation outcomes.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ExplorerError, ExplorerResult};
use crate::evaluation::EvaluationOutcome;

/// One exported line: the item and its selection path, plus the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    /// The classified item.
    pub item: String,
    /// Selected category ids joined with `;`.
    pub path: String,
    /// Expected term name.
    pub expected: String,
    /// 1-based position of the expected term, empty when not found.
    pub position: Option<usize>,
    /// Number of terms in the result.
    pub total: usize,
}

impl From<&EvaluationOutcome> for ExportRow {
    fn from(outcome: &EvaluationOutcome) -> Self {
        Self {
            item: outcome.record.item.clone(),
            path: outcome.record.path(),
            expected: outcome.expected_term.clone(),
            position: outcome.position,
            total: outcome.total,
        }
    }
}

/// Writes outcomes as CSV with a header row.
pub fn write_records<W: Write>(output: W, outcomes: &[EvaluationOutcome]) -> ExplorerResult<()> {
    let mut writer = csv::Writer::from_writer(output);
    for outcome in outcomes {
        writer.serialize(ExportRow::from(outcome))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes outcomes to a CSV file.
pub fn export_records(path: &Path, outcomes: &[EvaluationOutcome]) -> ExplorerResult<()> {
    let file = File::create(path).map_err(|source| ExplorerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_records(file, outcomes)?;
    info!(path = %path.display(), rows = outcomes.len(), "exported records");
    Ok(())
}

/// Reads rows back from exported CSV.
pub fn read_records<R: std::io::Read>(input: R) -> ExplorerResult<Vec<ExportRow>> {
    csv::Reader::from_reader(input)
        .deserialize()
        .map(|row| row.map_err(ExplorerError::from))
        .collect()
}

/// Writes outcomes as a pretty-printed JSON array.
pub fn write_json<W: Write>(output: W, outcomes: &[EvaluationOutcome]) -> ExplorerResult<()> {
    serde_json::to_writer_pretty(output, outcomes)?;
    Ok(())
}
