use std::io;

use thiserror::Error;

use crate::types::{ColumnName, DatasetName, FileNumber};

/// Error type for dataset loading, validation, and output failures.
///
/// Join misses are not errors: unmatched rows are routed to the missing
/// side-output and counted in the pipeline report.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A dataset could not be read or fetched.
    #[error("dataset '{dataset}' is unavailable: {reason}")]
    DatasetUnavailable {
        /// Dataset label.
        dataset: DatasetName,
        /// Underlying failure.
        reason: String,
    },
    /// A required column is absent from a dataset header.
    #[error("dataset '{dataset}' is missing required column '{column}'")]
    MissingColumn {
        /// Dataset label.
        dataset: DatasetName,
        /// Header that was expected.
        column: ColumnName,
    },
    /// A row could not be parsed.
    #[error("dataset '{dataset}' row {row} is malformed: {reason}")]
    MalformedRow {
        /// Dataset label.
        dataset: DatasetName,
        /// One-based data row; 0 is the header.
        row: usize,
        /// Parser message.
        reason: String,
    },
    /// A case carries an occurrence date in no known layout.
    #[error("case '{file_number}' has an unparseable occurrence date '{value}'")]
    MalformedDate {
        /// Case whose date failed.
        file_number: FileNumber,
        /// Date text as read.
        value: String,
    },
    /// The link mapping document has the wrong shape.
    #[error("case link mapping is invalid: {0}")]
    LinkMapping(String),
    /// Invalid configuration or arguments.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// CSV writer failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
