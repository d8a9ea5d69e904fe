//! Error types for loading, exporting and driving the explorer.

use std::path::PathBuf;

use facet_search::SearchError;
use facet_taxonomy::TaxonomyError;
use thiserror::Error;

/// Errors raised by the explorer's I/O layer.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// I/O error while opening or writing a file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML input.
    #[error("XML error in {source_name}: {message}")]
    Xml {
        /// Name of the input (file path or label).
        source_name: String,
        /// Parser message including the byte position.
        message: String,
    },

    /// A record lacks a mandatory field.
    #[error("{record} is missing required field <{field}>")]
    MissingField {
        /// Human readable record locator.
        record: String,
        /// Field name.
        field: &'static str,
    },

    /// CSV read or write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Taxonomy construction failed.
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    /// Search or traversal failed.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Result type for explorer operations.
pub type ExplorerResult<T> = std::result::Result<T, ExplorerError>;
