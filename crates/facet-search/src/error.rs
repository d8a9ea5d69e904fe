//! Error types for search and traversal.

use thiserror::Error;

/// Errors that can occur while searching or driving a traversal session.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A selection referenced a category id the taxonomy does not contain.
    #[error("category not found: {0}")]
    UnknownCategory(String),

    /// The event source ran out of input before the session finished.
    #[error("input closed before the session finished")]
    InputClosed,

    /// Error reported by the event source (console, widget bridge, ...).
    #[error("event source error: {0}")]
    Source(String),
}

/// Result type for search operations.
pub type SearchOutcome<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_category() {
        let err = SearchError::UnknownCategory("1003".to_string());
        assert_eq!(err.to_string(), "category not found: 1003");
    }

    #[test]
    fn test_error_display_input_closed() {
        assert_eq!(
            SearchError::InputClosed.to_string(),
            "input closed before the session finished"
        );
    }

    #[test]
    fn test_error_display_source() {
        let err = SearchError::Source("stdin: broken pipe".to_string());
        assert_eq!(err.to_string(), "event source error: stdin: broken pipe");
    }
}
