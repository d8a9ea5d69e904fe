//! Error types for taxonomy construction.

use thiserror::Error;

/// Errors that can occur while building a taxonomy.
///
/// Construction is all-or-nothing: when any of these is returned, no
/// partially linked taxonomy exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    /// A category references a term code that is not in the term store.
    #[error("category {category} references unknown term {code}")]
    UnknownTerm {
        /// Id of the referencing category.
        category: String,
        /// The missing term code.
        code: String,
    },

    /// A category path names a parent id that is not in the category map.
    #[error("category {category} has unknown parent {parent}")]
    UnknownParent {
        /// Id of the child category.
        category: String,
        /// The parent id derived from the path.
        parent: String,
    },

    /// Two category records share the same id.
    #[error("duplicate category id: {0}")]
    DuplicateCategory(String),

    /// Two term records share the same code.
    #[error("duplicate term code: {0}")]
    DuplicateTerm(String),

    /// Parent links derived from the paths loop back on themselves.
    #[error("category {0} is its own ancestor")]
    CyclicPath(String),
}

/// Result type for taxonomy operations.
pub type TaxonomyResult<T> = std::result::Result<T, TaxonomyError>;
