//! Terms and the flat term store.

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TaxonomyError, TaxonomyResult};

/// Lifecycle status of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TermStatus {
    /// Term is current and may be returned by strict searches.
    Active,
    /// Term is retired; default searches still rank it.
    Obsolete,
}

impl TermStatus {
    /// Maps a source status label to a status.
    ///
    /// Only `Active` (any case) is active; every other label, including an
    /// empty one, is treated as obsolete.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("active") {
            TermStatus::Active
        } else {
            TermStatus::Obsolete
        }
    }

    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TermStatus::Active => "Active",
            TermStatus::Obsolete => "Obsolete",
        }
    }
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leaf classification record.
///
/// Terms are identified by `code`; two terms with equal codes are the same
/// term everywhere in the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Term {
    /// Unique term code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Free-text definition.
    pub definition: String,
    /// Active/obsolete status.
    pub status: TermStatus,
}

impl Term {
    /// Creates a new term.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        definition: impl Into<String>,
        status: TermStatus,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            definition: definition.into(),
            status,
        }
    }

    /// Returns true if the term is active.
    pub fn is_active(&self) -> bool {
        self.status == TermStatus::Active
    }
}

/// Flat mapping from term code to [`Term`], remembering source order.
#[derive(Debug, Clone, Default)]
pub struct TermStore {
    terms: HashMap<String, Term>,
    order: Vec<String>,
}

impl TermStore {
    /// Builds a store from term records.
    ///
    /// Fails with [`TaxonomyError::DuplicateTerm`] if two records share a code.
    pub fn from_terms<I>(terms: I) -> TaxonomyResult<Self>
    where
        I: IntoIterator<Item = Term>,
    {
        let mut store = TermStore::default();
        for term in terms {
            if store.terms.contains_key(&term.code) {
                return Err(TaxonomyError::DuplicateTerm(term.code));
            }
            store.order.push(term.code.clone());
            store.terms.insert(term.code.clone(), term);
        }
        Ok(store)
    }

    /// Looks up a term by code.
    pub fn get(&self, code: &str) -> Option<&Term> {
        self.terms.get(code)
    }

    /// Returns true if a term with this code exists.
    pub fn contains(&self, code: &str) -> bool {
        self.terms.contains_key(code)
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the store holds no terms.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates terms in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.order.iter().filter_map(|code| self.terms.get(code))
    }

    /// First term (in source order) whose name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Option<&Term> {
        self.iter().find(|term| term.name == name)
    }

    /// First term (in source order) whose definition matches exactly.
    pub fn find_by_definition(&self, definition: &str) -> Option<&Term> {
        self.iter().find(|term| term.definition == definition)
    }
}
