//! Attribute lookups over categories and terms.
//!
//! Each attribute has its own lookup returning `Option`. [`CategoryKey`] and
//! [`TermKey`] bundle them for callers that pick the attribute at runtime.

use crate::category::Category;
use crate::taxonomy::Taxonomy;
use crate::term::Term;

/// Attribute used to find a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKey<'k> {
    /// Unique id.
    Id(&'k str),
    /// Category code.
    Code(&'k str),
    /// Display name.
    Name(&'k str),
    /// Definition text.
    Definition(&'k str),
    /// Raw path string.
    Path(&'k str),
}

impl<'k> CategoryKey<'k> {
    /// Picks the first supplied key in the order id, code, name, definition,
    /// path. Returns `None` when no key is supplied.
    pub fn first_of(
        id: Option<&'k str>,
        code: Option<&'k str>,
        name: Option<&'k str>,
        definition: Option<&'k str>,
        path: Option<&'k str>,
    ) -> Option<Self> {
        id.map(CategoryKey::Id)
            .or_else(|| code.map(CategoryKey::Code))
            .or_else(|| name.map(CategoryKey::Name))
            .or_else(|| definition.map(CategoryKey::Definition))
            .or_else(|| path.map(CategoryKey::Path))
    }
}

/// Attribute used to find a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKey<'k> {
    /// Unique code.
    Code(&'k str),
    /// Display name.
    Name(&'k str),
    /// Definition text.
    Definition(&'k str),
}

impl<'k> TermKey<'k> {
    /// Picks the first supplied key in the order code, name, definition.
    pub fn first_of(
        code: Option<&'k str>,
        name: Option<&'k str>,
        definition: Option<&'k str>,
    ) -> Option<Self> {
        code.map(TermKey::Code)
            .or_else(|| name.map(TermKey::Name))
            .or_else(|| definition.map(TermKey::Definition))
    }
}

impl Taxonomy {
    /// Finds a category by any supported key.
    pub fn find_category(&self, key: CategoryKey<'_>) -> Option<&Category> {
        match key {
            CategoryKey::Id(id) => self.category(id),
            CategoryKey::Code(code) => self.find_category_by_code(code),
            CategoryKey::Name(name) => self.find_category_by_name(name),
            CategoryKey::Definition(definition) => self.find_category_by_definition(definition),
            CategoryKey::Path(path) => self.find_category_by_path(path),
        }
    }

    /// First category in source order with this code.
    pub fn find_category_by_code(&self, code: &str) -> Option<&Category> {
        self.categories().find(|c| c.code() == Some(code))
    }

    /// First category in source order with this name.
    pub fn find_category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories().find(|c| c.name() == name)
    }

    /// First category in source order with this definition.
    pub fn find_category_by_definition(&self, definition: &str) -> Option<&Category> {
        self.categories().find(|c| c.definition() == definition)
    }

    /// First category in source order with this exact path.
    pub fn find_category_by_path(&self, path: &str) -> Option<&Category> {
        self.categories().find(|c| c.path() == path)
    }

    /// Finds a term by any supported key.
    pub fn find_term(&self, key: TermKey<'_>) -> Option<&Term> {
        match key {
            TermKey::Code(code) => self.term(code),
            TermKey::Name(name) => self.find_term_by_name(name),
            TermKey::Definition(definition) => self.find_term_by_definition(definition),
        }
    }

    /// First term in source order with this name.
    pub fn find_term_by_name(&self, name: &str) -> Option<&Term> {
        self.term_store().find_by_name(name)
    }

    /// First term in source order with this definition.
    pub fn find_term_by_definition(&self, definition: &str) -> Option<&Term> {
        self.term_store().find_by_definition(definition)
    }
}
