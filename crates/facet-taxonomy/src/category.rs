//! Category records and linked category nodes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A raw category ("collective term") record as handed over by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoryRecord {
    /// Unique category id.
    pub id: String,
    /// Optional code. Records without a code are roots.
    pub code: Option<String>,
    /// Display name.
    pub name: String,
    /// Free-text definition, shown as help during traversal.
    pub definition: String,
    /// Slash-delimited ancestor id chain, e.g. `/10/20/30/`.
    pub path: String,
    /// Codes of the terms assigned directly to this category, in source order.
    pub term_codes: Vec<String>,
}

impl CategoryRecord {
    /// Creates a record with no code and no terms.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        definition: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            code: None,
            name: name.into(),
            definition: definition.into(),
            path: path.into(),
            term_codes: Vec::new(),
        }
    }

    /// Sets the category code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Appends directly assigned term codes.
    pub fn with_terms<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.term_codes.extend(codes.into_iter().map(Into::into));
        self
    }
}

/// A linked taxonomy node.
///
/// Relationships are stored as ids; the owning [`Taxonomy`](crate::Taxonomy)
/// resolves them. `parent` is a non-owning back-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Category {
    pub(crate) id: String,
    pub(crate) code: Option<String>,
    pub(crate) name: String,
    pub(crate) definition: String,
    pub(crate) path: String,
    pub(crate) parent: Option<String>,
    pub(crate) children: Vec<String>,
    pub(crate) terms: Vec<String>,
}

impl Category {
    pub(crate) fn from_record(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            code: record.code,
            name: record.name,
            definition: record.definition,
            path: record.path,
            parent: None,
            children: Vec::new(),
            terms: Vec::new(),
        }
    }

    /// Unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Informational code; `None` marks a root.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text definition.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Raw ancestor path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Id of the parent category, if one was resolved from the path.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Child ids in source order.
    pub fn child_ids(&self) -> &[String] {
        &self.children
    }

    /// Codes of directly assigned terms (not inherited), deduplicated.
    pub fn term_codes(&self) -> &[String] {
        &self.terms
    }

    /// Returns true if the category has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if the category has no code, i.e. it is listed as a root.
    pub fn is_codeless(&self) -> bool {
        self.code.is_none()
    }

    pub(crate) fn assign_term(&mut self, code: &str) {
        if !self.terms.iter().any(|existing| existing == code) {
            self.terms.push(code.to_string());
        }
    }
}

/// Derives the parent id of category `id` from its `path`.
///
/// Finds the last occurrence of `/{id}/`, cuts the path there, and returns
/// the trailing segment of what remains. Returns `None` when the path does
/// not contain the id or when nothing precedes it.
///
/// ```
/// use facet_taxonomy::derive_parent_id;
///
/// assert_eq!(derive_parent_id("30", "/10/20/30/"), Some("20"));
/// assert_eq!(derive_parent_id("10", "/10/"), None);
/// assert_eq!(derive_parent_id("10", "garbage"), None);
/// ```
pub fn derive_parent_id<'p>(id: &str, path: &'p str) -> Option<&'p str> {
    let needle = format!("/{id}/");
    let cut = path.rfind(&needle)?;
    let remainder = &path[..cut];
    let parent = match remainder.rfind('/') {
        Some(slash) => &remainder[slash + 1..],
        None => remainder,
    };
    if parent.is_empty() {
        None
    } else {
        Some(parent)
    }
}
