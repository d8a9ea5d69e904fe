//! Exportable records of completed sessions.

use facet_taxonomy::Category;

/// Separator used when a selection is flattened into a single field.
pub const PATH_SEPARATOR: &str = ";";

/// The categories chosen for one classified item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionRecord {
    /// Identifier or description of the classified item.
    pub item: String,
    /// Ids of the selected categories, in root order.
    pub selected_category_ids: Vec<String>,
}

impl SessionRecord {
    /// Builds a record from a selection.
    pub fn from_selection(item: impl Into<String>, selection: &[&Category]) -> Self {
        Self {
            item: item.into(),
            selected_category_ids: selection.iter().map(|c| c.id().to_string()).collect(),
        }
    }

    /// Selected ids joined with [`PATH_SEPARATOR`].
    pub fn path(&self) -> String {
        self.selected_category_ids.join(PATH_SEPARATOR)
    }

    /// Parses a record from an item and a joined path.
    pub fn from_path(item: impl Into<String>, path: &str) -> Self {
        Self {
            item: item.into(),
            selected_category_ids: path
                .split(PATH_SEPARATOR)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Returns true if nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.selected_category_ids.is_empty()
    }
}
