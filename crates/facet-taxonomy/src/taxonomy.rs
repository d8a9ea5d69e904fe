//! Taxonomy construction and navigation.
//!
//! A [`Taxonomy`] is built once from term records and category records and is
//! read-only afterwards. Parent links are recovered from each category's
//! path string; children keep source order because that order numbers the
//! menus shown to users.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::category::{derive_parent_id, Category, CategoryRecord};
use crate::error::{TaxonomyError, TaxonomyResult};
use crate::term::{Term, TermStore};

/// A disagreement between a category's root marker and its resolved parent.
///
/// Roots are the codeless categories. Nothing in the source data forces
/// "codeless" and "parentless" to coincide, so both mismatches are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Codeless category that also resolved a parent: it is listed as a root
    /// and linked as a child at the same time.
    CodelessWithParent {
        /// Id of the category.
        category: String,
        /// Id of the resolved parent.
        parent: String,
    },
    /// Category with a code but no parent: unreachable from any root.
    ParentlessWithCode {
        /// Id of the category.
        category: String,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::CodelessWithParent { category, parent } => write!(
                f,
                "category {category} has no code but its path names parent {parent}"
            ),
            Anomaly::ParentlessWithCode { category } => write!(
                f,
                "category {category} has a code but no parent and is unreachable"
            ),
        }
    }
}

/// The complete category forest plus its term store.
///
/// # Example
///
/// ```
/// use facet_taxonomy::{CategoryRecord, Taxonomy, Term, TermStatus};
///
/// let taxonomy = Taxonomy::build(
///     vec![Term::new("T1", "Scalpel", "A small knife", TermStatus::Active)],
///     vec![
///         CategoryRecord::new("1", "Cutting", "Devices that cut", "/1/"),
///         CategoryRecord::new("2", "Blades", "Bladed devices", "/1/2/")
///             .with_code("x")
///             .with_terms(["T1"]),
///     ],
/// )?;
///
/// let root = taxonomy.roots()[0];
/// assert_eq!(root.name(), "Cutting");
/// assert_eq!(taxonomy.children(root)[0].id(), "2");
/// # Ok::<(), facet_taxonomy::TaxonomyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Taxonomy {
    terms: TermStore,
    categories: HashMap<String, Category>,
    order: Vec<String>,
    roots: Vec<String>,
    anomalies: Vec<Anomaly>,
}

impl Taxonomy {
    /// Builds a linked taxonomy.
    ///
    /// # Errors
    ///
    /// - [`TaxonomyError::DuplicateTerm`] / [`TaxonomyError::DuplicateCategory`]
    ///   on repeated keys
    /// - [`TaxonomyError::UnknownTerm`] if a category lists a missing term code
    /// - [`TaxonomyError::UnknownParent`] if a path names a missing parent
    /// - [`TaxonomyError::CyclicPath`] if parent links form a loop
    pub fn build<T, C>(terms: T, categories: C) -> TaxonomyResult<Self>
    where
        T: IntoIterator<Item = Term>,
        C: IntoIterator<Item = CategoryRecord>,
    {
        let terms = TermStore::from_terms(terms)?;

        let mut nodes: HashMap<String, Category> = HashMap::new();
        let mut order = Vec::new();
        let mut roots = Vec::new();

        for mut record in categories {
            if nodes.contains_key(&record.id) {
                return Err(TaxonomyError::DuplicateCategory(record.id));
            }
            let term_codes = std::mem::take(&mut record.term_codes);
            let mut category = Category::from_record(record);
            for code in &term_codes {
                if !terms.contains(code) {
                    return Err(TaxonomyError::UnknownTerm {
                        category: category.id.clone(),
                        code: code.clone(),
                    });
                }
                category.assign_term(code);
            }
            if category.is_codeless() {
                roots.push(category.id.clone());
            }
            order.push(category.id.clone());
            nodes.insert(category.id.clone(), category);
        }

        // Resolve every parent before linking so an error leaves nothing half-built.
        let mut links: Vec<(String, String)> = Vec::new();
        for id in &order {
            let category = &nodes[id];
            if let Some(parent) = derive_parent_id(&category.id, &category.path) {
                if !nodes.contains_key(parent) {
                    return Err(TaxonomyError::UnknownParent {
                        category: id.clone(),
                        parent: parent.to_string(),
                    });
                }
                links.push((id.clone(), parent.to_string()));
            }
        }

        for (child, parent) in &links {
            if let Some(node) = nodes.get_mut(child) {
                node.parent = Some(parent.clone());
            }
            if let Some(node) = nodes.get_mut(parent) {
                node.children.push(child.clone());
            }
        }

        check_acyclic(&nodes, &order)?;
        let anomalies = collect_anomalies(&nodes, &order);
        for anomaly in &anomalies {
            warn!(?anomaly, "category root marker disagrees with its path");
        }

        debug!(
            terms = terms.len(),
            categories = order.len(),
            roots = roots.len(),
            links = links.len(),
            "built taxonomy"
        );

        Ok(Self {
            terms,
            categories: nodes,
            order,
            roots,
            anomalies,
        })
    }

    /// The term store.
    pub fn term_store(&self) -> &TermStore {
        &self.terms
    }

    /// Looks up a term by code.
    pub fn term(&self, code: &str) -> Option<&Term> {
        self.terms.get(code)
    }

    /// Iterates terms in source order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    /// Number of terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Looks up a category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    /// Iterates categories in source order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.order.iter().filter_map(|id| self.categories.get(id))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the taxonomy has no categories.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Root categories (the codeless ones) in source order.
    pub fn roots(&self) -> Vec<&Category> {
        self.roots
            .iter()
            .filter_map(|id| self.categories.get(id))
            .collect()
    }

    /// Direct children of a category in source order.
    pub fn children(&self, category: &Category) -> Vec<&Category> {
        category
            .children
            .iter()
            .filter_map(|id| self.categories.get(id))
            .collect()
    }

    /// The parent of a category, if any.
    pub fn parent(&self, category: &Category) -> Option<&Category> {
        category
            .parent
            .as_deref()
            .and_then(|id| self.categories.get(id))
    }

    /// Ancestors from the direct parent up to the top of the branch.
    pub fn ancestors(&self, category: &Category) -> Vec<&Category> {
        let mut chain = Vec::new();
        let mut current = self.parent(category);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Number of parent links between a category and the top of its branch.
    pub fn depth(&self, category: &Category) -> usize {
        self.ancestors(category).len()
    }

    /// Terms assigned directly to a category (not inherited).
    pub fn direct_terms(&self, category: &Category) -> Vec<&Term> {
        category
            .terms
            .iter()
            .filter_map(|code| self.terms.get(code))
            .collect()
    }

    /// Root marker mismatches found while building.
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }
}

fn check_acyclic(nodes: &HashMap<String, Category>, order: &[String]) -> TaxonomyResult<()> {
    let limit = order.len();
    for id in order {
        let mut steps = 0;
        let mut current = nodes.get(id).and_then(|c| c.parent.as_deref());
        while let Some(parent) = current {
            steps += 1;
            if parent == id || steps > limit {
                return Err(TaxonomyError::CyclicPath(id.clone()));
            }
            current = nodes.get(parent).and_then(|c| c.parent.as_deref());
        }
    }
    Ok(())
}

fn collect_anomalies(nodes: &HashMap<String, Category>, order: &[String]) -> Vec<Anomaly> {
    order
        .iter()
        .filter_map(|id| nodes.get(id))
        .filter_map(|category| match (&category.code, &category.parent) {
            (None, Some(parent)) => Some(Anomaly::CodelessWithParent {
                category: category.id.clone(),
                parent: parent.clone(),
            }),
            (Some(_), None) => Some(Anomaly::ParentlessWithCode {
                category: category.id.clone(),
            }),
            _ => None,
        })
        .collect()
}
