//! Subtree term aggregation.
//!
//! This module provides the `SubtreeAggregator` struct for collecting every
//! term reachable under a category.

use std::collections::HashSet;

use crate::category::Category;
use crate::taxonomy::Taxonomy;
use crate::term::Term;

/// Collects terms assigned anywhere in a category's subtree.
///
/// Aggregation never touches stored category state; each call builds a new
/// collection. Terms are deduplicated by code and returned in pre-order:
/// the category's own terms first, then each child subtree in child order.
///
/// # Example
///
/// ```ignore
/// let aggregator = SubtreeAggregator::new(&taxonomy);
/// let terms = aggregator.all_terms(taxonomy.category("1").unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SubtreeAggregator<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> SubtreeAggregator<'a> {
    /// Creates an aggregator over the given taxonomy.
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// All terms in the subtree rooted at `category`, each exactly once.
    pub fn all_terms(&self, category: &Category) -> Vec<&'a Term> {
        self.all_term_codes(category)
            .iter()
            .filter_map(|code| self.taxonomy.term(code))
            .collect()
    }

    /// Codes of all terms in the subtree, each exactly once.
    pub fn all_term_codes(&self, category: &Category) -> Vec<String> {
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut codes = Vec::new();

        for node in self.subtree(category) {
            for code in node.term_codes() {
                if seen.insert(code.as_str()) {
                    codes.push(code.clone());
                }
            }
        }

        codes
    }

    /// Number of distinct terms in the subtree.
    pub fn count_terms(&self, category: &Category) -> usize {
        self.all_term_codes(category).len()
    }

    /// Returns true if the term appears anywhere in the subtree.
    pub fn contains_term(&self, category: &Category, code: &str) -> bool {
        self.subtree(category)
            .iter()
            .any(|node| node.term_codes().iter().any(|c| c == code))
    }

    /// The category and all of its descendants, in pre-order.
    pub fn subtree(&self, category: &Category) -> Vec<&'a Category> {
        let mut nodes = Vec::new();
        let Some(start) = self.taxonomy.category(category.id()) else {
            return nodes;
        };

        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            nodes.push(current);
            for child in self.taxonomy.children(current).into_iter().rev() {
                stack.push(child);
            }
        }

        nodes
    }

    /// All descendants, excluding the category itself.
    pub fn descendants(&self, category: &Category) -> Vec<&'a Category> {
        let mut nodes = self.subtree(category);
        if !nodes.is_empty() {
            nodes.remove(0);
        }
        nodes
    }
}
