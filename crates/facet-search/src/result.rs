//! Search result types.

use std::time::Duration;

use facet_taxonomy::Term;

use crate::config::SearchMode;

/// A term together with the number of selected categories containing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedTerm<'a> {
    /// The matching term.
    pub term: &'a Term,
    /// How many selected categories contain the term in their subtree.
    pub hits: usize,
}

/// Result of a search.
///
/// Terms are kept in result order: ranked mode orders them by descending hit
/// count, strict mode by term code.
///
/// # Example
///
/// ```ignore
/// let result = engine.search(&selection, SearchMode::Ranked);
///
/// for ranked in result.top(5) {
///     println!("{}: {}", ranked.term.code, ranked.term.name);
/// }
///
/// if let Some(position) = result.position_of_name("Scalpel") {
///     println!("found at position {position}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    /// Matching terms in result order.
    pub terms: Vec<RankedTerm<'a>>,
    /// Mode that produced the result.
    pub mode: SearchMode,
    /// Execution statistics.
    pub stats: SearchStats,
}

impl<'a> SearchResult<'a> {
    /// Creates a new result.
    pub fn new(terms: Vec<RankedTerm<'a>>, mode: SearchMode, stats: SearchStats) -> Self {
        Self { terms, mode, stats }
    }

    /// Creates an empty result.
    pub fn empty(mode: SearchMode) -> Self {
        Self {
            terms: Vec::new(),
            mode,
            stats: SearchStats::default(),
        }
    }

    /// Returns the number of matching terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterates matching terms in result order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Term> + '_ {
        self.terms.iter().map(|ranked| ranked.term)
    }

    /// The first `n` ranked terms.
    pub fn top(&self, n: usize) -> &[RankedTerm<'a>] {
        &self.terms[..n.min(self.terms.len())]
    }

    /// Term codes in result order.
    pub fn codes(&self) -> Vec<&'a str> {
        self.terms.iter().map(|ranked| ranked.term.code.as_str()).collect()
    }

    /// Returns true if a term with this code is in the result.
    pub fn contains(&self, code: &str) -> bool {
        self.terms.iter().any(|ranked| ranked.term.code == code)
    }

    /// 1-based position of the term with this code.
    pub fn position_of(&self, code: &str) -> Option<usize> {
        self.terms
            .iter()
            .position(|ranked| ranked.term.code == code)
            .map(|index| index + 1)
    }

    /// 1-based position of the first term with this name.
    pub fn position_of_name(&self, name: &str) -> Option<usize> {
        self.terms
            .iter()
            .position(|ranked| ranked.term.name == name)
            .map(|index| index + 1)
    }
}

impl<'a> IntoIterator for SearchResult<'a> {
    type Item = RankedTerm<'a>;
    type IntoIter = std::vec::IntoIter<RankedTerm<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

/// Statistics from a search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total search duration.
    pub duration: Duration,
    /// Number of selected categories that were aggregated.
    pub categories_expanded: usize,
    /// Number of aggregations served from the cache.
    pub cache_hits: usize,
}

impl SearchStats {
    /// Creates new search stats.
    pub fn new(duration: Duration, categories_expanded: usize, cache_hits: usize) -> Self {
        Self {
            duration,
            categories_expanded,
            cache_hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_taxonomy::TermStatus;

    fn terms() -> Vec<Term> {
        vec![
            Term::new("B2", "Forceps", "", TermStatus::Active),
            Term::new("A1", "Scalpel", "", TermStatus::Active),
            Term::new("C3", "Scalpel", "", TermStatus::Obsolete),
        ]
    }

    fn result(terms: &[Term]) -> SearchResult<'_> {
        let ranked = terms
            .iter()
            .enumerate()
            .map(|(i, term)| RankedTerm {
                term,
                hits: terms.len() - i,
            })
            .collect();
        SearchResult::new(ranked, SearchMode::Ranked, SearchStats::default())
    }

    #[test]
    fn test_empty_result() {
        let result = SearchResult::empty(SearchMode::Strict);
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
        assert_eq!(result.mode, SearchMode::Strict);
        assert!(result.top(5).is_empty());
    }

    #[test]
    fn test_positions_are_one_based() {
        let terms = terms();
        let result = result(&terms);
        assert_eq!(result.position_of("B2"), Some(1));
        assert_eq!(result.position_of("C3"), Some(3));
        assert_eq!(result.position_of("Z9"), None);
    }

    #[test]
    fn test_position_of_name_uses_first_match() {
        let terms = terms();
        let result = result(&terms);
        assert_eq!(result.position_of_name("Scalpel"), Some(2));
        assert_eq!(result.position_of_name("Retractor"), None);
    }

    #[test]
    fn test_top_clamps_to_len() {
        let terms = terms();
        let result = result(&terms);
        assert_eq!(result.top(2).len(), 2);
        assert_eq!(result.top(10).len(), 3);
    }

    #[test]
    fn test_codes_and_contains() {
        let terms = terms();
        let result = result(&terms);
        assert_eq!(result.codes(), vec!["B2", "A1", "C3"]);
        assert!(result.contains("A1"));
        assert!(!result.contains("D4"));
    }

    #[test]
    fn test_into_iter_keeps_hits() {
        let terms = terms();
        let hits: Vec<usize> = result(&terms).into_iter().map(|r| r.hits).collect();
        assert_eq!(hits, vec![3, 2, 1]);
    }

    #[test]
    fn test_search_stats() {
        let stats = SearchStats::new(Duration::from_millis(3), 2, 1);
        assert_eq!(stats.duration, Duration::from_millis(3));
        assert_eq!(stats.categories_expanded, 2);
        assert_eq!(stats.cache_hits, 1);
    }
}
