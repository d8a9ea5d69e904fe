//! Search engine implementation.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;

use facet_taxonomy::{Category, SubtreeAggregator, Taxonomy, Term};
use tracing::debug;

use crate::cache::AggregateCache;
use crate::config::{SearchConfig, SearchMode};
use crate::error::{SearchError, SearchOutcome};
use crate::result::{RankedTerm, SearchResult, SearchStats};

/// Ranks and filters terms for a selection of categories.
///
/// Each selected category is expanded to the terms of its whole subtree.
/// [`SearchMode::Ranked`] merges the expansions and orders terms by how many
/// selections contain them; [`SearchMode::Strict`] keeps only active terms
/// contained in every selection.
///
/// # Example
///
/// ```ignore
/// use facet_search::{SearchEngine, SearchMode};
///
/// let engine = SearchEngine::new(&taxonomy);
/// let selection = vec![taxonomy.category("10").unwrap(), taxonomy.category("20").unwrap()];
///
/// let ranked = engine.search(&selection, SearchMode::Ranked);
/// let strict = engine.search(&selection, SearchMode::Strict);
/// ```
pub struct SearchEngine<'a> {
    /// The taxonomy searched.
    taxonomy: &'a Taxonomy,
    /// Engine configuration.
    config: SearchConfig,
    /// Aggregate cache (optional).
    cache: Option<Arc<AggregateCache>>,
}

impl<'a> SearchEngine<'a> {
    /// Creates an engine with default configuration.
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            config: SearchConfig::default(),
            cache: None,
        }
    }

    /// Creates an engine with custom configuration.
    pub fn with_config(taxonomy: &'a Taxonomy, config: SearchConfig) -> Self {
        let cache = config
            .cache
            .as_ref()
            .map(|c| Arc::new(AggregateCache::new(c.clone())));
        Self {
            taxonomy,
            config,
            cache,
        }
    }

    /// The taxonomy this engine searches.
    pub fn taxonomy(&self) -> &'a Taxonomy {
        self.taxonomy
    }

    /// Returns a reference to the engine configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns a reference to the cache if enabled.
    pub fn cache(&self) -> Option<&AggregateCache> {
        self.cache.as_deref()
    }

    /// All terms in the subtree of `category`, each once.
    pub fn all_terms(&self, category: &Category) -> Vec<&'a Term> {
        self.aggregate(category)
            .0
            .iter()
            .filter_map(|code| self.taxonomy.term(code))
            .collect()
    }

    /// Searches with the configured mode.
    pub fn run(&self, selection: &[&Category]) -> SearchResult<'a> {
        self.search(selection, self.config.mode)
    }

    /// Searches a selection of categories.
    ///
    /// An empty selection yields an empty result in both modes.
    pub fn search(&self, selection: &[&Category], mode: SearchMode) -> SearchResult<'a> {
        let start = Instant::now();

        if selection.is_empty() {
            return SearchResult::empty(mode);
        }

        let mut cache_hits = 0;
        let expansions: Vec<Vec<String>> = selection
            .iter()
            .map(|category| {
                let (codes, hit) = self.aggregate(category);
                if hit {
                    cache_hits += 1;
                }
                codes
            })
            .collect();

        let terms = match mode {
            SearchMode::Ranked => self.rank(&expansions),
            SearchMode::Strict => self.intersect(&expansions),
        };

        let stats = SearchStats::new(start.elapsed(), selection.len(), cache_hits);
        debug!(
            ?mode,
            selected = selection.len(),
            results = terms.len(),
            cache_hits,
            "search finished"
        );
        SearchResult::new(terms, mode, stats)
    }

    /// Searches a selection given by category ids.
    ///
    /// # Errors
    ///
    /// [`SearchError::UnknownCategory`] if an id is not in the taxonomy.
    pub fn search_ids<S: AsRef<str>>(
        &self,
        ids: &[S],
        mode: SearchMode,
    ) -> SearchOutcome<SearchResult<'a>> {
        let selection = ids
            .iter()
            .map(|id| {
                self.taxonomy
                    .category(id.as_ref())
                    .ok_or_else(|| SearchError::UnknownCategory(id.as_ref().to_string()))
            })
            .collect::<SearchOutcome<Vec<&Category>>>()?;
        Ok(self.search(&selection, mode))
    }

    /// Renders the top of a result as text, one `code: name` line per term.
    pub fn summary(&self, result: &SearchResult<'_>) -> String {
        let limit = self.config.display_limit;
        let mut out = String::new();

        if result.len() < limit {
            out.push_str("These are your results:\n");
        } else {
            let _ = writeln!(out, "These are your top {limit} results:");
        }
        for ranked in result.top(limit) {
            let _ = writeln!(out, "{}: {}", ranked.term.code, ranked.term.name);
        }

        out
    }

    /// Expands a category to its subtree term codes; the flag reports a cache hit.
    fn aggregate(&self, category: &Category) -> (Vec<String>, bool) {
        if let Some(ref cache) = self.cache {
            if let Some(codes) = cache.get(category.id()) {
                return (codes, true);
            }
        }

        let codes = SubtreeAggregator::new(self.taxonomy).all_term_codes(category);

        if let Some(ref cache) = self.cache {
            cache.set(category.id().to_string(), codes.clone());
        }

        (codes, false)
    }

    /// Union ranked by multiplicity; ties keep first-occurrence order.
    fn rank(&self, expansions: &[Vec<String>]) -> Vec<RankedTerm<'a>> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for code in expansions.iter().flatten() {
            let count = counts.entry(code.as_str()).or_insert(0);
            if *count == 0 {
                order.push(code.as_str());
            }
            *count += 1;
        }

        let mut ranked: Vec<RankedTerm<'a>> = order
            .into_iter()
            .filter_map(|code| {
                self.taxonomy.term(code).map(|term| RankedTerm {
                    term,
                    hits: counts[code],
                })
            })
            .collect();

        // stable sort keeps first-occurrence order among equal counts
        ranked.sort_by(|a, b| b.hits.cmp(&a.hits));
        ranked
    }

    /// Active terms common to every expansion, ordered by code.
    fn intersect(&self, expansions: &[Vec<String>]) -> Vec<RankedTerm<'a>> {
        let Some((first, rest)) = expansions.split_first() else {
            return Vec::new();
        };

        let mut common: HashSet<&str> = first.iter().map(String::as_str).collect();
        for expansion in rest {
            let next: HashSet<&str> = expansion.iter().map(String::as_str).collect();
            common.retain(|code| next.contains(code));
        }

        let mut terms: Vec<RankedTerm<'a>> = common
            .into_iter()
            .filter_map(|code| self.taxonomy.term(code))
            .filter(|term| term.is_active())
            .map(|term| RankedTerm {
                term,
                hits: expansions.len(),
            })
            .collect();

        terms.sort_by(|a, b| a.term.code.cmp(&b.term.code));
        terms
    }
}
