//! Configuration types for the search engine.

/// How selected categories are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchMode {
    /// Union of the aggregated terms, ranked by how many selections contain
    /// each term.
    #[default]
    Ranked,
    /// Intersection of the aggregated terms, active terms only.
    Strict,
}

/// Configuration for the search engine.
///
/// # Example
///
/// ```rust
/// use facet_search::{CacheConfig, SearchConfig, SearchMode};
///
/// let config = SearchConfig::builder()
///     .with_cache(CacheConfig::default())
///     .with_mode(SearchMode::Strict)
///     .with_display_limit(3)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Aggregate cache configuration (None = caching disabled).
    pub cache: Option<CacheConfig>,
    /// Mode used by [`SearchEngine::run`](crate::SearchEngine::run).
    pub mode: SearchMode,
    /// Number of results shown by summaries.
    pub display_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache: None,
            mode: SearchMode::Ranked,
            display_limit: 5,
        }
    }
}

impl SearchConfig {
    /// Creates a new builder for SearchConfig.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

/// Builder for SearchConfig.
#[derive(Debug, Clone)]
pub struct SearchConfigBuilder {
    cache: Option<CacheConfig>,
    mode: SearchMode,
    display_limit: usize,
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            cache: defaults.cache,
            mode: defaults.mode,
            display_limit: defaults.display_limit,
        }
    }
}

impl SearchConfigBuilder {
    /// Enables aggregate caching with the given configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the default search mode.
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shortcut for choosing [`SearchMode::Strict`] or [`SearchMode::Ranked`].
    pub fn with_strict(self, strict: bool) -> Self {
        self.with_mode(if strict {
            SearchMode::Strict
        } else {
            SearchMode::Ranked
        })
    }

    /// Sets how many results summaries show.
    pub fn with_display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit;
        self
    }

    /// Builds the SearchConfig.
    pub fn build(self) -> SearchConfig {
        SearchConfig {
            cache: self.cache,
            mode: self.mode,
            display_limit: self.display_limit,
        }
    }
}

/// Configuration for the aggregate cache.
///
/// The taxonomy never changes after it is built, so entries do not expire;
/// the capacity only bounds memory.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of categories whose aggregated terms are kept.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 1_024 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_default() {
        let config = SearchConfig::default();
        assert!(config.cache.is_none());
        assert_eq!(config.mode, SearchMode::Ranked);
        assert_eq!(config.display_limit, 5);
    }

    #[test]
    fn test_search_config_builder() {
        let config = SearchConfig::builder()
            .with_cache(CacheConfig { max_entries: 64 })
            .with_mode(SearchMode::Strict)
            .with_display_limit(3)
            .build();

        assert_eq!(config.cache.map(|c| c.max_entries), Some(64));
        assert_eq!(config.mode, SearchMode::Strict);
        assert_eq!(config.display_limit, 3);
    }

    #[test]
    fn test_with_strict() {
        let strict = SearchConfig::builder().with_strict(true).build();
        assert_eq!(strict.mode, SearchMode::Strict);

        let ranked = SearchConfig::builder().with_strict(false).build();
        assert_eq!(ranked.mode, SearchMode::Ranked);
    }

    #[test]
    fn test_cache_config_default() {
        assert_eq!(CacheConfig::default().max_entries, 1_024);
    }
}
