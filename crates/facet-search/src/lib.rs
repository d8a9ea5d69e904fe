//! # facet-search
//!
//! Faceted ranking and interactive facet selection over a
//! [`facet_taxonomy::Taxonomy`].
//!
//! ## Key Features
//!
//! - **Ranked search** - union of the selected subtrees, terms ordered by how
//!   many selections contain them
//! - **Strict search** - intersection of the selected subtrees, active terms only
//! - **Traversal sessions** - a state machine that collects at most one
//!   category per root branch from yes/no/menu answers
//! - **Aggregate cache** - optional LRU cache of per-category term expansions
//!
//! ## Quick Start
//!
//! ```ignore
//! use facet_search::{Event, ScriptedSource, SearchEngine, TraversalSession};
//!
//! let engine = SearchEngine::new(&taxonomy);
//!
//! let mut source = ScriptedSource::new([Event::Yes, Event::Choice(1), Event::Yes]);
//! let selection = TraversalSession::new(&taxonomy).run(&mut source)?;
//!
//! let result = engine.run(&selection);
//! print!("{}", engine.summary(&result));
//! ```
//!
//! ## With Configuration
//!
//! ```ignore
//! use facet_search::{CacheConfig, SearchConfig, SearchEngine};
//!
//! let config = SearchConfig::builder()
//!     .with_cache(CacheConfig { max_entries: 512 })
//!     .with_strict(true)
//!     .with_display_limit(3)
//!     .build();
//!
//! let engine = SearchEngine::with_config(&taxonomy, config);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - derives `Serialize`/`Deserialize` for records and modes

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
mod config;
mod engine;
mod error;
mod result;
mod session;
mod traits;
mod traversal;

// Public re-exports
pub use cache::{AggregateCache, CacheStats};
pub use config::{CacheConfig, SearchConfig, SearchConfigBuilder, SearchMode};
pub use engine::SearchEngine;
pub use error::{SearchError, SearchOutcome};
pub use result::{RankedTerm, SearchResult, SearchStats};
pub use session::{SessionRecord, PATH_SEPARATOR};
pub use traits::{EventSource, ScriptedSource};
pub use traversal::{Event, Prompt, Rejection, Step, TraversalSession, TraversalState};

// Re-export commonly used types from dependencies for convenience
pub use facet_taxonomy::{Category, Taxonomy, Term, TermStatus};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _: Option<CacheConfig> = None;
        let _: Option<SearchConfig> = None;
        let _: Option<SearchStats> = None;
        let _: Option<SessionRecord> = None;
        let _: Option<SearchOutcome<()>> = None;
    }

    #[test]
    fn test_re_exports() {
        let taxonomy = facet_taxonomy::Taxonomy::build(Vec::new(), Vec::new()).unwrap();
        let engine = SearchEngine::new(&taxonomy);
        assert!(engine.search(&[], SearchMode::Ranked).is_empty());
    }
}
