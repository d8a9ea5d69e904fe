//! # facet-taxonomy
//!
//! In-memory model of a faceted classification taxonomy.
//!
//! A taxonomy is a forest of categories ("collective terms"). Each category
//! may carry terms directly and may have child categories. The forest is
//! rebuilt from flat records whose `path` field holds the slash-delimited
//! chain of ancestor ids.
//!
//! ## Usage
//!
//! ```rust
//! use facet_taxonomy::{CategoryRecord, SubtreeAggregator, Taxonomy, Term, TermStatus};
//!
//! let taxonomy = Taxonomy::build(
//!     vec![Term::new("T1", "Scalpel", "A small knife", TermStatus::Active)],
//!     vec![
//!         CategoryRecord::new("1", "Function", "What the device does", "/1/"),
//!         CategoryRecord::new("2", "Cutting", "Cuts tissue", "/1/2/")
//!             .with_code("x")
//!             .with_terms(["T1"]),
//!     ],
//! )
//! .unwrap();
//!
//! let root = taxonomy.roots()[0];
//! let terms = SubtreeAggregator::new(&taxonomy).all_terms(root);
//! assert_eq!(terms[0].name, "Scalpel");
//! ```
//!
//! ## Root rule
//!
//! | code | resolved parent | listed as root | reported anomaly |
//! |------|-----------------|----------------|------------------|
//! | none | none | yes | - |
//! | some | some | no | - |
//! | none | some | yes | `CodelessWithParent` |
//! | some | none | no | `ParentlessWithCode` |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod aggregator;
mod category;
mod error;
mod lookup;
mod taxonomy;
mod term;

pub use aggregator::SubtreeAggregator;
pub use category::{derive_parent_id, Category, CategoryRecord};
pub use error::{TaxonomyError, TaxonomyResult};
pub use lookup::{CategoryKey, TermKey};
pub use taxonomy::{Anomaly, Taxonomy};
pub use term::{Term, TermStatus, TermStore};
