//! # facet-explorer
//!
//! File loading, a text console and an evaluation harness around
//! [`facet_search`].
//!
//! ## Key Features
//!
//! - **XML loading** - term database and category explorer files into a
//!   [`facet_taxonomy::Taxonomy`]
//! - **Console** - drives a [`facet_search::TraversalSession`] from any
//!   `BufRead`/`Write` pair
//! - **Evaluation** - runs a session per device from a CSV list and reports
//!   where the expected term landed
//! - **Export** - outcomes as CSV (`item`, `path`, ...) or JSON
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::io;
//! use std::path::Path;
//!
//! use facet_explorer::{load_taxonomy, ConsoleSource};
//! use facet_search::{SearchEngine, TraversalSession};
//!
//! let taxonomy = load_taxonomy(Path::new("terms.xml"), Path::new("explorer.xml"))?;
//! let engine = SearchEngine::new(&taxonomy);
//!
//! let mut console = ConsoleSource::new(io::stdin().lock(), io::stdout());
//! let selection = TraversalSession::new(&taxonomy).run(&mut console)?;
//! print!("{}", engine.summary(&engine.run(&selection)));
//! ```

#![warn(missing_docs)]

pub mod console;
pub mod devices;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod loader;

pub use console::{render_category, render_prompt, render_tree, ConsoleSource};
pub use devices::{load_devices, parse_devices, shuffle_devices, Device};
pub use error::{ExplorerError, ExplorerResult};
pub use evaluation::{EvaluationOutcome, EvaluationReport, Evaluator};
pub use export::{export_records, write_json, write_records, ExportRow};
pub use loader::{load_categories, load_taxonomy, load_terms, parse_categories, parse_terms};
