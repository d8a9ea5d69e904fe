//! Traits for driving traversal sessions.
//!
//! This module defines the [`EventSource`] trait that any presentation layer
//! (text console, widget bridge, replay script) implements to feed events to
//! a [`TraversalSession`](crate::TraversalSession).
//!
//! # Example: a console source
//!
//! ```ignore
//! use facet_search::{Event, EventSource, Prompt, SearchError, SearchOutcome};
//!
//! struct Console;
//!
//! impl EventSource for Console {
//!     fn next_event(&mut self, prompt: &Prompt<'_>) -> SearchOutcome<Event> {
//!         render(prompt);
//!         loop {
//!             let line = read_line().ok_or(SearchError::InputClosed)?;
//!             if let Some(event) = Event::parse(&line) {
//!                 return Ok(event);
//!             }
//!             println!("Please select a numbered option, choose 0 to skip or type cancel to cancel.");
//!         }
//!     }
//! }
//! ```

use std::collections::VecDeque;

use facet_taxonomy::Category;

use crate::error::{SearchError, SearchOutcome};
use crate::traversal::{Event, Prompt, Rejection};

/// Supplies events to a traversal session.
///
/// Only [`next_event`](Self::next_event) is required. The notification hooks
/// default to doing nothing; override them to show help text, re-prompt
/// messages, or branch summaries.
pub trait EventSource {
    /// Blocks until the next event for `prompt` is available.
    ///
    /// Returns [`SearchError::InputClosed`] when no more input will arrive.
    fn next_event(&mut self, prompt: &Prompt<'_>) -> SearchOutcome<Event>;

    /// Called with the definition of the current category after `Help`.
    fn show_help(&mut self, text: &str) {
        let _ = text;
    }

    /// Called when an event was rejected; the same prompt follows.
    fn rejected(&mut self, prompt: &Prompt<'_>, rejection: &Rejection) {
        let _ = (prompt, rejection);
    }

    /// Called when a root branch ends.
    fn branch_closed(&mut self, root: &Category, selection: Option<&Category>) {
        let _ = (root, selection);
    }
}

/// An [`EventSource`] that replays a fixed list of events.
///
/// Useful for tests and for replaying recorded sessions. Once the script is
/// exhausted it reports [`SearchError::InputClosed`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    events: VecDeque<Event>,
    help_shown: Vec<String>,
    rejections: Vec<Rejection>,
}

impl ScriptedSource {
    /// Creates a source replaying `events` in order.
    pub fn new<I: IntoIterator<Item = Event>>(events: I) -> Self {
        Self {
            events: events.into_iter().collect(),
            help_shown: Vec::new(),
            rejections: Vec::new(),
        }
    }

    /// Number of events not consumed yet.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// Help texts shown so far.
    pub fn help_shown(&self) -> &[String] {
        &self.help_shown
    }

    /// Rejections reported so far.
    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }
}

impl EventSource for ScriptedSource {
    fn next_event(&mut self, _prompt: &Prompt<'_>) -> SearchOutcome<Event> {
        self.events.pop_front().ok_or(SearchError::InputClosed)
    }

    fn show_help(&mut self, text: &str) {
        self.help_shown.push(text.to_string());
    }

    fn rejected(&mut self, _prompt: &Prompt<'_>, rejection: &Rejection) {
        self.rejections.push(*rejection);
    }
}
