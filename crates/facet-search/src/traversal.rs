//! Interactive facet selection.
//!
//! A [`TraversalSession`] walks the root categories in order. For each root
//! it asks whether to explore it, lets the user descend one child at a time,
//! and asks for confirmation once a childless category is reached. Each root
//! branch contributes at most one category to the selection.
//!
//! ```text
//!              Yes                 Choice(n) on a node with children
//! AskExplore ──────► ChooseChild ─────────────┐
//!     │                  │  ▲                 │
//!     │ No      0/Cancel │  └─────────────────┘
//!     │                  │        Choice(n) on a childless node / Yes on a childless root
//!     ▼                  ▼                 ▼
//! next root ◄──────── next root ◄──No── ConfirmLeaf ──Yes──► record, next root
//! ```
//!
//! After the last root the session is `Done`.

use std::fmt;

use facet_taxonomy::{Category, Taxonomy};
use tracing::{debug, trace};

use crate::error::SearchOutcome;
use crate::session::SessionRecord;
use crate::traits::EventSource;

/// Input accepted by a traversal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A 1-based menu choice; `0` abandons the branch.
    Choice(usize),
    /// Show the definition of the current category.
    Help,
    /// Abandon the current branch.
    Cancel,
    /// Affirmative answer.
    Yes,
    /// Negative answer.
    No,
}

impl Event {
    /// Maps a line of text input to an event.
    ///
    /// Accepts `y`/`yes`, `n`/`no`, `help`, `cancel` (any case) and decimal
    /// numbers. Returns `None` for anything else.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input.to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Event::Yes),
            "n" | "no" => Some(Event::No),
            "help" => Some(Event::Help),
            "cancel" => Some(Event::Cancel),
            other if !other.is_empty() && other.bytes().all(|b| b.is_ascii_digit()) => {
                other.parse().ok().map(Event::Choice)
            }
            _ => None,
        }
    }
}

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState<'a> {
    /// Asking whether to filter by this root.
    AskExplore(&'a Category),
    /// Offering the children of this category.
    ChooseChild(&'a Category),
    /// Asking to confirm this childless category.
    ConfirmLeaf(&'a Category),
    /// Every root has been processed.
    Done,
}

/// What the presentation layer should show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt<'a> {
    /// Yes/no: filter by this root?
    AskExplore {
        /// The root category.
        root: &'a Category,
    },
    /// Numbered menu of child categories (1-based, in source order).
    ChooseChild {
        /// The category being refined.
        category: &'a Category,
        /// Its children.
        options: Vec<&'a Category>,
    },
    /// Yes/no: confirm this category?
    ConfirmLeaf {
        /// The childless category reached.
        category: &'a Category,
    },
    /// Nothing left to ask.
    Done,
}

/// Why an event was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The event has no meaning in the current state.
    NotApplicable,
    /// A menu choice outside `1..=max`.
    OutOfRange {
        /// The rejected choice.
        choice: usize,
        /// Number of options offered.
        max: usize,
    },
    /// The session has already finished.
    Finished,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotApplicable => f.write_str("that answer does not apply here"),
            Rejection::OutOfRange { choice, max } => {
                write!(f, "option {choice} is not between 1 and {max}")
            }
            Rejection::Finished => f.write_str("the session has finished"),
        }
    }
}

/// Result of feeding one event to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// The session moved within the current branch.
    Moved,
    /// Help text for the current category; the state is unchanged.
    Help(&'a str),
    /// The event was rejected; the same prompt should be shown again.
    Rejected(Rejection),
    /// The current root branch ended.
    BranchClosed {
        /// Root of the closed branch.
        root: &'a Category,
        /// The category recorded for the branch, if any.
        selection: Option<&'a Category>,
    },
}

/// One pass of facet selection over every root category.
///
/// Sessions are cheap; start a new one for every item being classified.
///
/// # Example
///
/// ```ignore
/// use facet_search::{Event, TraversalSession};
///
/// let mut session = TraversalSession::new(&taxonomy);
/// session.handle(Event::Yes);
/// session.handle(Event::Choice(2));
/// session.handle(Event::Yes);
/// // ... until session.is_done()
/// let selection = session.into_selection();
/// ```
#[derive(Debug, Clone)]
pub struct TraversalSession<'a> {
    taxonomy: &'a Taxonomy,
    roots: Vec<&'a Category>,
    root_index: usize,
    state: TraversalState<'a>,
    selection: Vec<&'a Category>,
}

impl<'a> TraversalSession<'a> {
    /// Starts a session at the first root.
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        let roots = taxonomy.roots();
        let state = roots
            .first()
            .copied()
            .map(TraversalState::AskExplore)
            .unwrap_or(TraversalState::Done);
        Self {
            taxonomy,
            roots,
            root_index: 0,
            state,
            selection: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> TraversalState<'a> {
        self.state
    }

    /// Returns true once every root has been processed.
    pub fn is_done(&self) -> bool {
        self.state == TraversalState::Done
    }

    /// Root currently being processed, if any.
    pub fn current_root(&self) -> Option<&'a Category> {
        if self.is_done() {
            None
        } else {
            self.roots.get(self.root_index).copied()
        }
    }

    /// Categories selected so far, one per accepted branch, in root order.
    pub fn selection(&self) -> &[&'a Category] {
        &self.selection
    }

    /// Consumes the session and returns its selection.
    pub fn into_selection(self) -> Vec<&'a Category> {
        self.selection
    }

    /// Builds an exportable record of the selection for `item`.
    pub fn record(&self, item: impl Into<String>) -> SessionRecord {
        SessionRecord::from_selection(item, &self.selection)
    }

    /// The prompt matching the current state.
    pub fn prompt(&self) -> Prompt<'a> {
        match self.state {
            TraversalState::AskExplore(root) => Prompt::AskExplore { root },
            TraversalState::ChooseChild(category) => Prompt::ChooseChild {
                category,
                options: self.taxonomy.children(category),
            },
            TraversalState::ConfirmLeaf(category) => Prompt::ConfirmLeaf { category },
            TraversalState::Done => Prompt::Done,
        }
    }

    /// Feeds one event to the session.
    pub fn handle(&mut self, event: Event) -> Step<'a> {
        trace!(?event, state = ?self.state, "traversal event");
        match self.state {
            TraversalState::Done => Step::Rejected(Rejection::Finished),

            TraversalState::AskExplore(root) => match event {
                Event::Yes => {
                    self.enter(root);
                    Step::Moved
                }
                Event::No => self.close_branch(None),
                Event::Help => Step::Help(root.definition()),
                Event::Choice(_) | Event::Cancel => Step::Rejected(Rejection::NotApplicable),
            },

            TraversalState::ChooseChild(current) => match event {
                Event::Choice(0) | Event::Cancel => self.close_branch(None),
                Event::Choice(choice) => {
                    let children = self.taxonomy.children(current);
                    match children.get(choice - 1) {
                        Some(&child) => {
                            self.enter(child);
                            Step::Moved
                        }
                        None => Step::Rejected(Rejection::OutOfRange {
                            choice,
                            max: children.len(),
                        }),
                    }
                }
                Event::Help => Step::Help(current.definition()),
                Event::Yes | Event::No => Step::Rejected(Rejection::NotApplicable),
            },

            TraversalState::ConfirmLeaf(current) => match event {
                Event::Yes => self.close_branch(Some(current)),
                Event::No => self.close_branch(None),
                Event::Help => Step::Help(current.definition()),
                Event::Choice(_) | Event::Cancel => Step::Rejected(Rejection::NotApplicable),
            },
        }
    }

    /// Drives the session to completion with events from `source`.
    ///
    /// Help and rejections are reported back to the source, which is asked
    /// again for the same prompt.
    pub fn run<S>(&mut self, source: &mut S) -> SearchOutcome<Vec<&'a Category>>
    where
        S: EventSource + ?Sized,
    {
        while !self.is_done() {
            let prompt = self.prompt();
            let event = source.next_event(&prompt)?;
            match self.handle(event) {
                Step::Moved => {}
                Step::Help(text) => source.show_help(text),
                Step::Rejected(rejection) => source.rejected(&prompt, &rejection),
                Step::BranchClosed { root, selection } => source.branch_closed(root, selection),
            }
        }
        Ok(self.selection.clone())
    }

    fn enter(&mut self, category: &'a Category) {
        self.state = if category.is_leaf() {
            TraversalState::ConfirmLeaf(category)
        } else {
            TraversalState::ChooseChild(category)
        };
    }

    fn close_branch(&mut self, selected: Option<&'a Category>) -> Step<'a> {
        let root = self.roots[self.root_index];
        if let Some(category) = selected {
            self.selection.push(category);
        }
        debug!(
            root = root.id(),
            selected = selected.map(|c| c.id()),
            "branch closed"
        );

        self.root_index += 1;
        self.state = match self.roots.get(self.root_index) {
            Some(next) => TraversalState::AskExplore(next),
            None => TraversalState::Done,
        };

        Step::BranchClosed {
            root,
            selection: selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_taxonomy::{CategoryRecord, Term, TermStatus};

    /// ```text
    /// F "Function"        M "Material"      S "Sterile" (no children)
    /// ├── F1 "Cutting"    └── M1 "Steel"
    /// │   ├── F11 "Fine"
    /// │   └── F12 "Coarse"
    /// └── F2 "Holding"
    /// ```
    fn sample() -> Taxonomy {
        Taxonomy::build(
            vec![Term::new("T1", "Scalpel", "", TermStatus::Active)],
            vec![
                CategoryRecord::new("F", "Function", "What it does", "/F/"),
                CategoryRecord::new("F1", "Cutting", "Cuts", "/F/F1/").with_code("f1"),
                CategoryRecord::new("F11", "Fine", "Cuts finely", "/F/F1/F11/")
                    .with_code("f11")
                    .with_terms(["T1"]),
                CategoryRecord::new("F12", "Coarse", "Cuts coarsely", "/F/F1/F12/")
                    .with_code("f12"),
                CategoryRecord::new("F2", "Holding", "Holds", "/F/F2/").with_code("f2"),
                CategoryRecord::new("M", "Material", "Made of", "/M/"),
                CategoryRecord::new("M1", "Steel", "Steel", "/M/M1/").with_code("m1"),
                CategoryRecord::new("S", "Sterile", "Supplied sterile", "/S/"),
            ],
        )
        .unwrap()
    }

    fn ids(categories: &[&Category]) -> Vec<String> {
        categories.iter().map(|c| c.id().to_string()).collect()
    }

    #[test]
    fn test_event_parse() {
        assert_eq!(Event::parse("Y"), Some(Event::Yes));
        assert_eq!(Event::parse(" yes \n"), Some(Event::Yes));
        assert_eq!(Event::parse("N"), Some(Event::No));
        assert_eq!(Event::parse("no"), Some(Event::No));
        assert_eq!(Event::parse("HELP"), Some(Event::Help));
        assert_eq!(Event::parse("Cancel"), Some(Event::Cancel));
        assert_eq!(Event::parse("0"), Some(Event::Choice(0)));
        assert_eq!(Event::parse("12"), Some(Event::Choice(12)));
        assert_eq!(Event::parse("-1"), None);
        assert_eq!(Event::parse("1.5"), None);
        assert_eq!(Event::parse(""), None);
        assert_eq!(Event::parse("maybe"), None);
    }

    #[test]
    fn test_starts_at_first_root() {
        let taxonomy = sample();
        let session = TraversalSession::new(&taxonomy);
        assert_eq!(session.current_root().unwrap().id(), "F");
        assert!(matches!(session.prompt(), Prompt::AskExplore { root } if root.id() == "F"));
    }

    #[test]
    fn test_no_at_every_root_selects_nothing() {
        let taxonomy = sample();
        let mut session = TraversalSession::new(&taxonomy);

        for _ in 0..3 {
            assert!(matches!(
                session.handle(Event::No),
                Step::BranchClosed { selection: None, .. }
            ));
        }

        assert!(session.is_done());
        assert!(session.selection().is_empty());
        assert_eq!(session.prompt(), Prompt::Done);
    }

    #[test]
    fn test_descend_and_confirm() {
        let taxonomy = sample();
        let mut session = TraversalSession::new(&taxonomy);

        assert_eq!(session.handle(Event::Yes), Step::Moved);
        match session.prompt() {
            Prompt::ChooseChild { category, options } => {
                assert_eq!(category.id(), "F");
                assert_eq!(ids(&options), vec!["F1", "F2"]);
            }
            other => panic!("unexpected prompt {other:?}"),
        }

        assert_eq!(session.handle(Event::Choice(1)), Step::Moved);
        assert_eq!(session.handle(Event::Choice(1)), Step::Moved);
        assert!(matches!(session.state(), TraversalState::ConfirmLeaf(c) if c.id() == "F11"));

        let step = session.handle(Event::Yes);
        assert!(matches!(
            step,
            Step::BranchClosed { root, selection: Some(c) } if root.id() == "F" && c.id() == "F11"
        ));
        assert_eq!(session.current_root().unwrap().id(), "M");
        assert_eq!(ids(session.selection()), vec!["F11"]);
    }

    #[test]
    fn test_childless_root_goes_straight_to_confirm() {
        let taxonomy = sample();
        let mut session = TraversalSession::new(&taxonomy);
        session.handle(Event::No);
        session.handle(Event::No);

        assert_eq!(session.handle(Event::Yes), Step::Moved);
        assert!(matches!(session.state(), TraversalState::ConfirmLeaf(c) if c.id() == "S"));
        session.handle(Event::Yes);

        assert!(session.is_done());
        assert_eq!(ids(session.selection()), vec!["S"]);
    }

    #[test]
    fn test_zero_and_cancel_abandon_branch() {
        let taxonomy = sample();
        let mut session = TraversalSession::new(&taxonomy);

        session.handle(Event::Yes);
        session.handle(Event::Choice(1));
        assert!(matches!(
            session.handle(Event::Choice(0)),
            Step::BranchClosed { selection: None, .. }
        ));

        session.handle(Event::Yes);
        assert!(matches!(
            session.handle(Event::Cancel),
            Step::BranchClosed { selection: None, .. }
        ));

        assert_eq!(session.current_root().unwrap().id(), "S");
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_no_at_confirm_abandons_branch() {
        let taxonomy = sample();
        let mut session = TraversalSession::new(&taxonomy);

        session.handle(Event::Yes);
        session.handle(Event::Choice(2));
        assert!(matches!(
            session.handle(Event::No),
            Step::BranchClosed { selection: None, .. }
        ));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_help_does_not_consume_turn() {
        let taxonomy = sample();
        let mut session = TraversalSession::new(&taxonomy);

        assert_eq!(session.handle(Event::Help), Step::Help("What it does"));
        session.handle(Event::Yes);
        assert_eq!(session.handle(Event::Help), Step::Help("What it does"));
        session.handle(Event::Choice(2));
        assert_eq!(session.handle(Event::Help), Step::Help("Holds"));
        assert!(matches!(session.state(), TraversalState::ConfirmLeaf(c) if c.id() == "F2"));
    }

    #[test]
    fn test_invalid_events_are_rejected() {
        let taxonomy = sample();
        let mut session = TraversalSession::new(&taxonomy);

        assert_eq!(
            session.handle(Event::Choice(1)),
            Step::Rejected(Rejection::NotApplicable)
        );
        session.handle(Event::Yes);
        assert_eq!(
            session.handle(Event::Yes),
            Step::Rejected(Rejection::NotApplicable)
        );
        assert_eq!(
            session.handle(Event::Choice(3)),
            Step::Rejected(Rejection::OutOfRange { choice: 3, max: 2 })
        );
        assert!(matches!(session.state(), TraversalState::ChooseChild(c) if c.id() == "F"));
    }

    #[test]
    fn test_done_rejects_everything() {
        let taxonomy = sample();
        let mut session = TraversalSession::new(&taxonomy);
        for _ in 0..3 {
            session.handle(Event::No);
        }
        assert_eq!(session.handle(Event::Yes), Step::Rejected(Rejection::Finished));
    }

    #[test]
    fn test_at_most_one_selection_per_root() {
        let taxonomy = sample();
        let mut session = TraversalSession::new(&taxonomy);

        session.handle(Event::Yes);
        session.handle(Event::Choice(2));
        session.handle(Event::Yes);
        session.handle(Event::Yes);
        session.handle(Event::Choice(1));
        session.handle(Event::Yes);
        session.handle(Event::Yes);
        session.handle(Event::Yes);

        assert!(session.is_done());
        assert_eq!(ids(session.selection()), vec!["F2", "M1", "S"]);
    }

    #[test]
    fn test_empty_taxonomy_is_done() {
        let taxonomy = Taxonomy::build(Vec::new(), Vec::new()).unwrap();
        let session = TraversalSession::new(&taxonomy);
        assert!(session.is_done());
        assert!(session.current_root().is_none());
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(
            Rejection::OutOfRange { choice: 4, max: 2 }.to_string(),
            "option 4 is not between 1 and 2"
        );
    }
}
