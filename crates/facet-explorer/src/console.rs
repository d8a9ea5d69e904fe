//! Text console front end for traversal sessions.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use facet_search::{
    Category, Event, EventSource, Prompt, Rejection, SearchError, SearchOutcome,
};
use facet_taxonomy::{SubtreeAggregator, Taxonomy};

const YES_NO_HINT: &str = "Please enter Yes(Y) or No(N).";
const MENU_HINT: &str = "Please select a numbered option, choose 0 to skip or type cancel to cancel.";

/// Drives a traversal session from a line-oriented reader and writer.
///
/// Lines that do not parse as an [`Event`] are answered with a hint and read
/// again; the session never sees them.
///
/// Output errors are fatal. A failed help or rejection message is reported
/// by the next call to [`EventSource::next_event`].
pub struct ConsoleSource<R, W> {
    input: R,
    output: W,
    failure: Option<SearchError>,
}

impl<R: BufRead, W: Write> ConsoleSource<R, W> {
    /// Creates a console over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            failure: None,
        }
    }

    /// Writes a line of free text, e.g. the item being classified.
    pub fn announce(&mut self, text: &str) -> SearchOutcome<()> {
        self.write(&format!("{text}\n"))
    }

    /// Consumes the console and returns its streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_line(&mut self) -> SearchOutcome<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(source_error)?;
        if read == 0 {
            return Err(SearchError::InputClosed);
        }
        Ok(line)
    }

    fn write(&mut self, text: &str) -> SearchOutcome<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(source_error)
    }

    /// Writes from a hook that cannot return an error; the first failure is
    /// kept for the next `next_event`.
    fn write_deferred(&mut self, text: &str) {
        if self.failure.is_some() {
            return;
        }
        if let Err(err) = self.write(text) {
            self.failure = Some(err);
        }
    }
}

impl<R: BufRead, W: Write> EventSource for ConsoleSource<R, W> {
    fn next_event(&mut self, prompt: &Prompt<'_>) -> SearchOutcome<Event> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.write(&render_prompt(prompt))?;
        loop {
            let line = self.read_line()?;
            if let Some(event) = Event::parse(&line) {
                return Ok(event);
            }
            self.write(&format!("{}\n", hint(prompt)))?;
        }
    }

    fn show_help(&mut self, text: &str) {
        self.write_deferred(&format!("{text}\n"));
    }

    fn rejected(&mut self, prompt: &Prompt<'_>, rejection: &Rejection) {
        self.write_deferred(&format!("{rejection}. {}\n", hint(prompt)));
    }
}

fn source_error(err: std::io::Error) -> SearchError {
    SearchError::Source(err.to_string())
}

fn hint(prompt: &Prompt<'_>) -> &'static str {
    match prompt {
        Prompt::ChooseChild { .. } => MENU_HINT,
        _ => YES_NO_HINT,
    }
}

/// Renders a prompt the way the console shows it.
pub fn render_prompt(prompt: &Prompt<'_>) -> String {
    let mut out = String::new();
    match prompt {
        Prompt::AskExplore { root } => {
            let _ = writeln!(out, "Would you like to filter devices based on {}?", root.name());
        }
        Prompt::ChooseChild { options, .. } => {
            out.push_str(
                "Please choose a term from the following that applies to your device. (0 to skip)\n",
            );
            for (index, child) in options.iter().enumerate() {
                let _ = writeln!(out, "[{}] {}", index + 1, child.name());
            }
        }
        Prompt::ConfirmLeaf { category } => {
            let _ = writeln!(out, "Would you like to confirm {}?", category.name());
        }
        Prompt::Done => {}
    }
    out
}

/// Renders the taxonomy as an indented tree with subtree term counts.
pub fn render_tree(taxonomy: &Taxonomy) -> String {
    let aggregator = SubtreeAggregator::new(taxonomy);
    let mut out = String::new();
    for root in taxonomy.roots() {
        render_branch(taxonomy, &aggregator, root, 0, &mut out);
    }
    out
}

fn render_branch(
    taxonomy: &Taxonomy,
    aggregator: &SubtreeAggregator<'_>,
    category: &Category,
    depth: usize,
    out: &mut String,
) {
    let _ = writeln!(
        out,
        "{:indent$}{} [{}] ({} terms)",
        "",
        category.name(),
        category.id(),
        aggregator.count_terms(category),
        indent = depth * 2
    );
    for child in taxonomy.children(category) {
        render_branch(taxonomy, aggregator, child, depth + 1, out);
    }
}

/// Renders one category with its ancestry and aggregated terms.
pub fn render_category(taxonomy: &Taxonomy, category: &Category) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", category.name(), category.id());
    if let Some(code) = category.code() {
        let _ = writeln!(out, "code: {code}");
    }
    let _ = writeln!(out, "definition: {}", category.definition());

    let mut chain: Vec<&str> = taxonomy
        .ancestors(category)
        .iter()
        .map(|c| c.name())
        .collect();
    chain.reverse();
    if !chain.is_empty() {
        let _ = writeln!(out, "under: {}", chain.join(" > "));
    }

    for term in SubtreeAggregator::new(taxonomy).all_terms(category) {
        let _ = writeln!(out, "  {}: {} ({})", term.code, term.name, term.status);
    }
    out
}
