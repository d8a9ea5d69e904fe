//! Batch evaluation: how well does a traversal find each device's term?

use std::fmt::Write as _;

use facet_search::{
    Category, EventSource, SearchEngine, SearchError, SearchResult, SessionRecord,
    TraversalSession,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::devices::Device;
use crate::error::{ExplorerError, ExplorerResult};

/// Result of classifying one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationOutcome {
    /// The selection made for the device.
    pub record: SessionRecord,
    /// Name of the term the device should be found as.
    pub expected_term: String,
    /// Code of the expected term, if the name exists in the term store.
    pub expected_code: Option<String>,
    /// 1-based position of the expected term in the result.
    pub position: Option<usize>,
    /// Number of terms in the result.
    pub total: usize,
}

impl EvaluationOutcome {
    /// Returns true if the expected term appeared in the result.
    pub fn is_found(&self) -> bool {
        self.position.is_some()
    }

    /// Text report in the console's wording.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "The term you were looking for is: {}", self.expected_term);
        match self.position {
            Some(position) => {
                let _ = writeln!(
                    out,
                    "The term has been found and it is in position {position} out of {} terms",
                    self.total
                );
            }
            None => out.push_str("The term could not be found\n"),
        }
        out
    }
}

/// Runs traversal sessions for devices and scores the results.
pub struct Evaluator<'e, 'a> {
    engine: &'e SearchEngine<'a>,
}

impl<'e, 'a> Evaluator<'e, 'a> {
    /// Creates an evaluator over an engine.
    pub fn new(engine: &'e SearchEngine<'a>) -> Self {
        Self { engine }
    }

    /// Scores a finished selection for `device`.
    pub fn score(&self, device: &Device, selection: &[&Category]) -> EvaluationOutcome {
        let result = self.engine.run(selection);
        self.outcome(device, selection, &result)
    }

    /// Runs one session for `device` with events from `source`, then scores it.
    ///
    /// # Errors
    ///
    /// Propagates the source's errors, including [`SearchError::InputClosed`].
    pub fn evaluate<S>(&self, device: &Device, source: &mut S) -> ExplorerResult<EvaluationOutcome>
    where
        S: EventSource + ?Sized,
    {
        let selection = TraversalSession::new(self.engine.taxonomy()).run(source)?;
        Ok(self.score(device, &selection))
    }

    /// Evaluates devices in order until they run out or input closes.
    ///
    /// `before` is called with each device before its session starts, and
    /// `after` with each outcome.
    pub fn evaluate_all<S, B, A>(
        &self,
        devices: &[Device],
        source: &mut S,
        mut before: B,
        mut after: A,
    ) -> ExplorerResult<Vec<EvaluationOutcome>>
    where
        S: EventSource + ?Sized,
        B: FnMut(&mut S, &Device) -> ExplorerResult<()>,
        A: FnMut(&mut S, &EvaluationOutcome) -> ExplorerResult<()>,
    {
        let mut outcomes = Vec::with_capacity(devices.len());
        for device in devices {
            before(source, device)?;
            match self.evaluate(device, source) {
                Ok(outcome) => {
                    after(source, &outcome)?;
                    outcomes.push(outcome);
                }
                Err(ExplorerError::Search(SearchError::InputClosed)) => {
                    warn!(
                        evaluated = outcomes.len(),
                        remaining = devices.len() - outcomes.len(),
                        "input closed, stopping evaluation"
                    );
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        info!(evaluated = outcomes.len(), "evaluation finished");
        Ok(outcomes)
    }

    fn outcome(
        &self,
        device: &Device,
        selection: &[&Category],
        result: &SearchResult<'_>,
    ) -> EvaluationOutcome {
        let expected = self
            .engine
            .taxonomy()
            .find_term_by_name(&device.expected_term);
        let position = expected.and_then(|term| result.position_of(&term.code));
        let expected_code = expected.map(|term| term.code.clone());
        debug!(
            item = %device.description,
            expected = %device.expected_term,
            ?position,
            total = result.len(),
            "device scored"
        );

        EvaluationOutcome {
            record: SessionRecord::from_selection(device.description.clone(), selection),
            expected_term: device.expected_term.clone(),
            expected_code,
            position,
            total: result.len(),
        }
    }
}

/// Aggregate figures over a batch of outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Devices evaluated.
    pub evaluated: usize,
    /// Devices whose expected term appeared in the result.
    pub found: usize,
    /// Devices whose expected term was within the first `top_n` results.
    pub within_top: usize,
    /// The cut-off used for `within_top`.
    pub top_n: usize,
    /// Devices whose expected term name is not in the term store.
    pub unknown_terms: usize,
    /// Mean position over found devices.
    pub mean_position: Option<f64>,
}

impl EvaluationReport {
    /// Summarizes outcomes, counting positions up to `top_n` as top hits.
    pub fn from_outcomes(outcomes: &[EvaluationOutcome], top_n: usize) -> Self {
        let positions: Vec<usize> = outcomes.iter().filter_map(|o| o.position).collect();
        let mean_position = if positions.is_empty() {
            None
        } else {
            Some(positions.iter().sum::<usize>() as f64 / positions.len() as f64)
        };

        Self {
            evaluated: outcomes.len(),
            found: positions.len(),
            within_top: positions.iter().filter(|&&p| p <= top_n).count(),
            top_n,
            unknown_terms: outcomes.iter().filter(|o| o.expected_code.is_none()).count(),
            mean_position,
        }
    }

    /// Share of devices whose term was found.
    pub fn found_rate(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            self.found as f64 / self.evaluated as f64
        }
    }
}

impl std::fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Devices evaluated: {}", self.evaluated)?;
        writeln!(
            f,
            "Found: {} ({:.1}%), in top {}: {}",
            self.found,
            self.found_rate() * 100.0,
            self.top_n,
            self.within_top
        )?;
        if let Some(mean) = self.mean_position {
            writeln!(f, "Mean position: {mean:.2}")?;
        }
        if self.unknown_terms > 0 {
            writeln!(f, "Expected terms missing from the term store: {}", self.unknown_terms)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_search::{Event, ScriptedSource};
    use facet_taxonomy::{CategoryRecord, Taxonomy, Term, TermStatus};

    fn sample() -> Taxonomy {
        Taxonomy::build(
            vec![
                Term::new("T1", "Scalpel", "", TermStatus::Active),
                Term::new("T2", "Clamp", "", TermStatus::Active),
            ],
            vec![
                CategoryRecord::new("1", "Function", "", "/1/"),
                CategoryRecord::new("2", "Cutting", "", "/1/2/")
                    .with_code("c")
                    .with_terms(["T1"]),
                CategoryRecord::new("3", "Holding", "", "/1/3/")
                    .with_code("h")
                    .with_terms(["T2"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_evaluate_found() {
        let taxonomy = sample();
        let engine = SearchEngine::new(&taxonomy);
        let evaluator = Evaluator::new(&engine);
        let mut source = ScriptedSource::new([Event::Yes, Event::Choice(1), Event::Yes]);

        let outcome = evaluator
            .evaluate(&Device::new("A knife", "Scalpel"), &mut source)
            .unwrap();

        assert_eq!(outcome.record.selected_category_ids, vec!["2"]);
        assert_eq!(outcome.expected_code.as_deref(), Some("T1"));
        assert_eq!(outcome.position, Some(1));
        assert_eq!(outcome.total, 1);
        assert_eq!(
            outcome.describe(),
            "The term you were looking for is: Scalpel\n\
             The term has been found and it is in position 1 out of 1 terms\n"
        );
    }

    #[test]
    fn test_evaluate_not_found() {
        let taxonomy = sample();
        let engine = SearchEngine::new(&taxonomy);
        let evaluator = Evaluator::new(&engine);

        let holding = taxonomy.category("3").unwrap();
        let outcome = evaluator.score(&Device::new("A knife", "Scalpel"), &[holding]);

        assert_eq!(outcome.position, None);
        assert!(!outcome.is_found());
        assert!(outcome.describe().ends_with("The term could not be found\n"));
    }

    #[test]
    fn test_position_follows_resolved_term_not_name() {
        let taxonomy = Taxonomy::build(
            vec![
                Term::new("N1", "Needle", "", TermStatus::Active),
                Term::new("N2", "Needle", "", TermStatus::Active),
            ],
            vec![
                CategoryRecord::new("1", "Function", "", "/1/"),
                CategoryRecord::new("2", "Injecting", "", "/1/2/")
                    .with_code("i")
                    .with_terms(["N2"]),
            ],
        )
        .unwrap();
        let engine = SearchEngine::new(&taxonomy);
        let evaluator = Evaluator::new(&engine);

        let injecting = taxonomy.category("2").unwrap();
        let outcome = evaluator.score(&Device::new("a syringe", "Needle"), &[injecting]);

        assert_eq!(outcome.expected_code.as_deref(), Some("N1"));
        assert_eq!(outcome.position, None);
        assert_eq!(outcome.total, 1);
    }

    #[test]
    fn test_evaluate_all_stops_when_input_closes() {
        let taxonomy = sample();
        let engine = SearchEngine::new(&taxonomy);
        let evaluator = Evaluator::new(&engine);
        let devices = vec![
            Device::new("A knife", "Scalpel"),
            Device::new("A clip", "Clamp"),
            Device::new("A stent", "Stent"),
        ];
        let mut source = ScriptedSource::new([
            Event::Yes,
            Event::Choice(1),
            Event::Yes,
            Event::Yes,
            Event::Choice(2),
            Event::Yes,
        ]);

        let mut announced = Vec::new();
        let outcomes = evaluator
            .evaluate_all(
                &devices,
                &mut source,
                |_, device| {
                    announced.push(device.description.clone());
                    Ok(())
                },
                |_, _| Ok(()),
            )
            .unwrap();

        assert_eq!(announced.len(), 3);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(EvaluationOutcome::is_found));
    }

    #[test]
    fn test_report() {
        let outcome = |position: Option<usize>, code: Option<&str>| EvaluationOutcome {
            record: SessionRecord::default(),
            expected_term: String::new(),
            expected_code: code.map(str::to_string),
            position,
            total: 10,
        };
        let outcomes = vec![
            outcome(Some(1), Some("a")),
            outcome(Some(8), Some("b")),
            outcome(None, Some("c")),
            outcome(None, None),
        ];

        let report = EvaluationReport::from_outcomes(&outcomes, 5);
        assert_eq!(report.evaluated, 4);
        assert_eq!(report.found, 2);
        assert_eq!(report.within_top, 1);
        assert_eq!(report.unknown_terms, 1);
        assert_eq!(report.mean_position, Some(4.5));
        assert_eq!(report.found_rate(), 0.5);
        assert!(report.to_string().contains("Found: 2 (50.0%), in top 5: 1"));
    }

    #[test]
    fn test_empty_report() {
        let report = EvaluationReport::from_outcomes(&[], 5);
        assert_eq!(report.mean_position, None);
        assert_eq!(report.found_rate(), 0.0);
    }
}
