//! Integration tests for ranking and traversal.
//!
//! These tests build a small medical-device taxonomy and exercise the
//! public API end to end.

use std::collections::HashSet;

use facet_search::{
    CacheConfig, Event, ScriptedSource, SearchConfig, SearchEngine, SearchMode,
    TraversalSession,
};
use facet_taxonomy::{Category, CategoryRecord, SubtreeAggregator, Taxonomy, Term, TermStatus};

fn term(code: &str, name: &str, status: TermStatus) -> Term {
    Term::new(code, name, format!("Definition of {name}"), status)
}

/// ```text
/// 100 Function                       200 Material            300 Single use
/// ├── 110 Cutting [T1 T2]            ├── 210 Metal [T1 T3]
/// │   └── 111 Laser cutting [T4]     │   └── 211 Steel [T2]
/// └── 120 Monitoring [T5 T6(obs)]    └── 220 Polymer [T5 T6(obs)]
/// ```
fn device_taxonomy() -> Taxonomy {
    Taxonomy::build(
        vec![
            term("T1", "Scalpel", TermStatus::Active),
            term("T2", "Surgical scissors", TermStatus::Active),
            term("T3", "Bone plate", TermStatus::Active),
            term("T4", "Laser scalpel", TermStatus::Active),
            term("T5", "Pulse oximeter", TermStatus::Active),
            term("T6", "Mercury thermometer", TermStatus::Obsolete),
            term("T7", "Bandage", TermStatus::Active),
        ],
        vec![
            CategoryRecord::new("100", "Function", "What the device does", "/100/"),
            CategoryRecord::new("110", "Cutting", "Devices that cut", "/100/110/")
                .with_code("F-CUT")
                .with_terms(["T1", "T2"]),
            CategoryRecord::new("111", "Laser cutting", "Cut with light", "/100/110/111/")
                .with_code("F-LAS")
                .with_terms(["T4"]),
            CategoryRecord::new("120", "Monitoring", "Measure signals", "/100/120/")
                .with_code("F-MON")
                .with_terms(["T5", "T6"]),
            CategoryRecord::new("200", "Material", "What it is made of", "/200/"),
            CategoryRecord::new("210", "Metal", "Metallic", "/200/210/")
                .with_code("M-MET")
                .with_terms(["T1", "T3"]),
            CategoryRecord::new("211", "Steel", "Steel alloys", "/200/210/211/")
                .with_code("M-STL")
                .with_terms(["T2"]),
            CategoryRecord::new("220", "Polymer", "Plastics", "/200/220/")
                .with_code("M-POL")
                .with_terms(["T5", "T6"]),
            CategoryRecord::new("300", "Single use", "Disposable after one use", "/300/")
                .with_terms(["T7"]),
        ],
    )
    .expect("fixture taxonomy builds")
}

fn select<'t>(taxonomy: &'t Taxonomy, ids: &[&str]) -> Vec<&'t Category> {
    ids.iter()
        .map(|id| taxonomy.category(id).expect("fixture id"))
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_branch_root_finds_child_term() {
    let taxonomy = Taxonomy::build(
        vec![term("T1", "Scalpel", TermStatus::Active)],
        vec![
            CategoryRecord::new("R", "Root", "", "/R/"),
            CategoryRecord::new("C1", "Child", "", "/R/C1/")
                .with_code("x")
                .with_terms(["T1"]),
        ],
    )
    .unwrap();
    let engine = SearchEngine::new(&taxonomy);
    let root = taxonomy.category("R").unwrap();

    let all: Vec<&str> = engine.all_terms(root).iter().map(|t| t.code.as_str()).collect();
    assert_eq!(all, vec!["T1"]);
    assert_eq!(engine.search(&[root], SearchMode::Ranked).codes(), vec!["T1"]);
    assert_eq!(engine.search(&[root], SearchMode::Strict).codes(), vec!["T1"]);
}

#[test]
fn test_shared_term_across_roots_ranks_first() {
    let taxonomy = Taxonomy::build(
        vec![
            term("A", "Only in R1", TermStatus::Active),
            term("S", "Shared", TermStatus::Active),
            term("B", "Only in R2", TermStatus::Active),
        ],
        vec![
            CategoryRecord::new("R1", "One", "", "/R1/").with_terms(["A", "S"]),
            CategoryRecord::new("R2", "Two", "", "/R2/").with_terms(["B", "S"]),
        ],
    )
    .unwrap();
    let engine = SearchEngine::new(&taxonomy);

    let result = engine.search(&select(&taxonomy, &["R1", "R2"]), SearchMode::Ranked);
    assert_eq!(result.codes(), vec!["S", "A", "B"]);
    assert_eq!(result.terms[0].hits, 2);
}

#[test]
fn test_strict_search_over_disjoint_categories_is_empty() {
    let taxonomy = device_taxonomy();
    let engine = SearchEngine::new(&taxonomy);

    let result = engine.search(&select(&taxonomy, &["111", "220"]), SearchMode::Strict);
    assert!(result.is_empty());
}

#[test]
fn test_tie_break_prefers_first_occurrence() {
    let taxonomy = device_taxonomy();
    let engine = SearchEngine::new(&taxonomy);

    // T1 is under both 110 and 210; T2 too (via 211); T4 only under 110
    let result = engine.search(&select(&taxonomy, &["110", "210"]), SearchMode::Ranked);
    assert_eq!(result.codes(), vec!["T1", "T2", "T4", "T3"]);
    assert!(result.position_of("T1") < result.position_of("T4"));
}

#[test]
fn test_strict_results_are_subset_of_ranked() {
    let taxonomy = device_taxonomy();
    let engine = SearchEngine::new(&taxonomy);
    let selections: [&[&str]; 5] = [
        &["100", "200"],
        &["110", "210"],
        &["120", "220"],
        &["100"],
        &["100", "200", "300"],
    ];

    for ids in selections {
        let selection = select(&taxonomy, ids);
        let strict = engine.search(&selection, SearchMode::Strict);
        let ranked: HashSet<&str> = engine
            .search(&selection, SearchMode::Ranked)
            .codes()
            .into_iter()
            .collect();

        for term in strict.iter() {
            assert!(term.is_active(), "strict results are active only");
            assert!(ranked.contains(term.code.as_str()), "{ids:?}: {}", term.code);
        }
    }
}

#[test]
fn test_strict_drops_obsolete_shared_terms() {
    let taxonomy = device_taxonomy();
    let engine = SearchEngine::new(&taxonomy);
    let selection = select(&taxonomy, &["120", "220"]);

    assert_eq!(engine.search(&selection, SearchMode::Strict).codes(), vec!["T5"]);
    assert_eq!(
        engine.search(&selection, SearchMode::Ranked).codes(),
        vec!["T5", "T6"]
    );
}

#[test]
fn test_aggregator_covers_whole_subtree_once() {
    let taxonomy = device_taxonomy();
    let aggregator = SubtreeAggregator::new(&taxonomy);

    let codes = aggregator.all_term_codes(taxonomy.category("100").unwrap());
    assert_eq!(codes, vec!["T1", "T2", "T4", "T5", "T6"]);

    let codes = aggregator.all_term_codes(taxonomy.category("200").unwrap());
    assert_eq!(codes, vec!["T1", "T3", "T2", "T5", "T6"]);
}

#[test]
fn test_children_enumerate_in_source_order() {
    let taxonomy = device_taxonomy();
    let material = taxonomy.category("200").unwrap();
    let names: Vec<&str> = taxonomy.children(material).iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Metal", "Polymer"]);
}

// =============================================================================
// Traversal
// =============================================================================

#[test]
fn test_declining_every_root_reaches_done_with_empty_query() {
    let taxonomy = device_taxonomy();
    let mut source = ScriptedSource::new([Event::No, Event::No, Event::No]);
    let mut session = TraversalSession::new(&taxonomy);

    let selection = session.run(&mut source).unwrap();

    assert!(session.is_done());
    assert!(selection.is_empty());
    assert!(SearchEngine::new(&taxonomy).run(&selection).is_empty());
}

#[test]
fn test_full_session_feeds_ranker() {
    let taxonomy = device_taxonomy();
    let mut source = ScriptedSource::new([
        // Function: descend to Cutting, then Laser cutting, confirm
        Event::Yes,
        Event::Choice(1),
        Event::Choice(1),
        Event::Yes,
        // Material: descend to Metal, skip with 0
        Event::Yes,
        Event::Choice(1),
        Event::Choice(0),
        // Single use: childless root, confirm directly
        Event::Yes,
        Event::Yes,
    ]);

    let mut session = TraversalSession::new(&taxonomy);
    let selection = session.run(&mut source).unwrap();
    let ids: Vec<&str> = selection.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec!["111", "300"]);

    let record = session.record("Laser scalpel, disposable");
    assert_eq!(record.path(), "111;300");

    let engine = SearchEngine::new(&taxonomy);
    let result = engine.run(&selection);
    assert_eq!(result.codes(), vec!["T4", "T7"]);
    assert_eq!(result.position_of_name("Laser scalpel"), Some(1));
}

#[test]
fn test_invalid_answers_are_reprompted_not_defaulted() {
    let taxonomy = device_taxonomy();
    let mut source = ScriptedSource::new([
        Event::Choice(2), // not a yes/no answer
        Event::Yes,
        Event::Yes,       // not a menu choice
        Event::Choice(9), // out of range
        Event::Help,
        Event::Choice(2),
        Event::Choice(1), // Monitoring is childless; a menu choice is not a confirmation
        Event::Yes,
        Event::No,
        Event::No,
    ]);

    let selection = TraversalSession::new(&taxonomy).run(&mut source).unwrap();
    let ids: Vec<&str> = selection.iter().map(|c| c.id()).collect();

    assert_eq!(ids, vec!["120"]);
    assert_eq!(source.rejections().len(), 4);
    assert_eq!(source.help_shown(), &["What the device does".to_string()]);
}

#[test]
fn test_sessions_are_reentrant_and_cache_is_shared() {
    let taxonomy = device_taxonomy();
    let config = SearchConfig::builder()
        .with_cache(CacheConfig { max_entries: 16 })
        .build();
    let engine = SearchEngine::with_config(&taxonomy, config);

    let script = [Event::Yes, Event::Choice(2), Event::Yes, Event::No, Event::No];
    let mut results = Vec::new();
    for _ in 0..3 {
        let mut source = ScriptedSource::new(script);
        let selection = TraversalSession::new(&taxonomy).run(&mut source).unwrap();
        results.push(engine.run(&selection).codes().join(","));
    }

    assert!(results.iter().all(|r| r == "T5,T6"));
    let stats = engine.cache().unwrap().stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}
