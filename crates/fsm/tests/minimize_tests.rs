use std::collections::BTreeMap;

use fsm::description::parse_description;
use fsm::{Dfa, Kind, Simulate};

fn load(text: &str) -> Dfa {
    let records = parse_description(Kind::Dfa, text).expect("fixture should parse");
    Dfa::from_records(records)
}

fn state_names(dfa: &Dfa) -> Vec<String> {
    let mut names: Vec<String> = dfa.states().map(|s| dfa.state_name(s).to_string()).collect();
    names.sort();
    names
}

fn accepting_names(dfa: &Dfa) -> Vec<String> {
    let mut names: Vec<String> = dfa
        .accepting()
        .map(|s| dfa.state_name(s).to_string())
        .collect();
    names.sort();
    names
}

// from -> symbol -> to, by name
fn paths(dfa: &Dfa) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut paths: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for (from, symbol, to) in dfa.transitions() {
        paths
            .entry(dfa.state_name(from).to_string())
            .or_default()
            .insert(dfa.symbol_name(symbol).to_string(), dfa.state_name(*to).to_string());
    }
    paths
}

fn expect_paths(triples: &[(&str, &str, &str)]) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut paths: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for (from, symbol, to) in triples {
        paths
            .entry(from.to_string())
            .or_default()
            .insert(symbol.to_string(), to.to_string());
    }
    paths
}

// every string over `alphabet` up to `max_len` symbols
fn all_inputs(alphabet: &[&str], max_len: usize) -> Vec<Vec<String>> {
    let mut inputs: Vec<Vec<String>> = vec![Vec::new()];
    let mut frontier: Vec<Vec<String>> = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for symbol in alphabet {
                let mut word = prefix.clone();
                word.push(symbol.to_string());
                next.push(word);
            }
        }
        inputs.extend(next.iter().cloned());
        frontier = next;
    }
    inputs
}

fn assert_same_language(original: &Dfa, minimized: &Dfa, alphabet: &[&str]) {
    for input in all_inputs(alphabet, 7) {
        assert_eq!(
            original.run(&input).is_accept(),
            minimized.run(&input).is_accept(),
            "minimized automaton disagrees on {:?}",
            input
        );
    }
}

#[test]
fn equivalence_classes_rich_min_1() {
    let dfa = load(include_str!("data/rich_min_1"));
    let classes: Vec<Vec<&str>> = dfa
        .equivalence_classes()
        .into_iter()
        .map(|class| class.into_iter().map(|s| dfa.state_name(s)).collect())
        .collect();

    assert_eq!(classes, vec![vec!["q1"], vec!["q2", "q3"]]);
}

#[test]
fn minimize_merges_equivalent_states() {
    let mut dfa = load(include_str!("data/rich_min_1"));
    let original = dfa.clone();
    dfa.minimize();

    assert_eq!(dfa.start().map(|s| dfa.state_name(s)), Some("q1"));
    assert_eq!(state_names(&dfa), vec!["q1", "q2"]);
    assert_eq!(
        paths(&dfa),
        expect_paths(&[
            ("q1", "a", "q2"),
            ("q1", "b", "q2"),
            ("q2", "a", "q1"),
            ("q2", "b", "q1"),
        ])
    );
    assert_eq!(accepting_names(&dfa), vec!["q1"]);
    assert_same_language(&original, &dfa, &["a", "b"]);
}

#[test]
fn minimize_merges_accepting_states() {
    let mut dfa = load(include_str!("data/rich_min_1_1"));
    assert_eq!(state_names(&dfa), vec!["q1", "q2", "q3", "q4"]);
    assert_eq!(accepting_names(&dfa), vec!["q1", "q4"]);

    let original = dfa.clone();
    dfa.minimize();

    assert_eq!(dfa.start().map(|s| dfa.state_name(s)), Some("q1"));
    assert_eq!(state_names(&dfa), vec!["q1", "q2"]);
    assert_eq!(
        paths(&dfa),
        expect_paths(&[
            ("q1", "a", "q2"),
            ("q1", "b", "q2"),
            ("q2", "a", "q1"),
            ("q2", "b", "q1"),
        ])
    );
    assert_eq!(accepting_names(&dfa), vec!["q1"]);
    assert_same_language(&original, &dfa, &["a", "b"]);
}

#[test]
fn minimize_removes_unreachable_states() {
    let mut dfa = load(include_str!("data/rich_min_1_2"));
    assert_eq!(state_names(&dfa), vec!["q1", "q2", "q3", "q4"]);

    let original = dfa.clone();
    dfa.minimize();

    assert_eq!(dfa.start().map(|s| dfa.state_name(s)), Some("q4"));
    assert_eq!(state_names(&dfa), vec!["q4"]);
    assert!(paths(&dfa).is_empty());
    assert_eq!(accepting_names(&dfa), vec!["q4"]);
    assert_same_language(&original, &dfa, &["a", "b"]);
}

#[test]
fn eliminate_unreachable_keeps_reachable_part() {
    let mut dfa = load(include_str!("data/rich_min_1"));
    let before = paths(&dfa);
    dfa.eliminate_unreachable_states();

    assert_eq!(state_names(&dfa), vec!["q1", "q2", "q3"]);
    assert_eq!(paths(&dfa), before);
    assert_eq!(accepting_names(&dfa), vec!["q1"]);
}

#[test]
fn eliminate_unreachable_removes_exactly_the_unreachable() {
    let mut dfa = Dfa::new();
    dfa.set_start("a");
    dfa.add_transition("a", "x", "b");
    dfa.add_transition("b", "y", "a");
    dfa.add_transition("c", "x", "a");
    dfa.add_transition("d", "x", "c");
    dfa.add_transition("d", "z", "d");
    dfa.set_accepting(["b", "c"]);

    dfa.eliminate_unreachable_states();

    assert_eq!(state_names(&dfa), vec!["a", "b"]);
    assert_eq!(accepting_names(&dfa), vec!["b"]);
    assert_eq!(
        paths(&dfa),
        expect_paths(&[("a", "x", "b"), ("b", "y", "a")])
    );
    assert_eq!(dfa.alphabet().count(), 2);
}

#[test]
fn minimize_is_idempotent() {
    for fixture in [
        include_str!("data/rich_min_1"),
        include_str!("data/rich_min_1_1"),
        include_str!("data/rich_min_1_2"),
        include_str!("data/ends_in_0"),
    ] {
        let mut dfa = load(fixture);
        dfa.minimize();
        let once = dfa.state_count();
        let once_paths = paths(&dfa);

        dfa.minimize();
        assert_eq!(dfa.state_count(), once);
        assert_eq!(paths(&dfa), once_paths);
    }
}

#[test]
fn minimize_collapses_parallel_branches() {
    // 0 -a-> 1 -b-> 3*, 0 -b-> 2 -b-> 4*
    let mut dfa = Dfa::new();
    dfa.set_start("0");
    dfa.add_transition("0", "a", "1");
    dfa.add_transition("0", "b", "2");
    dfa.add_transition("1", "b", "3");
    dfa.add_transition("2", "b", "4");
    dfa.set_accepting(["3", "4"]);

    let original = dfa.clone();
    let classes: Vec<usize> = dfa.equivalence_classes().iter().map(Vec::len).collect();
    assert_eq!(classes, vec![1, 2, 2]);

    dfa.minimize();
    assert_eq!(state_names(&dfa), vec!["0", "1", "3"]);
    assert_same_language(&original, &dfa, &["a", "b"]);
}

#[test]
fn minimize_keeps_distinguishable_states() {
    let mut dfa = load(include_str!("data/ends_in_0"));
    let original = dfa.clone();
    dfa.minimize();

    assert_eq!(dfa.state_count(), 2);
    assert_same_language(&original, &dfa, &["0", "1", "2"]);
}

#[test]
fn minimize_distinguishes_missing_transitions() {
    // same acceptance, but "b" has nowhere to go on y
    let mut dfa = Dfa::new();
    dfa.set_start("s");
    dfa.add_transition("s", "x", "a");
    dfa.add_transition("s", "y", "b");
    dfa.add_transition("a", "y", "s");
    dfa.add_transition("a", "x", "s");
    dfa.add_transition("b", "x", "s");
    dfa.set_accepting(["s"]);

    let original = dfa.clone();
    dfa.minimize();

    assert_eq!(state_names(&dfa), vec!["a", "b", "s"]);
    assert_same_language(&original, &dfa, &["x", "y"]);
}
