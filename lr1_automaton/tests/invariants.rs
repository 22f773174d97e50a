//! Structural invariants that `arithmetic.rs`'s conflict-detection tests
//! don't exercise directly.

use lr1_automaton::Automaton;
use lr1_grammar::ast::{RawAlternative, RawGrammar, RawItem, RawRule, SourceLocation};

fn sym(name: &str) -> RawItem {
    RawItem::Symbol(name.to_string(), SourceLocation::new(1, 1))
}

fn alt(items: Vec<RawItem>) -> RawAlternative {
    RawAlternative { items }
}

fn rule(head: &str, alternatives: Vec<RawAlternative>) -> RawRule {
    RawRule {
        head: head.to_string(),
        head_location: SourceLocation::new(1, 1),
        alternatives,
    }
}

fn arithmetic_grammar() -> RawGrammar {
    RawGrammar {
        rules: vec![
            rule(
                "e",
                vec![
                    alt(vec![sym("e"), sym("+"), sym("t")]),
                    alt(vec![sym("t")]),
                ],
            ),
            rule(
                "t",
                vec![
                    alt(vec![sym("t"), sym("*"), sym("f")]),
                    alt(vec![sym("f")]),
                ],
            ),
            rule(
                "f",
                vec![
                    alt(vec![sym("n")]),
                    alt(vec![sym("("), sym("e"), sym(")")]),
                ],
            ),
        ],
    }
}

#[test]
fn halting_state_is_not_the_initial_state() {
    // `lr1_driver::Driver` always starts parsing from state 0 (see its
    // scenario tests, which only pass because 0 really is the start
    // state); this just confirms the halting state is a different one.
    let grammar = lr1_grammar::build(&arithmetic_grammar()).unwrap();
    let automaton = Automaton::build(grammar).unwrap();
    assert_ne!(automaton.tables().halting_state, 0);
}

#[test]
fn halting_state_is_unique_and_distinct_from_initial() {
    let grammar = lr1_grammar::build(&arithmetic_grammar()).unwrap();
    let automaton = Automaton::build(grammar).unwrap();
    let tables = automaton.tables();
    let halting_targets: Vec<_> = tables
        .shift
        .iter()
        .filter(|&(_, &target)| target == tables.halting_state)
        .collect();
    assert_eq!(halting_targets.len(), 1, "exactly one shift should reach the halting state (shifting EOF)");
}

#[test]
fn no_state_token_pair_has_both_a_shift_and_a_reduce() {
    let grammar = lr1_grammar::build(&arithmetic_grammar()).unwrap();
    let automaton = Automaton::build(grammar).unwrap();
    let tables = automaton.tables();
    for key in tables.reduce.keys() {
        assert!(
            !tables.shift.contains_key(key),
            "state/token pair {key:?} has both a shift and a reduce after conflict resolution"
        );
    }
}

#[test]
fn construction_is_deterministic_across_runs() {
    let grammar_a = lr1_grammar::build(&arithmetic_grammar()).unwrap();
    let grammar_b = lr1_grammar::build(&arithmetic_grammar()).unwrap();
    let automaton_a = Automaton::build(grammar_a).unwrap();
    let automaton_b = Automaton::build(grammar_b).unwrap();

    let tables_a = automaton_a.tables();
    let tables_b = automaton_b.tables();
    assert_eq!(tables_a.num_states, tables_b.num_states);
    assert_eq!(tables_a.halting_state, tables_b.halting_state);
    assert_eq!(tables_a.shift, tables_b.shift);
    assert_eq!(tables_a.goto, tables_b.goto);
    assert_eq!(tables_a.reduce, tables_b.reduce);
}

#[test]
fn shortcuts_are_finite_for_every_reachable_symbol() {
    let grammar = lr1_grammar::build(&arithmetic_grammar()).unwrap();
    let shortcuts = grammar.shortcuts().expect("arithmetic grammar has no infinite-recursion symbols");
    for id in grammar.symbols.all_symbols() {
        assert!(shortcuts.contains_key(&id), "missing shortcut for {}", grammar.symbols.name(id));
    }
}
