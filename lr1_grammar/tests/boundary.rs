//! Boundary behaviours and round-trip properties that `src/loader.rs`'s
//! in-file unit tests don't reach: the ones that surface once
//! `RuleLoader`'s output is fed through `RuleOptimiser` and `Grammar`.

use lr1_grammar::ast::{RawAlternative, RawGrammar, RawItem, RawRule, SourceLocation};
use lr1_grammar::{Error, RuleLoader, RuleOptimiser};

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

#[test]
fn empty_grammar_is_rejected() {
    let grammar = RawGrammar { rules: vec![] };
    match lr1_grammar::build(&grammar) {
        Err(Error::EmptyGrammar) => {}
        _ => panic!("expected EmptyGrammar"),
    }
}

#[test]
fn transparent_start_symbol_is_rejected() {
    // `_s` is transparent by the leading-underscore convention.
    let grammar = RawGrammar {
        rules: vec![rule("_s", vec![alt(vec![sym("'a'")])])],
    };
    match lr1_grammar::build(&grammar) {
        Err(Error::StartIsTransparent(_)) => {}
        _ => panic!("expected StartIsTransparent"),
    }
}

#[test]
fn self_referential_rule_with_no_terminal_is_rejected() {
    // `x: x;` alone never derives a terminal, so it is rejected before an
    // automaton could ever be built from it -- the finite-expansion
    // invariant catches it at the earliest possible point rather than
    // looping forever inside closure computation.
    let grammar = RawGrammar {
        rules: vec![rule("x", vec![alt(vec![sym("x")])])],
    };
    match lr1_grammar::build(&grammar) {
        Err(Error::StartNoTerminalDerivation(_)) => {}
        _ => panic!("expected StartNoTerminalDerivation"),
    }
}

#[test]
fn rule_optimiser_is_idempotent() {
    let grammar = RawGrammar {
        rules: vec![
            rule(
                "list",
                vec![alt(vec![sym("item")]), alt(vec![sym("list"), sym("item")])],
            ),
            rule("item", vec![alt(vec![sym("'x'")])]),
        ],
    };
    let mut once = RuleLoader::new().load(&grammar).unwrap();
    RuleOptimiser::optimise(&mut once);

    let mut twice = RuleLoader::new().load(&grammar).unwrap();
    RuleOptimiser::optimise(&mut twice);
    RuleOptimiser::optimise(&mut twice);

    assert_eq!(once.rules.len(), twice.rules.len());
    let once_bodies: Vec<_> = once.rules.iter().map(|(_, r)| r.body.clone()).collect();
    let twice_bodies: Vec<_> = twice.rules.iter().map(|(_, r)| r.body.clone()).collect();
    assert_eq!(once_bodies, twice_bodies);
}

#[test]
fn construction_is_deterministic_across_runs() {
    let grammar = RawGrammar {
        rules: vec![
            rule(
                "expr",
                vec![
                    alt(vec![sym("expr"), sym("'+'"), sym("term")]),
                    alt(vec![sym("term")]),
                ],
            ),
            rule("term", vec![alt(vec![sym("'n'")])]),
        ],
    };
    let first = lr1_grammar::build(&grammar).unwrap();
    let second = lr1_grammar::build(&grammar).unwrap();
    assert_eq!(first.symbols.all_symbols().collect::<Vec<_>>(), second.symbols.all_symbols().collect::<Vec<_>>());
    assert_eq!(first.nullable, second.nullable);
}

#[test]
fn plus_rule_accepts_one_or_more_repetitions() {
    let grammar = RawGrammar {
        rules: vec![rule(
            "list",
            vec![alt(vec![RawItem::Plus(Box::new(sym("'x'")))])],
        )],
    };
    let built = lr1_grammar::build(&grammar).unwrap();
    // one repetition must be derivable: FIRST(list) contains 'x' and list is
    // not itself nullable (a bare '+' never matches zero occurrences).
    assert!(!built.nullable.contains(&built.start_head()));
}

trait GrammarStartHead {
    fn start_head(&self) -> lr1_grammar::SymbolId;
}

impl GrammarStartHead for lr1_grammar::Grammar {
    fn start_head(&self) -> lr1_grammar::SymbolId {
        // `start` is replaced by the synthetic augmenting symbol during
        // `cleanup`; its single rule's body is `[original_start, eof]`.
        self.rules
            .iter()
            .find(|(_, r)| r.head == self.start)
            .map(|(_, r)| r.body[0])
            .unwrap()
    }
}
