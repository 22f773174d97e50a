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

/// The canonical left-recursive E/T/F arithmetic grammar: unambiguous,
/// should build a conflict-free automaton.
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
fn arithmetic_grammar_has_no_conflicts() {
    let tree = arithmetic_grammar();
    let grammar = lr1_grammar::build(&tree).expect("grammar should build");
    let automaton = Automaton::build(grammar).expect("should be conflict-free");
    assert!(automaton.tables().num_states > 1);
}

/// A genuinely ambiguous grammar (classic dangling-`+` ambiguity without
/// precedence declarations) must surface as a conflict, not be silently
/// resolved one way.
#[test]
fn ambiguous_grammar_reports_conflict() {
    let tree = RawGrammar {
        rules: vec![rule(
            "e",
            vec![
                alt(vec![sym("e"), sym("+"), sym("e")]),
                alt(vec![sym("n")]),
            ],
        )],
    };
    let grammar = lr1_grammar::build(&tree).expect("grammar should build");
    let result = Automaton::build(grammar);
    assert!(result.is_err());
}

/// The same ambiguous grammar, but with an explicit `!`-override on the
/// second `e` of the recursive alternative, resolving the conflict toward
/// shifting (left-to-right, i.e. right-recursive binding).
#[test]
fn override_resolves_ambiguous_grammar() {
    let tree = RawGrammar {
        rules: vec![rule(
            "e",
            vec![
                alt(vec![sym("e"), sym("+"), RawItem::Override(Box::new(sym("e")))]),
                alt(vec![sym("n")]),
            ],
        )],
    };
    let grammar = lr1_grammar::build(&tree).expect("grammar should build");
    let automaton = Automaton::build(grammar);
    assert!(automaton.is_ok());
}
