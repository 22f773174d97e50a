// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! A bundled arithmetic-expression demo grammar, used by the CLI binary
//! and exercised in tests: `expr`, `term`, `factor` with `(`, `)`, `*`,
//! `+`, number.

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

/// `expr: expr '+' term | term; term: term '*' factor | factor;`
/// `factor: 'n' | '(' expr ')';`
pub fn arithmetic_grammar() -> RawGrammar {
    RawGrammar {
        rules: vec![
            rule(
                "expr",
                vec![
                    alt(vec![sym("expr"), sym("+"), sym("term")]),
                    alt(vec![sym("term")]),
                ],
            ),
            rule(
                "term",
                vec![
                    alt(vec![sym("term"), sym("*"), sym("factor")]),
                    alt(vec![sym("factor")]),
                ],
            ),
            rule(
                "factor",
                vec![
                    alt(vec![sym("n")]),
                    alt(vec![sym("("), sym("expr"), sym(")")]),
                ],
            ),
        ],
    }
}
