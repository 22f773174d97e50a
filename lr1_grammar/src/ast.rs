// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Shape of a parsed grammar-file syntax tree, as produced by a
//! grammar-file lexer/parser that lives outside this crate; `RuleLoader`
//! consumes exactly this shape.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLocation {
    pub line: u32,
    pub col: u32,
}

impl SourceLocation {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// One element of a rule alternative, before `?`/`*`/`+`/group expansion.
#[derive(Debug, Clone)]
pub enum RawItem {
    Symbol(String, SourceLocation),
    Optional(Box<RawItem>),
    Star(Box<RawItem>),
    Plus(Box<RawItem>),
    Group(Vec<RawAlternative>, SourceLocation),
    /// A leading `!` on an item: records a conflict-resolution override.
    Override(Box<RawItem>),
}

impl RawItem {
    pub fn location(&self) -> SourceLocation {
        match self {
            RawItem::Symbol(_, loc) => *loc,
            RawItem::Optional(inner) | RawItem::Star(inner) | RawItem::Plus(inner) => {
                inner.location()
            }
            RawItem::Group(_, loc) => *loc,
            RawItem::Override(inner) => inner.location(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RawAlternative {
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone)]
pub struct RawRule {
    pub head: String,
    pub head_location: SourceLocation,
    pub alternatives: Vec<RawAlternative>,
}

#[derive(Debug, Clone, Default)]
pub struct RawGrammar {
    pub rules: Vec<RawRule>,
}
