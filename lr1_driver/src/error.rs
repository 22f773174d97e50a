// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Collected runtime parse errors, with a hand-rolled `Display` impl rather
//! than pulling in an error-derive crate for a type this small.

use crate::tree::Tree;
use lr1_grammar::SymbolId;
use std::collections::BTreeSet;
use std::fmt;

/// One token the driver could not place, and the set of terminals that
/// would have been accepted in its place.
#[derive(Debug, Clone)]
pub struct ParseError<P> {
    pub found: (SymbolId, P),
    pub expected: BTreeSet<SymbolId>,
}

impl<P> fmt::Display for ParseError<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unexpected {}, expected one of: ", self.found.0)?;
        for (i, t) in self.expected.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{t}")?;
        }
        Ok(())
    }
}

/// Raised when parsing could not complete cleanly. `tree` carries the
/// best repaired parse if recovery produced one; `None` if the bounded
/// repair search could not improve on leaving the input untouched.
#[derive(Debug, Clone)]
pub struct ParseErrors<P> {
    pub errors: Vec<ParseError<P>>,
    pub tree: Option<Tree<P>>,
}

impl<P> fmt::Display for ParseErrors<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} parse error(s):", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        Ok(())
    }
}

impl<P: fmt::Debug> std::error::Error for ParseErrors<P> {}
