// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Conflict reporting: hand-rolled `Display` impls describing each
//! shift/reduce or reduce/reduce conflict with a witness token sequence.

use lr1_grammar::RuleId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

/// One irreducible shift/reduce or reduce/reduce conflict: the witness
/// input leading to it, and the competing actions.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub witness: Vec<String>,
    pub shifts: Vec<(RuleId, usize)>,
    pub reduces: Vec<RuleId>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ConflictKind::ShiftReduce => "shift-reduce",
            ConflictKind::ReduceReduce => "reduce-reduce",
        };
        write!(f, "{} conflict: the input {} ...", kind, self.witness.join(" "))?;
        if !self.shifts.is_empty() {
            write!(f, "; can shift via rule(s) {:?}", self.shifts)?;
        }
        if !self.reduces.is_empty() {
            write!(f, "; can reduce via rule(s) {:?}", self.reduces)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum Error {
    Grammar(lr1_grammar::Error),
    Conflicts(Vec<Conflict>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Grammar(e) => write!(f, "{}", e),
            Error::Conflicts(conflicts) => {
                writeln!(f, "{} conflict(s) found:", conflicts.len())?;
                for conflict in conflicts {
                    writeln!(f, "  {}", conflict)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<lr1_grammar::Error> for Error {
    fn from(e: lr1_grammar::Error) -> Self {
        Error::Grammar(e)
    }
}
