// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use std::fmt;

/// Fatal, unrecoverable problems with a grammar's rule set, reported with
/// the offending symbol(s). Hand-written `Display` impl rather than a
/// derive-macro error crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    EmptyGrammar,
    StartNotNonTerminal(String),
    StartIsTransparent(String),
    StartNoTerminalDerivation(String),
    NoFiniteExpansion(Vec<String>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyGrammar => write!(f, "grammar has no rules"),
            Error::StartNotNonTerminal(name) => {
                write!(f, "start symbol \"{}\" is not a nonterminal", name)
            }
            Error::StartIsTransparent(name) => {
                write!(f, "start symbol \"{}\" is transparent (begins with '_')", name)
            }
            Error::StartNoTerminalDerivation(name) => {
                write!(f, "start symbol \"{}\" does not derive terminals", name)
            }
            Error::NoFiniteExpansion(names) => {
                write!(
                    f,
                    "symbols with no finite expansion (infinite recursion): {}",
                    names.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for Error {}
