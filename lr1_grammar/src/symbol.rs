// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
// Symbol interning: terminals, nonterminals and the two synthetic markers
// share one dense `u32` namespace, as recommended by the design notes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(SymbolId),
    NonTerminal(SymbolId),
}

impl Symbol {
    pub fn id(&self) -> SymbolId {
        match self {
            Symbol::Terminal(id) | Symbol::NonTerminal(id) => *id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }
}

/// Interning table mapping symbol names to stable ids, and the reverse
/// lookup used by diagnostics.  `EOF` and `S` are reserved at construction
/// time so they can never collide with a user-supplied name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    by_name: BTreeMap<String, SymbolId>,
    /// A symbol is a nonterminal iff it is ever used as a rule head; this
    /// set is populated as rules are recorded and anything left out of it
    /// is a terminal.
    non_terminals: BTreeSet<SymbolId>,
    eof: Option<SymbolId>,
    start: Option<SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning its stable id. Does not by itself decide
    /// whether the symbol is a terminal or nonterminal.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = SymbolId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn mark_non_terminal(&mut self, id: SymbolId) {
        self.non_terminals.insert(id);
    }

    /// Reserve the synthetic EOF terminal and start nonterminal.  Must be
    /// called exactly once, after all user symbols have been interned.
    pub fn reserve_markers(&mut self) -> (SymbolId, SymbolId) {
        let eof = self.intern("$EOF");
        let start = self.intern("$S");
        self.mark_non_terminal(start);
        self.eof = Some(eof);
        self.start = Some(start);
        (eof, start)
    }

    pub fn eof(&self) -> SymbolId {
        self.eof.expect("reserve_markers not called")
    }

    pub fn start(&self) -> SymbolId {
        self.start.expect("reserve_markers not called")
    }

    pub fn name(&self, id: SymbolId) -> &str {
        &self.names[id.0 as usize]
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    pub fn is_non_terminal(&self, id: SymbolId) -> bool {
        self.non_terminals.contains(&id)
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        !self.is_non_terminal(id)
    }

    pub fn is_transparent(&self, id: SymbolId) -> bool {
        self.name(id).starts_with('_')
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.non_terminals.iter().copied()
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = SymbolId> {
        (0..self.names.len() as u32).map(SymbolId)
    }
}

/// Dense context/lookahead set over the terminal alphabet.  Backed by a
/// `BTreeSet`-like sorted `Vec`, which keeps union -- the hot inner loop of
/// closure computation -- cheap and keeps iteration order deterministic
/// without a separate sort step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet(Vec<SymbolId>);

impl TokenSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn singleton(id: SymbolId) -> Self {
        Self(vec![id])
    }

    pub fn insert(&mut self, id: SymbolId) -> bool {
        match self.0.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, id);
                true
            }
        }
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.0.iter().copied()
    }

    /// `true` if adding `other` changed this set.
    pub fn union_grew(&mut self, other: &TokenSet) -> bool {
        let before = self.0.len();
        for id in other.iter() {
            self.insert(id);
        }
        self.0.len() != before
    }

    pub fn intersects(&self, other: &TokenSet) -> bool {
        self.0.iter().any(|id| other.contains(*id))
    }

    pub fn intersection(&self, other: &TokenSet) -> TokenSet {
        TokenSet(self.0.iter().copied().filter(|id| other.contains(*id)).collect())
    }
}

impl FromIterator<SymbolId> for TokenSet {
    fn from_iter<I: IntoIterator<Item = SymbolId>>(iter: I) -> Self {
        let mut set = TokenSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl BitOr for &TokenSet {
    type Output = TokenSet;

    fn bitor(self, rhs: &TokenSet) -> TokenSet {
        let mut result = self.clone();
        result.union_grew(rhs);
        result
    }
}

impl BitOrAssign<&TokenSet> for TokenSet {
    fn bitor_assign(&mut self, rhs: &TokenSet) {
        self.union_grew(rhs);
    }
}
