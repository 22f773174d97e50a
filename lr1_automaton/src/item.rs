// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! LR(1) items: a dotted production plus its lookahead set, keyed by the
//! plain `(RuleId, dot)` pair rather than an identity handle, since rules
//! here are addressed by stable small ids.

use lr1_grammar::{RuleId, TokenSet};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub rule: RuleId,
    pub dot: usize,
}

impl Item {
    pub fn new(rule: RuleId, dot: usize) -> Self {
        Self { rule, dot }
    }
}

/// A state's item set: kernel or closure, depending on where it's used.
pub type ItemSet = BTreeMap<Item, TokenSet>;

/// The dotted-production keys of an item set, stripped of lookahead --
/// what Pager's compatibility test compares between two candidate states.
pub type Core = BTreeSet<Item>;

pub fn core_of(set: &ItemSet) -> Core {
    set.keys().copied().collect()
}
