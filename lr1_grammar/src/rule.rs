// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use crate::symbol::SymbolId;
use std::collections::BTreeMap;

pub type RuleId = i32;

/// `head -> body[0] ... body[l-1]`.  The synthetic `S -> start EOF` rule
/// carries `RuleId = -1`, as specified.
#[derive(Debug, Clone)]
pub struct Rule {
    pub head: SymbolId,
    pub body: Vec<SymbolId>,
}

impl Rule {
    pub fn new(head: SymbolId, body: Vec<SymbolId>) -> Self {
        Self { head, body }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A conflict override: a position in some rule's body that a grammar
/// author marked with a leading `!` to pre-select an action at a conflict
/// point.  For reduce actions the "position" recorded is the rule's full
/// length.
#[derive(Debug, Clone, Default)]
pub struct Overrides(BTreeMap<RuleId, Vec<usize>>);

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rule: RuleId, position: usize) {
        self.0.entry(rule).or_default().push(position);
    }

    pub fn contains(&self, rule: RuleId, position: usize) -> bool {
        self.0.get(&rule).is_some_and(|v| v.contains(&position))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: BTreeMap<RuleId, Rule>,
    next_id: RuleId,
    pub rule_from_head: BTreeMap<SymbolId, Vec<(RuleId, usize)>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: Rule) -> RuleId {
        let id = self.next_id;
        self.next_id += 1;
        self.rules.insert(id, rule);
        id
    }

    /// Insert the synthetic start rule under the reserved id `-1`.
    pub fn insert_synthetic(&mut self, rule: Rule) -> RuleId {
        self.rules.insert(-1, rule);
        -1
    }

    pub fn get(&self, id: RuleId) -> &Rule {
        &self.rules[&id]
    }

    pub fn remove(&mut self, id: RuleId) -> Rule {
        self.rules.remove(&id).expect("unknown rule id")
    }

    pub fn contains(&self, id: RuleId) -> bool {
        self.rules.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.rules.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules.iter().map(|(k, v)| (*k, v))
    }

    /// Mutable access to every rule body, for bulk symbol-renaming passes.
    pub fn iter_mut_bodies(&mut self) -> impl Iterator<Item = (RuleId, &mut Vec<SymbolId>)> {
        self.rules.iter_mut().map(|(k, v)| (*k, &mut v.body))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rebuild `rule_from_head` from the current rule set.  Must be called
    /// after any structural edit (cleanup, optimisation, synthetic-rule
    /// insertion) before it is relied on.
    pub fn reindex(&mut self) {
        self.rule_from_head.clear();
        for (id, rule) in self.rules.iter() {
            self.rule_from_head
                .entry(rule.head)
                .or_default()
                .push((*id, rule.len()));
        }
    }
}
