// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! RuleOptimiser: deduplicates transparent rule-sets and inlines
//! transparent nonterminals referenced exactly once, to a fixed point.

use crate::loader::LoadedGrammar;
use crate::rule::{Rule, RuleId};
use crate::symbol::SymbolId;
use std::collections::{BTreeMap, BTreeSet};

pub struct RuleOptimiser;

impl RuleOptimiser {
    pub fn optimise(grammar: &mut LoadedGrammar) {
        loop {
            let deduped = Self::deduplicate_pass(grammar);
            let inlined = Self::inline_pass(grammar);
            if !deduped && !inlined {
                break;
            }
        }
        grammar.rules.reindex();
    }

    /// Merge transparent heads whose body-sets are identical, renaming all
    /// references to a single representative (the lowest id in the group).
    fn deduplicate_pass(grammar: &mut LoadedGrammar) -> bool {
        let mut body_sets: BTreeMap<SymbolId, BTreeSet<Vec<SymbolId>>> = BTreeMap::new();
        for (_, rule) in grammar.rules.iter() {
            if grammar.symbols.is_transparent(rule.head) {
                body_sets
                    .entry(rule.head)
                    .or_default()
                    .insert(rule.body.clone());
            }
        }

        let mut groups: BTreeMap<BTreeSet<Vec<SymbolId>>, SymbolId> = BTreeMap::new();
        let mut rename: BTreeMap<SymbolId, SymbolId> = BTreeMap::new();
        for (&head, bodies) in body_sets.iter() {
            match groups.get(bodies) {
                Some(&representative) if representative != head => {
                    rename.insert(head, representative);
                }
                Some(_) => {}
                None => {
                    groups.insert(bodies.clone(), head);
                }
            }
        }
        if rename.is_empty() {
            return false;
        }

        for (_, rule) in grammar.rules.iter_mut_bodies() {
            for symbol in rule.iter_mut() {
                if let Some(&replacement) = rename.get(symbol) {
                    *symbol = replacement;
                }
            }
        }
        let dead_ids: Vec<RuleId> = grammar
            .rules
            .iter()
            .filter(|(_, rule)| rename.contains_key(&rule.head))
            .map(|(id, _)| id)
            .collect();
        for id in dead_ids {
            grammar.rules.remove(id);
        }
        grammar.rules.reindex();
        true
    }

    /// Inline a transparent nonterminal that is referenced exactly once
    /// (and not recursively, and not twice within that one reference) when
    /// the net-token accounting formula favours it.
    fn inline_pass(grammar: &mut LoadedGrammar) -> bool {
        grammar.rules.reindex();
        let candidates: Vec<SymbolId> = grammar
            .symbols
            .non_terminals()
            .filter(|&id| grammar.symbols.is_transparent(id) && id != grammar.start)
            .collect();

        for candidate in candidates {
            if let Some((referencing_rule, position)) =
                Self::sole_reference(grammar, candidate)
            {
                if Self::should_inline(grammar, candidate, referencing_rule) {
                    Self::inline_at(grammar, candidate, referencing_rule, position);
                    grammar.rules.reindex();
                    return true;
                }
            }
        }
        false
    }

    /// Returns `Some((rule, position))` iff `candidate` occurs exactly once
    /// across the whole rule set, in a rule other than its own definitions.
    fn sole_reference(grammar: &LoadedGrammar, candidate: SymbolId) -> Option<(RuleId, usize)> {
        let mut found = None;
        let mut count = 0;
        for (id, rule) in grammar.rules.iter() {
            if rule.head == candidate {
                if rule.body.contains(&candidate) {
                    return None; // self-recursive, never inline
                }
                continue;
            }
            for (pos, &symbol) in rule.body.iter().enumerate() {
                if symbol == candidate {
                    count += 1;
                    if count > 1 {
                        return None;
                    }
                    found = Some((id, pos));
                }
            }
        }
        found
    }

    fn should_inline(grammar: &LoadedGrammar, candidate: SymbolId, referencing_rule: RuleId) -> bool {
        let bodies: Vec<&Rule> = grammar
            .rules
            .iter()
            .filter(|(_, r)| r.head == candidate)
            .map(|(_, r)| r)
            .collect();
        let k = bodies.len() as i64;
        let sum_body_lens: i64 = bodies.iter().map(|r| r.len() as i64).sum();
        let rhs_len = grammar.rules.get(referencing_rule).len() as i64;
        let refs = 1i64;

        let removed = sum_body_lens + k;
        let added = (k - 1) * rhs_len + (sum_body_lens - 1) * refs;
        removed > added
    }

    fn inline_at(
        grammar: &mut LoadedGrammar,
        candidate: SymbolId,
        referencing_rule: RuleId,
        position: usize,
    ) {
        let bodies: Vec<Vec<SymbolId>> = grammar
            .rules
            .iter()
            .filter(|(_, r)| r.head == candidate)
            .map(|(_, r)| r.body.clone())
            .collect();

        let host = grammar.rules.get(referencing_rule).clone();
        for body in &bodies {
            let mut new_body = host.body[..position].to_vec();
            new_body.extend(body.iter().copied());
            new_body.extend(host.body[position + 1..].iter().copied());
            grammar.rules.insert(Rule::new(host.head, new_body));
        }
        grammar.rules.remove(referencing_rule);

        let dead_ids: Vec<RuleId> = grammar
            .rules
            .iter()
            .filter(|(_, r)| r.head == candidate)
            .map(|(id, _)| id)
            .collect();
        for id in dead_ids {
            grammar.rules.remove(id);
        }
    }
}
