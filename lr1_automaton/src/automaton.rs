// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Pager (1977) weak-compatibility LR(1) automaton construction, conflict
//! detection with override resolution, and shift/goto/reduce table
//! emission. States live in an explicit arena (`Vec<RawState>` indexed by
//! raw id) rather than a shared, cyclic graph structure: Pager's algorithm
//! regenerates and discards whole states as it runs, which is simpler to
//! express as vector slots than as shared ownership.

use crate::error::{Conflict, ConflictKind, Error};
use crate::item::{core_of, Item, ItemSet};
use lr1_grammar::{Grammar, RuleId, SymbolId, TokenSet};
use std::collections::{BTreeMap, BTreeSet};

struct RawState {
    kernel: ItemSet,
    shift: BTreeMap<SymbolId, usize>,
}

/// Shift/goto/reduce tables over final (post-sort) state ids, plus the
/// distinguished halting state. `reduce` is filled in only after `check()`
/// has confirmed every `(state, token)` pair resolves to a single action.
#[derive(Debug, Default)]
pub struct ActionTables {
    pub num_states: usize,
    pub halting_state: usize,
    pub shift: BTreeMap<(usize, SymbolId), usize>,
    pub goto: BTreeMap<(usize, SymbolId), usize>,
    pub reduce: BTreeMap<(usize, SymbolId), RuleId>,
}

pub struct Automaton {
    grammar: Grammar,
    tables: ActionTables,
    closures: Vec<ItemSet>,
}

impl Automaton {
    pub fn build(grammar: Grammar) -> Result<Automaton, Error> {
        let (raw_states, halting_raw, used) = Self::generate_raw_states(&grammar);
        let (tables, order) = Self::finalize(&grammar, raw_states, halting_raw, used);
        let closures: Vec<ItemSet> = order
            .iter()
            .map(|kernel| Self::closure(&grammar, kernel))
            .collect();

        let mut automaton = Automaton {
            grammar,
            tables,
            closures,
        };
        let reduce = automaton.check()?;
        automaton.tables.reduce = reduce;
        Ok(automaton)
    }

    pub fn tables(&self) -> &ActionTables {
        &self.tables
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Closure of a kernel item set: repeatedly add productions for every
    /// nonterminal right after the dot, with lookaheads computed from
    /// FIRST(tail + inherited-context), per Pager's `_closure`.
    fn closure(grammar: &Grammar, kernel: &ItemSet) -> ItemSet {
        let mut res = kernel.clone();
        let mut todo: Vec<(Item, TokenSet)> =
            kernel.iter().map(|(item, ctx)| (*item, ctx.clone())).collect();

        while let Some((item, ctx)) = todo.pop() {
            let rule = grammar.rules.get(item.rule);
            if item.dot == rule.len() {
                continue;
            }
            let tail = &rule.body[item.dot + 1..];
            let next_symbol = rule.body[item.dot];
            let new_rules = grammar
                .rules
                .rule_from_head
                .get(&next_symbol)
                .cloned()
                .unwrap_or_default();
            for x in ctx.iter().collect::<Vec<_>>() {
                let mut word: Vec<SymbolId> = tail.to_vec();
                word.push(x);
                let lookahead = grammar.first_tokens(&word);
                for &(rule_id, _len) in &new_rules {
                    let new_item = Item::new(rule_id, 0);
                    let entry = res.entry(new_item).or_default();
                    let mut added = TokenSet::new();
                    for tok in lookahead.iter() {
                        if !entry.contains(tok) {
                            added.insert(tok);
                        }
                    }
                    if !added.is_empty() {
                        entry.union_grew(&added);
                        todo.push((new_item, added));
                    }
                }
            }
        }
        res
    }

    /// Pager's definition 1 (p. 254): `S` and `T` may be merged if their
    /// cores match and no pair of core items would cross-pollinate
    /// lookaheads that neither state already carries internally.
    fn is_compatible(s: &ItemSet, t: &ItemSet) -> bool {
        if core_of(s) != core_of(t) {
            return false;
        }
        let core: Vec<Item> = s.keys().copied().collect();
        if core.len() == 1 {
            return true;
        }
        Self::is_compatible_pairwise(s, t, &core)
    }

    fn is_compatible_pairwise(s: &ItemSet, t: &ItemSet, core: &[Item]) -> bool {
        for i in 0..core.len() - 1 {
            let a = core[i];
            for &b in core.iter().skip(i + 1) {
                let s_a = &s[&a];
                let s_b = &s[&b];
                let t_a = &t[&a];
                let t_b = &t[&b];
                let cross = s_a.intersects(t_b) || s_b.intersects(t_a);
                let own_s = s_a.intersects(s_b);
                let own_t = t_a.intersects(t_b);
                if cross && !own_s && !own_t {
                    return false;
                }
            }
        }
        true
    }

    /// Phase 1 of Pager's algorithm: build the raw state arena, merging
    /// newly-shifted kernels into weakly-compatible existing states and
    /// regenerating any already-processed state whose context grew.
    fn generate_raw_states(grammar: &Grammar) -> (Vec<RawState>, usize, BTreeSet<usize>) {
        let &(start_rule, _) = &grammar.rules.rule_from_head[&grammar.start][0];
        let mut kernels: Vec<ItemSet> = Vec::new();
        let initial_kernel: ItemSet = {
            let mut m = ItemSet::new();
            m.insert(Item::new(start_rule, 0), TokenSet::singleton(grammar.eof));
            m
        };
        kernels.push(initial_kernel);

        let mut maybe_compatible: BTreeMap<SymbolId, Vec<usize>> = BTreeMap::new();
        let mut todo: BTreeSet<usize> = BTreeSet::new();
        todo.insert(0);
        let mut done: BTreeSet<usize> = BTreeSet::new();

        let mut shift_tab: BTreeMap<usize, BTreeMap<SymbolId, usize>> = BTreeMap::new();
        let mut halting_state = usize::MAX;

        while let Some(state_no) = todo.iter().next().copied() {
            todo.remove(&state_no);
            done.insert(state_no);

            let closure = Self::closure(grammar, &kernels[state_no]);
            let mut shift: BTreeMap<SymbolId, ItemSet> = BTreeMap::new();

            for (item, ctx) in closure.iter() {
                let rule = grammar.rules.get(item.rule);
                if item.dot != rule.len() {
                    let x = rule.body[item.dot];
                    let next_item = Item::new(item.rule, item.dot + 1);
                    let entry = shift
                        .entry(x)
                        .or_default()
                        .entry(next_item)
                        .or_default();
                    entry.union_grew(ctx);
                }
            }
            // Accumulated locally and only committed below: a shift target
            // can turn out to be state_no itself (a state whose kernel
            // grows through its own transitions), in which case the
            // `done.remove`/`shift_tab.remove` regeneration below discards
            // this whole pass's results for state_no, same as Pager's
            // `stab` becoming a detached dict once `del shift_tab[Tn]` runs
            // for `Tn == state_no`.
            let mut new_shift: BTreeMap<SymbolId, usize> = BTreeMap::new();

            for (x, s) in shift {
                let candidates = maybe_compatible.get(&x).cloned().unwrap_or_default();
                let mut merged_into = None;
                for candidate in candidates {
                    if Self::is_compatible(&s, &kernels[candidate]) {
                        let mut changed = false;
                        for (prod, ctx) in s.iter() {
                            let target = kernels[candidate]
                                .entry(*prod)
                                .or_default();
                            if target.union_grew(ctx) {
                                changed = true;
                            }
                        }
                        if changed && done.contains(&candidate) {
                            done.remove(&candidate);
                            shift_tab.remove(&candidate);
                            todo.insert(candidate);
                        }
                        merged_into = Some(candidate);
                        break;
                    }
                }
                let target_state = match merged_into {
                    Some(candidate) => candidate,
                    None => {
                        let new_id = kernels.len();
                        kernels.push(s);
                        maybe_compatible.entry(x).or_default().push(new_id);
                        todo.insert(new_id);
                        if x == grammar.eof {
                            halting_state = new_id;
                        }
                        new_id
                    }
                };
                new_shift.insert(x, target_state);
            }

            if done.contains(&state_no) {
                shift_tab.insert(state_no, new_shift);
            }
        }

        // discard states orphaned by regeneration
        let mut used: BTreeSet<usize> = BTreeSet::new();
        let mut stack = vec![0usize];
        while let Some(n) = stack.pop() {
            if !used.insert(n) {
                continue;
            }
            if let Some(targets) = shift_tab.get(&n) {
                for &t in targets.values() {
                    if !used.contains(&t) {
                        stack.push(t);
                    }
                }
            }
        }

        let raw_states: Vec<RawState> = kernels
            .into_iter()
            .enumerate()
            .map(|(id, kernel)| RawState {
                kernel,
                shift: shift_tab.remove(&id).unwrap_or_default(),
            })
            .collect();

        (raw_states, halting_state, used)
    }

    /// Phase 2: drop unused states, sort the remainder by the documented
    /// `(is_halting, min_core)` key, assign final labels, and remap every
    /// shift/goto/reduce target through that relabelling.
    fn finalize(
        grammar: &Grammar,
        raw_states: Vec<RawState>,
        halting_raw: usize,
        used: BTreeSet<usize>,
    ) -> (ActionTables, Vec<ItemSet>) {
        let mut order: Vec<usize> = used.into_iter().collect();
        order.sort_by_key(|&id| {
            let is_halting = id == halting_raw;
            let min_core = raw_states[id].kernel.keys().min().copied();
            (is_halting, min_core)
        });
        let mut relabel: BTreeMap<usize, usize> = BTreeMap::new();
        for (new_id, &old_id) in order.iter().enumerate() {
            relabel.insert(old_id, new_id);
        }

        let mut tables = ActionTables {
            num_states: order.len(),
            halting_state: relabel[&halting_raw],
            ..Default::default()
        };

        let kernels: Vec<ItemSet> = order
            .iter()
            .map(|&old_id| raw_states[old_id].kernel.clone())
            .collect();

        for (new_id, &old_id) in order.iter().enumerate() {
            let raw = &raw_states[old_id];
            for (&symbol, &target_old) in &raw.shift {
                let target = relabel[&target_old];
                if grammar.symbols.is_terminal(symbol) {
                    tables.shift.insert((new_id, symbol), target);
                } else {
                    tables.goto.insert((new_id, symbol), target);
                }
            }
        }

        (tables, kernels)
    }

    /// All reduce/shift/goto actions the automaton offers at `(state, x)`.
    /// Reduce candidates are read straight from the state's closure (every
    /// completed item whose lookahead context contains `x`) rather than from
    /// `self.tables.reduce`, since that table only holds the single action
    /// `check()` resolved each `(state, token)` pair to and would otherwise
    /// hide reduce-reduce conflicts before they're ever detected.
    fn actions_at(&self, state: usize, x: SymbolId) -> Vec<Action> {
        let mut actions = Vec::new();
        if state != self.tables.halting_state {
            for (item, ctx) in self.closures[state].iter() {
                let rule = self.grammar.rules.get(item.rule);
                if item.dot == rule.len() && ctx.contains(x) {
                    actions.push(Action::Reduce(item.rule));
                }
            }
        }
        if self.grammar.symbols.is_terminal(x) {
            if let Some(&target) = self.tables.shift.get(&(state, x)) {
                actions.push(Action::Shift(target));
            }
        } else if let Some(&target) = self.tables.goto.get(&(state, x)) {
            actions.push(Action::Shift(target));
        }
        actions
    }

    fn all_tokens_at(&self, state: usize) -> BTreeSet<SymbolId> {
        let mut tokens = BTreeSet::new();
        if state != self.tables.halting_state {
            for (item, ctx) in self.closures[state].iter() {
                let rule = self.grammar.rules.get(item.rule);
                if item.dot == rule.len() {
                    for tok in ctx.iter() {
                        tokens.insert(tok);
                    }
                }
            }
        }
        for &(s, x) in self.tables.shift.keys() {
            if s == state {
                tokens.insert(x);
            }
        }
        for &(s, x) in self.tables.goto.keys() {
            if s == state {
                tokens.insert(x);
            }
        }
        tokens
    }

    /// Whether `action` at `(state, x)` is pre-selected by a `!`-override
    /// in the grammar source. A shift is authorized only if *every* item
    /// predicting `x` leads, once shifted, straight to the overridden body
    /// position (the position right after the marked symbol's predecessor)
    /// -- that's what lets `E '+' !E` resolve the dangling-`+` conflict in
    /// favour of shift.
    fn check_override(
        &self,
        overrides: &lr1_grammar::Overrides,
        state: usize,
        x: SymbolId,
        action: &Action,
    ) -> bool {
        match action {
            Action::Shift(_) => {
                let predicting: Vec<Item> = self.closures[state]
                    .keys()
                    .copied()
                    .filter(|item| {
                        let rule = self.grammar.rules.get(item.rule);
                        item.dot != rule.len() && rule.body[item.dot] == x
                    })
                    .collect();
                !predicting.is_empty()
                    && predicting
                        .iter()
                        .all(|item| overrides.contains(item.rule, item.dot + 1))
            }
            Action::Reduce(rule_id) => {
                let len = self.grammar.rules.get(*rule_id).len();
                overrides.contains(*rule_id, len)
            }
        }
    }

    /// Walk every reachable state, re-checking overrides, and collect any
    /// conflicts that survive override resolution. On success returns the
    /// single resolved reduce action for every `(state, token)` pair that
    /// offered one, ready to populate `ActionTables::reduce`.
    fn check(&self) -> Result<BTreeMap<(usize, SymbolId), RuleId>, Error> {
        let mut path: BTreeMap<usize, Vec<SymbolId>> = BTreeMap::new();
        path.insert(0, Vec::new());
        let mut todo: BTreeSet<usize> = BTreeSet::new();
        todo.insert(0);
        let mut seen: BTreeSet<usize> = BTreeSet::new();
        let mut conflicts = Vec::new();
        let mut reduce: BTreeMap<(usize, SymbolId), RuleId> = BTreeMap::new();
        let shortcuts = self.grammar.shortcuts().ok();

        while let Some(state) = todo.iter().next().copied() {
            todo.remove(&state);
            if !seen.insert(state) {
                continue;
            }
            for x in self.all_tokens_at(state) {
                let mut actions = self.actions_at(state, x);
                if actions.len() > 1 {
                    let ok_overrides: Vec<Action> = actions
                        .iter()
                        .filter(|a| self.check_override(&self.grammar.overrides, state, x, a))
                        .cloned()
                        .collect();
                    if ok_overrides.len() == 1 {
                        actions = ok_overrides;
                    }
                }

                if let [Action::Reduce(rule_id)] = actions.as_slice() {
                    reduce.insert((state, x), *rule_id);
                }

                for action in &actions {
                    if let Action::Shift(next) = action {
                        if !path.contains_key(next) {
                            let mut word = path[&state].clone();
                            word.push(x);
                            path.insert(*next, word);
                            todo.insert(*next);
                        }
                    }
                }

                if actions.len() > 1 {
                    let mut word = path[&state].clone();
                    word.push(x);
                    let witness: Vec<String> = match &shortcuts {
                        Some(table) => word
                            .iter()
                            .map(|s| {
                                table
                                    .get(s)
                                    .map(|toks| {
                                        toks.iter()
                                            .map(|t| self.grammar.symbols.name(*t).to_string())
                                            .collect::<Vec<_>>()
                                            .join(" ")
                                    })
                                    .unwrap_or_default()
                            })
                            .collect(),
                        None => word.iter().map(|s| self.grammar.symbols.name(*s).to_string()).collect(),
                    };
                    let shifts: Vec<(RuleId, usize)> = if actions.iter().any(|a| matches!(a, Action::Shift(_))) {
                        self.closures[state]
                            .keys()
                            .filter(|item| {
                                let rule = self.grammar.rules.get(item.rule);
                                item.dot != rule.len() && rule.body[item.dot] == x
                            })
                            .map(|item| (item.rule, item.dot))
                            .collect()
                    } else {
                        Vec::new()
                    };
                    let reduces: Vec<RuleId> = actions
                        .iter()
                        .filter_map(|a| match a {
                            Action::Reduce(r) => Some(*r),
                            _ => None,
                        })
                        .collect();
                    let kind = if reduces.len() > 1 {
                        ConflictKind::ReduceReduce
                    } else {
                        ConflictKind::ShiftReduce
                    };
                    conflicts.push(Conflict {
                        kind,
                        witness,
                        shifts,
                        reduces,
                    });
                }
            }
        }

        if conflicts.is_empty() {
            Ok(reduce)
        } else {
            Err(Error::Conflicts(conflicts))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Shift(usize),
    Reduce(RuleId),
}
