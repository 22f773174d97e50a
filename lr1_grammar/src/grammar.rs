// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! `Grammar`: cleanup (terminal-derivation closure, reachability closure,
//! synthetic `EOF`/`S` rule), nullable/FIRST/FOLLOW fixed-point analysis and
//! `shortcuts()`, the shortest terminal-only witness string for each symbol.

use crate::error::Error;
use crate::loader::LoadedGrammar;
use crate::rule::{Overrides, Rule, RuleId, RuleTable};
use crate::symbol::{SymbolId, SymbolTable, TokenSet};
use std::collections::{BTreeMap, BTreeSet};

pub struct Grammar {
    pub symbols: SymbolTable,
    pub rules: RuleTable,
    pub overrides: Overrides,
    pub start: SymbolId,
    pub eof: SymbolId,
    pub nullable: BTreeSet<SymbolId>,
    first: BTreeMap<SymbolId, TokenSet>,
    follow: BTreeMap<SymbolId, TokenSet>,
}

impl Grammar {
    pub fn build(mut loaded: LoadedGrammar) -> Result<Grammar, Error> {
        if loaded.rules.is_empty() {
            return Err(Error::EmptyGrammar);
        }
        if !loaded.symbols.is_non_terminal(loaded.start) {
            let name = loaded.symbols.name(loaded.start).to_string();
            return Err(Error::StartNotNonTerminal(name));
        }
        if loaded.symbols.is_transparent(loaded.start) {
            let name = loaded.symbols.name(loaded.start).to_string();
            return Err(Error::StartIsTransparent(name));
        }

        let eof = Self::cleanup(&mut loaded)?;
        loaded.rules.reindex();

        let nullable = Self::compute_nullable(&loaded.rules);
        let first = Self::compute_first(&loaded.rules, &loaded.symbols, &nullable);
        let follow = Self::compute_follow(&loaded.rules, &loaded.symbols, &nullable, &first);

        Ok(Grammar {
            symbols: loaded.symbols,
            rules: loaded.rules,
            overrides: loaded.overrides,
            start: loaded.start,
            eof,
            nullable,
            first,
            follow,
        })
    }

    /// Terminal-derivation closure `N`, reachability closure `gamma`, and
    /// insertion of the synthetic `EOF` terminal and `S -> start EOF` rule.
    /// Returns the reserved `EOF` symbol id.
    fn cleanup(loaded: &mut LoadedGrammar) -> Result<SymbolId, Error> {
        let mut derives_terminals: BTreeSet<SymbolId> = loaded
            .rules
            .iter()
            .filter(|(_, r)| r.is_empty())
            .map(|(_, r)| r.head)
            .collect();

        let all_ids: Vec<RuleId> = loaded.rules.ids().collect();
        loop {
            let mut changed = false;
            for &id in &all_ids {
                if !loaded.rules.contains(id) {
                    continue;
                }
                let rule = loaded.rules.get(id);
                if derives_terminals.contains(&rule.head) {
                    continue;
                }
                let reaches = rule.body.iter().any(|s| {
                    loaded.symbols.is_terminal(*s) || derives_terminals.contains(s)
                });
                if reaches {
                    derives_terminals.insert(rule.head);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        if !derives_terminals.contains(&loaded.start) {
            let name = loaded.symbols.name(loaded.start).to_string();
            return Err(Error::StartNoTerminalDerivation(name));
        }

        let kept: Vec<RuleId> = loaded
            .rules
            .ids()
            .filter(|&id| {
                let rule = loaded.rules.get(id);
                Self::all_in(rule, &derives_terminals, &loaded.symbols)
            })
            .collect();
        Self::retain(loaded, &kept);

        let mut gamma: BTreeSet<SymbolId> = BTreeSet::new();
        gamma.insert(loaded.start);
        loop {
            let mut changed = false;
            for id in loaded.rules.ids().collect::<Vec<_>>() {
                let rule = loaded.rules.get(id);
                if !gamma.contains(&rule.head) {
                    continue;
                }
                for &s in &rule.body {
                    if gamma.insert(s) {
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let kept: Vec<RuleId> = loaded
            .rules
            .ids()
            .filter(|&id| {
                let rule = loaded.rules.get(id);
                gamma.contains(&rule.head) && rule.body.iter().all(|s| gamma.contains(s))
            })
            .collect();
        Self::retain(loaded, &kept);

        let (eof, private_start) = loaded.symbols.reserve_markers();
        let old_start = loaded.start;
        loaded
            .rules
            .insert_synthetic(Rule::new(private_start, vec![old_start, eof]));
        loaded.start = private_start;
        Ok(eof)
    }

    fn all_in(rule: &Rule, derives_terminals: &BTreeSet<SymbolId>, symbols: &SymbolTable) -> bool {
        let head_ok = derives_terminals.contains(&rule.head) || symbols.is_terminal(rule.head);
        head_ok
            && rule
                .body
                .iter()
                .all(|s| derives_terminals.contains(s) || symbols.is_terminal(*s))
    }

    fn retain(loaded: &mut LoadedGrammar, kept: &[RuleId]) {
        let keep: BTreeSet<RuleId> = kept.iter().copied().collect();
        let dead: Vec<RuleId> = loaded
            .rules
            .ids()
            .filter(|id| !keep.contains(id))
            .collect();
        for id in dead {
            loaded.rules.remove(id);
        }
    }

    fn compute_nullable(rules: &RuleTable) -> BTreeSet<SymbolId> {
        let mut nullable = BTreeSet::new();
        loop {
            let mut changed = false;
            for (_, rule) in rules.iter() {
                if nullable.contains(&rule.head) {
                    continue;
                }
                if rule.body.iter().all(|s| nullable.contains(s)) {
                    nullable.insert(rule.head);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        nullable
    }

    fn compute_first(
        rules: &RuleTable,
        symbols: &SymbolTable,
        nullable: &BTreeSet<SymbolId>,
    ) -> BTreeMap<SymbolId, TokenSet> {
        let mut first: BTreeMap<SymbolId, TokenSet> = BTreeMap::new();
        for id in symbols.all_symbols() {
            if symbols.is_terminal(id) {
                first.insert(id, TokenSet::singleton(id));
            } else {
                first.insert(id, TokenSet::new());
            }
        }
        loop {
            let mut changed = false;
            for (_, rule) in rules.iter() {
                let mut fi = TokenSet::new();
                for &s in &rule.body {
                    fi |= &first[&s];
                    if !nullable.contains(&s) {
                        break;
                    }
                }
                let entry = first.get_mut(&rule.head).unwrap();
                if entry.union_grew(&fi) {
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        first
    }

    fn compute_follow(
        rules: &RuleTable,
        symbols: &SymbolTable,
        nullable: &BTreeSet<SymbolId>,
        first: &BTreeMap<SymbolId, TokenSet>,
    ) -> BTreeMap<SymbolId, TokenSet> {
        let mut follow: BTreeMap<SymbolId, TokenSet> = BTreeMap::new();
        for id in symbols.all_symbols() {
            follow.insert(id, TokenSet::new());
        }
        loop {
            let mut changed = false;
            for (_, rule) in rules.iter() {
                for i in 0..rule.body.len() {
                    let mut fo = TokenSet::new();
                    let mut tail_nullable = true;
                    for &s in &rule.body[i + 1..] {
                        fo |= &first[&s];
                        if !nullable.contains(&s) {
                            tail_nullable = false;
                            break;
                        }
                    }
                    if tail_nullable {
                        let head_follow = follow[&rule.head].clone();
                        fo |= &head_follow;
                    }
                    let entry = follow.get_mut(&rule.body[i]).unwrap();
                    if entry.union_grew(&fo) {
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        follow
    }

    pub fn is_nullable(&self, word: &[SymbolId]) -> bool {
        word.iter().all(|s| self.nullable.contains(s))
    }

    pub fn first_tokens(&self, word: &[SymbolId]) -> TokenSet {
        let mut fi = TokenSet::new();
        for &s in word {
            fi |= &self.first[&s];
            if !self.nullable.contains(&s) {
                break;
            }
        }
        fi
    }

    pub fn follow_tokens(&self, symbol: SymbolId) -> &TokenSet {
        &self.follow[&symbol]
    }

    /// Shortest terminal-only witness string for every symbol, used to
    /// explain conflicts and construct recovery windows.
    pub fn shortcuts(&self) -> Result<BTreeMap<SymbolId, Vec<SymbolId>>, Error> {
        let mut res: BTreeMap<SymbolId, Vec<SymbolId>> = BTreeMap::new();
        for id in self.symbols.all_symbols() {
            if self.symbols.is_terminal(id) {
                res.insert(id, vec![id]);
            }
        }
        let mut todo: BTreeSet<SymbolId> = BTreeSet::new();
        for id in self.symbols.non_terminals() {
            if self.nullable.contains(&id) {
                res.insert(id, vec![]);
            } else {
                todo.insert(id);
            }
        }

        let mut rtab: BTreeMap<SymbolId, Vec<Vec<SymbolId>>> = BTreeMap::new();
        for &x in &todo {
            rtab.insert(x, Vec::new());
        }
        for (_, rule) in self.rules.iter() {
            if todo.contains(&rule.head) {
                rtab.get_mut(&rule.head).unwrap().push(rule.body.clone());
            }
        }

        while !todo.is_empty() {
            let mut still_todo = BTreeSet::new();
            for &x in &todo {
                let mut best: Option<Vec<SymbolId>> = None;
                for body in &rtab[&x] {
                    if body.iter().all(|y| res.contains_key(y)) {
                        let word: Vec<SymbolId> =
                            body.iter().flat_map(|y| res[y].clone()).collect();
                        best = Some(match best {
                            Some(current) if current.len() <= word.len() => current,
                            _ => word,
                        });
                    }
                }
                match best {
                    Some(word) => {
                        res.insert(x, word);
                    }
                    None => {
                        still_todo.insert(x);
                    }
                }
            }
            if still_todo.len() == todo.len() {
                let names = still_todo
                    .iter()
                    .map(|id| self.symbols.name(*id).to_string())
                    .collect();
                return Err(Error::NoFiniteExpansion(names));
            }
            todo = still_todo;
        }
        Ok(res)
    }
}
