// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! RuleLoader: turns a parsed grammar tree into a flat rule table,
//! expanding `?`/`*`/`+`/groups into fresh transparent nonterminals and
//! extracting `!`-overrides and per-symbol source locations.

use crate::ast::{RawAlternative, RawGrammar, RawItem, SourceLocation};
use crate::rule::{Overrides, Rule, RuleId, RuleTable};
use crate::symbol::{SymbolId, SymbolTable};
use std::collections::BTreeMap;

pub struct LoadedGrammar {
    pub symbols: SymbolTable,
    pub rules: RuleTable,
    pub overrides: Overrides,
    pub rule_locations: BTreeMap<RuleId, Vec<SourceLocation>>,
    pub start: SymbolId,
}

#[derive(Default)]
pub struct RuleLoader {
    symbols: SymbolTable,
    rules: RuleTable,
    overrides: Overrides,
    rule_locations: BTreeMap<RuleId, Vec<SourceLocation>>,
    next_fresh: u32,
}

impl RuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(self, grammar: &RawGrammar) -> Result<LoadedGrammar, &'static str> {
        self.load_with_start(grammar, None)
    }

    pub fn load_with_start(
        mut self,
        grammar: &RawGrammar,
        start_override: Option<&str>,
    ) -> Result<LoadedGrammar, &'static str> {
        if grammar.rules.is_empty() {
            return Err("empty grammar");
        }
        let mut start = None;
        for raw_rule in &grammar.rules {
            let head = self.symbols.intern(&raw_rule.head);
            self.symbols.mark_non_terminal(head);
            if start.is_none() {
                start = Some(head);
            }
            for alternative in &raw_rule.alternatives {
                let (body, body_locations, override_positions) =
                    self.lower_alternative(alternative);
                let id = self.rules.insert(Rule::new(head, body));
                self.rule_locations.insert(id, body_locations);
                for pos in override_positions {
                    self.overrides.add(id, pos);
                }
            }
        }
        let start = if let Some(name) = start_override {
            self.symbols.intern(name)
        } else {
            start.expect("checked non-empty above")
        };
        self.rules.reindex();
        Ok(LoadedGrammar {
            symbols: self.symbols,
            rules: self.rules,
            overrides: self.overrides,
            rule_locations: self.rule_locations,
            start,
        })
    }

    fn fresh_name(&mut self, op: &str) -> String {
        let name = format!("_{}{}", self.next_fresh, op);
        self.next_fresh += 1;
        name
    }

    /// Lower one alternative (a sequence of items) into its body symbols,
    /// their source locations, and the positions marked with an override.
    fn lower_alternative(
        &mut self,
        alternative: &RawAlternative,
    ) -> (Vec<SymbolId>, Vec<SourceLocation>, Vec<usize>) {
        let mut body = Vec::new();
        let mut locations = Vec::new();
        let mut overrides = Vec::new();
        for item in &alternative.items {
            let (is_override, inner) = match item {
                RawItem::Override(inner) => (true, inner.as_ref()),
                other => (false, other),
            };
            let loc = inner.location();
            let symbol = self.lower_item(inner);
            if is_override {
                overrides.push(body.len());
            }
            body.push(symbol);
            locations.push(loc);
        }
        (body, locations, overrides)
    }

    /// Lower a single (non-override) item to the symbol it reduces to,
    /// introducing whatever fresh transparent nonterminals are needed.
    fn lower_item(&mut self, item: &RawItem) -> SymbolId {
        match item {
            RawItem::Symbol(name, _loc) => self.symbols.intern(name),
            RawItem::Override(inner) => self.lower_item(inner),
            RawItem::Optional(inner) => {
                let x = self.lower_item(inner);
                let n = self.new_transparent("?");
                self.add_simple_rule(n, vec![]);
                self.add_simple_rule(n, vec![x]);
                n
            }
            RawItem::Star(inner) => {
                let x = self.lower_item(inner);
                let n = self.new_transparent("*");
                self.add_simple_rule(n, vec![]);
                self.add_simple_rule(n, vec![n, x]);
                n
            }
            RawItem::Plus(inner) => {
                let x = self.lower_item(inner);
                let n = self.new_transparent("+");
                self.add_simple_rule(n, vec![x]);
                self.add_simple_rule(n, vec![n, x]);
                n
            }
            RawItem::Group(alternatives, _loc) => {
                let n = self.new_transparent("(");
                for alternative in alternatives {
                    let (body, locations, overrides) = self.lower_alternative(alternative);
                    let id = self.rules.insert(Rule::new(n, body));
                    self.rule_locations.insert(id, locations);
                    for pos in overrides {
                        self.overrides.add(id, pos);
                    }
                }
                n
            }
        }
    }

    fn new_transparent(&mut self, op: &str) -> SymbolId {
        let name = self.fresh_name(op);
        let id = self.symbols.intern(&name);
        self.symbols.mark_non_terminal(id);
        id
    }

    fn add_simple_rule(&mut self, head: SymbolId, body: Vec<SymbolId>) -> RuleId {
        let locations = vec![SourceLocation::new(0, 0); body.len()];
        let id = self.rules.insert(Rule::new(head, body));
        self.rule_locations.insert(id, locations);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn sym(name: &str) -> RawItem {
        RawItem::Symbol(name.to_string(), SourceLocation::new(1, 1))
    }

    fn alt(items: Vec<RawItem>) -> RawAlternative {
        RawAlternative { items }
    }

    #[test]
    fn plus_expands_to_one_or_more() {
        let grammar = RawGrammar {
            rules: vec![RawRule {
                head: "list".to_string(),
                head_location: SourceLocation::new(1, 1),
                alternatives: vec![alt(vec![RawItem::Plus(Box::new(sym("x")))])],
            }],
        };
        let loaded = RuleLoader::new().load(&grammar).unwrap();
        // list: _0+ ; _0+: x | _0+ x ;
        assert_eq!(loaded.rules.len(), 3);
        let list_id = loaded.symbols.lookup("list").unwrap();
        let bodies: Vec<_> = loaded.rules.rule_from_head[&list_id].clone();
        assert_eq!(bodies.len(), 1);
        let (_, len) = bodies[0];
        assert_eq!(len, 1);
    }

    #[test]
    fn override_marker_is_recorded() {
        let grammar = RawGrammar {
            rules: vec![RawRule {
                head: "e".to_string(),
                head_location: SourceLocation::new(1, 1),
                alternatives: vec![
                    alt(vec![sym("e"), sym("+"), RawItem::Override(Box::new(sym("e")))]),
                    alt(vec![sym("n")]),
                ],
            }],
        };
        let loaded = RuleLoader::new().load(&grammar).unwrap();
        let e_id = loaded.symbols.lookup("e").unwrap();
        let rule_id = loaded.rules.rule_from_head[&e_id][0].0;
        assert!(loaded.overrides.contains(rule_id, 2));
        assert!(!loaded.overrides.contains(rule_id, 0));
    }

    #[test]
    fn group_creates_transparent_nonterminal_with_alternatives() {
        let grammar = RawGrammar {
            rules: vec![RawRule {
                head: "s".to_string(),
                head_location: SourceLocation::new(1, 1),
                alternatives: vec![alt(vec![RawItem::Group(
                    vec![alt(vec![sym("a")]), alt(vec![sym("b")])],
                    SourceLocation::new(1, 1),
                )])],
            }],
        };
        let loaded = RuleLoader::new().load(&grammar).unwrap();
        assert_eq!(loaded.rules.len(), 3); // s: _0( ; _0(: a | b ;
    }
}
