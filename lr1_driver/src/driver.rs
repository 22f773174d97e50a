// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Windowed error-recovering LR(1) driver: a shift/reduce loop that builds
//! a parse tree with transparent-node splicing, a stateless dry-run used to
//! score candidate repairs, and a bounded insert/replace/delete search over
//! a window of already-shifted and upcoming tokens once a parse error is
//! hit.

use crate::error::{ParseError, ParseErrors};
use crate::tree::Tree;
use lr1_automaton::Automaton;
use lr1_grammar::SymbolId;
use std::collections::{BTreeSet, VecDeque};

/// Tunes the bounded repair search.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryParams {
    pub pre_window: usize,
    pub post_window: usize,
    pub max_errors: Option<usize>,
}

impl Default for RecoveryParams {
    fn default() -> Self {
        RecoveryParams {
            pre_window: 4,
            post_window: 4,
            max_errors: None,
        }
    }
}

/// One input item: a terminal's identity plus whatever opaque payload the
/// caller wants preserved in the resulting tree.
pub type Token<P> = (SymbolId, P);

struct RunOutcome<P> {
    done: bool,
    state: usize,
    error: Option<Token<P>>,
}

pub struct Driver<'a, P> {
    automaton: &'a Automaton,
    params: RecoveryParams,
    terminals: Vec<SymbolId>,
    _payload: std::marker::PhantomData<fn() -> P>,
}

impl<'a, P: Clone + Default> Driver<'a, P> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self::with_params(automaton, RecoveryParams::default())
    }

    pub fn with_params(automaton: &'a Automaton, params: RecoveryParams) -> Self {
        let grammar = automaton.grammar();
        let terminals = grammar
            .symbols
            .all_symbols()
            .filter(|&s| grammar.symbols.is_terminal(s) && s != grammar.eof)
            .collect();
        Driver {
            automaton,
            params,
            terminals,
            _payload: std::marker::PhantomData,
        }
    }

    /// Parse `input` to completion, recovering from errors within the
    /// configured window. Returns the root subtree on a clean parse, or
    /// `Err` carrying every collected error and, if recovery produced one,
    /// the best-effort repaired tree.
    pub fn parse(
        &self,
        input: impl IntoIterator<Item = Token<P>>,
    ) -> Result<Tree<P>, ParseErrors<P>> {
        let eof = self.automaton.grammar().eof;
        let mut rest = input
            .into_iter()
            .chain(std::iter::once((eof, P::default())));
        let mut buffer: VecDeque<Token<P>> = VecDeque::new();
        let mut errors = Vec::new();
        let mut stack: Vec<(usize, Tree<P>)> = Vec::new();
        let mut state = 0usize;

        loop {
            let outcome = self.run(&mut buffer, &mut rest, &mut stack, state);
            state = outcome.state;
            if outcome.done {
                break;
            }
            let Some(found) = outcome.error else {
                // Input exhausted before reaching the halting state. Cannot
                // happen once EOF has been appended and the tables are
                // conflict-free: shifting EOF always lands on the halting
                // state directly.
                break;
            };
            buffer.pop_front();

            let expected = self.expected_at(state);
            errors.push(ParseError {
                found: found.clone(),
                expected,
            });
            if self
                .params
                .max_errors
                .is_some_and(|max| errors.len() >= max)
            {
                return Err(ParseErrors { errors, tree: None });
            }

            match self.repair(&mut buffer, &mut rest, &mut stack, found) {
                Some(new_state) => state = new_state,
                None => return Err(ParseErrors { errors, tree: None }),
            }
        }

        // The halting state is reached by *shifting* EOF, which pushes one
        // more (state, EOF-leaf) entry on top of the fully-reduced start
        // symbol; the real root sits at the bottom of the stack.
        let tree = stack
            .into_iter()
            .next()
            .expect("halting state reached with an empty stack")
            .1;
        if errors.is_empty() {
            Ok(tree)
        } else {
            Err(ParseErrors {
                errors,
                tree: Some(tree),
            })
        }
    }

    /// The shift/reduce loop proper. Runs until the halting state, until
    /// the input is exhausted, or until no action applies at `(state, t)`.
    fn run<I: Iterator<Item = Token<P>>>(
        &self,
        buffer: &mut VecDeque<Token<P>>,
        rest: &mut I,
        stack: &mut Vec<(usize, Tree<P>)>,
        mut state: usize,
    ) -> RunOutcome<P> {
        let tables = self.automaton.tables();
        let grammar = self.automaton.grammar();
        loop {
            if state == tables.halting_state {
                return RunOutcome {
                    done: true,
                    state,
                    error: None,
                };
            }
            if buffer.is_empty() {
                if let Some(token) = rest.next() {
                    buffer.push_back(token);
                }
            }
            let symbol = match buffer.front() {
                Some((s, _)) => *s,
                None => {
                    return RunOutcome {
                        done: false,
                        state,
                        error: None,
                    }
                }
            };

            if let Some(&target) = tables.shift.get(&(state, symbol)) {
                let (sym, payload) = buffer.pop_front().unwrap();
                stack.push((state, Tree::Leaf(sym, payload)));
                state = target;
            } else if let Some(&rule_id) = tables.reduce.get(&(state, symbol)) {
                let rule = grammar.rules.get(rule_id);
                let head = rule.head;
                let n = rule.len();
                let (new_state, children) = if n > 0 {
                    let base = stack.len() - n;
                    let new_state = stack[base].0;
                    let mut children = Vec::with_capacity(n);
                    for (_, tree) in stack.split_off(base) {
                        if grammar.symbols.is_transparent(tree.symbol()) {
                            match tree {
                                Tree::Node(_, grandchildren) => children.extend(grandchildren),
                                leaf @ Tree::Leaf(..) => children.push(leaf),
                            }
                        } else {
                            children.push(tree);
                        }
                    }
                    (new_state, children)
                } else {
                    (state, Vec::new())
                };
                state = tables.goto[&(new_state, head)];
                stack.push((new_state, Tree::Node(head, children)));
            } else {
                return RunOutcome {
                    done: false,
                    state,
                    error: buffer.front().cloned(),
                };
            }
        }
    }

    /// Stateless dry-run used only to score a repair candidate: no tree is
    /// built, only how many leading tokens of `candidate` get consumed.
    fn dry_run(&self, candidate: &[Token<P>], stack_states: &[usize], mut state: usize) -> usize {
        let tables = self.automaton.tables();
        let grammar = self.automaton.grammar();
        let mut stack: Vec<usize> = stack_states.to_vec();
        let mut count = 0;
        while state != tables.halting_state && count < candidate.len() {
            let symbol = candidate[count].0;
            if let Some(&target) = tables.shift.get(&(state, symbol)) {
                stack.push(state);
                state = target;
                count += 1;
            } else if let Some(&rule_id) = tables.reduce.get(&(state, symbol)) {
                let rule = grammar.rules.get(rule_id);
                let n = rule.len();
                if n > 0 {
                    let base = stack.len() - n;
                    state = stack[base];
                    stack.truncate(base);
                }
                stack.push(state);
                state = tables.goto[&(state, rule.head)];
            } else {
                break;
            }
        }
        count
    }

    fn expected_at(&self, state: usize) -> BTreeSet<SymbolId> {
        let tables = self.automaton.tables();
        let mut expected = BTreeSet::new();
        for &(s, t) in tables.shift.keys() {
            if s == state {
                expected.insert(t);
            }
        }
        for &(s, t) in tables.reduce.keys() {
            if s == state {
                expected.insert(t);
            }
        }
        expected
    }

    /// Bounded lookbehind/lookahead repair. On success, the repaired queue
    /// is pushed back in front of `buffer` and the rebuilt `(stack, state)`
    /// is returned so the main loop can resume from it.
    fn repair<I: Iterator<Item = Token<P>>>(
        &self,
        buffer: &mut VecDeque<Token<P>>,
        rest: &mut I,
        stack: &mut Vec<(usize, Tree<P>)>,
        lookahead: Token<P>,
    ) -> Option<usize> {
        let pre_window = self.params.pre_window;
        let post_window = self.params.post_window;

        let mut leaves = Vec::new();
        for (_, tree) in stack.drain(..) {
            leaves.extend(tree.leaves());
        }
        let split = leaves.len().saturating_sub(pre_window);
        let overflow: Vec<Token<P>> = leaves[..split].to_vec();
        let mut queue: Vec<Token<P>> = leaves[split..].to_vec();
        queue.push(lookahead);

        // Reparse the part of the old stack that falls outside the
        // pre-window: it was accepted before, so it can only ever succeed
        // again, rebuilding `stack` and landing on the state the window
        // search should resume from.
        let mut overflow_iter = overflow.into_iter();
        let rebuilt = self.run(&mut VecDeque::new(), &mut overflow_iter, stack, 0);
        let state = rebuilt.state;

        let window = queue.len();
        for _ in 0..post_window {
            if buffer.is_empty() {
                match rest.next() {
                    Some(token) => queue.push(token),
                    None => break,
                }
            } else {
                queue.push(buffer.pop_front().unwrap());
            }
        }

        let stack_states: Vec<usize> = stack.iter().map(|(s, _)| *s).collect();
        let baseline = queue.len() - window + 1;
        let mut best_val = baseline;
        let mut best_queue = queue.clone();
        let mut improved = false;

        for i in (0..window).rev() {
            for &t in &self.terminals {
                let candidate = Self::with_insert(&queue, i, t);
                if self.consider(&candidate, &stack_states, state, &mut best_val, &mut best_queue)
                {
                    improved = true;
                }
            }
            if queue[i].0 == self.automaton.grammar().eof {
                continue;
            }
            for &t in &self.terminals {
                if t == queue[i].0 {
                    continue;
                }
                let candidate = Self::with_replace(&queue, i, t);
                if self.consider(&candidate, &stack_states, state, &mut best_val, &mut best_queue)
                {
                    improved = true;
                }
            }
            let candidate = Self::with_delete(&queue, i);
            if self.consider(&candidate, &stack_states, state, &mut best_val, &mut best_queue) {
                improved = true;
            }
        }

        if !improved {
            return None;
        }
        for token in best_queue.into_iter().rev() {
            buffer.push_front(token);
        }
        Some(state)
    }

    fn consider(
        &self,
        candidate: &[Token<P>],
        stack_states: &[usize],
        state: usize,
        best_val: &mut usize,
        best_queue: &mut Vec<Token<P>>,
    ) -> bool {
        let pos = self.dry_run(candidate, stack_states, state);
        let val = candidate.len() - pos;
        if val < *best_val {
            *best_val = val;
            *best_queue = candidate.to_vec();
            true
        } else {
            false
        }
    }

    fn with_insert(queue: &[Token<P>], i: usize, t: SymbolId) -> Vec<Token<P>> {
        let mut out = Vec::with_capacity(queue.len() + 1);
        out.extend_from_slice(&queue[..i]);
        out.push((t, P::default()));
        out.extend_from_slice(&queue[i..]);
        out
    }

    fn with_replace(queue: &[Token<P>], i: usize, t: SymbolId) -> Vec<Token<P>> {
        let mut out = Vec::with_capacity(queue.len());
        out.extend_from_slice(&queue[..i]);
        out.push((t, P::default()));
        out.extend_from_slice(&queue[i + 1..]);
        out
    }

    fn with_delete(queue: &[Token<P>], i: usize) -> Vec<Token<P>> {
        let mut out = Vec::with_capacity(queue.len() - 1);
        out.extend_from_slice(&queue[..i]);
        out.extend_from_slice(&queue[i + 1..]);
        out
    }
}
