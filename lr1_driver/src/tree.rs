// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Parse-tree node shape: `Leaf` carries a terminal and its payload, `Node`
//! carries a nonterminal and its already-transparency-spliced children.

use lr1_grammar::SymbolId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree<P> {
    Leaf(SymbolId, P),
    Node(SymbolId, Vec<Tree<P>>),
}

impl<P> Tree<P> {
    pub fn symbol(&self) -> SymbolId {
        match self {
            Tree::Leaf(s, _) | Tree::Node(s, _) => *s,
        }
    }

    pub fn children(&self) -> &[Tree<P>] {
        match self {
            Tree::Leaf(..) => &[],
            Tree::Node(_, children) => children,
        }
    }

    /// Left-to-right terminal-leaf sequence. Transparent nodes are already
    /// spliced out of the tree by the time it is built, so this is a plain
    /// recursive walk, not a transparency-aware one.
    pub fn leaves(&self) -> Vec<(SymbolId, P)>
    where
        P: Clone,
    {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<(SymbolId, P)>)
    where
        P: Clone,
    {
        match self {
            Tree::Leaf(s, p) => out.push((*s, p.clone())),
            Tree::Node(_, children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}
