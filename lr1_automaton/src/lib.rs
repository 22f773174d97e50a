// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
pub mod automaton;
pub mod error;
pub mod item;

pub use automaton::{ActionTables, Automaton};
pub use error::{Conflict, ConflictKind, Error};
pub use item::{Core, Item, ItemSet};
