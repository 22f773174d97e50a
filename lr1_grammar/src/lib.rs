// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
pub mod ast;
pub mod error;
pub mod grammar;
pub mod loader;
pub mod optimiser;
pub mod rule;
pub mod symbol;

pub use error::Error;
pub use grammar::Grammar;
pub use loader::{LoadedGrammar, RuleLoader};
pub use optimiser::RuleOptimiser;
pub use rule::{Overrides, Rule, RuleId, RuleTable};
pub use symbol::{Symbol, SymbolId, SymbolTable, TokenSet};

/// Load, optimise and analyse a parsed grammar tree in one call.
pub fn build(tree: &ast::RawGrammar) -> Result<Grammar, Error> {
    build_with_start(tree, None)
}

pub fn build_with_start(
    tree: &ast::RawGrammar,
    start_override: Option<&str>,
) -> Result<Grammar, Error> {
    let mut loaded = RuleLoader::new()
        .load_with_start(tree, start_override)
        .map_err(|_| Error::EmptyGrammar)?;
    RuleOptimiser::optimise(&mut loaded);
    Grammar::build(loaded)
}
