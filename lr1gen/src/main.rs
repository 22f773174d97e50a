// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use clap::crate_authors;
use structopt::StructOpt;

use lr1_driver::{Driver, RecoveryParams};
use lr1gen::{demo, Generator};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lr1gen",
    about = "Build the bundled arithmetic-expression grammar and parse a token stream against it",
    author = crate_authors!(),
)]
struct CLOptions {
    /// Tokens to parse, space separated: 'n', '+', '*', '(', ')'.
    tokens: Vec<String>,
    /// How many tokens before an error the repair search considers.
    #[structopt(long, default_value = "4")]
    pre_window: usize,
    /// How many tokens past an error the repair search reads ahead.
    #[structopt(long, default_value = "4")]
    post_window: usize,
    /// Abort after this many collected errors.
    #[structopt(long)]
    max_errors: Option<usize>,
}

fn main() {
    let options = CLOptions::from_args();

    let grammar = demo::arithmetic_grammar();
    let automaton = match Generator::build(&grammar) {
        Ok(automaton) => automaton,
        Err(error) => {
            eprintln!("failed to build automaton: {error}");
            std::process::exit(4);
        }
    };
    println!(
        "built automaton with {} states",
        automaton.tables().num_states
    );

    let symbols = &automaton.grammar().symbols;
    let mut input = Vec::new();
    for token in &options.tokens {
        match symbols.lookup(token) {
            Some(id) => input.push((id, token.clone())),
            None => {
                eprintln!("unknown token: {token}");
                std::process::exit(1);
            }
        }
    }

    let driver: Driver<String> = Driver::with_params(
        &automaton,
        RecoveryParams {
            pre_window: options.pre_window,
            post_window: options.post_window,
            max_errors: options.max_errors,
        },
    );
    match driver.parse(input) {
        Ok(tree) => {
            let leaves: Vec<String> = tree.leaves().into_iter().map(|(_, v)| v).collect();
            println!("parsed: {}", leaves.join(" "));
        }
        Err(errors) => {
            eprintln!("{errors}");
            std::process::exit(if errors.tree.is_some() { 3 } else { 5 });
        }
    }
}
