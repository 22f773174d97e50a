//! The bundled arithmetic demo grammar parses `n * ( n + n )` and the leaf
//! sequence reproduces the input.

use lr1_driver::Driver;
use lr1gen::{demo, Generator};

#[test]
fn demo_grammar_parses_and_round_trips_leaves() {
    let grammar = demo::arithmetic_grammar();
    let automaton = Generator::build(&grammar).expect("demo grammar should be conflict-free");

    let symbols = &automaton.grammar().symbols;
    let n = symbols.lookup("n").unwrap();
    let star = symbols.lookup("*").unwrap();
    let plus = symbols.lookup("+").unwrap();
    let lparen = symbols.lookup("(").unwrap();
    let rparen = symbols.lookup(")").unwrap();

    let input = vec![
        (n, 1),
        (star, 0),
        (lparen, 0),
        (n, 2),
        (plus, 0),
        (n, 3),
        (rparen, 0),
    ];

    let driver: Driver<i32> = Driver::new(&automaton);
    let tree = driver.parse(input.clone()).expect("should parse");
    assert_eq!(tree.leaves(), input);
}
