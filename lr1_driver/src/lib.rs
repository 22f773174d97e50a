// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
pub mod driver;
pub mod error;
pub mod tree;

pub use driver::{Driver, RecoveryParams, Token};
pub use error::{ParseError, ParseErrors};
pub use tree::Tree;
