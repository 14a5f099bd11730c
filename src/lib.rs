//!The crate provides backtracking parser combinators working directly on string slices:
//! primitive matchers (literals, character sets, anchored patterns) glued together by
//! sequencing, repetition and ordered choice, with no grammar compiler in between.
//!
//! A parser is a [`Parser<T>`](parser::Parser) turning the remaining input into a
//! [`Step`](step::Step): either a value with the rest of the input, or a
//! [`ParseError`](error::ParseError) with nothing consumed. Failures stay plain values
//! until [`run`](parser::run) turns them into an error. Every parser also has a
//! human-readable description kept in the [`registry`], and a
//! [`DebugSession`](debug::DebugSession) can trace the descent.
//!
//! # Example
//!```
//!     use parsnip::combinator::{between, choice, lazy, separated_by};
//!     use parsnip::lexer::{keyword, number, quoted_string, whitespace};
//!     use parsnip::parser::{run, Parser};
//!
//!     #[derive(Debug, Clone, PartialEq)]
//!     enum Item {
//!         Number(f64),
//!         Text(String),
//!         List(Vec<Item>),
//!     }
//!
//!     fn item() -> Parser<Item> {
//!         lazy(|| {
//!             choice(vec![
//!                 whitespace().then(number()).map(Item::Number),
//!                 whitespace().then(quoted_string()).map(Item::Text),
//!                 between(keyword("["), separated_by(item(), keyword(",")), keyword("]"))
//!                     .map(Item::List),
//!             ])
//!         })
//!     }
//!
//!     let parsed = run(&item(), r#"[1, "two", [3.5, []]]"#);
//!     assert_eq!(
//!         parsed,
//!         Ok(Item::List(vec![
//!             Item::Number(1.0),
//!             Item::Text("two".to_string()),
//!             Item::List(vec![Item::Number(3.5), Item::List(vec![])]),
//!         ]))
//!     );
//!
//!     let error = run(&item(), "[1, ?]").unwrap_err();
//!     println!("{}", error);
//! ```
//!
//! Only parsers are accepted where a parser is expected, a plain function is rejected
//! by the compiler:
//!```compile_fail
//!     use parsnip::combinator::many;
//!
//!     let not_a_parser = |input: &str| input.len();
//!     let _ = many(not_a_parser);
//! ```

pub mod combinator;
pub mod debug;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod primitive;
pub mod registry;
pub mod step;
