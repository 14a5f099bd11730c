//! Combinators building new parsers out of existing ones.
//!
//! Every sequencing combinator continues through
//! [`Step::and_then`](crate::step::Step::and_then), so a failure
//! anywhere in a sequence comes out unchanged, naming the parser that actually failed.
use crate::error::{near, Attempt, ParseError};
use crate::parser::Parser;
use crate::step::Step::{Fail, Success};
use once_cell::sync::OnceCell;

/// Runs `first`, then `second` on its rest, keeping the value of `second`.
pub fn then<T, U>(first: Parser<T>, second: Parser<U>) -> Parser<U>
where
    T: 'static,
    U: 'static,
{
    let description = format!("then({}, {})", first.label(), second.label());
    Parser::new(description, move |input| {
        first.parse(input).and_then(|_, rest| second.parse(rest))
    })
}

/// Runs `first`, then `second` on its rest, keeping the value of `first`.
pub fn skip<T, U>(first: Parser<T>, second: Parser<U>) -> Parser<T>
where
    T: 'static,
    U: 'static,
{
    let description = format!("skip({}, {})", first.label(), second.label());
    Parser::new(description, move |input| {
        first
            .parse(input)
            .and_then(|l, rest| second.parse(rest).map(|r| (l, r)))
            .take_left()
    })
}

/// Runs `first`, then `second` on its rest, keeping both values.
pub fn zip<T, U>(first: Parser<T>, second: Parser<U>) -> Parser<(T, U)>
where
    T: 'static,
    U: 'static,
{
    let description = format!("zip({}, {})", first.label(), second.label());
    Parser::new(description, move |input| {
        first
            .parse(input)
            .and_then(|l, rest| second.parse(rest).map(|r| (l, r)))
    })
}

/// Transforms the value of `parser` with `mapper`.
pub fn lift<T, U, F>(parser: Parser<T>, mapper: F) -> Parser<U>
where
    T: 'static,
    U: 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    let description = format!("lift({})", parser.label());
    Parser::new(description, move |input| parser.parse(input).map(&mapper))
}

/// Transforms the value of `parser` with a conversion that may refuse it.
///
/// A refusal is a parse failure reported where `parser` started.
pub fn try_lift<T, U, F>(parser: Parser<T>, convert: F) -> Parser<U>
where
    T: 'static,
    U: 'static,
    F: Fn(T) -> Result<U, String> + Send + Sync + 'static,
{
    let description = format!("try_lift({})", parser.label());
    Parser::new(description, move |input| match parser.parse(input) {
        Success(v, rest) => match convert(v) {
            Ok(u) => Success(u, rest),
            Err(message) => Fail(
                ParseError::Invalid {
                    message,
                    near: near(input),
                },
                input,
            ),
        },
        Fail(e, rest) => Fail(e, rest),
    })
}

/// Applies `parser` zero or more times, never failing.
///
/// Stops at the first failure, or as soon as `parser` succeeds without consuming
/// anything. That zero-width value is not collected.
///
/// ```
///  use parsnip::combinator::many;
///  use parsnip::parser::{run, succeed};
///  use parsnip::primitive::literal;
///
///  assert_eq!(run(&many(literal("a")), "aaa"), Ok(vec![(), (), ()]));
///  assert_eq!(run(&many(literal("a")), ""), Ok(vec![]));
///  assert_eq!(many(succeed(1)).parse("xyz").ok(), Some(vec![]));
/// ```
pub fn many<T: 'static>(parser: Parser<T>) -> Parser<Vec<T>> {
    let description = format!("many({})", parser.label());
    Parser::new(description, move |input| {
        let mut values = vec![];
        let mut rest = input;
        while let Success(value, next) = parser.parse(rest) {
            if next.len() >= rest.len() {
                break;
            }
            values.push(value);
            rest = next;
        }
        Success(values, rest)
    })
}

/// Applies `parser` one or more times.
pub fn some<T: 'static>(parser: Parser<T>) -> Parser<Vec<T>> {
    let description = format!("some({})", parser.label());
    let tail = many(parser.clone());
    Parser::new(description, move |input| {
        parser
            .parse(input)
            .and_then(|head, rest| tail.parse(rest).map(|tail| (head, tail)))
            .merge()
    })
}

/// Tries every parser in order on the same input and commits to the first success.
///
/// When all of them fail, the error lists each alternative with its own failure.
///
/// ```
///  use parsnip::combinator::choice;
///  use parsnip::error::ParseError;
///  use parsnip::primitive::literal;
///
///  let sign = choice(vec![literal("+").map(|_| 1), literal("-").map(|_| -1)]);
///  assert_eq!(sign.parse("-5").ok(), Some(-1));
///
///  match sign.parse("5").error() {
///     Some(ParseError::Choice { attempts, .. }) => {
///         assert_eq!(attempts.len(), 2);
///         assert_eq!(attempts[1].description, r#"lift(literal("-"))"#);
///     }
///     other => panic!("unexpected {:?}", other),
///  }
/// ```
pub fn choice<T: 'static>(parsers: impl IntoIterator<Item = Parser<T>>) -> Parser<T> {
    let parsers: Vec<Parser<T>> = parsers.into_iter().collect();
    let names: Vec<String> = parsers.iter().map(Parser::label).collect();
    let description = format!("choice({})", names.join(", "));
    Parser::new(description, move |input| {
        let mut attempts = Vec::with_capacity(parsers.len());
        for (parser, name) in parsers.iter().zip(&names) {
            match parser.parse(input) {
                Success(v, rest) => return Success(v, rest),
                Fail(error, _) => attempts.push(Attempt {
                    description: name.clone(),
                    error,
                }),
            }
        }
        Fail(
            ParseError::Choice {
                near: near(input),
                attempts,
            },
            input,
        )
    })
}

/// Applies `parser` if it matches, yielding `None` without consuming otherwise.
pub fn optional<T: 'static>(parser: Parser<T>) -> Parser<Option<T>> {
    let description = format!("optional({})", parser.label());
    Parser::new(description, move |input| match parser.parse(input) {
        Success(v, rest) => Success(Some(v), rest),
        Fail(..) => Success(None, input),
    })
}

/// Zero or more `parser` separated by `separator`, the separators are dropped.
///```antlr
/// contract: (value (separator value)*)?
/// ```
/// A trailing separator is left in the input.
pub fn separated_by<T, S>(parser: Parser<T>, separator: Parser<S>) -> Parser<Vec<T>>
where
    T: 'static,
    S: 'static,
{
    let description = format!(
        "separated_by({}, {})",
        parser.label(),
        separator.label()
    );
    let tail = many(then(separator, parser.clone()));
    Parser::new(description, move |input| match parser.parse(input) {
        Success(head, rest) => tail.parse(rest).map(|tail| (head, tail)).merge(),
        Fail(..) => Success(vec![], input),
    })
}

/// Parses `parser` enclosed by `open` and `close`
/// ```ebnf
/// <rule> ::= open value close
/// ```
pub fn between<L, T, R>(open: Parser<L>, parser: Parser<T>, close: Parser<R>) -> Parser<T>
where
    L: 'static,
    T: 'static,
    R: 'static,
{
    skip(then(open, parser), close)
}

/// Defers building a parser until it is first used, so a grammar can refer to itself.
///
/// ```
///  use parsnip::combinator::{between, choice, lazy};
///  use parsnip::parser::{run, Parser};
///  use parsnip::primitive::literal;
///
///  // balanced parentheses, counting the depth
///  fn nested() -> Parser<usize> {
///      lazy(|| choice(vec![
///          between(literal("("), nested(), literal(")")).map(|d| d + 1),
///          parsnip::parser::succeed(0),
///      ]))
///  }
///  assert_eq!(run(&nested(), "((()))"), Ok(3));
///  assert!(run(&nested(), "(()").is_err());
/// ```
pub fn lazy<T, F>(build: F) -> Parser<T>
where
    T: 'static,
    F: Fn() -> Parser<T> + Send + Sync + 'static,
{
    let cell: OnceCell<Parser<T>> = OnceCell::new();
    Parser::new("lazy", move |input| cell.get_or_init(&build).parse(input))
}
