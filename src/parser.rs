use crate::combinator;
use crate::error::{clip, near, ParseError, RunError};
use crate::registry::{self, ParserId};
use crate::step::Step;
use crate::step::Step::{Fail, Success};
use std::fmt;
use std::sync::Arc;

/// How much of a child's description a combinator repeats in its own.
pub const DESCRIPTION_WIDTH: usize = 64;

type Run<T> = dyn for<'a> Fn(&'a str) -> Step<'a, T> + Send + Sync;

/// A parser: a pure function from the remaining input to a [`Step`].
///
/// The value is an immutable handle, so cloning it is cheap and combinators take
/// their arguments by value. Every parser gets its own [`ParserId`] and a description
/// in the [side table](crate::registry); both go away with the last handle.
///
/// ```
///  use parsnip::parser::Parser;
///  use parsnip::step::Step;
///
///  let digit = Parser::new("digit", |input: &str| match input.chars().next() {
///      Some(c) if c.is_ascii_digit() => Step::Success(c, &input[1..]),
///      _ => parsnip::parser::fail::<char>("digit").parse(input),
///  });
///  assert_eq!(digit.description(), "digit");
///  assert_eq!(digit.parse("1a").ok(), Some('1'));
///  assert!(digit.parse("a1").error().is_some());
/// ```
pub struct Parser<T> {
    core: Arc<Core<T>>,
}

struct Core<T> {
    id: ParserId,
    run: Arc<Run<T>>,
}

impl<T> Drop for Core<T> {
    fn drop(&mut self) {
        registry::forget(self.id)
    }
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser {
            core: self.core.clone(),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("id", &self.id())
            .field("description", &self.description())
            .finish()
    }
}

impl<T> Parser<T> {
    /// Creates a parser from a matching function and registers its description.
    ///
    /// The function must honor the contract of [`Step`]: on success the rest is a suffix
    /// of the input, on failure nothing is consumed.
    pub fn new<F>(description: impl Into<String>, run: F) -> Self
    where
        F: for<'a> Fn(&'a str) -> Step<'a, T> + Send + Sync + 'static,
    {
        Parser::from_run(description.into(), Arc::new(run))
    }

    fn from_run(description: String, run: Arc<Run<T>>) -> Self {
        let id = registry::next_id();
        registry::register(id, description);
        Parser {
            core: Arc::new(Core { id, run }),
        }
    }

    pub fn parse<'a>(&self, input: &'a str) -> Step<'a, T> {
        (self.core.run)(input)
    }

    /// Parses the whole input, see [`run`].
    pub fn run(&self, input: &str) -> Result<T, RunError> {
        run(self, input)
    }

    pub fn id(&self) -> ParserId {
        self.core.id
    }

    pub fn description(&self) -> String {
        registry::describe(self.id()).unwrap_or_else(|| self.id().to_string())
    }

    /// The description as it appears inside the description of an enclosing combinator,
    /// cut to [`DESCRIPTION_WIDTH`] characters.
    pub(crate) fn label(&self) -> String {
        clip(&self.description(), DESCRIPTION_WIDTH)
    }

    /// A new parser that matches exactly like this one but is described by `description`.
    ///
    /// ```
    ///  use parsnip::primitive::charset;
    ///
    ///  let digit = charset("0123456789").named("digit");
    ///  assert_eq!(digit.description(), "digit");
    /// ```
    pub fn named(&self, description: impl Into<String>) -> Parser<T> {
        Parser::from_run(description.into(), self.core.run.clone())
    }
}

impl<T: 'static> Parser<T> {
    pub fn bind<U, F>(self, continuation: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> Parser<U> + Send + Sync + 'static,
    {
        bind(self, continuation)
    }

    pub fn then<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        combinator::then(self, next)
    }

    pub fn skip<U: 'static>(self, next: Parser<U>) -> Parser<T> {
        combinator::skip(self, next)
    }

    pub fn zip<U: 'static>(self, next: Parser<U>) -> Parser<(T, U)> {
        combinator::zip(self, next)
    }

    pub fn map<U, F>(self, mapper: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        combinator::lift(self, mapper)
    }

    pub fn or(self, alternative: Parser<T>) -> Parser<T> {
        combinator::choice(vec![self, alternative])
    }

    pub fn many(self) -> Parser<Vec<T>> {
        combinator::many(self)
    }

    pub fn some(self) -> Parser<Vec<T>> {
        combinator::some(self)
    }

    pub fn optional(self) -> Parser<Option<T>> {
        combinator::optional(self)
    }
}

/// Always succeeds with `value`, consuming nothing.
pub fn succeed<T>(value: T) -> Parser<T>
where
    T: Clone + Send + Sync + 'static,
{
    Parser::new("succeed", move |input| Success(value.clone(), input))
}

/// Always fails with `tag`, consuming nothing.
pub fn fail<T>(tag: impl Into<String>) -> Parser<T> {
    let tag = tag.into();
    Parser::new(format!("fail({:?})", tag), move |input| {
        Fail(
            ParseError::Tagged {
                tag: tag.clone(),
                near: near(input),
            },
            input,
        )
    })
}

/// Runs `parser` and feeds its value to `continuation`, which picks the parser
/// for the rest of the input.
///
/// A failure of either side is returned unchanged.
///
/// ```
///  use parsnip::parser::{bind, run, succeed, fail};
///  use parsnip::primitive::charset;
///
///  // a digit n followed by n letters 'x'
///  let counted = bind(charset("0123456789"), |d| {
///      let n = d.to_digit(10).unwrap_or(0) as usize;
///      if n == 0 { succeed(String::new()) } else {
///          parsnip::primitive::literal("x".repeat(n)).map(move |_| "x".repeat(n))
///      }
///  });
///  assert_eq!(run(&counted, "3xxx"), Ok("xxx".to_string()));
///  assert!(run(&counted, "3xx").is_err());
///  let _never = bind(fail::<char>("nope"), |c| succeed(c));
/// ```
pub fn bind<T, U, F>(parser: Parser<T>, continuation: F) -> Parser<U>
where
    T: 'static,
    U: 'static,
    F: Fn(T) -> Parser<U> + Send + Sync + 'static,
{
    let description = format!("bind({})", parser.label());
    Parser::new(description, move |input| {
        parser
            .parse(input)
            .and_then(|value, rest| continuation(value).parse(rest))
    })
}

/// Parses the whole input.
///
/// This is the only place where a failed [`Step`] turns into an error, and the
/// input must be consumed completely.
///
/// ```
///  use parsnip::parser::run;
///  use parsnip::primitive::literal;
///  use parsnip::error::RunError;
///
///  assert_eq!(run(&literal("yo"), "yo"), Ok(()));
///  assert!(matches!(run(&literal("yo"), "yo!"), Err(RunError::Incomplete { offset: 2, .. })));
///  assert!(matches!(run(&literal("yo"), "no"), Err(RunError::Failed { offset: 0, .. })));
/// ```
pub fn run<T>(parser: &Parser<T>, input: &str) -> Result<T, RunError> {
    let offset = |rest: &str| input.len().saturating_sub(rest.len());
    match parser.parse(input) {
        Success(value, rest) if rest.is_empty() => Ok(value),
        Success(_, rest) => Err(RunError::Incomplete {
            offset: offset(rest),
            near: near(rest),
        }),
        Fail(error, rest) => Err(RunError::Failed {
            error,
            offset: offset(rest),
            near: near(rest),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{charset, literal};
    use crate::test::parser_test::{expect, expect_rest, fail_on};

    #[test]
    fn succeed_consumes_nothing() {
        let p = succeed(42);
        expect(p.parse("abc"), 42);
        expect_rest(p.parse("abc"), "abc");
    }

    #[test]
    fn fail_consumes_nothing() {
        let p = fail::<i32>("never");
        let step = p.parse("abc");
        assert_eq!(
            step.error(),
            Some(&ParseError::Tagged {
                tag: "never".to_string(),
                near: "abc".to_string()
            })
        );
        fail_on(step, "abc");
    }

    #[test]
    fn bind_runs_continuation_on_rest() {
        let p = bind(charset("ab"), |c| if c == 'a' { literal("1") } else { literal("2") });
        expect_rest(p.parse("a1z"), "z");
        expect_rest(p.parse("b2z"), "z");
        fail_on(p.parse("a2z"), "2z");
    }

    #[test]
    fn bind_propagates_first_failure() {
        let p = bind(literal("x"), |_| succeed(1));
        fail_on(p.parse("yz"), "yz");
    }

    #[test]
    fn named_shares_behaviour_but_not_identity() {
        let a = literal("a");
        let b = a.named("letter a");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.description(), r#"literal("a")"#);
        assert_eq!(b.description(), "letter a");
        expect_rest(b.parse("ab"), "b");
    }

    #[test]
    fn description_follows_construction() {
        let p = bind(literal("a"), |_| succeed(()));
        assert_eq!(p.description(), r#"bind(literal("a"))"#);
        assert!(format!("{:?}", p).contains(r#"bind(literal(\"a\"))"#));
    }

    #[test]
    fn run_reports_offsets() {
        let ab = literal("a").then(literal("b"));
        assert_eq!(run(&ab, "ab"), Ok(()));
        match run(&ab, "ac") {
            Err(RunError::Failed { offset, near, .. }) => {
                assert_eq!(offset, 1);
                assert_eq!(near, "c");
            }
            other => panic!("unexpected {:?}", other),
        }
        match run(&ab, "abcccccccccccccccccccccccc") {
            Err(RunError::Incomplete { offset, near }) => {
                assert_eq!(offset, 2);
                assert_eq!(near, "cccccccccccccccccccc...");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parsers_are_shareable_across_threads() {
        let p = literal("a").many();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = p.clone();
                std::thread::spawn(move || run(&p, "aaaa").map(|v| v.len()))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().ok(), Some(Ok(4)));
        }
    }
}
