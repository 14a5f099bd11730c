//! The matchers every grammar bottoms out in.
use crate::error::{near, GrammarError, ParseError};
use crate::parser::Parser;
use crate::step::Step::{Fail, Success};
use regex::Regex;
use regex_syntax::hir::Look;

/// Matches exactly `literal` at the start of the input, case-sensitive.
///
/// ```
///  use parsnip::primitive::literal;
///
///  assert_eq!(literal("yo").parse("yo!").rest(), "!");
///  assert!(literal("yo").parse("Yo!").error().is_some());
/// ```
pub fn literal(literal: impl Into<String>) -> Parser<()> {
    let expected = literal.into();
    Parser::new(format!("literal({:?})", expected), move |input| {
        match input.strip_prefix(expected.as_str()) {
            Some(rest) => Success((), rest),
            None => Fail(
                ParseError::Literal {
                    expected: expected.clone(),
                    near: near(input),
                },
                input,
            ),
        }
    })
}

/// Matches one character that belongs to `chars`, yielding it.
pub fn charset(chars: impl Into<String>) -> Parser<char> {
    let set = chars.into();
    Parser::new(format!("charset({:?})", set), move |input| {
        let mut rest = input.chars();
        match rest.next() {
            Some(c) if set.contains(c) => Success(c, rest.as_str()),
            _ => Fail(
                ParseError::Charset {
                    set: set.clone(),
                    near: near(input),
                },
                input,
            ),
        }
    })
}

/// Matches a regular expression at the start of the input, yielding the matched text.
///
/// The expression has to be anchored with `^` or `\A` on every branch, otherwise it
/// could match further into the input and the grammar is rejected right away.
/// Expressions that match the empty string are accepted, keep them out of
/// repetitions that would spin on them.
///
/// ```
///  use parsnip::primitive::pattern;
///  use parsnip::error::GrammarError;
///
///  let ident = pattern(r"^[a-z_][a-z0-9_]*").unwrap();
///  assert_eq!(ident.parse("foo_1 = 2").ok(), Some("foo_1".to_string()));
///
///  assert!(matches!(pattern("[a-z]+"), Err(GrammarError::Unanchored { .. })));
///  assert!(matches!(pattern("^a|b"), Err(GrammarError::Unanchored { .. })));
///  assert!(matches!(pattern("(?m)^a"), Err(GrammarError::Unanchored { .. })));
///  assert!(matches!(pattern("^(a"), Err(GrammarError::InvalidPattern { .. })));
/// ```
pub fn pattern(expr: &str) -> Result<Parser<String>, GrammarError> {
    let invalid = |message: String| GrammarError::InvalidPattern {
        expr: expr.to_string(),
        message,
    };
    let hir = regex_syntax::parse(expr).map_err(|e| invalid(e.to_string()))?;
    if !hir.properties().look_set_prefix().contains(Look::Start) {
        return Err(GrammarError::Unanchored {
            expr: expr.to_string(),
        });
    }
    let regex = Regex::new(expr).map_err(|e| invalid(e.to_string()))?;
    Ok(matching(regex))
}

/// Builds the matcher of an expression already known to be anchored.
pub(crate) fn matching(regex: Regex) -> Parser<String> {
    Parser::new(format!("pattern({:?})", regex.as_str()), move |input| {
        match regex.find(input) {
            Some(m) if m.start() == 0 => Success(m.as_str().to_string(), &input[m.end()..]),
            _ => Fail(
                ParseError::Pattern {
                    pattern: regex.as_str().to_string(),
                    near: near(input),
                },
                input,
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::parser_test::{expect, expect_rest, fail, fail_on};

    #[test]
    fn literal_matches_prefix() {
        expect_rest(literal("yo").parse("yo"), "");
        expect_rest(literal("yo").parse("yoyo"), "yo");
        expect_rest(literal("").parse("abc"), "abc");
    }

    #[test]
    fn literal_failure_names_itself() {
        let step = literal("yo").parse("hey you");
        assert_eq!(
            step.error().map(ToString::to_string),
            Some(r#"literal "yo" near: "hey you""#.to_string())
        );
        fail_on(step, "hey you");
    }

    #[test]
    fn charset_takes_one_char() {
        expect(charset("abc").parse("a"), 'a');
        expect_rest(charset("abc").parse("cab"), "ab");
        expect(charset("żó").parse("ół"), 'ó');
        fail(charset("abc").parse("d"));
        fail_on(charset("abc").parse(""), "");
    }

    #[test]
    fn pattern_yields_matched_text() {
        let num = pattern(r"^[0-9]+").unwrap();
        expect(num.parse("123abc"), "123".to_string());
        expect_rest(num.parse("123abc"), "abc");
        fail_on(num.parse("abc123"), "abc123");
    }

    #[test]
    fn pattern_accepts_start_of_text_anchor() {
        let word = pattern(r"\A[a-z]+").unwrap();
        expect(word.parse("abc def"), "abc".to_string());
        let both = pattern(r"^a|^b").unwrap();
        expect(both.parse("bz"), "b".to_string());
    }

    #[test]
    fn pattern_may_match_empty() {
        let blanks = pattern(r"^ *").unwrap();
        expect(blanks.parse("x"), String::new());
        expect_rest(blanks.parse("x"), "x");
    }

    #[test]
    fn pattern_rejects_find_anywhere() {
        assert_eq!(
            pattern("abc").err(),
            Some(GrammarError::Unanchored {
                expr: "abc".to_string()
            })
        );
        assert!(pattern("a^").is_err());
        assert!(pattern("(?m)^abc").is_err());
    }

    #[test]
    fn descriptions() {
        assert_eq!(literal("a").description(), r#"literal("a")"#);
        assert_eq!(charset(" \t").description(), r#"charset(" \t")"#);
        assert_eq!(pattern("^a+").unwrap().description(), r#"pattern("^a+")"#);
    }
}
