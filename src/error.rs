use thiserror::Error;

/// How many characters of the input an error message shows before cutting it off.
pub const NEAR_WIDTH: usize = 20;

/// Parsing error.
///
/// Every variant carries `near`, the input the failing parser was looking at,
/// clipped to [`NEAR_WIDTH`] characters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The input does not start with the expected literal.
    #[error("literal {expected:?} near: {near:?}")]
    Literal { expected: String, near: String },
    /// The next character is not a member of the set (or the input is empty).
    #[error("charset {set:?} near: {near:?}")]
    Charset { set: String, near: String },
    /// The anchored pattern does not match the start of the input.
    #[error("pattern {pattern:?} near: {near:?}")]
    Pattern { pattern: String, near: String },
    /// Produced by [`fail`](crate::parser::fail) with a caller supplied tag.
    #[error("{tag} near: {near:?}")]
    Tagged { tag: String, near: String },
    /// The text matched but its value could not be converted.
    ///
    /// # Examples
    ///
    /// ```
    /// use parsnip::combinator::try_lift;
    /// use parsnip::error::ParseError;
    /// use parsnip::primitive::charset;
    ///
    /// let digit = try_lift(charset("0123456789x"), |c| c.to_digit(10).ok_or("not a digit".to_string()));
    ///
    /// if let Some(ParseError::Invalid { message, .. }) = digit.parse("x").error() {
    ///     assert_eq!(message, "not a digit")
    /// } else { panic!("expected a conversion error") };
    /// ```
    #[error("{message} near: {near:?}")]
    Invalid { message: String, near: String },
    /// Every alternative of a choice failed. The attempts are kept in the order they were tried.
    #[error("choice near: {near:?} [{}]", render_attempts(.attempts))]
    Choice { near: String, attempts: Vec<Attempt> },
}

/// One failed alternative of a choice.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    /// Description of the alternative as registered in the side table.
    pub description: String,
    pub error: ParseError,
}

impl ParseError {
    /// The input fragment the failure was reported at.
    pub fn near(&self) -> &str {
        match self {
            ParseError::Literal { near, .. }
            | ParseError::Charset { near, .. }
            | ParseError::Pattern { near, .. }
            | ParseError::Tagged { near, .. }
            | ParseError::Invalid { near, .. }
            | ParseError::Choice { near, .. } => near,
        }
    }
}

fn render_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.description, a.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Misuse detected while a grammar is being built, before any input is seen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrammarError {
    #[error("pattern {expr:?} is not a valid expression: {message}")]
    InvalidPattern { expr: String, message: String },
    /// The expression may match somewhere other than the start of the input.
    #[error("pattern {expr:?} must be anchored at the start of input with `^` or `\\A`")]
    Unanchored { expr: String },
}

/// The error returned by [`run`](crate::parser::run).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error("parse failed at offset {offset}: {error}, rest: {near:?}")]
    Failed {
        error: ParseError,
        offset: usize,
        near: String,
    },
    /// The parser succeeded but did not consume the whole input.
    #[error("incomplete parse at offset {offset}, left over: {near:?}")]
    Incomplete { offset: usize, near: String },
}

/// Cuts the input down to `width` characters, marking the cut with `...`.
pub(crate) fn clip(input: &str, width: usize) -> String {
    match input.char_indices().nth(width) {
        Some((idx, _)) => format!("{}...", &input[..idx]),
        None => input.to_string(),
    }
}

pub(crate) fn near(input: &str) -> String {
    clip(input, NEAR_WIDTH)
}
