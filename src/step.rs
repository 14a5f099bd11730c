use crate::error::ParseError;
use Step::{Fail, Success};

/// The outcome of running a parser on a piece of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<'a, T> {
    /// Successfully parsed a value, the rest is the unconsumed suffix of the input
    Success(T, &'a str),
    /// Failed to parse, the rest is the input at the failure point and nothing is consumed
    Fail(ParseError, &'a str),
}

impl<'a, T> Step<'a, T> {
    /// Continues with the rest of a successful step.
    /// A failure passes through untouched, so this is the single place
    /// where the sequencing rule of the engine lives.
    pub fn and_then<Rhs, Then>(self, then: Then) -> Step<'a, Rhs>
    where
        Then: FnOnce(T, &'a str) -> Step<'a, Rhs>,
    {
        match self {
            Success(t, rest) => then(t, rest),
            Fail(e, rest) => Fail(e, rest),
        }
    }

    pub fn map<Rhs, Map>(self, mapper: Map) -> Step<'a, Rhs>
    where
        Map: FnOnce(T) -> Rhs,
    {
        match self {
            Success(t, rest) => Success(mapper(t), rest),
            Fail(e, rest) => Fail(e, rest),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Success(t, _) => Some(t),
            Fail(..) => None,
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            Success(..) => None,
            Fail(e, _) => Some(e),
        }
    }

    /// The unconsumed input, after the success or at the failure point.
    pub fn rest(&self) -> &'a str {
        match self {
            Success(_, rest) | Fail(_, rest) => *rest,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Success(..))
    }

    pub fn into_result(self) -> Result<(T, &'a str), (ParseError, &'a str)> {
        match self {
            Success(t, rest) => Ok((t, rest)),
            Fail(e, rest) => Err((e, rest)),
        }
    }
}

impl<'a, L, R> Step<'a, (L, R)> {
    /// Drops the right side of a pair, e.g. a closing bracket that carries no value.
    pub fn take_left(self) -> Step<'a, L> {
        self.map(|(l, _)| l)
    }

    pub fn take_right(self) -> Step<'a, R> {
        self.map(|(_, r)| r)
    }
}

impl<'a, L> Step<'a, (L, Vec<L>)> {
    /// Merges a head element into the tail that follows it
    ///```antlr
    /// contract: value (COMMA value)*
    /// ```
    pub fn merge(self) -> Step<'a, Vec<L>> {
        self.map(|(h, mut rest)| {
            rest.insert(0, h);
            rest
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(near: &str) -> ParseError {
        ParseError::Tagged { tag: "boom".to_string(), near: near.to_string() }
    }

    #[test]
    fn and_then_continues_on_rest() {
        let step: Step<i32> = Success(1, "bc");
        let next = step.and_then(|v, rest| Success(v + 1, &rest[1..]));
        assert_eq!(next, Success(2, "c"));
    }

    #[test]
    fn and_then_keeps_failure() {
        let step: Step<i32> = Fail(failure("abc"), "abc");
        let next = step.and_then(|v, rest| Success(v + 1, rest));
        assert_eq!(next.rest(), "abc");
        assert_eq!(next.error(), Some(&failure("abc")));
    }

    #[test]
    fn into_result_keeps_rest() {
        let step: Step<i32> = Success(7, "rest");
        assert_eq!(step.into_result(), Ok((7, "rest")));
        let step: Step<i32> = Fail(failure("xy"), "xy");
        assert_eq!(step.into_result(), Err((failure("xy"), "xy")));
    }

    #[test]
    fn merge_head_and_tail() {
        let step: Step<(i32, Vec<i32>)> = Success((1, vec![2, 3]), "");
        assert_eq!(step.merge().ok(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn take_sides() {
        let step: Step<(i32, char)> = Success((1, 'x'), "");
        assert_eq!(step.clone().take_left().ok(), Some(1));
        assert_eq!(step.take_right().ok(), Some('x'));
    }
}
