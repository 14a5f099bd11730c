//! Tracing of parser invocations.
//!
//! A [`DebugSession`] wraps parsers so each call writes what it saw and what it
//! returned, indented by how deep in the descent the call happened:
//!
//! ```text
//! list <- "[1,2]"
//!   item <- "1,2]"
//!   item -> ok 1.0 | rest ",2]"
//!   ...
//! list -> ok [1.0, 2.0] | rest ""
//! ```
use crate::error::clip;
use crate::parser::Parser;
use crate::step::Step::{Fail, Success};
use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const DEFAULT_WIDTH: usize = 20;
const INDENT: &str = "  ";

/// Owns the nesting depth shared by every parser it wrapped and the sink trace lines go to.
///
/// Clones share the depth and the sink. Calling wrapped parsers from several threads at once
/// interleaves the lines and garbles the indentation, the parse results stay correct.
#[derive(Clone)]
pub struct DebugSession {
    depth: Arc<AtomicUsize>,
    width: usize,
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Default for DebugSession {
    fn default() -> Self {
        DebugSession::new()
    }
}

impl DebugSession {
    /// A session printing to stdout.
    pub fn new() -> Self {
        DebugSession::with_writer(io::stdout())
    }

    pub fn with_writer<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        DebugSession {
            depth: Arc::new(AtomicUsize::new(0)),
            width: DEFAULT_WIDTH,
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// How many characters of the input a trace line shows.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Number of wrapped invocations currently running.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Wraps `parser` so every invocation is traced under `name`.
    /// The wrapped parser returns exactly what `parser` returns.
    ///
    /// ```
    ///  use parsnip::debug::DebugSession;
    ///  use parsnip::primitive::literal;
    ///
    ///  let session = DebugSession::new();
    ///  let yo = session.wrap(literal("yo"), "yo");
    ///  assert_eq!(yo.parse("yo!").rest(), "!");
    ///  assert_eq!(yo.description(), "yo");
    /// ```
    pub fn wrap<T>(&self, parser: Parser<T>, name: impl Into<String>) -> Parser<T>
    where
        T: Debug + 'static,
    {
        let name = name.into();
        let session = self.clone();
        Parser::new(name.clone(), move |input| {
            let frame = session.enter();
            session.line(frame.level, format!("{} <- {:?}", name, session.show(input)));
            let step = parser.parse(input);
            match &step {
                Success(value, rest) => session.line(
                    frame.level,
                    format!("{} -> ok {:?} | rest {:?}", name, value, session.show(rest)),
                ),
                Fail(error, rest) => session.line(
                    frame.level,
                    format!("{} -> fail {} | rest {:?}", name, error, session.show(rest)),
                ),
            }
            step
        })
    }

    fn enter(&self) -> Frame<'_> {
        let level = self.depth.fetch_add(1, Ordering::SeqCst);
        Frame {
            depth: &self.depth,
            level,
        }
    }

    fn show(&self, input: &str) -> String {
        clip(input, self.width)
    }

    fn line(&self, level: usize, text: String) {
        // a panic while writing leaves nothing half-done, so a poisoned sink is still usable
        let mut sink = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // a broken sink must not change what the parser returns
        let _ = writeln!(sink, "{}{}", INDENT.repeat(level), text);
    }
}

/// One running wrapped invocation, leaving the depth on drop even when unwinding.
struct Frame<'s> {
    depth: &'s AtomicUsize,
    level: usize,
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{choice, lazy, many};
    use crate::parser::run;
    use crate::primitive::literal;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[test]
    fn nested_calls_are_indented() {
        let buffer = Buffer::default();
        let session = DebugSession::with_writer(buffer.clone());
        let a = session.wrap(literal("a"), "a");
        let all = session.wrap(many(a), "as");

        assert_eq!(run(&all, "aa"), Ok(vec![(), ()]));
        assert_eq!(
            buffer.lines(),
            vec![
                r#"as <- "aa""#,
                r#"  a <- "aa""#,
                r#"  a -> ok () | rest "a""#,
                r#"  a <- "a""#,
                r#"  a -> ok () | rest """#,
                r#"  a <- """#,
                r#"  a -> fail literal "a" near: "" | rest """#,
                r#"as -> ok [(), ()] | rest """#,
            ]
        );
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn recursion_deepens_indentation() {
        fn nested(session: DebugSession) -> Parser<usize> {
            let inner = session.clone();
            let p = lazy(move || {
                choice(vec![
                    literal("(")
                        .then(nested(inner.clone()))
                        .skip(literal(")"))
                        .map(|d| d + 1),
                    crate::parser::succeed(0),
                ])
            });
            session.wrap(p, "nested")
        }

        let buffer = Buffer::default();
        let session = DebugSession::with_writer(buffer.clone());
        assert_eq!(run(&nested(session.clone()), "(())"), Ok(2));

        let entries: Vec<_> = buffer
            .lines()
            .into_iter()
            .filter(|l| l.contains("<-"))
            .collect();
        assert_eq!(
            entries,
            vec![
                r#"nested <- "(())""#,
                r#"  nested <- "())""#,
                r#"    nested <- "))""#,
            ]
        );
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn long_input_is_clipped_in_trace_only() {
        let buffer = Buffer::default();
        let session = DebugSession::with_writer(buffer.clone()).with_width(3);
        let p = session.wrap(literal("abcdef"), "p");

        assert_eq!(p.parse("abcdefgh").rest(), "gh");
        assert_eq!(
            buffer.lines(),
            vec![r#"p <- "abc...""#, r#"p -> ok () | rest "gh""#]
        );
    }

    #[test]
    fn wrapping_does_not_change_results() {
        let session = DebugSession::with_writer(io::sink());
        let plain = many(literal("ab"));
        let traced = session.wrap(plain.clone(), "abs");
        for input in ["", "ab", "abab", "aba", "x"] {
            assert_eq!(plain.parse(input), traced.parse(input));
        }
        let failing = session.wrap(literal("x"), "x");
        assert_eq!(literal("x").parse("y"), failing.parse("y"));
    }

    #[test]
    fn tracing_continues_after_sink_poisoned() {
        let buffer = Buffer::default();
        let session = DebugSession::with_writer(buffer.clone());
        let poisoner = session.clone();
        let _ = std::thread::spawn(move || {
            let _sink = poisoner.sink.lock();
            panic!("poison the sink");
        })
        .join();
        assert!(session.sink.is_poisoned());

        let a = session.wrap(literal("a"), "a");
        assert_eq!(run(&a, "a"), Ok(()));
        assert_eq!(buffer.lines(), vec![r#"a <- "a""#, r#"a -> ok () | rest """#]);
    }

    #[test]
    fn depth_recovers_after_panic() {
        let session = DebugSession::with_writer(io::sink());
        let boom = session.wrap(
            Parser::<()>::new("boom", |_: &str| panic!("boom")),
            "boom",
        );
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| boom.parse("x")));
        assert!(result.is_err());
        assert_eq!(session.depth(), 0);
    }
}
