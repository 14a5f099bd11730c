//! Lexical helpers: blanks, keywords, numerals and quoted strings.
use crate::combinator::{many, then, try_lift};
use crate::parser::Parser;
use crate::primitive::{charset, literal, matching};
use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;

const BLANKS: &str = " \t\n";

static NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?").expect("numeral pattern"));
static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(\\.|[^"\\\x00-\x1F])*""#).expect("quoted string pattern"));

/// Zero or more blanks (space, tab, newline), yielding the blank characters.
pub fn whitespace() -> Parser<Vec<char>> {
    many(charset(BLANKS)).named("whitespace")
}

/// Skips leading blanks, then matches `keyword`.
///
/// ```
///  use parsnip::lexer::keyword;
///  use parsnip::parser::run;
///
///  assert_eq!(run(&keyword("yo"), "  yo"), Ok(()));
///  assert_eq!(run(&keyword("yo"), "yo"), Ok(()));
/// ```
pub fn keyword(keyword: &str) -> Parser<()> {
    then(whitespace(), literal(keyword)).named(format!("keyword({:?})", keyword))
}

/// An optionally signed decimal numeral with an optional fraction: `-12`, `+3.25`.
/// Exponents and other radixes are not numerals here.
pub fn number() -> Parser<f64> {
    try_lift(matching(NUMERAL.clone()), |text| {
        text.parse::<f64>().map_err(|e| format!("numeral {:?}: {}", text, e))
    })
    .named("number")
}

/// A double-quoted string literal, yielding the text with its escapes decoded.
/// Control characters below U+0020 must be escaped.
///
/// ```
///  use parsnip::lexer::quoted_string;
///  use parsnip::parser::run;
///
///  assert_eq!(run(&quoted_string(), r#""abc""#), Ok("abc".to_string()));
///  assert_eq!(run(&quoted_string(), r#""a\"b\né""#), Ok("a\"b\né".to_string()));
///  assert!(run(&quoted_string(), r#""\q""#).is_err());
/// ```
pub fn quoted_string() -> Parser<String> {
    try_lift(matching(QUOTED.clone()), |text| {
        unescape(&text[1..text.len() - 1])
    })
    .named("quoted_string")
}

/// Pieces of a string literal body.
#[derive(logos_derive::Logos, Debug, Clone, Copy, PartialEq)]
enum Piece<'s> {
    #[regex(r#"[^"\\\x00-\x1F]+"#, |lex| lex.slice())]
    Text(&'s str),
    #[regex(r#"\\["\\/bfnrt]"#, |lex| escaped(lex.slice()))]
    Escape(char),
    /// One UTF-16 code unit, surrogate halves are paired up afterwards.
    #[regex(r"\\u[0-9a-fA-F]{4}", |lex| u16::from_str_radix(&lex.slice()[2..], 16).ok())]
    Unit(u16),
}

fn escaped(escape: &str) -> Option<char> {
    match escape.chars().nth(1)? {
        '"' => Some('"'),
        '\\' => Some('\\'),
        '/' => Some('/'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

fn unescape(body: &str) -> Result<String, String> {
    let mut text = String::with_capacity(body.len());
    let mut units = vec![];
    for (piece, span) in Piece::lexer(body).spanned() {
        if let Ok(Piece::Unit(unit)) = piece {
            units.push(unit);
            continue;
        }
        flush_units(&mut units, &mut text)?;
        match piece {
            Ok(Piece::Text(t)) => text.push_str(t),
            Ok(Piece::Escape(c)) => text.push(c),
            Ok(Piece::Unit(_)) => {}
            Err(_) => return Err(format!("invalid escape {:?}", &body[span])),
        }
    }
    flush_units(&mut units, &mut text)?;
    Ok(text)
}

fn flush_units(units: &mut Vec<u16>, text: &mut String) -> Result<(), String> {
    for c in char::decode_utf16(units.drain(..)) {
        let c = c.map_err(|e| format!("unpaired surrogate \\u{:04x}", e.unpaired_surrogate()))?;
        text.push(c);
    }
    Ok(())
}
