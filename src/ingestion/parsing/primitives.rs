//! Primitive parsers: single characters, literals, numbers, words and whitespace.

use super::combinator::{any, one_or_more, Parser};

/// One character satisfying `predicate`.
pub fn satisfy(predicate: impl Fn(char) -> bool + Send + Sync + 'static) -> Parser<char> {
    Parser::new(move |input| input.scan_if(&predicate))
}

/// Exactly the character `c`.
pub fn character(c: char) -> Parser<char> {
    satisfy(move |x| x == c)
}

/// Any one of `set`.
pub fn one_of(set: &'static str) -> Parser<char> {
    satisfy(move |x| set.contains(x))
}

pub fn digit() -> Parser<char> {
    satisfy(|c| c.is_ascii_digit())
}

/// The literal `s`, matched exactly.
pub fn string(s: impl Into<String>) -> Parser<String> {
    let s = s.into();
    Parser::new(move |input| input.scan_literal(&s))
}

/// Succeeds only at end of input.
pub fn end() -> Parser<()> {
    Parser::new(|input| input.is_at_end().then_some(()))
}

/// Consumes and returns the rest of the input. Always succeeds.
pub fn remainder() -> Parser<String> {
    Parser::new(|input| Some(input.scan_remainder()))
}

pub fn never() -> Parser<()> {
    Parser::new(|_| None)
}

pub fn nothing() -> Parser<()> {
    Parser::new(|_| Some(()))
}

/// An unsigned decimal integer.
pub fn int() -> Parser<i32> {
    one_or_more(digit()).joined().flat_map(|digits| digits.parse().ok())
}

/// An optionally signed integer (`+3`, `-1`, `4`).
pub fn signed_int() -> Parser<i32> {
    one_of("+-")
        .optional()
        .followed_by(int())
        .map(|(sign, n)| if sign == Some('-') { -n } else { n })
}

/// Letters, digits and apostrophes.
pub fn word() -> Parser<String> {
    one_or_more(satisfy(|c| c.is_alphanumeric() || "'＇’".contains(c))).joined()
}

pub fn horizontal_whitespace() -> Parser<String> {
    one_or_more(one_of(" \t")).joined()
}

pub fn vertical_whitespace() -> Parser<String> {
    one_or_more(one_of("\r\n")).joined()
}

/// Any run of spaces, tabs and line breaks.
pub fn whitespace() -> Parser<String> {
    one_or_more(horizontal_whitespace().or(vertical_whitespace())).joined()
}

/// Zero or more horizontal whitespace characters.
pub fn spaces() -> Parser<()> {
    any(one_of(" \t")).ignored()
}
