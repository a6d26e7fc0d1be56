//! Parsing engine
//!
//! A small backtracking parser-combinator library over a character cursor.
//! Field extractors build their grammars from these pieces.

pub mod combinator;
pub mod cursor;
pub mod primitives;

pub use combinator::{
    any, choice, many, one_or_more, skip_until, zip, zip3, zip4, zip5, zip6, zip7, Located, Parser,
};
pub use cursor::Cursor;
pub use primitives::{
    character, digit, end, horizontal_whitespace, int, never, nothing, one_of, remainder, satisfy,
    signed_int, spaces, string, vertical_whitespace, whitespace, word,
};
