//! Weft Lex - statement tokenizer for the Weft frame-script runtime.
//!
//! A Weft statement is one line of text inside a frame. This crate turns that
//! line into an ordered list of case-normalized tokens, honoring quoted
//! string literals and trailing comments. It is deliberately standalone so
//! that editor tooling can tokenize statements without pulling in the
//! runtime.
//!
//! # Rules
//!
//! - Tokens are separated by spaces and tabs; bare tokens are lower-cased.
//! - The interior of a `"..."` literal is one token, preserved verbatim.
//! - An unescaped `#` or `/` discards the rest of the line.
//! - `\#`, `\/`, `\"` and `\\` escape to the literal character.
//! - A statement whose first token is a quoted literal is a
//!   single-string-literal statement: the whole remainder of the line (up to
//!   the last closing quote) becomes that one token.

mod scan;

pub use scan::{tokenize, LexError, Tokens};
