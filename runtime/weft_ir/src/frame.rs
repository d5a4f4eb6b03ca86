//! The interpreter's borrowed view of the host graph.
//!
//! Frames and items live in the host document model; the runtime sees a
//! frame as an id, a title, and an ordered list of body statements. The
//! statement carries its raw text, an optional outgoing link, and the
//! memoized token cache that makes loop bodies and repeated calls skip
//! re-tokenizing.

use std::sync::OnceLock;

use crate::errors::{malformed_literal, RunResult};
use weft_lex::Tokens;

/// Opaque handle to a frame in the host graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u32);

/// Opaque handle to an item (a positioned child of a frame).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

/// Item kind filter used by the `foreach*` family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// Point items (`foreachdot`).
    Dot,
    /// Text items (`foreachtext`).
    Text,
    /// Line items (`foreachline`).
    Line,
    /// Any visible item (`foreach`).
    Any,
}

impl ItemKind {
    /// Whether an item of kind `actual` passes this filter.
    pub fn admits(self, actual: ItemKind) -> bool {
        self == ItemKind::Any || self == actual
    }
}

/// One executable body line of a frame.
#[derive(Debug)]
pub struct Statement {
    /// Raw statement text as it appears in the frame.
    pub text: String,
    /// The on-screen item this statement lives in, when the host has one.
    pub item: Option<ItemId>,
    /// Outgoing link; doubles as "goto a block" and "call a subroutine".
    pub link: Option<FrameId>,
    /// Parse cache, populated on first successful tokenization.
    cache: OnceLock<Tokens>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Statement {
        Statement {
            text: text.into(),
            item: None,
            link: None,
            cache: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn with_link(mut self, target: FrameId) -> Statement {
        self.link = Some(target);
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: ItemId) -> Statement {
        self.item = Some(item);
        self
    }

    /// The statement's token list, tokenizing on first use.
    ///
    /// A successful parse is cached for the lifetime of the owning frame
    /// object; a malformed literal is *not* cached, so the statement fails
    /// the same way on every execution.
    pub fn tokens(&self) -> RunResult<&Tokens> {
        if let Some(tokens) = self.cache.get() {
            return Ok(tokens);
        }
        let tokens = weft_lex::tokenize(&self.text)
            .map_err(|err| malformed_literal(&err.to_string()))?;
        // A concurrent initializer may have won the race; either value is
        // the same parse.
        let _ = self.cache.set(tokens);
        self.cache
            .get()
            .ok_or_else(|| malformed_literal("token cache poisoned"))
    }
}

/// A frame: the "source file unit" of the language.
///
/// Obtained from the host graph as a shared handle and never owned by the
/// interpreter.
#[derive(Debug)]
pub struct Frame {
    pub id: FrameId,
    /// Frame title; when the leading word is `call` (or the host treats it
    /// as such) the title is also a procedure signature.
    pub title: String,
    /// Ordered body statements.
    pub body: Vec<std::sync::Arc<Statement>>,
}
