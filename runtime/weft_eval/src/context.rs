//! Variable scope for one run or one procedure invocation.

use weft_ir::{malformed_variable, RunResult, Tag};

use crate::store::{RefStore, ValueStore};

/// A variable scope: one value store plus one reference store.
///
/// A top-level run creates one context; each procedure call creates a new,
/// disjoint child context. There is no lexical nesting — the only way a
/// value crosses a call boundary is explicit parameter binding and
/// copy-back.
#[derive(Debug, Default)]
pub struct Context {
    pub values: ValueStore,
    pub refs: RefStore,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    /// Whether a variable of either store has been set, routing by tag.
    pub fn is_defined(&self, name: &str) -> RunResult<bool> {
        let tag = Tag::of_var(name).ok_or_else(|| malformed_variable(name))?;
        Ok(if tag.is_value() {
            self.values.contains(name)
        } else {
            self.refs.contains(name)
        })
    }
}
