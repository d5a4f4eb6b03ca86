//! Typed variable stores.
//!
//! A context owns two independent maps: the value store (scalars) and the
//! reference store (handles). The `$<tag>.` prefix of a variable name is
//! both the routing key deciding which store holds it and a contract
//! checked on every operation. Variables are created on first assignment
//! and live for the lifetime of the owning context.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use weft_ir::{
    malformed_variable, type_mismatch, undefined_variable, AssocRef, FrameId, ItemId, Reference,
    RunResult, StreamRef, Tag, Value,
};

/// Store of scalar values, keyed by full variable name.
#[derive(Debug, Default)]
pub struct ValueStore {
    vars: FxHashMap<String, Value>,
}

/// The tag of a value-store variable name.
fn value_tag(name: &str) -> RunResult<Tag> {
    let tag = Tag::of_var(name).ok_or_else(|| malformed_variable(name))?;
    if !tag.is_value() {
        return Err(type_mismatch("a value variable", tag.describe()));
    }
    Ok(tag)
}

/// The tag of a reference-store variable name.
fn reference_tag(name: &str) -> RunResult<Tag> {
    let tag = Tag::of_var(name).ok_or_else(|| malformed_variable(name))?;
    if !tag.is_reference() {
        return Err(type_mismatch("a reference variable", tag.describe()));
    }
    Ok(tag)
}

impl ValueStore {
    pub fn new() -> ValueStore {
        ValueStore::default()
    }

    /// Create-or-overwrite from a literal, validating it parses under the
    /// variable's tag. `set $i.x "many"` is a type mismatch, never a
    /// silent coercion.
    pub fn set(&mut self, name: &str, literal: &str) -> RunResult<()> {
        let tag = value_tag(name)?;
        let value = Value::parse_literal(tag, literal)
            .ok_or_else(|| type_mismatch(tag.describe(), format!("literal `{literal}`")))?;
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Typed write. The value's tag must match the name's tag; the one
    /// widening pair is int↔real (reals truncate toward zero into an
    /// integer destination).
    pub fn assign(&mut self, name: &str, value: Value) -> RunResult<()> {
        let tag = value_tag(name)?;
        let stored = match (tag, value) {
            (Tag::Int, Value::Real(r)) => Value::Int(r as i64),
            (Tag::Real, Value::Int(i)) => Value::Real(i as f64),
            (_, value) if value.tag() == tag => value,
            (_, value) => return Err(type_mismatch(tag.describe(), value.tag().describe())),
        };
        self.vars.insert(name.to_string(), stored);
        Ok(())
    }

    /// Assign from another value variable; tags must be identical.
    pub fn copy(&mut self, dst: &str, src: &str) -> RunResult<()> {
        let dst_tag = value_tag(dst)?;
        let src_tag = value_tag(src)?;
        if dst_tag != src_tag {
            return Err(type_mismatch(dst_tag.describe(), src_tag.describe()));
        }
        let value = self.get(src)?.clone();
        self.vars.insert(dst.to_string(), value);
        Ok(())
    }

    /// Read a variable, failing on a never-set name.
    pub fn get(&self, name: &str) -> RunResult<&Value> {
        value_tag(name)?;
        self.vars.get(name).ok_or_else(|| undefined_variable(name))
    }

    pub fn get_int(&self, name: &str) -> RunResult<i64> {
        let value = self.get(name)?;
        value
            .as_int()
            .ok_or_else(|| type_mismatch("integer", value.tag().describe()))
    }

    pub fn get_real(&self, name: &str) -> RunResult<f64> {
        let value = self.get(name)?;
        value
            .as_real()
            .ok_or_else(|| type_mismatch("real", value.tag().describe()))
    }

    pub fn get_str(&self, name: &str) -> RunResult<&str> {
        let value = self.get(name)?;
        value
            .as_str()
            .ok_or_else(|| type_mismatch("string", value.tag().describe()))
    }

    pub fn get_bool(&self, name: &str) -> RunResult<bool> {
        let value = self.get(name)?;
        value
            .as_bool()
            .ok_or_else(|| type_mismatch("boolean", value.tag().describe()))
    }

    pub fn get_char(&self, name: &str) -> RunResult<char> {
        let value = self.get(name)?;
        value
            .as_char()
            .ok_or_else(|| type_mismatch("character", value.tag().describe()))
    }

    /// Three-way ordering of two variables (see [`Value::compare`]).
    pub fn compare(&self, a: &str, b: &str) -> RunResult<Ordering> {
        let va = self.get(a)?;
        let vb = self.get(b)?;
        va.compare(vb)
            .ok_or_else(|| type_mismatch(va.tag().describe(), vb.tag().describe()))
    }

    /// Whether the variable has ever been set.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Create the variable with its tag's empty value, used to
    /// auto-declare output parameters at a call boundary.
    pub fn declare_default(&mut self, name: &str) -> RunResult<()> {
        let tag = value_tag(name)?;
        if let Some(value) = Value::default_for(tag) {
            self.vars.entry(name.to_string()).or_insert(value);
        }
        Ok(())
    }
}

/// Store of opaque reference handles, keyed by full variable name.
#[derive(Debug, Default)]
pub struct RefStore {
    vars: FxHashMap<String, Reference>,
}

impl RefStore {
    pub fn new() -> RefStore {
        RefStore::default()
    }

    /// Create-or-overwrite; the reference's tag must match the name's.
    pub fn set(&mut self, name: &str, reference: Reference) -> RunResult<()> {
        let tag = reference_tag(name)?;
        if reference.tag() != tag {
            return Err(type_mismatch(tag.describe(), reference.tag().describe()));
        }
        self.vars.insert(name.to_string(), reference);
        Ok(())
    }

    /// Read a reference, failing on a never-set name.
    pub fn get(&self, name: &str) -> RunResult<&Reference> {
        reference_tag(name)?;
        self.vars.get(name).ok_or_else(|| undefined_variable(name))
    }

    pub fn get_frame(&self, name: &str) -> RunResult<FrameId> {
        match self.get(name)? {
            Reference::Frame(id) => Ok(*id),
            other => Err(type_mismatch("frame reference", other.tag().describe())),
        }
    }

    pub fn get_item(&self, name: &str) -> RunResult<ItemId> {
        match self.get(name)? {
            Reference::Item(id) => Ok(*id),
            other => Err(type_mismatch("item reference", other.tag().describe())),
        }
    }

    pub fn get_assoc(&self, name: &str) -> RunResult<AssocRef> {
        match self.get(name)? {
            Reference::Assoc(map) => Ok(map.clone()),
            other => Err(type_mismatch("association reference", other.tag().describe())),
        }
    }

    pub fn get_stream(&self, name: &str) -> RunResult<StreamRef> {
        match self.get(name)? {
            Reference::Stream(stream) => Ok(stream.clone()),
            other => Err(type_mismatch("stream reference", other.tag().describe())),
        }
    }

    /// Drop a reference variable. Removing a never-set name is a no-op.
    pub fn delete(&mut self, name: &str) -> RunResult<()> {
        reference_tag(name)?;
        self.vars.remove(name);
        Ok(())
    }

    /// Whether the variable has ever been set.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }
}
