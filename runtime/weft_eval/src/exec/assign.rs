//! The `set` statement: typed create-or-overwrite.
//!
//! `set $i.x 42` validates the literal under the destination tag;
//! `set $i.x $i.y` is the variable-to-variable copy form, which requires
//! identical tags. Reference variables copy by handle.

use weft_ir::{malformed_variable, type_mismatch, RunResult, Status, Tag};

use super::exactly;
use crate::context::Context;

pub(crate) fn set(ctx: &mut Context, tokens: &[String]) -> RunResult<Status> {
    exactly(tokens, 2)?;
    let dst = &tokens[1];
    let src = &tokens[2];
    let dst_tag = Tag::of_var(dst).ok_or_else(|| malformed_variable(dst))?;

    if dst_tag.is_value() {
        match Tag::of_var(src) {
            Some(src_tag) if src_tag.is_value() => ctx.values.copy(dst, src)?,
            Some(src_tag) => {
                return Err(type_mismatch(dst_tag.describe(), src_tag.describe()));
            }
            None => ctx.values.set(dst, src)?,
        }
    } else {
        // Reference copy: the source must be a reference variable of the
        // same tag; there is no literal form for handles.
        let src_tag = Tag::of_var(src).ok_or_else(|| type_mismatch(dst_tag.describe(), "a literal"))?;
        if src_tag != dst_tag {
            return Err(type_mismatch(dst_tag.describe(), src_tag.describe()));
        }
        let reference = ctx.refs.get(src)?.clone();
        ctx.refs.set(dst, reference)?;
    }
    Ok(Status::Ok)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use weft_ir::{FrameId, Reference, RunErrorKind, Value};

    #[test]
    fn literal_form_validates_under_tag() {
        let mut ctx = Context::new();
        set(&mut ctx, &tokens(&["set", "$i.x", "42"])).unwrap();
        assert_eq!(ctx.values.get("$i.x").unwrap(), &Value::Int(42));

        let err = set(&mut ctx, &tokens(&["set", "$i.x", "many"])).unwrap_err();
        assert!(matches!(err.kind, RunErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn copy_form_requires_identical_tags() {
        let mut ctx = Context::new();
        ctx.values.set("$i.a", "3").unwrap();
        set(&mut ctx, &tokens(&["set", "$i.b", "$i.a"])).unwrap();
        assert_eq!(ctx.values.get_int("$i.b").unwrap(), 3);

        let err = set(&mut ctx, &tokens(&["set", "$r.c", "$i.a"])).unwrap_err();
        assert!(matches!(err.kind, RunErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn reference_copy_is_by_handle() {
        let mut ctx = Context::new();
        ctx.refs.set("$fp.a", Reference::Frame(FrameId(5))).unwrap();
        set(&mut ctx, &tokens(&["set", "$fp.b", "$fp.a"])).unwrap();
        assert_eq!(ctx.refs.get_frame("$fp.b").unwrap(), FrameId(5));

        let err = set(&mut ctx, &tokens(&["set", "$fp.c", "7"])).unwrap_err();
        assert!(matches!(err.kind, RunErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn arity_is_exactly_two() {
        let mut ctx = Context::new();
        let err = set(&mut ctx, &tokens(&["set", "$i.x"])).unwrap_err();
        assert_eq!(err.kind, RunErrorKind::WrongArgCount { expected: 2, got: 1 });
    }

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(ToString::to_string).collect()
    }
}
