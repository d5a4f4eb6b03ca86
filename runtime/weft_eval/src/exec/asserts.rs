//! The assert statement family.
//!
//! A failed assertion raises `UnitTestFailed` carrying the expected and
//! actual values; the suite runner counts it as a test failure rather
//! than a runtime error.

use std::cmp::Ordering;

use weft_ir::{
    malformed_variable, type_mismatch, unit_test_failed, unknown_statement, RunResult, Status, Tag,
};

use super::{exactly, operand_pair};
use crate::context::Context;

pub(crate) fn dispatch(ctx: &mut Context, name: &str, tokens: &[String]) -> RunResult<Status> {
    match name {
        "asserttrue" => {
            exactly(tokens, 1)?;
            if !ctx.values.get_bool(&tokens[1])? {
                return Err(unit_test_failed("true", "false"));
            }
            Ok(Status::Ok)
        }
        "assertfalse" => {
            exactly(tokens, 1)?;
            if ctx.values.get_bool(&tokens[1])? {
                return Err(unit_test_failed("false", "true"));
            }
            Ok(Status::Ok)
        }
        "assertequals" => {
            exactly(tokens, 2)?;
            let (expected, actual) = operand_pair(ctx, &tokens[1], &tokens[2])?;
            let ord = expected
                .compare(&actual)
                .ok_or_else(|| type_mismatch(expected.tag().describe(), actual.tag().describe()))?;
            if ord != Ordering::Equal {
                return Err(unit_test_failed(expected.to_string(), actual.to_string()));
            }
            Ok(Status::Ok)
        }
        "assertnotequals" => {
            exactly(tokens, 2)?;
            let (expected, actual) = operand_pair(ctx, &tokens[1], &tokens[2])?;
            if expected.compare(&actual) == Some(Ordering::Equal) {
                return Err(unit_test_failed(
                    format!("anything but {expected}"),
                    actual.to_string(),
                ));
            }
            Ok(Status::Ok)
        }
        "assertnull" => {
            exactly(tokens, 1)?;
            if reference_defined(ctx, &tokens[1])? {
                return Err(unit_test_failed("null", "a bound reference"));
            }
            Ok(Status::Ok)
        }
        "assertnotnull" => {
            exactly(tokens, 1)?;
            if !reference_defined(ctx, &tokens[1])? {
                return Err(unit_test_failed("a bound reference", "null"));
            }
            Ok(Status::Ok)
        }
        "assertdefined" => {
            exactly(tokens, 1)?;
            if !ctx.is_defined(&tokens[1])? {
                return Err(unit_test_failed("a defined variable", "undefined"));
            }
            Ok(Status::Ok)
        }
        _ => Err(unknown_statement(name)),
    }
}

/// Whether a reference variable is bound; value-tagged names are a
/// mismatch here (use `assertdefined` for those).
fn reference_defined(ctx: &Context, token: &str) -> RunResult<bool> {
    let tag = Tag::of_var(token).ok_or_else(|| malformed_variable(token))?;
    if !tag.is_reference() {
        return Err(type_mismatch("a reference variable", tag.describe()));
    }
    Ok(ctx.refs.contains(token))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::exec::testutil::{run_line, runtime};
    use pretty_assertions::assert_eq;
    use weft_ir::{FrameId, Reference, RunErrorKind};

    #[test]
    fn assertequals_round_trip() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        ctx.values.set("$i.x", "5").unwrap();
        ctx.values.set("$i.y", "5").unwrap();
        assert_eq!(
            run_line(&rt, &mut ctx, "assertequals $i.x $i.y").unwrap(),
            Status::Ok
        );

        ctx.values.set("$i.y", "6").unwrap();
        let err = run_line(&rt, &mut ctx, "assertequals $i.x $i.y").unwrap_err();
        assert_eq!(
            err.kind,
            RunErrorKind::UnitTestFailed {
                expected: "5".to_string(),
                actual: "6".to_string()
            }
        );
    }

    #[test]
    fn boolean_asserts() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        ctx.values.set("$b.ok", "true").unwrap();
        assert!(run_line(&rt, &mut ctx, "asserttrue $b.ok").is_ok());
        assert!(run_line(&rt, &mut ctx, "assertfalse $b.ok").is_err());
    }

    #[test]
    fn null_asserts_inspect_the_reference_store() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        assert!(run_line(&rt, &mut ctx, "assertnull $fp.f").is_ok());
        assert!(run_line(&rt, &mut ctx, "assertnotnull $fp.f").is_err());

        ctx.refs.set("$fp.f", Reference::Frame(FrameId(1))).unwrap();
        assert!(run_line(&rt, &mut ctx, "assertnotnull $fp.f").is_ok());
        assert!(run_line(&rt, &mut ctx, "assertnull $fp.f").is_err());
    }

    #[test]
    fn assertdefined_covers_both_stores() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        assert!(run_line(&rt, &mut ctx, "assertdefined $i.x").is_err());
        ctx.values.set("$i.x", "1").unwrap();
        assert!(run_line(&rt, &mut ctx, "assertdefined $i.x").is_ok());
    }

    #[test]
    fn assertnotequals() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        ctx.values.set("$s.a", "left").unwrap();
        assert!(run_line(&rt, &mut ctx, "assertnotequals $s.a \"right\"").is_ok());
        assert!(run_line(&rt, &mut ctx, "assertnotequals $s.a \"left\"").is_err());
    }
}
