//! The statement dispatcher.
//!
//! `dispatch` is a total match on a statement's first token, grouped into
//! one module per family. Every family validates its own arity through
//! the three primitives here — at-least, at-most, exactly — before
//! touching any argument, so an arity error never leaves partial side
//! effects. A first token no family recognizes is forwarded, as one
//! opaque command, to the host's reflective action dispatcher.

pub(crate) mod arith;
pub(crate) mod assign;
pub(crate) mod assoc;
pub(crate) mod asserts;
pub(crate) mod calls;
pub(crate) mod cond;
pub(crate) mod files;
pub(crate) mod frames;
pub(crate) mod items;
pub(crate) mod loops;
pub(crate) mod misc;
pub(crate) mod search;
pub(crate) mod strings;

use weft_ir::{
    malformed_variable, too_few_args, too_many_args, type_mismatch, unknown_statement,
    wrong_arg_count, Frame, Reference, RunResult, Statement, Status, Tag, Value,
};

use crate::context::Context;
use crate::runtime::Runtime;
use crate::walker;

/// Execute one parsed statement.
pub(crate) fn dispatch(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    frame: &Frame,
    stmt: &Statement,
    tokens: &[String],
    prev: Status,
) -> RunResult<Status> {
    let Some(name) = tokens.first() else {
        return Ok(Status::Ok);
    };
    match name.as_str() {
        "set" => assign::set(ctx, tokens),

        "add" | "subtract" | "multiply" | "divide" | "modulo" | "power" => {
            arith::binary(ctx, name, tokens)
        }
        "not" | "exp" | "log" | "log10" | "sqrt" => arith::unary(ctx, name, tokens),

        "if" | "ifnot" | "ifdefined" | "ifnotdefined" | "ifeq" | "ifeqnocase" | "ifnoteq"
        | "ifless" | "ifgtr" | "ifgeq" | "ifleq" => {
            cond::conditional(rt, depth, ctx, frame, stmt, tokens)
        }
        "else" => cond::else_branch(rt, depth, ctx, frame, stmt, tokens, prev),

        "repeat" => loops::repeat(rt, depth, ctx, stmt, tokens),
        "foreach" | "foreachtext" | "foreachline" | "foreachdot" | "foreachassociation" => {
            loops::foreach(rt, depth, ctx, stmt, tokens)
        }

        "break" | "exitrepeat" => {
            exactly(tokens, 0)?;
            Ok(Status::Break)
        }
        "continue" | "nextrepeat" => {
            exactly(tokens, 0)?;
            Ok(Status::Continue)
        }
        "return" => {
            exactly(tokens, 0)?;
            Ok(Status::Return)
        }
        "exitall" => {
            exactly(tokens, 0)?;
            Ok(Status::Exit)
        }
        "run" => {
            exactly(tokens, 0)?;
            walker::walk_link(rt, depth, ctx, stmt, "run")
        }
        "call" => calls::call_statement(rt, depth, ctx, stmt, tokens),

        "createframe" | "openframe" | "closeframe" | "deleteframe" | "copyframe"
        | "clearframe" => frames::dispatch(rt, ctx, name, tokens),

        "createitem" | "createtext" | "deleteitem" | "copyitem" | "getitemtext"
        | "setitemtext" | "getitemlink" | "getitemposition" => {
            items::dispatch(rt, ctx, name, tokens)
        }

        "createassociation" | "setassociation" | "getassociation" | "deleteassociation" => {
            assoc::dispatch(ctx, name, tokens)
        }

        "openfileread" | "openfilewrite" | "readfileline" | "writefileline" | "closefile" => {
            files::dispatch(ctx, name, tokens)
        }

        "concatstr" | "substr" | "subststr" | "parsestr" | "stripstr" | "getstrchar"
        | "getstrlength" => strings::dispatch(ctx, name, tokens),

        "search" | "searchnext" | "searchcount" => search::dispatch(rt, ctx, name, tokens),

        "asserttrue" | "assertfalse" | "assertequals" | "assertnotequals" | "assertnull"
        | "assertnotnull" | "assertdefined" => asserts::dispatch(ctx, name, tokens),

        "message" => misc::message(rt, ctx, tokens),
        "pause" => misc::pause(rt, ctx, tokens),

        _ => fallback(rt, ctx, frame, stmt, tokens, name),
    }
}

/// Forward an unrecognized statement to the host action dispatcher.
///
/// A result item is written into the variable named by the statement's
/// trailing token when that token carries the item-reference tag;
/// otherwise it is attached to the UI cursor.
fn fallback(
    rt: &Runtime,
    ctx: &mut Context,
    frame: &Frame,
    stmt: &Statement,
    tokens: &[String],
    name: &str,
) -> RunResult<Status> {
    match rt.actions().perform(frame.id, stmt.item, &stmt.text) {
        Ok(Some(item)) => {
            if let Some(last) = tokens.last() {
                if Tag::of_var(last) == Some(Tag::Item) {
                    ctx.refs.set(last, Reference::Item(item))?;
                    return Ok(Status::Ok);
                }
            }
            rt.stage().attach_to_cursor(item);
            Ok(Status::Ok)
        }
        Ok(None) => Ok(Status::Ok),
        Err(()) => Err(unknown_statement(name)),
    }
}

// Arity primitives

/// Parameter count: the tokens beyond the statement name.
fn params(tokens: &[String]) -> usize {
    tokens.len().saturating_sub(1)
}

/// Require at least `min` parameters.
pub(crate) fn at_least(tokens: &[String], min: usize) -> RunResult<()> {
    let got = params(tokens);
    if got < min {
        return Err(too_few_args(min, got));
    }
    Ok(())
}

/// Require at most `max` parameters.
pub(crate) fn at_most(tokens: &[String], max: usize) -> RunResult<()> {
    let got = params(tokens);
    if got > max {
        return Err(too_many_args(max, got));
    }
    Ok(())
}

/// Require exactly `expected` parameters.
pub(crate) fn exactly(tokens: &[String], expected: usize) -> RunResult<()> {
    let got = params(tokens);
    if got != expected {
        return Err(wrong_arg_count(expected, got));
    }
    Ok(())
}

// Operand resolution

/// A resolved operand: a variable read or an inferred literal.
pub(crate) struct Operand {
    pub value: Value,
    /// Raw token text when the operand was a literal, for tag-directed
    /// re-parsing against the other side of a comparison.
    pub literal: Option<String>,
}

/// Resolve a token as a value operand: `$`-tokens read the value store,
/// anything else is a literal (integer, then real, then boolean, falling
/// back to string).
pub(crate) fn operand(ctx: &Context, token: &str) -> RunResult<Operand> {
    if token.starts_with('$') {
        Ok(Operand {
            value: ctx.values.get(token)?.clone(),
            literal: None,
        })
    } else {
        Ok(Operand {
            value: Value::infer_literal(token),
            literal: Some(token.to_string()),
        })
    }
}

/// Resolve a comparison pair.
///
/// When exactly one side is a literal and the tags disagree, the literal
/// is re-parsed under the variable side's tag, so `ifeq $s.x 5` compares
/// strings rather than failing on the inferred integer.
pub(crate) fn operand_pair(ctx: &Context, a: &str, b: &str) -> RunResult<(Value, Value)> {
    let left = operand(ctx, a)?;
    let right = operand(ctx, b)?;
    let mut va = left.value;
    let mut vb = right.value;
    if va.tag() != vb.tag() {
        if let (None, Some(lit)) = (&left.literal, &right.literal) {
            if let Some(v) = Value::parse_literal(va.tag(), lit) {
                vb = v;
            }
        } else if let (Some(lit), None) = (&left.literal, &right.literal) {
            if let Some(v) = Value::parse_literal(vb.tag(), lit) {
                va = v;
            }
        }
    }
    Ok((va, vb))
}

/// Resolve an operand to its text form.
pub(crate) fn string_operand(ctx: &Context, token: &str) -> RunResult<String> {
    Ok(operand(ctx, token)?.value.to_string())
}

/// Resolve an operand that must be numeric, as an integer.
pub(crate) fn int_operand(ctx: &Context, token: &str) -> RunResult<i64> {
    let value = operand(ctx, token)?.value;
    value
        .as_int()
        .ok_or_else(|| type_mismatch("integer", value.tag().describe()))
}

/// Require a value-store variable token; returns its name and tag.
pub(crate) fn value_var<'t>(token: &'t str) -> RunResult<(&'t str, Tag)> {
    let tag = Tag::of_var(token).ok_or_else(|| malformed_variable(token))?;
    if !tag.is_value() {
        return Err(type_mismatch("a value variable", tag.describe()));
    }
    Ok((token, tag))
}

/// Require a reference-store variable token of a specific tag.
pub(crate) fn ref_var<'t>(token: &'t str, expected: Tag) -> RunResult<&'t str> {
    let tag = Tag::of_var(token).ok_or_else(|| malformed_variable(token))?;
    if tag != expected {
        return Err(type_mismatch(expected.describe(), tag.describe()));
    }
    Ok(token)
}


#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use weft_ir::RunErrorKind;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn arity_primitives_count_parameters_not_tokens() {
        let two = tokens(&["substr", "$s.x"]);
        assert!(at_least(&two, 1).is_ok());
        assert_eq!(
            at_least(&two, 3).unwrap_err().kind,
            RunErrorKind::TooFewArgs { min: 3, got: 1 }
        );
        assert_eq!(
            at_most(&two, 0).unwrap_err().kind,
            RunErrorKind::TooManyArgs { max: 0, got: 1 }
        );
        assert_eq!(
            exactly(&two, 4).unwrap_err().kind,
            RunErrorKind::WrongArgCount { expected: 4, got: 1 }
        );
        assert!(exactly(&two, 1).is_ok());
    }

    #[test]
    fn operand_reads_variables_and_infers_literals() {
        let mut ctx = crate::context::Context::new();
        ctx.values.set("$i.x", "9").unwrap();
        assert_eq!(operand(&ctx, "$i.x").unwrap().value, Value::Int(9));
        assert_eq!(operand(&ctx, "7").unwrap().value, Value::Int(7));
        assert_eq!(operand(&ctx, "7.5").unwrap().value, Value::Real(7.5));
        assert_eq!(
            operand(&ctx, "word").unwrap().value,
            Value::Str("word".to_string())
        );
        assert!(operand(&ctx, "$i.missing").is_err());
    }

    #[test]
    fn operand_pair_reparses_literal_under_variable_tag() {
        let mut ctx = crate::context::Context::new();
        ctx.values.set("$s.x", "5").unwrap();
        let (a, b) = operand_pair(&ctx, "$s.x", "5").unwrap();
        assert_eq!(a, Value::Str("5".to_string()));
        assert_eq!(b, Value::Str("5".to_string()));
    }

    #[test]
    fn var_helpers_enforce_shape_and_store() {
        assert!(value_var("$i.x").is_ok());
        assert!(value_var("$fp.x").is_err());
        assert!(value_var("bare").is_err());
        assert!(ref_var("$fp.x", Tag::Frame).is_ok());
        assert!(ref_var("$ip.x", Tag::Frame).is_err());
    }
}
