//! The arithmetic statement family.
//!
//! Binary forms are `add a b dest` (dest = a op b); unary forms are
//! `sqrt a dest`. Operands may be numeric variables or literals; the
//! destination must be a numeric variable (`not` is the one exception,
//! operating on booleans). Integer math saturates, and divide/modulo by
//! zero saturate to the tag's maximum representable value.

use weft_ir::{
    arith_int, arith_real, type_mismatch, unary_real, unknown_statement, ArithOp, RunResult,
    Status, Tag, UnaryOp, Value,
};

use super::{exactly, operand, value_var};
use crate::context::Context;

/// `add`/`subtract`/`multiply`/`divide`/`modulo`/`power`.
pub(crate) fn binary(ctx: &mut Context, name: &str, tokens: &[String]) -> RunResult<Status> {
    exactly(tokens, 3)?;
    let op = ArithOp::parse(name).ok_or_else(|| unknown_statement(name))?;
    let (dst, dst_tag) = value_var(&tokens[3])?;
    if !dst_tag.is_numeric() {
        return Err(type_mismatch("a numeric variable", dst_tag.describe()));
    }
    let a = numeric(ctx, &tokens[1])?;
    let b = numeric(ctx, &tokens[2])?;

    // Pure-integer operations stay in integer math so saturation hits the
    // integer bound; anything touching a real computes in f64.
    let result = match (dst_tag, &a, &b) {
        (Tag::Int, Value::Int(x), Value::Int(y)) => Value::Int(arith_int(op, *x, *y)),
        _ => {
            let x = a.as_real().unwrap_or_default();
            let y = b.as_real().unwrap_or_default();
            Value::Real(arith_real(op, x, y))
        }
    };
    ctx.values.assign(dst, result)?;
    Ok(Status::Ok)
}

/// `not`/`exp`/`log`/`log10`/`sqrt`.
pub(crate) fn unary(ctx: &mut Context, name: &str, tokens: &[String]) -> RunResult<Status> {
    exactly(tokens, 2)?;
    let op = UnaryOp::parse(name).ok_or_else(|| unknown_statement(name))?;
    let (dst, dst_tag) = value_var(&tokens[2])?;

    if op == UnaryOp::Not {
        let value = operand(ctx, &tokens[1])?.value;
        let flag = value
            .as_bool()
            .ok_or_else(|| type_mismatch("boolean", value.tag().describe()))?;
        ctx.values.assign(dst, Value::Bool(!flag))?;
        return Ok(Status::Ok);
    }

    if !dst_tag.is_numeric() {
        return Err(type_mismatch("a numeric variable", dst_tag.describe()));
    }
    let x = numeric(ctx, &tokens[1])?.as_real().unwrap_or_default();
    let result = unary_real(op, x).ok_or_else(|| unknown_statement(name))?;
    ctx.values.assign(dst, Value::Real(result))?;
    Ok(Status::Ok)
}

/// Resolve an operand and require it numeric.
fn numeric(ctx: &Context, token: &str) -> RunResult<Value> {
    let value = operand(ctx, token)?.value;
    if !value.tag().is_numeric() {
        return Err(type_mismatch("a numeric operand", value.tag().describe()));
    }
    Ok(value)
}
