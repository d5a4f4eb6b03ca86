//! The if-family and `else`.
//!
//! An if-statement evaluates its condition; on true it executes either the
//! rest of the same line (one-line form) or the linked frame's body (block
//! form) and answers `TrueIf` when that execution was `Ok`; on false it
//! answers `FalseIf` without executing anything. The if-signal pair never
//! escapes the node: the immediately following `else` consumes it, or the
//! walker normalizes it away.

use std::cmp::Ordering;

use weft_ir::{
    else_without_if, type_mismatch, unknown_statement, Frame, RunResult, Statement, Status, Tokens,
};

use super::operand_pair;
use crate::context::Context;
use crate::runtime::Runtime;
use crate::walker;

/// Operand tokens each condition form consumes.
fn condition_arity(name: &str) -> usize {
    match name {
        "if" | "ifnot" | "ifdefined" | "ifnotdefined" => 1,
        _ => 2,
    }
}

/// Evaluate a condition over its operand tokens.
fn evaluate(ctx: &Context, name: &str, args: &[String]) -> RunResult<bool> {
    match name {
        "if" => ctx.values.get_bool(&args[0]),
        "ifnot" => Ok(!ctx.values.get_bool(&args[0])?),
        "ifdefined" => ctx.is_defined(&args[0]),
        "ifnotdefined" => Ok(!ctx.is_defined(&args[0])?),
        "ifeqnocase" => {
            let (a, b) = operand_pair(ctx, &args[0], &args[1])?;
            a.eq_no_case(&b)
                .ok_or_else(|| type_mismatch("string operands", b.tag().describe()))
        }
        "ifeq" | "ifnoteq" | "ifless" | "ifgtr" | "ifgeq" | "ifleq" => {
            let (a, b) = operand_pair(ctx, &args[0], &args[1])?;
            let ord = a
                .compare(&b)
                .ok_or_else(|| type_mismatch(a.tag().describe(), b.tag().describe()))?;
            Ok(match name {
                "ifeq" => ord == Ordering::Equal,
                "ifnoteq" => ord != Ordering::Equal,
                "ifless" => ord == Ordering::Less,
                "ifgtr" => ord == Ordering::Greater,
                "ifgeq" => ord != Ordering::Less,
                _ => ord != Ordering::Greater, // ifleq
            })
        }
        _ => Err(unknown_statement(name)),
    }
}

/// Dispatch an if-family statement.
pub(crate) fn conditional(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    frame: &Frame,
    stmt: &Statement,
    tokens: &[String],
) -> RunResult<Status> {
    let name = &tokens[0];
    let needed = condition_arity(name);
    super::at_least(tokens, needed)?;
    let args = &tokens[1..=needed];

    if !evaluate(ctx, name, args)? {
        return Ok(Status::FalseIf);
    }
    let status = branch(rt, depth, ctx, frame, stmt, &tokens[needed + 1..])?;
    Ok(if status == Status::Ok {
        Status::TrueIf
    } else {
        status
    })
}

/// Dispatch `else`, which inspects the previous statement's status.
pub(crate) fn else_branch(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    frame: &Frame,
    stmt: &Statement,
    tokens: &[String],
    prev: Status,
) -> RunResult<Status> {
    match prev {
        Status::TrueIf => Ok(Status::Ok),
        Status::FalseIf => branch(rt, depth, ctx, frame, stmt, &tokens[1..]),
        _ => Err(else_without_if()),
    }
}

/// Execute the taken branch: the rest of the line when present, otherwise
/// the linked frame's body. A bare condition with neither is a pure test.
fn branch(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    frame: &Frame,
    stmt: &Statement,
    rest: &[String],
) -> RunResult<Status> {
    if !rest.is_empty() {
        let nested: Tokens = rest.iter().cloned().collect();
        return super::dispatch(rt, depth, ctx, frame, stmt, &nested, Status::Ok);
    }
    if stmt.link.is_some() {
        return walker::walk_link(rt, depth, ctx, stmt, "if");
    }
    Ok(Status::Ok)
}
