//! The node walker: executes every statement of a frame's body in order.
//!
//! Each statement's status decides what happens next: `Ok` and the
//! if-signal pair continue, anything else aborts the rest of the node and
//! is returned to the caller. A failure raised while executing one
//! statement is caught here, attributed to that statement, flagged on the
//! stage, and re-raised; the walker never continues past a failed
//! statement.

use std::sync::Arc;

use weft_ir::{
    frame_not_found, recursion_limit_exceeded, unlinked_run, Frame, FrameId, RunResult, Statement,
    Status,
};

use crate::context::Context;
use crate::exec;
use crate::runtime::Runtime;

/// Run a frame's body in an existing context.
///
/// `depth` counts frame nesting (goto recursion plus procedure calls) and
/// trips the runtime's recursion limit, since a cyclic graph would
/// otherwise recurse forever.
pub(crate) fn run_frame(
    rt: &Runtime,
    depth: usize,
    frame: &Arc<Frame>,
    ctx: &mut Context,
) -> RunResult<Status> {
    if depth > rt.recursion_limit() {
        return Err(recursion_limit_exceeded(rt.recursion_limit()));
    }
    tracing::debug!(frame = frame.id.0, title = %frame.title, depth, "running frame");

    let mut prev = Status::Ok;
    for (index, stmt) in frame.body.iter().enumerate() {
        rt.checkpoint(frame.id, index)?;
        let status = run_statement(rt, depth, ctx, frame, stmt, prev).map_err(|mut err| {
            // Attribute to the innermost statement only; outer frames
            // re-raise without re-flagging.
            if err.frame.is_none() {
                rt.stage().flag_statement(frame.id, index);
                err = err
                    .with_frame(frame.id)
                    .with_statement(stmt.text.clone());
            }
            err
        })?;
        if status.aborts_node() {
            return Ok(status);
        }
        prev = status;
    }
    // A trailing if-signal is consumed by the node boundary.
    Ok(Status::Ok)
}

/// Execute one statement: lazily tokenize, then dispatch.
fn run_statement(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    frame: &Frame,
    stmt: &Statement,
    prev: Status,
) -> RunResult<Status> {
    let tokens = stmt.tokens()?;
    if tokens.is_empty() {
        // Pure comment or the unlinked no-op; a bare link means "run the
        // linked frame".
        return match stmt.link {
            Some(target) => walk_target(rt, depth, ctx, target),
            None => Ok(Status::Ok),
        };
    }
    exec::dispatch(rt, depth, ctx, frame, stmt, tokens, prev)
}

/// Run the frame a statement links to, failing when the link is missing.
pub(crate) fn walk_link(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    stmt: &Statement,
    name: &str,
) -> RunResult<Status> {
    let target = stmt.link.ok_or_else(|| unlinked_run(name))?;
    walk_target(rt, depth, ctx, target)
}

/// Run a linked frame: a goto into the same context, unless the target's
/// title marks it as a procedure, in which case this is a parameterless
/// call.
pub(crate) fn walk_target(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    target: FrameId,
) -> RunResult<Status> {
    let frame = rt
        .graph()
        .frame(target)
        .ok_or_else(|| frame_not_found(format!("frame {}", target.0)))?;
    if exec::calls::is_procedure(&frame) {
        exec::calls::invoke_frame(rt, depth, ctx, &frame, &[])
    } else {
        run_frame(rt, depth + 1, &frame, ctx)
    }
}
