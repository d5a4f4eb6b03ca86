//! The frame statement family.
//!
//! Graph mutation goes through the host's [`Graph`](crate::host::Graph)
//! capability; display effects (`openframe`, `closeframe`) go through the
//! stage.

use weft_ir::{frame_not_found, unknown_statement, FrameId, Reference, RunResult, Status, Tag};

use super::{exactly, ref_var, string_operand};
use crate::context::Context;
use crate::runtime::Runtime;

pub(crate) fn dispatch(
    rt: &Runtime,
    ctx: &mut Context,
    name: &str,
    tokens: &[String],
) -> RunResult<Status> {
    match name {
        "createframe" => {
            exactly(tokens, 2)?;
            let title = string_operand(ctx, &tokens[1])?;
            let dst = ref_var(&tokens[2], Tag::Frame)?;
            let id = rt.graph().create_frame(&title);
            ctx.refs.set(dst, Reference::Frame(id))?;
            Ok(Status::Ok)
        }
        "openframe" => {
            exactly(tokens, 1)?;
            let id = frame_operand(rt, ctx, &tokens[1])?;
            rt.stage().bring_to_front(id);
            Ok(Status::Ok)
        }
        "closeframe" => {
            exactly(tokens, 1)?;
            let id = frame_operand(rt, ctx, &tokens[1])?;
            rt.stage().close(id);
            Ok(Status::Ok)
        }
        "deleteframe" => {
            exactly(tokens, 1)?;
            let id = frame_operand(rt, ctx, &tokens[1])?;
            if !rt.graph().delete_frame(id) {
                return Err(frame_not_found(format!("frame {}", id.0)));
            }
            Ok(Status::Ok)
        }
        "copyframe" => {
            exactly(tokens, 3)?;
            let src = frame_operand(rt, ctx, &tokens[1])?;
            let title = string_operand(ctx, &tokens[2])?;
            let dst = ref_var(&tokens[3], Tag::Frame)?;
            let copy = rt
                .graph()
                .copy_frame(src, &title)
                .ok_or_else(|| frame_not_found(format!("frame {}", src.0)))?;
            ctx.refs.set(dst, Reference::Frame(copy))?;
            Ok(Status::Ok)
        }
        "clearframe" => {
            exactly(tokens, 1)?;
            let id = frame_operand(rt, ctx, &tokens[1])?;
            if !rt.graph().clear_frame(id) {
                return Err(frame_not_found(format!("frame {}", id.0)));
            }
            Ok(Status::Ok)
        }
        _ => Err(unknown_statement(name)),
    }
}

/// Resolve a frame from a `$fp.` variable or a title literal.
fn frame_operand(rt: &Runtime, ctx: &Context, token: &str) -> RunResult<FrameId> {
    if token.starts_with('$') {
        return ctx.refs.get_frame(token);
    }
    rt.graph()
        .frame_by_title(token)
        .ok_or_else(|| frame_not_found(token))
}
