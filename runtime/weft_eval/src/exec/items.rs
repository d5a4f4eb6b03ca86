//! The item statement family.

use weft_ir::{
    frame_not_found, item_not_found, unknown_statement, ItemKind, Reference, RunResult, Status,
    Tag, Value,
};

use super::{exactly, int_operand, ref_var, string_operand, value_var};
use crate::context::Context;
use crate::runtime::Runtime;

pub(crate) fn dispatch(
    rt: &Runtime,
    ctx: &mut Context,
    name: &str,
    tokens: &[String],
) -> RunResult<Status> {
    match name {
        "createitem" => {
            exactly(tokens, 4)?;
            create(rt, ctx, tokens, ItemKind::Dot, None)
        }
        "createtext" => {
            exactly(tokens, 5)?;
            let text = string_operand(ctx, &tokens[4])?;
            create(rt, ctx, tokens, ItemKind::Text, Some(text))
        }
        "deleteitem" => {
            exactly(tokens, 1)?;
            let item = ctx.refs.get_item(&tokens[1])?;
            if !rt.graph().delete_item(item) {
                return Err(item_not_found(item.0));
            }
            Ok(Status::Ok)
        }
        "copyitem" => {
            exactly(tokens, 3)?;
            let item = ctx.refs.get_item(&tokens[1])?;
            let dest = ctx.refs.get_frame(&tokens[2])?;
            let dst = ref_var(&tokens[3], Tag::Item)?;
            let copy = rt
                .graph()
                .copy_item(item, dest)
                .ok_or_else(|| item_not_found(item.0))?;
            ctx.refs.set(dst, Reference::Item(copy))?;
            Ok(Status::Ok)
        }
        "getitemtext" => {
            exactly(tokens, 2)?;
            let item = ctx.refs.get_item(&tokens[1])?;
            let (dst, _) = value_var(&tokens[2])?;
            let text = rt
                .graph()
                .item_text(item)
                .ok_or_else(|| item_not_found(item.0))?;
            ctx.values.assign(dst, Value::Str(text))?;
            Ok(Status::Ok)
        }
        "setitemtext" => {
            exactly(tokens, 2)?;
            let item = ctx.refs.get_item(&tokens[1])?;
            let text = string_operand(ctx, &tokens[2])?;
            if !rt.graph().set_item_text(item, &text) {
                return Err(item_not_found(item.0));
            }
            Ok(Status::Ok)
        }
        "getitemlink" => {
            exactly(tokens, 2)?;
            let item = ctx.refs.get_item(&tokens[1])?;
            let dst = ref_var(&tokens[2], Tag::Frame)?;
            let target = rt
                .graph()
                .item_link(item)
                .ok_or_else(|| frame_not_found(format!("no link on item {}", item.0)))?;
            ctx.refs.set(dst, Reference::Frame(target))?;
            Ok(Status::Ok)
        }
        "getitemposition" => {
            exactly(tokens, 3)?;
            let item = ctx.refs.get_item(&tokens[1])?;
            let (dst_x, _) = value_var(&tokens[2])?;
            let (dst_y, _) = value_var(&tokens[3])?;
            let (x, y) = rt
                .graph()
                .item_position(item)
                .ok_or_else(|| item_not_found(item.0))?;
            ctx.values.assign(dst_x, Value::Int(x))?;
            ctx.values.assign(dst_y, Value::Int(y))?;
            Ok(Status::Ok)
        }
        _ => Err(unknown_statement(name)),
    }
}

/// Shared tail of `createitem`/`createtext`: frame, x, y, then the
/// destination variable in the statement's last position.
fn create(
    rt: &Runtime,
    ctx: &mut Context,
    tokens: &[String],
    kind: ItemKind,
    text: Option<String>,
) -> RunResult<Status> {
    let frame = ctx.refs.get_frame(&tokens[1])?;
    let x = int_operand(ctx, &tokens[2])?;
    let y = int_operand(ctx, &tokens[3])?;
    let dst = ref_var(&tokens[tokens.len() - 1], Tag::Item)?;
    let item = rt
        .graph()
        .create_item(frame, kind, x, y, text.as_deref().unwrap_or(""))
        .ok_or_else(|| frame_not_found(format!("frame {}", frame.0)))?;
    ctx.refs.set(dst, Reference::Item(item))?;
    Ok(Status::Ok)
}
