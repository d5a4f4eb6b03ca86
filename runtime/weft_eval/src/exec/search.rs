//! The search statement family: substring search over a frame's text
//! items.

use weft_ir::{
    unknown_statement, ItemId, ItemKind, Reference, RunResult, Status, Tag, Value,
};

use super::{exactly, ref_var, string_operand, value_var};
use crate::context::Context;
use crate::runtime::Runtime;

pub(crate) fn dispatch(
    rt: &Runtime,
    ctx: &mut Context,
    name: &str,
    tokens: &[String],
) -> RunResult<Status> {
    match name {
        "search" => {
            exactly(tokens, 4)?;
            let items = candidates(rt, ctx, tokens)?;
            finish(rt, ctx, tokens, items.into_iter())
        }
        "searchnext" => {
            exactly(tokens, 4)?;
            let items = candidates(rt, ctx, tokens)?;
            // Resume after the current hit when the output variable
            // already holds one; otherwise behave like `search`.
            let dst = ref_var(&tokens[3], Tag::Item)?;
            let skip_past: Option<ItemId> = if ctx.refs.contains(dst) {
                Some(ctx.refs.get_item(dst)?)
            } else {
                None
            };
            let start = match skip_past {
                Some(current) => items
                    .iter()
                    .position(|item| *item == current)
                    .map_or(0, |pos| pos + 1),
                None => 0,
            };
            finish(rt, ctx, tokens, items.into_iter().skip(start))
        }
        "searchcount" => {
            exactly(tokens, 3)?;
            let needle = string_operand(ctx, &tokens[2])?;
            let frame = ctx.refs.get_frame(&tokens[1])?;
            let (dst, _) = value_var(&tokens[3])?;
            let count = rt
                .graph()
                .items(frame, ItemKind::Text)
                .into_iter()
                .filter(|item| matches(rt, *item, &needle))
                .count();
            let count = i64::try_from(count).unwrap_or(i64::MAX);
            ctx.values.assign(dst, Value::Int(count))?;
            Ok(Status::Ok)
        }
        _ => Err(unknown_statement(name)),
    }
}

/// The frame's text items for a `search`/`searchnext` statement.
fn candidates(rt: &Runtime, ctx: &Context, tokens: &[String]) -> RunResult<Vec<ItemId>> {
    let frame = ctx.refs.get_frame(&tokens[1])?;
    Ok(rt.graph().items(frame, ItemKind::Text))
}

/// Bind the first match to the output pair: the item variable and the
/// found flag. The item variable is left untouched on a miss.
fn finish(
    rt: &Runtime,
    ctx: &mut Context,
    tokens: &[String],
    items: impl Iterator<Item = ItemId>,
) -> RunResult<Status> {
    let needle = string_operand(ctx, &tokens[2])?;
    let dst = ref_var(&tokens[3], Tag::Item)?;
    let (flag, _) = value_var(&tokens[4])?;

    for item in items {
        if matches(rt, item, &needle) {
            ctx.refs.set(dst, Reference::Item(item))?;
            ctx.values.assign(flag, Value::Bool(true))?;
            return Ok(Status::Ok);
        }
    }
    ctx.values.assign(flag, Value::Bool(false))?;
    Ok(Status::Ok)
}

fn matches(rt: &Runtime, item: ItemId, needle: &str) -> bool {
    rt.graph()
        .item_text(item)
        .is_some_and(|text| text.contains(needle))
}
