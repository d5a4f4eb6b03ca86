//! The association statement family: key/value maps behind `$ap.` handles.

use weft_ir::{undefined_variable, unknown_statement, Reference, RunResult, Status, Tag};

use super::{exactly, operand, ref_var, string_operand, value_var};
use crate::context::Context;

pub(crate) fn dispatch(ctx: &mut Context, name: &str, tokens: &[String]) -> RunResult<Status> {
    match name {
        "createassociation" => {
            exactly(tokens, 1)?;
            let dst = ref_var(&tokens[1], Tag::Assoc)?;
            ctx.refs.set(dst, Reference::new_assoc())?;
            Ok(Status::Ok)
        }
        "setassociation" => {
            exactly(tokens, 3)?;
            let map = ctx.refs.get_assoc(&tokens[1])?;
            let key = string_operand(ctx, &tokens[2])?;
            let value = operand(ctx, &tokens[3])?.value;
            map.lock().insert(key, value);
            Ok(Status::Ok)
        }
        "getassociation" => {
            exactly(tokens, 3)?;
            let map = ctx.refs.get_assoc(&tokens[1])?;
            let key = string_operand(ctx, &tokens[2])?;
            let (dst, _) = value_var(&tokens[3])?;
            let value = map
                .lock()
                .get(&key)
                .cloned()
                .ok_or_else(|| undefined_variable(&key))?;
            ctx.values.assign(dst, value)?;
            Ok(Status::Ok)
        }
        "deleteassociation" => {
            exactly(tokens, 2)?;
            let map = ctx.refs.get_assoc(&tokens[1])?;
            let key = string_operand(ctx, &tokens[2])?;
            map.lock().remove(&key);
            Ok(Status::Ok)
        }
        _ => Err(unknown_statement(name)),
    }
}
