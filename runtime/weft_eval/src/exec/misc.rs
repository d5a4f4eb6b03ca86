//! Odds and ends: `message` and `pause`.

use std::time::Duration;

use weft_ir::{interrupted, RunResult, Status};

use super::{at_least, exactly, int_operand, string_operand};
use crate::context::Context;
use crate::runtime::Runtime;

/// `message <operands...>` - show the operands, space-joined, through the
/// host's message display.
pub(crate) fn message(rt: &Runtime, ctx: &mut Context, tokens: &[String]) -> RunResult<Status> {
    at_least(tokens, 1)?;
    let mut parts = Vec::with_capacity(tokens.len() - 1);
    for token in &tokens[1..] {
        parts.push(string_operand(ctx, token)?);
    }
    rt.stage().message(&parts.join(" "));
    Ok(Status::Ok)
}

/// `pause <milliseconds>` - sleep in short slices so a stop request still
/// lands between them.
pub(crate) fn pause(rt: &Runtime, ctx: &mut Context, tokens: &[String]) -> RunResult<Status> {
    exactly(tokens, 1)?;
    let total = int_operand(ctx, &tokens[1])?.max(0);
    let control = rt.control();
    let mut remaining = u64::try_from(total).unwrap_or(0);
    while remaining > 0 {
        if control.stop_requested() {
            return Err(interrupted());
        }
        let slice = remaining.min(10);
        std::thread::sleep(Duration::from_millis(slice));
        remaining -= slice;
    }
    Ok(Status::Ok)
}
