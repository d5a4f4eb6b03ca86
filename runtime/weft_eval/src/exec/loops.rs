//! The loop statement family: `repeat` and `foreach*`.
//!
//! A loop's body is always the linked frame. `Break` and `Continue` are
//! consumed here and converted back to `Ok` — stopping or continuing the
//! loop — while `Exit` and `Return` escape immediately. The statements
//! themselves (`break`, `continue`, ...) know nothing about their
//! enclosing construct; this module is where their meaning lives.

use weft_ir::{
    interrupted, type_mismatch, unknown_statement, unlinked_run, FrameId, ItemKind, Reference,
    RunResult, Statement, Status, Tag, Value,
};

use super::{at_most, exactly, int_operand, ref_var, value_var};
use crate::context::Context;
use crate::runtime::Runtime;
use crate::walker;

/// What one body execution means for the loop.
enum LoopFlow {
    Next,
    Stop(Status),
}

/// Run the loop body once and classify the resulting status.
fn iteration(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    target: FrameId,
) -> RunResult<LoopFlow> {
    match walker::walk_target(rt, depth, ctx, target)? {
        Status::Break => Ok(LoopFlow::Stop(Status::Ok)),
        Status::Continue | Status::Ok | Status::TrueIf | Status::FalseIf => Ok(LoopFlow::Next),
        escaping => Ok(LoopFlow::Stop(escaping)),
    }
}

/// `repeat [count [$i.counter]]` - fixed-count or unconditional loop.
pub(crate) fn repeat(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    stmt: &Statement,
    tokens: &[String],
) -> RunResult<Status> {
    at_most(tokens, 2)?;
    let target = stmt.link.ok_or_else(|| unlinked_run("repeat"))?;

    let count = match tokens.get(1) {
        Some(token) => Some(int_operand(ctx, token)?),
        None => None,
    };
    let counter = match tokens.get(2) {
        Some(token) => {
            let (name, tag) = value_var(token)?;
            if tag != Tag::Int {
                return Err(type_mismatch("an integer counter", tag.describe()));
            }
            Some(name)
        }
        None => None,
    };

    let mut index: i64 = 0;
    loop {
        index = index.saturating_add(1);
        if let Some(limit) = count {
            if index > limit {
                return Ok(Status::Ok);
            }
        }
        if let Some(name) = counter {
            ctx.values.assign(name, Value::Int(index))?;
        }
        match iteration(rt, depth, ctx, target)? {
            LoopFlow::Next => {}
            LoopFlow::Stop(status) => return Ok(status),
        }
        // An unconditional repeat over an empty body still has to honor a
        // stop request.
        if rt.control().stop_requested() {
            return Err(interrupted());
        }
    }
}

/// `foreach*` - iterate association keys or a frame's child items.
pub(crate) fn foreach(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    stmt: &Statement,
    tokens: &[String],
) -> RunResult<Status> {
    exactly(tokens, 2)?;
    let name = tokens[0].as_str();
    let target = stmt.link.ok_or_else(|| unlinked_run(name))?;

    if name == "foreachassociation" {
        let map = ctx.refs.get_assoc(&tokens[1])?;
        let (loop_var, tag) = value_var(&tokens[2])?;
        if tag != Tag::Str {
            return Err(type_mismatch("a string loop variable", tag.describe()));
        }
        // Snapshot the keys so the body may mutate the association.
        let keys: Vec<String> = map.lock().keys().cloned().collect();
        for key in keys {
            ctx.values.assign(loop_var, Value::Str(key))?;
            match iteration(rt, depth, ctx, target)? {
                LoopFlow::Next => {}
                LoopFlow::Stop(status) => return Ok(status),
            }
        }
        return Ok(Status::Ok);
    }

    let kind = match name {
        "foreach" => ItemKind::Any,
        "foreachtext" => ItemKind::Text,
        "foreachline" => ItemKind::Line,
        "foreachdot" => ItemKind::Dot,
        _ => return Err(unknown_statement(name)),
    };
    let frame = ctx.refs.get_frame(&tokens[1])?;
    let loop_var = ref_var(&tokens[2], Tag::Item)?;
    for item in rt.graph().items(frame, kind) {
        ctx.refs.set(loop_var, Reference::Item(item))?;
        match iteration(rt, depth, ctx, target)? {
            LoopFlow::Next => {}
            LoopFlow::Stop(status) => return Ok(status),
        }
    }
    Ok(Status::Ok)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::exec::testutil::{run_linked_line, runtime};
    use crate::host::Graph;
    use pretty_assertions::assert_eq;
    use weft_ir::RunErrorKind;

    #[test]
    fn repeat_counts_and_binds_the_counter() {
        let (rt, graph) = runtime();
        let body = graph.add_frame("Body", vec![Statement::new("add $i.sum $i.n $i.sum")]);
        let mut ctx = Context::new();
        ctx.values.set("$i.sum", "0").unwrap();
        let status = run_linked_line(&rt, &mut ctx, "repeat 4 $i.n", body).unwrap();
        assert_eq!(status, Status::Ok);
        // 1 + 2 + 3 + 4
        assert_eq!(ctx.values.get_int("$i.sum").unwrap(), 10);
        assert_eq!(ctx.values.get_int("$i.n").unwrap(), 4);
    }

    #[test]
    fn break_stops_the_loop_with_ok() {
        let (rt, graph) = runtime();
        let body = graph.add_frame(
            "Body",
            vec![Statement::new("ifeq $i.c 3 break")],
        );
        let mut ctx = Context::new();
        let status = run_linked_line(&rt, &mut ctx, "repeat 5 $i.c", body).unwrap();
        assert_eq!(status, Status::Ok);
        assert_eq!(ctx.values.get_int("$i.c").unwrap(), 3);
    }

    #[test]
    fn continue_skips_to_the_next_iteration() {
        let (rt, graph) = runtime();
        let skip = graph.add_frame(
            "Body",
            vec![
                Statement::new("ifeq $i.c 2 continue"),
                Statement::new("add $i.sum 1 $i.sum"),
            ],
        );
        let mut ctx = Context::new();
        ctx.values.set("$i.sum", "0").unwrap();
        run_linked_line(&rt, &mut ctx, "repeat 3 $i.c", skip).unwrap();
        assert_eq!(ctx.values.get_int("$i.sum").unwrap(), 2);
    }

    #[test]
    fn return_escapes_the_loop() {
        let (rt, graph) = runtime();
        let body = graph.add_frame("Body", vec![Statement::new("return")]);
        let mut ctx = Context::new();
        let status = run_linked_line(&rt, &mut ctx, "repeat 5 $i.c", body).unwrap();
        assert_eq!(status, Status::Return);
        assert_eq!(ctx.values.get_int("$i.c").unwrap(), 1);
    }

    #[test]
    fn repeat_without_link_is_unlinked_run() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        let err = crate::exec::testutil::run_line(&rt, &mut ctx, "repeat 3").unwrap_err();
        assert!(matches!(err.kind, RunErrorKind::UnlinkedRun { .. }));
    }

    #[test]
    fn foreach_association_binds_keys_in_order() {
        let (rt, graph) = runtime();
        let body = graph.add_frame(
            "Body",
            vec![Statement::new("concatstr $s.seen $s.key $s.seen")],
        );
        let mut ctx = Context::new();
        let assoc = Reference::new_assoc();
        if let Reference::Assoc(map) = &assoc {
            let mut map = map.lock();
            map.insert("b".to_string(), Value::Int(2));
            map.insert("a".to_string(), Value::Int(1));
            map.insert("c".to_string(), Value::Int(3));
        }
        ctx.refs.set("$ap.m", assoc).unwrap();
        ctx.values.set("$s.seen", "").unwrap();
        run_linked_line(&rt, &mut ctx, "foreachassociation $ap.m $s.key", body).unwrap();
        // seen = seen + key per iteration; keys visit in sorted order.
        assert_eq!(ctx.values.get_str("$s.seen").unwrap(), "abc");
    }

    #[test]
    fn foreach_items_filters_by_kind() {
        let (rt, graph) = runtime();
        let home = graph.add_frame("Home", vec![]);
        graph.create_item(home, ItemKind::Text, 0, 0, "t1").unwrap();
        graph.create_item(home, ItemKind::Dot, 1, 1, "").unwrap();
        graph.create_item(home, ItemKind::Text, 2, 2, "t2").unwrap();

        let body = graph.add_frame("Body", vec![Statement::new("add $i.count 1 $i.count")]);
        let mut ctx = Context::new();
        ctx.values.set("$i.count", "0").unwrap();
        ctx.refs.set("$fp.home", Reference::Frame(home)).unwrap();

        run_linked_line(&rt, &mut ctx, "foreachtext $fp.home $ip.t", body).unwrap();
        assert_eq!(ctx.values.get_int("$i.count").unwrap(), 2);

        ctx.values.set("$i.count", "0").unwrap();
        run_linked_line(&rt, &mut ctx, "foreach $fp.home $ip.t", body).unwrap();
        assert_eq!(ctx.values.get_int("$i.count").unwrap(), 3);
    }
}
