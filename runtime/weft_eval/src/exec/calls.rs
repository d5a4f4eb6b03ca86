//! Procedure invocation.
//!
//! A procedure is an ordinary frame whose title doubles as its formal
//! signature: whitespace-separated tokens, with the literal marker `call`
//! prepended when it is not already the leading word. Argument matching is
//! positional, comparing only the tag character (the letter right after
//! `$`) of each token. Arguments bind into a fresh, disjoint context;
//! after the body runs, every argument position is copied back caller-ward
//! — values by value, references by handle — which is how output
//! parameters work. There is no implicit return value.

use std::sync::Arc;

use weft_ir::{
    frame_not_found, malformed_variable, tag_char, too_few_args, too_many_args, type_mismatch,
    unlinked_call, unmatched_loop_control, Frame, Reference, RunResult, Statement, Status, Tag,
};

use crate::context::Context;
use crate::runtime::Runtime;
use crate::walker;

/// Whether a frame's title marks it as a procedure.
pub(crate) fn is_procedure(frame: &Frame) -> bool {
    frame
        .title
        .split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("call"))
}

/// The formal signature: lower-cased title tokens with the `call` marker
/// ensured at the front.
fn formal_signature(frame: &Frame) -> Vec<String> {
    let mut signature: Vec<String> = frame
        .title
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();
    if signature.first().map(String::as_str) != Some("call") {
        signature.insert(0, "call".to_string());
    }
    signature
}

/// Dispatch an explicit `call` statement.
pub(crate) fn call_statement(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    stmt: &Statement,
    tokens: &[String],
) -> RunResult<Status> {
    let target = stmt.link.ok_or_else(unlinked_call)?;
    let frame = rt
        .graph()
        .frame(target)
        .ok_or_else(|| frame_not_found(format!("frame {}", target.0)))?;
    invoke_frame(rt, depth, ctx, &frame, tokens)
}

/// Invoke a procedure frame.
///
/// `tokens` is the caller's call statement; an empty slice is a bare-link
/// invocation, which can only reach a parameterless procedure.
pub(crate) fn invoke_frame(
    rt: &Runtime,
    depth: usize,
    ctx: &mut Context,
    frame: &Arc<Frame>,
    tokens: &[String],
) -> RunResult<Status> {
    let formal = formal_signature(frame);

    let bare: Vec<String>;
    let call_tokens: &[String] = if tokens.is_empty() {
        // Synthesize `call <name>` so a parameterless procedure runs and
        // one with parameters reports the missing arguments.
        bare = formal.iter().take(2).cloned().collect();
        &bare
    } else {
        tokens
    };

    // Token counts must match exactly; the two flavors keep diagnostics
    // honest about which side is short.
    if call_tokens.len() < formal.len() {
        return Err(too_few_args(formal.len() - 1, call_tokens.len() - 1));
    }
    if call_tokens.len() > formal.len() {
        return Err(too_many_args(formal.len() - 1, call_tokens.len() - 1));
    }

    let mut child = Context::new();
    for position in 2..formal.len() {
        bind_argument(ctx, &mut child, &call_tokens[position], &formal[position])?;
    }

    tracing::debug!(frame = frame.id.0, title = %frame.title, "invoking procedure");
    let status = walker::run_frame(rt, depth + 1, frame, &mut child)?;

    // A loop signal has no meaning at a procedure boundary.
    if matches!(status, Status::Break | Status::Continue) {
        return Err(unmatched_loop_control(status));
    }

    for position in 2..formal.len() {
        copy_back(ctx, &child, &call_tokens[position], &formal[position])?;
    }

    Ok(match status {
        // Normal procedure exit.
        Status::Return => Status::Ok,
        other => other,
    })
}

/// Bind one argument position into the child context.
///
/// An existing caller variable is copied under the formal name; a missing
/// one auto-declares the tag's empty value in *both* contexts (output
/// parameters). Reference tags without an empty value bind lazily through
/// copy-back instead.
fn bind_argument(
    caller: &mut Context,
    child: &mut Context,
    caller_token: &str,
    formal_token: &str,
) -> RunResult<()> {
    let caller_tag = tag_char(caller_token).ok_or_else(|| malformed_variable(caller_token))?;
    let formal_tag = tag_char(formal_token).ok_or_else(|| malformed_variable(formal_token))?;
    if caller_tag != formal_tag {
        return Err(type_mismatch(
            format!("${formal_tag} parameter {formal_token}"),
            format!("${caller_tag} argument {caller_token}"),
        ));
    }

    let tag = Tag::of_var(formal_token).ok_or_else(|| malformed_variable(formal_token))?;
    if tag.is_value() {
        if caller.values.contains(caller_token) {
            let value = caller.values.get(caller_token)?.clone();
            child.values.assign(formal_token, value)?;
        } else {
            caller.values.declare_default(caller_token)?;
            child.values.declare_default(formal_token)?;
        }
    } else if caller.refs.contains(caller_token) {
        let reference = caller.refs.get(caller_token)?.clone();
        child.refs.set(formal_token, reference)?;
    } else if tag == Tag::Assoc {
        // The one reference tag with an empty value: both sides share a
        // fresh association.
        let fresh = Reference::new_assoc();
        caller.refs.set(caller_token, fresh.clone())?;
        child.refs.set(formal_token, fresh)?;
    }
    Ok(())
}

/// Copy one argument position's final value back to the caller.
fn copy_back(
    caller: &mut Context,
    child: &Context,
    caller_token: &str,
    formal_token: &str,
) -> RunResult<()> {
    let tag = Tag::of_var(formal_token).ok_or_else(|| malformed_variable(formal_token))?;
    if tag.is_value() {
        if child.values.contains(formal_token) {
            let value = child.values.get(formal_token)?.clone();
            caller.values.assign(caller_token, value)?;
        }
    } else if child.refs.contains(formal_token) {
        let reference = child.refs.get(formal_token)?.clone();
        caller.refs.set(caller_token, reference)?;
    }
    Ok(())
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
    fn parameter_copy_back() {
        let (rt, graph) = runtime();
        let addone = graph.add_frame(
            "call addone $i.a",
            vec![Statement::new("add $i.a 1 $i.a")],
        );
        let mut ctx = Context::new();
        ctx.values.set("$i.x", "5").unwrap();

        let status = run_linked_line(&rt, &mut ctx, "call addone $i.x", addone).unwrap();
        assert_eq!(status, Status::Ok);
        assert_eq!(ctx.values.get_int("$i.x").unwrap(), 6);
        // The callee's local name does not leak into the caller.
        assert!(!ctx.values.contains("$i.a"));
    }

    #[test]
    fn output_parameters_auto_declare() {
        let (rt, graph) = runtime();
        let answer = graph.add_frame(
            "call answer $i.out",
            vec![Statement::new("set $i.out 42")],
        );
        let mut ctx = Context::new();
        run_linked_line(&rt, &mut ctx, "call answer $i.result", answer).unwrap();
        assert_eq!(ctx.values.get_int("$i.result").unwrap(), 42);
    }

    #[test]
    fn callee_cannot_see_unrelated_caller_variables() {
        let (rt, graph) = runtime();
        // Reading $i.secret inside the callee must fail: contexts are
        // disjoint beyond explicit parameter binding.
        let spy = graph.add_frame(
            "call spy $i.a",
            vec![Statement::new("add $i.secret 1 $i.a")],
        );
        let mut ctx = Context::new();
        ctx.values.set("$i.secret", "7").unwrap();
        ctx.values.set("$i.x", "0").unwrap();
        let err = run_linked_line(&rt, &mut ctx, "call spy $i.x", spy).unwrap_err();
        assert!(matches!(err.kind, RunErrorKind::UndefinedVariable { .. }));
    }

    #[test]
    fn arity_mismatch_distinguishes_directions() {
        let (rt, graph) = runtime();
        let two = graph.add_frame("call two $i.a $i.b", vec![]);
        let mut ctx = Context::new();
        ctx.values.set("$i.x", "1").unwrap();

        let err = run_linked_line(&rt, &mut ctx, "call two $i.x", two).unwrap_err();
        assert_eq!(err.kind, RunErrorKind::TooFewArgs { min: 3, got: 2 });

        let err =
            run_linked_line(&rt, &mut ctx, "call two $i.x $i.x $i.x", two).unwrap_err();
        assert_eq!(err.kind, RunErrorKind::TooManyArgs { max: 3, got: 4 });
    }

    #[test]
    fn tag_character_mismatch_is_incorrect_type() {
        let (rt, graph) = runtime();
        let wants_int = graph.add_frame("call f $i.a", vec![]);
        let mut ctx = Context::new();
        ctx.values.set("$s.word", "hi").unwrap();
        let err = run_linked_line(&rt, &mut ctx, "call f $s.word", wants_int).unwrap_err();
        assert!(matches!(err.kind, RunErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn return_normalizes_to_ok_and_break_is_a_hard_error() {
        let (rt, graph) = runtime();
        let returns = graph.add_frame("call r", vec![Statement::new("return")]);
        let breaks = graph.add_frame("call b", vec![Statement::new("break")]);
        let mut ctx = Context::new();

        let status = run_linked_line(&rt, &mut ctx, "call r", returns).unwrap();
        assert_eq!(status, Status::Ok);

        let err = run_linked_line(&rt, &mut ctx, "call b", breaks).unwrap_err();
        assert_eq!(
            err.kind,
            RunErrorKind::UnmatchedLoopControl {
                status: Status::Break
            }
        );
    }

    #[test]
    fn exit_propagates_through_the_call() {
        let (rt, graph) = runtime();
        let exits = graph.add_frame("call e", vec![Statement::new("exitall")]);
        let mut ctx = Context::new();
        let status = run_linked_line(&rt, &mut ctx, "call e", exits).unwrap();
        assert_eq!(status, Status::Exit);
    }

    #[test]
    fn call_without_link_fails() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        let err = crate::exec::testutil::run_line(&rt, &mut ctx, "call f $i.x").unwrap_err();
        assert_eq!(err.kind, RunErrorKind::UnlinkedCall);
    }

    #[test]
    fn marker_is_prepended_when_missing() {
        let (rt, graph) = runtime();
        // Title without the leading `call` word still forms a signature.
        let plain = graph.add_frame("double $i.n", vec![Statement::new("add $i.n $i.n $i.n")]);
        let mut ctx = Context::new();
        ctx.values.set("$i.v", "21").unwrap();
        run_linked_line(&rt, &mut ctx, "call double $i.v", plain).unwrap();
        assert_eq!(ctx.values.get_int("$i.v").unwrap(), 42);
    }

    #[test]
    fn reference_arguments_copy_by_handle() {
        let (rt, graph) = runtime();
        let fill = graph.add_frame(
            "call fill $ap.m",
            vec![Statement::new("setassociation $ap.m color \"teal\"")],
        );
        let mut ctx = Context::new();
        run_linked_line(&rt, &mut ctx, "call fill $ap.out", fill).unwrap();
        let map = ctx.refs.get_assoc("$ap.out").unwrap();
        assert_eq!(
            map.lock().get("color").map(ToString::to_string),
            Some("teal".to_string())
        );
    }

    #[test]
    fn bare_link_reaches_parameterless_procedures_only() {
        let (rt, graph) = runtime();
        let zero = graph.add_frame("call init", vec![Statement::new("set $i.x 1")]);
        let one = graph.add_frame("call inc $i.a", vec![]);
        let mut ctx = Context::new();

        let zero_frame = graph.frame(zero).unwrap();
        assert_eq!(
            invoke_frame(&rt, 0, &mut ctx, &zero_frame, &[]).unwrap(),
            Status::Ok
        );

        let one_frame = graph.frame(one).unwrap();
        let err = invoke_frame(&rt, 0, &mut ctx, &one_frame, &[]).unwrap_err();
        assert_eq!(err.kind, RunErrorKind::TooFewArgs { min: 2, got: 1 });
    }
}
