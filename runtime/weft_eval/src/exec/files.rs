//! The file statement family: line-oriented streams behind `$sp.` handles.
//!
//! Streams are owned by the context that opened them and must be closed
//! explicitly with `closefile`; the runtime does not finalize leaked
//! handles.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::sync::Arc;

use parking_lot::Mutex;
use weft_ir::{stream_error, unknown_statement, Reference, RunResult, Status, Stream, Tag, Value};

use super::{exactly, ref_var, string_operand, value_var};
use crate::context::Context;

pub(crate) fn dispatch(ctx: &mut Context, name: &str, tokens: &[String]) -> RunResult<Status> {
    match name {
        "openfileread" => {
            exactly(tokens, 2)?;
            let dst = ref_var(&tokens[1], Tag::Stream)?;
            let path = string_operand(ctx, &tokens[2])?;
            let file = File::open(&path).map_err(|err| stream_error(err.to_string()))?;
            let stream = Stream::Read(BufReader::new(file));
            ctx.refs
                .set(dst, Reference::Stream(Arc::new(Mutex::new(stream))))?;
            Ok(Status::Ok)
        }
        "openfilewrite" => {
            exactly(tokens, 2)?;
            let dst = ref_var(&tokens[1], Tag::Stream)?;
            let path = string_operand(ctx, &tokens[2])?;
            let file = File::create(&path).map_err(|err| stream_error(err.to_string()))?;
            let stream = Stream::Write(BufWriter::new(file));
            ctx.refs
                .set(dst, Reference::Stream(Arc::new(Mutex::new(stream))))?;
            Ok(Status::Ok)
        }
        "readfileline" => {
            exactly(tokens, 3)?;
            let stream = ctx.refs.get_stream(&tokens[1])?;
            let (dst, _) = value_var(&tokens[2])?;
            let (more, _) = value_var(&tokens[3])?;
            let line = stream
                .lock()
                .read_line()
                .map_err(|err| stream_error(err.to_string()))?;
            match line {
                Some(text) => {
                    ctx.values.assign(dst, Value::Str(text))?;
                    ctx.values.assign(more, Value::Bool(true))?;
                }
                None => {
                    ctx.values.assign(dst, Value::Str(String::new()))?;
                    ctx.values.assign(more, Value::Bool(false))?;
                }
            }
            Ok(Status::Ok)
        }
        "writefileline" => {
            exactly(tokens, 2)?;
            let stream = ctx.refs.get_stream(&tokens[1])?;
            let text = string_operand(ctx, &tokens[2])?;
            stream
                .lock()
                .write_line(&text)
                .map_err(|err| stream_error(err.to_string()))?;
            Ok(Status::Ok)
        }
        "closefile" => {
            exactly(tokens, 1)?;
            let stream = ctx.refs.get_stream(&tokens[1])?;
            stream
                .lock()
                .close()
                .map_err(|err| stream_error(err.to_string()))?;
            Ok(Status::Ok)
        }
        _ => Err(unknown_statement(name)),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::exec::testutil::{run_line, runtime};
    use pretty_assertions::assert_eq;
    use weft_ir::RunErrorKind;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("weft-files-{}-{name}", std::process::id()));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn write_then_read_round_trips() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        let path = temp_path("roundtrip.txt");

        run_line(&rt, &mut ctx, &format!("openfilewrite $sp.out \"{path}\"")).unwrap();
        run_line(&rt, &mut ctx, "writefileline $sp.out \"first\"").unwrap();
        run_line(&rt, &mut ctx, "writefileline $sp.out \"second\"").unwrap();
        run_line(&rt, &mut ctx, "closefile $sp.out").unwrap();

        run_line(&rt, &mut ctx, &format!("openfileread $sp.in \"{path}\"")).unwrap();
        run_line(&rt, &mut ctx, "readfileline $sp.in $s.line $b.more").unwrap();
        assert_eq!(ctx.values.get_str("$s.line").unwrap(), "first");
        assert!(ctx.values.get_bool("$b.more").unwrap());

        run_line(&rt, &mut ctx, "readfileline $sp.in $s.line $b.more").unwrap();
        assert_eq!(ctx.values.get_str("$s.line").unwrap(), "second");

        run_line(&rt, &mut ctx, "readfileline $sp.in $s.line $b.more").unwrap();
        assert_eq!(ctx.values.get_str("$s.line").unwrap(), "");
        assert!(!ctx.values.get_bool("$b.more").unwrap());

        run_line(&rt, &mut ctx, "closefile $sp.in").unwrap();
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn closed_stream_errors_on_use() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        let path = temp_path("closed.txt");

        run_line(&rt, &mut ctx, &format!("openfilewrite $sp.f \"{path}\"")).unwrap();
        run_line(&rt, &mut ctx, "closefile $sp.f").unwrap();
        let err = run_line(&rt, &mut ctx, "writefileline $sp.f \"late\"").unwrap_err();
        assert!(matches!(err.kind, RunErrorKind::StreamError { .. }));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_a_stream_error() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        let err = run_line(
            &rt,
            &mut ctx,
            "openfileread $sp.f \"/nonexistent/weft/input.txt\"",
        )
        .unwrap_err();
        assert!(matches!(err.kind, RunErrorKind::StreamError { .. }));
    }
}
