//! The string statement family.
//!
//! Indices are character-based and 0-based; `substr` clamps a start past
//! the end to the empty string, while `getstrchar` treats an out-of-range
//! index as an error.

use weft_ir::{index_out_of_range, unknown_statement, Reference, RunResult, Status, Tag, Value};

use super::{exactly, int_operand, ref_var, string_operand, value_var};
use crate::context::Context;

pub(crate) fn dispatch(ctx: &mut Context, name: &str, tokens: &[String]) -> RunResult<Status> {
    match name {
        "concatstr" => {
            exactly(tokens, 3)?;
            let a = string_operand(ctx, &tokens[1])?;
            let b = string_operand(ctx, &tokens[2])?;
            let (dst, _) = value_var(&tokens[3])?;
            ctx.values.assign(dst, Value::Str(format!("{a}{b}")))?;
            Ok(Status::Ok)
        }
        "substr" => {
            exactly(tokens, 4)?;
            let src = string_operand(ctx, &tokens[1])?;
            let start = int_operand(ctx, &tokens[2])?;
            let len = int_operand(ctx, &tokens[3])?;
            let (dst, _) = value_var(&tokens[4])?;
            if start < 0 || len < 0 {
                return Err(index_out_of_range(start.min(len), src.chars().count()));
            }
            let piece: String = src
                .chars()
                .skip(usize::try_from(start).unwrap_or(usize::MAX))
                .take(usize::try_from(len).unwrap_or(usize::MAX))
                .collect();
            ctx.values.assign(dst, Value::Str(piece))?;
            Ok(Status::Ok)
        }
        "subststr" => {
            exactly(tokens, 4)?;
            let src = string_operand(ctx, &tokens[1])?;
            let find = string_operand(ctx, &tokens[2])?;
            let replace = string_operand(ctx, &tokens[3])?;
            let (dst, _) = value_var(&tokens[4])?;
            ctx.values
                .assign(dst, Value::Str(src.replace(&find, &replace)))?;
            Ok(Status::Ok)
        }
        "parsestr" => {
            exactly(tokens, 3)?;
            let src = string_operand(ctx, &tokens[1])?;
            let sep = string_operand(ctx, &tokens[2])?;
            let dst = ref_var(&tokens[3], Tag::Assoc)?;
            let pieces: Vec<&str> = if sep.is_empty() {
                src.split_whitespace().collect()
            } else {
                src.split(sep.as_str()).collect()
            };
            let assoc = Reference::new_assoc();
            if let Reference::Assoc(map) = &assoc {
                let mut map = map.lock();
                for (index, piece) in pieces.iter().enumerate() {
                    map.insert(index.to_string(), Value::Str((*piece).to_string()));
                }
            }
            ctx.refs.set(dst, assoc)?;
            Ok(Status::Ok)
        }
        "stripstr" => {
            exactly(tokens, 2)?;
            let src = string_operand(ctx, &tokens[1])?;
            let (dst, _) = value_var(&tokens[2])?;
            ctx.values.assign(dst, Value::Str(src.trim().to_string()))?;
            Ok(Status::Ok)
        }
        "getstrchar" => {
            exactly(tokens, 3)?;
            let src = string_operand(ctx, &tokens[1])?;
            let index = int_operand(ctx, &tokens[2])?;
            let (dst, _) = value_var(&tokens[3])?;
            let ch = usize::try_from(index)
                .ok()
                .and_then(|i| src.chars().nth(i))
                .ok_or_else(|| index_out_of_range(index, src.chars().count()))?;
            ctx.values.assign(dst, Value::Char(ch))?;
            Ok(Status::Ok)
        }
        "getstrlength" => {
            exactly(tokens, 2)?;
            let src = string_operand(ctx, &tokens[1])?;
            let (dst, _) = value_var(&tokens[2])?;
            let len = i64::try_from(src.chars().count()).unwrap_or(i64::MAX);
            ctx.values.assign(dst, Value::Int(len))?;
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

    #[test]
    fn concat_substr_and_length() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        ctx.values.set("$s.a", "note").unwrap();
        run_line(&rt, &mut ctx, "concatstr $s.a \"book\" $s.b").unwrap();
        assert_eq!(ctx.values.get_str("$s.b").unwrap(), "notebook");

        run_line(&rt, &mut ctx, "substr $s.b 4 4 $s.tail").unwrap();
        assert_eq!(ctx.values.get_str("$s.tail").unwrap(), "book");

        run_line(&rt, &mut ctx, "substr $s.b 99 4 $s.none").unwrap();
        assert_eq!(ctx.values.get_str("$s.none").unwrap(), "");

        run_line(&rt, &mut ctx, "getstrlength $s.b $i.len").unwrap();
        assert_eq!(ctx.values.get_int("$i.len").unwrap(), 8);
    }

    #[test]
    fn substitution_replaces_all_occurrences() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        ctx.values.set("$s.src", "a-b-c").unwrap();
        run_line(&rt, &mut ctx, "subststr $s.src \"-\" \".\" $s.out").unwrap();
        assert_eq!(ctx.values.get_str("$s.out").unwrap(), "a.b.c");
    }

    #[test]
    fn parsestr_splits_into_an_association() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        ctx.values.set("$s.csv", "one,two,three").unwrap();
        run_line(&rt, &mut ctx, "parsestr $s.csv \",\" $ap.parts").unwrap();
        run_line(&rt, &mut ctx, "getassociation $ap.parts 1 $s.p").unwrap();
        assert_eq!(ctx.values.get_str("$s.p").unwrap(), "two");

        // Empty separator means whitespace splitting.
        ctx.values.set("$s.words", "  alpha\tbeta  ").unwrap();
        run_line(&rt, &mut ctx, "parsestr $s.words \"\" $ap.words").unwrap();
        run_line(&rt, &mut ctx, "getassociation $ap.words 0 $s.w").unwrap();
        assert_eq!(ctx.values.get_str("$s.w").unwrap(), "alpha");
    }

    #[test]
    fn stripstr_trims_both_ends() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        ctx.values.set("$s.padded", "  middle  ").unwrap();
        run_line(&rt, &mut ctx, "stripstr $s.padded $s.out").unwrap();
        assert_eq!(ctx.values.get_str("$s.out").unwrap(), "middle");
    }

    #[test]
    fn getstrchar_bounds() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        ctx.values.set("$s.word", "weft").unwrap();
        run_line(&rt, &mut ctx, "getstrchar $s.word 1 $c.ch").unwrap();
        assert_eq!(ctx.values.get_char("$c.ch").unwrap(), 'e');

        let err = run_line(&rt, &mut ctx, "getstrchar $s.word 9 $c.ch").unwrap_err();
        assert_eq!(err.kind, RunErrorKind::IndexOutOfRange { index: 9, len: 4 });
    }

    #[test]
    fn one_argument_substr_fails_arity_before_touching_variables() {
        let (rt, _) = runtime();
        let mut ctx = Context::new();
        let err = run_line(&rt, &mut ctx, "substr $s.src").unwrap_err();
        assert_eq!(err.kind, RunErrorKind::WrongArgCount { expected: 4, got: 1 });
        assert!(!ctx.values.contains("$s.src"));
    }
}
