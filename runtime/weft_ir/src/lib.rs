//! Weft IR - core data model for the Weft frame-script runtime.
//!
//! A Weft program is not a flat source file: it is a graph of *frames*
//! (nodes in the host document) whose body lines are statements, and whose
//! links double as "goto a block" and "call a subroutine". This crate holds
//! the types that model that program shape, plus the typed value/reference
//! unions and the control-flow status signal that thread through the
//! evaluator:
//!
//! - [`Tag`]: the `$<tag>.` type-prefix discipline of variable names
//! - [`Value`] / [`Reference`]: the two typed unions the variable stores hold
//! - [`Status`]: the closed control-flow signal set (`Exit`, `Ok`, `Break`,
//!   `Continue`, `Return`, `TrueIf`, `FalseIf`)
//! - [`Frame`] / [`Statement`]: the interpreter's borrowed view of the host
//!   graph, with the per-statement memoized token cache
//! - [`RunError`]: the structured error taxonomy with factory constructors

mod errors;
mod frame;
mod reference;
mod status;
mod tag;
mod value;

pub use errors::{
    else_without_if, frame_not_found, index_out_of_range, interrupted, item_not_found,
    malformed_literal, malformed_variable, recursion_limit_exceeded, stream_error, too_few_args,
    too_many_args, type_mismatch, undefined_variable, unit_test_failed, unknown_statement,
    unlinked_call, unlinked_run, unmatched_loop_control, wrong_arg_count, RunError, RunErrorKind,
    RunResult,
};
pub use frame::{Frame, FrameId, ItemId, ItemKind, Statement};
pub use reference::{AssocRef, Reference, Stream, StreamRef};
pub use status::Status;
pub use tag::{tag_char, Tag};
pub use value::{arith_int, arith_real, unary_real, ArithOp, UnaryOp, Value};

// Re-export the tokenizer's output type; the statement cache stores it.
pub use weft_lex::Tokens;
