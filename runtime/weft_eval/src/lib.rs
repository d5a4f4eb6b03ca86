//! Weft Eval - the interpreter for the Weft frame-script runtime.
//!
//! A Weft program lives in the host's document graph: each frame's body
//! lines are statements, and a statement's link to another frame is both
//! "goto a block" and "call a subroutine". This crate executes that
//! graph:
//!
//! - [`ValueStore`]/[`RefStore`] and [`Context`]: the dual typed variable
//!   environment, one scope per run or procedure call
//! - the statement dispatcher (`exec`): a total match over ~80 statement
//!   forms, falling through to the host's reflective action dispatcher
//! - the node walker: in-order body execution threading the
//!   [`Status`](weft_ir::Status) signal
//! - procedure invocation: title-derived signatures, positional tag
//!   matching, fresh contexts, argument copy-back
//! - [`RunControl`]: cooperative cancellation and step pacing on a
//!   dedicated worker thread ([`spawn`])
//! - [`run_suite`]: batch test-frame execution with pass/fail/error
//!   tallies
//!
//! Host integration happens through the [`Graph`], [`Actions`] and
//! [`Stage`] capability traits; [`MemoryGraph`] is an in-process graph
//! for tests and lightweight embedding.

mod context;
mod control;
mod exec;
mod host;
mod memory;
mod runtime;
mod store;
mod suite;
mod walker;

pub use context::Context;
pub use control::{current_run, set_current_run, RunControl, StepMode};
pub use host::{Actions, Graph, NoActions, SilentStage, Stage};
pub use memory::MemoryGraph;
pub use runtime::{spawn, RunHandle, Runtime, RuntimeBuilder};
pub use store::{RefStore, ValueStore};
pub use suite::{run_suite, SuiteReport};

// Re-export the data model so hosts depend on one crate.
pub use weft_ir::{
    Frame, FrameId, ItemId, ItemKind, Reference, RunError, RunErrorKind, RunResult, Statement,
    Status, Tag, Value,
};
