//! The control-flow status signal.
//!
//! Every statement and every node execution produces exactly one `Status`.
//! Control transfer is never modeled as an error or an unwinding panic:
//! if/else, loops, and procedure boundaries each *inspect* the status and
//! decide what it means at their level, which makes this enum the single
//! coordination point of the whole runtime.

use std::fmt;

/// Result signal of executing one statement or one frame body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Terminate the entire run; propagates through everything.
    Exit,
    /// Normal completion; execution continues with the next statement.
    Ok,
    /// Stop the innermost loop. Escaping a procedure boundary is an error.
    Break,
    /// Skip to the next loop iteration. Same boundary rule as `Break`.
    Continue,
    /// Return from the current procedure; normalized to `Ok` by the caller.
    Return,
    /// An if-condition held and its branch ran; consumed by `else`.
    TrueIf,
    /// An if-condition did not hold; consumed by `else`.
    FalseIf,
}

impl Status {
    /// Whether this is one of the if-signal pair that a following `else`
    /// inspects. These never escape a node body.
    pub fn is_if_signal(self) -> bool {
        matches!(self, Status::TrueIf | Status::FalseIf)
    }

    /// Whether the node walker aborts the remaining statements of the
    /// current node on this status.
    pub fn aborts_node(self) -> bool {
        !matches!(self, Status::Ok | Status::TrueIf | Status::FalseIf)
    }

    /// Statement-vocabulary name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Status::Exit => "exitall",
            Status::Ok => "ok",
            Status::Break => "break",
            Status::Continue => "continue",
            Status::Return => "return",
            Status::TrueIf => "true-if",
            Status::FalseIf => "false-if",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
