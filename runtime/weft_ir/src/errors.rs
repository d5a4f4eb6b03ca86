//! Structured runtime errors and their factory constructors.
//!
//! Every failure the runtime can raise is a *local, recoverable* condition
//! from the host's point of view: it aborts the offending run, never the
//! host process. `RunErrorKind` carries the structured category for
//! programmatic matching; factory functions (e.g. [`undefined_variable`])
//! are the public construction API and populate both `kind` and `message`.

use std::fmt;

use crate::frame::FrameId;
use crate::status::Status;

/// Result of a runtime operation.
pub type RunResult<T> = Result<T, RunError>;

/// Typed error category.
///
/// Each variant carries the data a diagnostic needs; the `Display` impl is
/// the single source of message text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunErrorKind {
    // Arity (checked before any argument is touched)
    TooFewArgs { min: usize, got: usize },
    TooManyArgs { max: usize, got: usize },
    WrongArgCount { expected: usize, got: usize },

    // Types and variables
    TypeMismatch { expected: String, got: String },
    UndefinedVariable { name: String },
    MalformedVariable { name: String },

    // Graph structure
    UnlinkedCall,
    UnlinkedRun { name: String },
    FrameNotFound { what: String },
    ItemNotFound { id: u32 },

    // Tokenization
    MalformedLiteral { detail: String },

    // Control flow
    UnmatchedLoopControl { status: Status },
    ElseWithoutIf,
    RecursionLimit { depth: usize },

    // Assertions
    UnitTestFailed { expected: String, actual: String },

    // Dispatch
    UnknownStatement { name: String },

    // Host I/O
    StreamError { detail: String },
    IndexOutOfRange { index: i64, len: usize },

    // Cancellation
    Interrupted,
}

impl fmt::Display for RunErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewArgs { min, got } => {
                write!(f, "expected at least {min} parameters, got {got}")
            }
            Self::TooManyArgs { max, got } => {
                write!(f, "expected at most {max} parameters, got {got}")
            }
            Self::WrongArgCount { expected, got } => {
                write!(f, "expected exactly {expected} parameters, got {got}")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::MalformedVariable { name } => {
                write!(f, "not a variable name: {name}")
            }
            Self::UnlinkedCall => write!(f, "call statement has no link to follow"),
            Self::UnlinkedRun { name } => {
                write!(f, "{name} needs a linked frame to run")
            }
            Self::FrameNotFound { what } => write!(f, "frame not found: {what}"),
            Self::ItemNotFound { id } => write!(f, "item not found: {id}"),
            Self::MalformedLiteral { detail } => write!(f, "{detail}"),
            Self::UnmatchedLoopControl { status } => {
                write!(f, "{status} outside of a repeat or foreach")
            }
            Self::ElseWithoutIf => write!(f, "else without a preceding if"),
            Self::RecursionLimit { depth } => {
                write!(f, "frame nesting exceeded {depth} levels")
            }
            Self::UnitTestFailed { expected, actual } => {
                write!(f, "assertion failed: expected {expected}, actual {actual}")
            }
            Self::UnknownStatement { name } => write!(f, "unknown statement: {name}"),
            Self::StreamError { detail } => write!(f, "stream error: {detail}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (length {len})")
            }
            Self::Interrupted => write!(f, "run stopped by request"),
        }
    }
}

/// A runtime failure, attributed to a frame/statement when the node walker
/// catches it.
#[derive(Clone, Debug)]
pub struct RunError {
    /// Structured category.
    pub kind: RunErrorKind,
    /// Human-readable message; equals `kind.to_string()` at construction.
    pub message: String,
    /// Frame the failing statement belongs to, when known.
    pub frame: Option<FrameId>,
    /// Raw text of the failing statement, when known.
    pub statement: Option<String>,
}

impl RunError {
    fn from_kind(kind: RunErrorKind) -> RunError {
        let message = kind.to_string();
        RunError {
            kind,
            message,
            frame: None,
            statement: None,
        }
    }

    /// Attribute this error to a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: FrameId) -> RunError {
        self.frame = Some(frame);
        self
    }

    /// Attribute this error to a statement's source text.
    #[must_use]
    pub fn with_statement(mut self, text: impl Into<String>) -> RunError {
        self.statement = Some(text.into());
        self
    }

    /// Whether this error is the cooperative-cancellation signal.
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        matches!(self.kind, RunErrorKind::Interrupted)
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(stmt) = &self.statement {
            write!(f, " (in `{stmt}`)")?;
        }
        Ok(())
    }
}

impl std::error::Error for RunError {}

// Arity

/// Fewer parameters than the statement's minimum.
#[cold]
pub fn too_few_args(min: usize, got: usize) -> RunError {
    RunError::from_kind(RunErrorKind::TooFewArgs { min, got })
}

/// More parameters than the statement's maximum.
#[cold]
pub fn too_many_args(max: usize, got: usize) -> RunError {
    RunError::from_kind(RunErrorKind::TooManyArgs { max, got })
}

/// Parameter count is not the exact arity.
#[cold]
pub fn wrong_arg_count(expected: usize, got: usize) -> RunError {
    RunError::from_kind(RunErrorKind::WrongArgCount { expected, got })
}

// Types and variables

/// An operation's required tag does not match the variable's actual tag.
#[cold]
pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> RunError {
    RunError::from_kind(RunErrorKind::TypeMismatch {
        expected: expected.into(),
        got: got.into(),
    })
}

/// Read of a never-set variable.
#[cold]
pub fn undefined_variable(name: &str) -> RunError {
    RunError::from_kind(RunErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

/// A token that should be a `$<tag>.<ident>` variable name is not one.
#[cold]
pub fn malformed_variable(name: &str) -> RunError {
    RunError::from_kind(RunErrorKind::MalformedVariable {
        name: name.to_string(),
    })
}

// Graph structure

/// A `call` statement lacks the required link.
#[cold]
pub fn unlinked_call() -> RunError {
    RunError::from_kind(RunErrorKind::UnlinkedCall)
}

/// A statement that runs a linked body lacks the link.
#[cold]
pub fn unlinked_run(name: &str) -> RunError {
    RunError::from_kind(RunErrorKind::UnlinkedRun {
        name: name.to_string(),
    })
}

/// The host graph has no frame for a handle or title.
#[cold]
pub fn frame_not_found(what: impl Into<String>) -> RunError {
    RunError::from_kind(RunErrorKind::FrameNotFound { what: what.into() })
}

/// The host graph has no item for a handle.
#[cold]
pub fn item_not_found(id: u32) -> RunError {
    RunError::from_kind(RunErrorKind::ItemNotFound { id })
}

// Tokenization

/// Unterminated quoted string during tokenization.
#[cold]
pub fn malformed_literal(detail: &str) -> RunError {
    RunError::from_kind(RunErrorKind::MalformedLiteral {
        detail: detail.to_string(),
    })
}

// Control flow

/// `Break` or `Continue` observed escaping a procedure boundary.
#[cold]
pub fn unmatched_loop_control(status: Status) -> RunError {
    RunError::from_kind(RunErrorKind::UnmatchedLoopControl { status })
}

/// `else` not immediately preceded by a consumed if-signal.
#[cold]
pub fn else_without_if() -> RunError {
    RunError::from_kind(RunErrorKind::ElseWithoutIf)
}

/// Frame nesting (goto/call recursion) exceeded the configured limit.
#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> RunError {
    RunError::from_kind(RunErrorKind::RecursionLimit { depth })
}

// Assertions

/// An `assert*` statement's condition did not hold.
#[cold]
pub fn unit_test_failed(expected: impl Into<String>, actual: impl Into<String>) -> RunError {
    RunError::from_kind(RunErrorKind::UnitTestFailed {
        expected: expected.into(),
        actual: actual.into(),
    })
}

// Dispatch

/// No statement family matched and the host action fallback declined.
#[cold]
pub fn unknown_statement(name: &str) -> RunError {
    RunError::from_kind(RunErrorKind::UnknownStatement {
        name: name.to_string(),
    })
}

// Host I/O

/// A file statement failed at the OS level, or used a closed stream.
#[cold]
pub fn stream_error(detail: impl Into<String>) -> RunError {
    RunError::from_kind(RunErrorKind::StreamError {
        detail: detail.into(),
    })
}

/// A string index fell outside the subject's length.
#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> RunError {
    RunError::from_kind(RunErrorKind::IndexOutOfRange { index, len })
}

// Cancellation

/// The process-wide stop flag was observed at a checkpoint.
#[cold]
pub fn interrupted() -> RunError {
    RunError::from_kind(RunErrorKind::Interrupted)
}
