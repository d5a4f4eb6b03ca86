//! The runtime object and its worker-thread entry.
//!
//! A `Runtime` bundles the injected host collaborators with the run
//! control handle; the builder is the configuration surface. One call to
//! [`Runtime::run`] is one interpreter run; [`spawn`] puts that run on a
//! dedicated worker thread so long-running or input-blocking programs
//! never execute on the host's UI thread.

use std::sync::Arc;
use std::thread::JoinHandle;

use weft_ir::{frame_not_found, FrameId, RunResult, Status};

use crate::context::Context;
use crate::control::{RunControl, StepMode};
use crate::host::{Actions, Graph, NoActions, SilentStage, Stage};
use crate::walker;

/// An interpreter instance bound to one host.
pub struct Runtime {
    graph: Arc<dyn Graph>,
    actions: Arc<dyn Actions>,
    stage: Arc<dyn Stage>,
    control: Arc<RunControl>,
    recursion_limit: usize,
}

impl Runtime {
    /// Start configuring a runtime over a host graph.
    pub fn builder(graph: Arc<dyn Graph>) -> RuntimeBuilder {
        RuntimeBuilder {
            graph,
            actions: Arc::new(NoActions),
            stage: Arc::new(SilentStage),
            mode: StepMode::Run,
            recursion_limit: 128,
        }
    }

    pub(crate) fn graph(&self) -> &dyn Graph {
        self.graph.as_ref()
    }

    pub(crate) fn actions(&self) -> &dyn Actions {
        self.actions.as_ref()
    }

    pub(crate) fn stage(&self) -> &dyn Stage {
        self.stage.as_ref()
    }

    pub(crate) fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// The control handle; the host clones this to stop or step the run
    /// from another thread.
    pub fn control(&self) -> Arc<RunControl> {
        self.control.clone()
    }

    /// Statement-boundary suspension point: highlight when stepping, then
    /// defer to the control handle.
    pub(crate) fn checkpoint(&self, frame: FrameId, statement: usize) -> RunResult<()> {
        if self.control.is_stepping() {
            self.stage.highlight(frame, statement);
        }
        self.control.checkpoint()
    }

    /// Execute a frame in a fresh top-level context.
    pub fn run(&self, frame: FrameId) -> RunResult<Status> {
        let mut ctx = Context::new();
        self.run_in(frame, &mut ctx)
    }

    /// Execute a frame in a caller-provided context.
    ///
    /// Errors are surfaced to the host's message display before being
    /// returned; the host process is never taken down by a failed run.
    pub fn run_in(&self, frame: FrameId, ctx: &mut Context) -> RunResult<Status> {
        let root = self
            .graph
            .frame(frame)
            .ok_or_else(|| frame_not_found(format!("frame {}", frame.0)))?;
        let result = walker::run_frame(self, 0, &root, ctx);
        match &result {
            Ok(status) => {
                tracing::debug!(frame = frame.0, status = %status, "run finished");
            }
            Err(err) => {
                tracing::debug!(frame = frame.0, error = %err, "run failed");
                self.stage.message(&err.to_string());
            }
        }
        result
    }
}

/// Configuration builder for [`Runtime`].
pub struct RuntimeBuilder {
    graph: Arc<dyn Graph>,
    actions: Arc<dyn Actions>,
    stage: Arc<dyn Stage>,
    mode: StepMode,
    recursion_limit: usize,
}

impl RuntimeBuilder {
    /// Inject the reflective action dispatcher.
    #[must_use]
    pub fn actions(mut self, actions: Arc<dyn Actions>) -> RuntimeBuilder {
        self.actions = actions;
        self
    }

    /// Inject the display/step collaborator.
    #[must_use]
    pub fn stage(mut self, stage: Arc<dyn Stage>) -> RuntimeBuilder {
        self.stage = stage;
        self
    }

    /// Initial pacing mode.
    #[must_use]
    pub fn step_mode(mut self, mode: StepMode) -> RuntimeBuilder {
        self.mode = mode;
        self
    }

    /// Maximum frame nesting before a run is aborted.
    #[must_use]
    pub fn recursion_limit(mut self, limit: usize) -> RuntimeBuilder {
        self.recursion_limit = limit;
        self
    }

    pub fn build(self) -> Runtime {
        Runtime {
            graph: self.graph,
            actions: self.actions,
            stage: self.stage,
            control: Arc::new(RunControl::new(self.mode)),
            recursion_limit: self.recursion_limit,
        }
    }
}

/// A run executing on its dedicated worker thread.
pub struct RunHandle {
    control: Arc<RunControl>,
    thread: JoinHandle<RunResult<Status>>,
}

impl RunHandle {
    /// Ask the run to stop at its next statement boundary.
    pub fn request_stop(&self) {
        self.control.request_stop();
    }

    /// The run's control handle.
    pub fn control(&self) -> Arc<RunControl> {
        self.control.clone()
    }

    /// Wait for the run to finish.
    pub fn join(self) -> RunResult<Status> {
        match self.thread.join() {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

/// Execute a frame on a dedicated worker thread.
///
/// The returned handle carries the control for stop/step signaling; the
/// host keeps it while the worker runs.
pub fn spawn(runtime: Runtime, frame: FrameId) -> RunHandle {
    let control = runtime.control();
    let thread = std::thread::spawn(move || runtime.run(frame));
    RunHandle { control, thread }
}
