//! Run control: cooperative cancellation and step pacing.
//!
//! Stop/interrupt signaling goes through an explicit [`RunControl`]
//! handle owned by the host, plus an advisory process-wide slot tracking
//! which run is current. Cancellation is cooperative: the walker checks
//! the flag at each statement boundary, so a statement stuck inside one
//! long external call cannot be interrupted mid-statement.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use weft_ir::{interrupted, RunResult};

/// Pacing of statement execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepMode {
    /// Execute statements as fast as they come.
    Run,
    /// Block before each statement until [`RunControl::advance`] is
    /// signalled or the optional time budget elapses.
    Step { budget: Option<Duration> },
}

struct StepState {
    mode: StepMode,
    /// Advance signals not yet consumed by a checkpoint.
    pending: u32,
}

/// Shared control handle for one run.
///
/// The host keeps a clone to call [`request_stop`](Self::request_stop) or
/// [`advance`](Self::advance) from another thread while the run executes
/// on its worker.
pub struct RunControl {
    stop: AtomicBool,
    state: Mutex<StepState>,
    gate: Condvar,
}

impl RunControl {
    pub fn new(mode: StepMode) -> RunControl {
        RunControl {
            stop: AtomicBool::new(false),
            state: Mutex::new(StepState { mode, pending: 0 }),
            gate: Condvar::new(),
        }
    }

    /// Ask the run to stop at its next checkpoint.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.gate.notify_all();
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Release one statement in step mode.
    pub fn advance(&self) {
        let mut state = self.state.lock();
        state.pending = state.pending.saturating_add(1);
        self.gate.notify_all();
    }

    /// Switch pacing; a waiting checkpoint re-evaluates immediately.
    pub fn set_mode(&self, mode: StepMode) {
        let mut state = self.state.lock();
        state.mode = mode;
        self.gate.notify_all();
    }

    /// Whether the run is currently in step mode.
    pub fn is_stepping(&self) -> bool {
        matches!(self.state.lock().mode, StepMode::Step { .. })
    }

    /// Statement-boundary suspension point.
    ///
    /// Returns `Err(Interrupted)` when the stop flag is set; in step mode
    /// blocks until an advance signal, a mode switch, or the time budget.
    pub fn checkpoint(&self) -> RunResult<()> {
        if self.stop_requested() {
            return Err(interrupted());
        }
        let mut state = self.state.lock();
        while let StepMode::Step { budget } = state.mode {
            if state.pending > 0 {
                state.pending -= 1;
                break;
            }
            if self.stop_requested() {
                break;
            }
            match budget {
                Some(limit) => {
                    if self.gate.wait_for(&mut state, limit).timed_out() {
                        break;
                    }
                }
                None => self.gate.wait(&mut state),
            }
        }
        drop(state);
        if self.stop_requested() {
            return Err(interrupted());
        }
        Ok(())
    }
}

impl Default for RunControl {
    fn default() -> RunControl {
        RunControl::new(StepMode::Run)
    }
}

/// Advisory process-wide slot for the control handle of the current run.
static CURRENT_RUN: Mutex<Option<Arc<RunControl>>> = Mutex::new(None);

/// Install (or clear) the current run, returning the previous occupant.
///
/// The runtime does not prevent a second concurrent run; keeping the slot
/// truthful in that case is the host's responsibility.
pub fn set_current_run(control: Option<Arc<RunControl>>) -> Option<Arc<RunControl>> {
    std::mem::replace(&mut *CURRENT_RUN.lock(), control)
}

/// The control handle of the current run, if one is installed.
pub fn current_run() -> Option<Arc<RunControl>> {
    CURRENT_RUN.lock().clone()
}
