//! Batch execution of test frames.
//!
//! A suite runs each frame as an independent run and keeps going after a
//! failure: failures are frame-scoped, never process-fatal. `assert*`
//! statements that did not hold count as *failed*; any other runtime
//! error counts as *errored*.

use weft_ir::{FrameId, RunError, RunErrorKind};

use crate::runtime::Runtime;

/// Aggregated outcome of a suite of runs.
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    /// Title and error of every non-passing frame, in run order.
    pub failures: Vec<(String, RunError)>,
}

impl SuiteReport {
    /// Total frames executed.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored
    }

    /// Whether every frame passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// Run each frame independently and tally the outcomes.
pub fn run_suite(runtime: &Runtime, frames: &[FrameId]) -> SuiteReport {
    let mut report = SuiteReport::default();
    for &id in frames {
        let title = runtime
            .graph()
            .frame(id)
            .map_or_else(|| format!("frame {}", id.0), |frame| frame.title.clone());
        match runtime.run(id) {
            Ok(_) => report.passed += 1,
            Err(err) => {
                if matches!(err.kind, RunErrorKind::UnitTestFailed { .. }) {
                    report.failed += 1;
                } else {
                    report.errored += 1;
                }
                report.failures.push((title, err));
            }
        }
    }
    tracing::debug!(
        passed = report.passed,
        failed = report.failed,
        errored = report.errored,
        "suite finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGraph;
    use crate::runtime::Runtime;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use weft_ir::Statement;

    #[test]
    fn suite_tallies_and_continues_after_failures() {
        let graph = Arc::new(MemoryGraph::new());
        let passes = graph.add_frame(
            "test arithmetic",
            vec![
                Statement::new("set $i.x 5"),
                Statement::new("set $i.y 5"),
                Statement::new("assertequals $i.x $i.y"),
            ],
        );
        let fails = graph.add_frame(
            "test inequality",
            vec![
                Statement::new("set $i.x 5"),
                Statement::new("assertequals $i.x 6"),
            ],
        );
        let errors = graph.add_frame("test broken", vec![Statement::new("add $i.never 1 $i.out")]);

        let rt = Runtime::builder(graph).build();
        let report = run_suite(&rt, &[passes, fails, errors]);

        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errored, 1);
        assert_eq!(report.total(), 3);
        assert!(!report.all_passed());
        assert_eq!(report.failures[0].0, "test inequality");
    }
}
