//! Fan-out/fan-in execution of a step across the sheet systems.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::{OmrError, OmrResult};
use crate::sheet::{Sheet, SystemInfo};

use super::SystemStep;

/// Shared cancellation flag for a step run.
///
/// Cancelling is cooperative: tasks already running finish, tasks not yet
/// started are abandoned, and the runner reports the cancellation once the
/// fan-in barrier is passed. Nothing is rolled back.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the associated step run.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A recovered per-system failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemFailure {
    /// Id of the failing system.
    pub system: usize,
    /// Rendered error message of the body failure.
    pub message: String,
}

/// Outcome summary of one step run.
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Name of the step that ran.
    pub step: String,
    /// Number of systems whose body completed.
    pub processed: usize,
    /// Number of systems abandoned because of cancellation.
    pub abandoned: usize,
    /// Failures recovered at the task boundary.
    pub failures: Vec<SystemFailure>,
}

enum TaskOutcome {
    Done,
    Failed(SystemFailure),
    Abandoned,
}

/// Runs steps over a sheet: sequential prolog, parallel per-system body,
/// barrier, sequential epilog.
#[derive(Debug, Clone)]
pub struct StepRunner {
    cancel: CancelToken,
    /// Body fan-out stays sequential up to this many target systems.
    sequential_threshold: usize,
}

impl Default for StepRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl StepRunner {
    /// Creates a runner with the default parallelism threshold.
    pub fn new() -> Self {
        Self {
            cancel: CancelToken::new(),
            sequential_threshold: 1,
        }
    }

    /// Sets the number of target systems below which the body runs
    /// sequentially (single-system sheets are not worth a fan-out).
    pub fn with_sequential_threshold(mut self, threshold: usize) -> Self {
        self.sequential_threshold = threshold;
        self
    }

    /// A token that cancels runs driven by this runner.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs one step over the sheet.
    ///
    /// `targets` selects the systems to process; `None` or an empty slice
    /// means every system of the sheet. The call returns once the epilog
    /// completed, or with [`OmrError::Cancelled`] when the run was
    /// cancelled; in that case the epilog does not run and completed
    /// system work is kept as is. Per-system body failures do not fail the
    /// run: they are logged, recorded in the report and the affected
    /// systems simply carry no result.
    pub fn run(
        &self,
        step: &dyn SystemStep,
        targets: Option<&[usize]>,
        sheet: &mut Sheet,
    ) -> OmrResult<StepReport> {
        step.prolog(sheet)?;

        let selection: Option<HashSet<usize>> = match targets {
            Some(ids) if !ids.is_empty() => Some(ids.iter().copied().collect()),
            _ => None,
        };
        let selected: Vec<&mut SystemInfo> = sheet
            .systems_mut()
            .iter_mut()
            .filter(|system| {
                selection
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&system.id()))
            })
            .collect();

        debug!(step = step.name(), systems = selected.len(), "launching system tasks");

        // Fan out one task per system and wait for all of them; the
        // collect is the fan-in barrier.
        let outcomes: Vec<TaskOutcome> = if selected.len() > self.sequential_threshold {
            selected
                .into_par_iter()
                .map(|system| self.run_body(step, system))
                .collect()
        } else {
            selected
                .into_iter()
                .map(|system| self.run_body(step, system))
                .collect()
        };

        if self.cancel.is_cancelled() {
            warn!(step = step.name(), "step run cancelled");
            return Err(OmrError::Cancelled);
        }

        let mut report = StepReport {
            step: step.name().to_string(),
            processed: 0,
            abandoned: 0,
            failures: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Done => report.processed += 1,
                TaskOutcome::Failed(failure) => report.failures.push(failure),
                TaskOutcome::Abandoned => report.abandoned += 1,
            }
        }

        step.epilog(sheet)?;

        info!(
            step = %report.step,
            processed = report.processed,
            failed = report.failures.len(),
            "step completed"
        );
        Ok(report)
    }

    /// One system task: runs the body and recovers any failure at this
    /// boundary so siblings are never affected.
    fn run_body(&self, step: &dyn SystemStep, system: &mut SystemInfo) -> TaskOutcome {
        if self.cancel.is_cancelled() {
            return TaskOutcome::Abandoned;
        }

        debug!(step = step.name(), system = system.id(), "running system body");
        match step.do_system(system) {
            Ok(()) => TaskOutcome::Done,
            Err(error) => {
                warn!(
                    step = step.name(),
                    system = system.id(),
                    error = %error,
                    "system body failed, result omitted"
                );
                TaskOutcome::Failed(SystemFailure {
                    system: system.id(),
                    message: error.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use crate::geometry::Rectangle;
    use crate::glyph::Glyph;
    use crate::sheet::Scale;

    /// Adds one marker glyph per processed system; fails on demand.
    struct MarkingStep {
        failing_system: Option<usize>,
        prologs: AtomicUsize,
        epilogs: AtomicUsize,
    }

    impl MarkingStep {
        fn new(failing_system: Option<usize>) -> Self {
            Self {
                failing_system,
                prologs: AtomicUsize::new(0),
                epilogs: AtomicUsize::new(0),
            }
        }
    }

    impl SystemStep for MarkingStep {
        fn name(&self) -> &str {
            "marking"
        }

        fn prolog(&self, _sheet: &mut Sheet) -> OmrResult<()> {
            self.prologs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn do_system(&self, system: &mut SystemInfo) -> OmrResult<()> {
            if self.failing_system == Some(system.id()) {
                return Err(OmrError::processing("synthetic body failure"));
            }
            system.add_glyph(Glyph::new(Rectangle::new(0, 0, 4, 4), 16, 16));
            Ok(())
        }

        fn epilog(&self, _sheet: &mut Sheet) -> OmrResult<()> {
            self.epilogs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn sheet_with_systems(count: usize) -> Sheet {
        let mut sheet = Sheet::new(Scale::new(16));
        for _ in 0..count {
            sheet.add_system();
        }
        sheet
    }

    #[test]
    fn test_failure_is_isolated_to_its_system() {
        let mut sheet = sheet_with_systems(3);
        let step = MarkingStep::new(Some(2));
        let runner = StepRunner::new();

        let report = runner.run(&step, None, &mut sheet).unwrap();

        // The epilog ran despite the failure.
        assert_eq!(step.epilogs.load(Ordering::SeqCst), 1);
        assert_eq!(report.processed, 2);
        assert_eq!(
            report.failures,
            vec![SystemFailure {
                system: 2,
                message: "processing failed: synthetic body failure".to_string(),
            }]
        );

        // Siblings carry their result, the failing system none.
        assert_eq!(sheet.system(1).unwrap().glyph_count(), 1);
        assert_eq!(sheet.system(2).unwrap().glyph_count(), 0);
        assert_eq!(sheet.system(3).unwrap().glyph_count(), 1);
    }

    #[test]
    fn test_all_systems_processed_by_default() {
        let mut sheet = sheet_with_systems(4);
        let step = MarkingStep::new(None);
        let report = StepRunner::new().run(&step, None, &mut sheet).unwrap();
        assert_eq!(report.processed, 4);
        assert!(report.failures.is_empty());
        assert_eq!(step.prologs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_target_subset_limits_the_fan_out() {
        let mut sheet = sheet_with_systems(3);
        let step = MarkingStep::new(None);
        let report = StepRunner::new()
            .run(&step, Some(&[1, 3]), &mut sheet)
            .unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(sheet.system(1).unwrap().glyph_count(), 1);
        assert_eq!(sheet.system(2).unwrap().glyph_count(), 0);
        assert_eq!(sheet.system(3).unwrap().glyph_count(), 1);
    }

    #[test]
    fn test_empty_target_list_means_all_systems() {
        let mut sheet = sheet_with_systems(2);
        let step = MarkingStep::new(None);
        let report = StepRunner::new().run(&step, Some(&[]), &mut sheet).unwrap();
        assert_eq!(report.processed, 2);
    }

    #[test]
    fn test_cancellation_aborts_before_the_epilog() {
        let mut sheet = sheet_with_systems(3);
        let step = MarkingStep::new(None);
        let runner = StepRunner::new();
        runner.cancel_token().cancel();

        let result = runner.run(&step, None, &mut sheet);
        assert!(matches!(result, Err(OmrError::Cancelled)));
        // Tasks were abandoned and the epilog never ran.
        assert_eq!(step.epilogs.load(Ordering::SeqCst), 0);
        for system in sheet.systems() {
            assert_eq!(system.glyph_count(), 0);
        }
    }
}
