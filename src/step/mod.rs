//! Processing steps over the sheet and their parallel runner.
//!
//! A step is a sequential prolog over the whole sheet, a per-system body
//! fanned out across a worker pool, and a sequential epilog once every
//! system task has finished. A failing system body never aborts its
//! siblings; only an outright cancellation aborts the step.

pub mod runner;

pub use runner::{CancelToken, StepReport, StepRunner, SystemFailure};

use crate::core::OmrResult;
use crate::sheet::{Sheet, SystemInfo};

/// A processing step working system per system.
///
/// Implementations provide the per-system body; the prolog and epilog
/// hooks default to no-ops. The body owns its system exclusively for the
/// duration of the step and must not reach into sibling systems.
pub trait SystemStep: Sync {
    /// The declared name of this step, used in reports and logs.
    fn name(&self) -> &str;

    /// Sequential whole-sheet setup, run before any system task starts.
    fn prolog(&self, _sheet: &mut Sheet) -> OmrResult<()> {
        Ok(())
    }

    /// The system-scoped processing body.
    ///
    /// An error here is recovered by the runner: it is logged, recorded in
    /// the step report, and the system simply carries no result.
    fn do_system(&self, system: &mut SystemInfo) -> OmrResult<()>;

    /// Sequential whole-sheet aggregation, run after every system task has
    /// finished, regardless of how many of them failed.
    fn epilog(&self, _sheet: &mut Sheet) -> OmrResult<()> {
        Ok(())
    }
}
