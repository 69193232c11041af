//! Phase trait shared by construction and local search.

use routeforge_core::Result;

use crate::scope::SolverScope;
use crate::termination::Termination;

/// One stage of the solving pipeline.
///
/// Phases mutate the working solution through the scope and record best
/// solutions there. Construction phases may fail (no feasible insertion
/// exists); improvement phases only stop.
pub trait Phase {
    /// Runs the phase until it finishes or the termination condition fires.
    fn solve(&mut self, scope: &mut SolverScope<'_>, termination: &dyn Termination) -> Result<()>;

    /// Returns a short name for logging.
    fn phase_type_name(&self) -> &'static str;
}
