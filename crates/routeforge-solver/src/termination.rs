//! Termination conditions for solver phases.

use std::fmt::Debug;
use std::time::Duration;

use crate::scope::SolverScope;

/// Trait for determining when to stop solving.
///
/// Checked between iterations only; a running move evaluation is never
/// interrupted, so the working solution is always left fully evaluated.
pub trait Termination: Send + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, scope: &SolverScope<'_>) -> bool;
}

/// Marker type indicating no termination condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl Termination for NoTermination {
    fn is_terminated(&self, _scope: &SolverScope<'_>) -> bool {
        false
    }
}

/// Terminates after a wall-clock time limit.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use routeforge_solver::TimeTermination;
///
/// let term = TimeTermination::new(Duration::from_secs(5));
/// let term = TimeTermination::seconds(5);
/// let term = TimeTermination::millis(500);
/// ```
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, scope: &SolverScope<'_>) -> bool {
        scope.elapsed().is_some_and(|e| e >= self.limit)
    }
}

/// Terminates after a total number of improvement steps.
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for StepCountTermination {
    fn is_terminated(&self, scope: &SolverScope<'_>) -> bool {
        scope.total_step_count() >= self.limit
    }
}
