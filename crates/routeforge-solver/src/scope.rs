//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use routeforge_core::{Problem, Solution};

use crate::termination::Termination;

/// Top-level scope for one solving process.
///
/// Owns the working solution, the best complete solution observed so far
/// together with its true (unpenalized) cost, the solve start instant and
/// the cooperative cancellation flag. Phases receive `&mut SolverScope`
/// and mutate the working solution through it.
pub struct SolverScope<'a> {
    problem: &'a Problem,
    working: Solution,
    best_solution: Option<Solution>,
    best_cost: Option<i64>,
    start_time: Option<Instant>,
    total_step_count: u64,
    terminate_early_flag: Option<Arc<AtomicBool>>,
}

impl<'a> SolverScope<'a> {
    /// Creates a scope with an all-depot working solution.
    pub fn new(problem: &'a Problem) -> Self {
        Self {
            problem,
            working: Solution::empty(problem),
            best_solution: None,
            best_cost: None,
            start_time: None,
            total_step_count: 0,
            terminate_early_flag: None,
        }
    }

    /// Returns the problem being solved.
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    /// Marks the start of solving for elapsed-time accounting.
    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.total_step_count = 0;
    }

    /// Returns the time spent since [`start_solving`](Self::start_solving).
    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    /// Returns the working solution.
    pub fn working(&self) -> &Solution {
        &self.working
    }

    /// Returns the working solution mutably.
    pub fn working_mut(&mut self) -> &mut Solution {
        &mut self.working
    }

    /// Returns the true cost of the working solution.
    pub fn working_cost(&self) -> i64 {
        self.working.total_cost(self.problem)
    }

    /// Returns the best complete solution observed so far.
    pub fn best_solution(&self) -> Option<&Solution> {
        self.best_solution.as_ref()
    }

    /// Returns the true cost of the best solution observed so far.
    pub fn best_cost(&self) -> Option<i64> {
        self.best_cost
    }

    /// Records the working solution as the new best if it is complete and
    /// its true cost beats the incumbent. Returns true on improvement.
    pub fn update_best_solution(&mut self) -> bool {
        if !self.working.is_complete(self.problem) {
            return false;
        }
        let cost = self.working.total_cost(self.problem);
        let improved = match self.best_cost {
            None => true,
            Some(best) => cost < best,
        };
        if improved {
            self.best_solution = Some(self.working.clone());
            self.best_cost = Some(cost);
        }
        improved
    }

    /// Consumes the scope, returning the best solution if one was recorded.
    pub fn take_best_solution(self) -> Option<Solution> {
        self.best_solution
    }

    /// Increments and returns the total step count.
    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.total_step_count
    }

    /// Returns the total step count across all phases.
    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    /// Installs the cooperative cancellation flag.
    pub fn set_terminate_early_flag(&mut self, flag: Arc<AtomicBool>) {
        self.terminate_early_flag = Some(flag);
    }

    /// Returns true if external cancellation was requested.
    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Returns true if the phase loop should stop, either because the
    /// termination condition fired or cancellation was requested.
    pub fn should_terminate(&self, termination: &dyn Termination) -> bool {
        self.is_terminate_early() || termination.is_terminated(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::NoTermination;
    use routeforge_core::Dimension;

    fn problem() -> Problem {
        Problem::new(vec![vec![0, 3, 4], vec![3, 0, 5], vec![4, 5, 0]], 1, 0)
            .unwrap()
            .with_dimension(Dimension::new("weight", vec![0, 1, 1], vec![2]))
            .unwrap()
    }

    #[test]
    fn test_best_tracking_requires_complete_solution() {
        let problem = problem();
        let mut scope = SolverScope::new(&problem);
        assert!(!scope.update_best_solution());
        assert!(scope.best_solution().is_none());

        scope.working_mut().insert(&problem, 0, 0, 1);
        scope.working_mut().insert(&problem, 0, 1, 2);
        assert!(scope.update_best_solution());
        assert_eq!(scope.best_cost(), Some(3 + 5 + 4));
    }

    #[test]
    fn test_best_is_monotone() {
        let problem = problem();
        let mut scope = SolverScope::new(&problem);
        scope.working_mut().insert(&problem, 0, 0, 1);
        scope.working_mut().insert(&problem, 0, 1, 2);
        assert!(scope.update_best_solution());
        let first = scope.best_cost().unwrap();

        // Same cost again is not an improvement.
        assert!(!scope.update_best_solution());
        assert_eq!(scope.best_cost(), Some(first));
    }

    #[test]
    fn test_terminate_early_flag() {
        let problem = problem();
        let mut scope = SolverScope::new(&problem);
        assert!(!scope.should_terminate(&NoTermination));

        let flag = Arc::new(AtomicBool::new(false));
        scope.set_terminate_early_flag(flag.clone());
        assert!(!scope.should_terminate(&NoTermination));
        flag.store(true, Ordering::SeqCst);
        assert!(scope.should_terminate(&NoTermination));
    }
}
