//! Top-level solver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use routeforge_config::{FirstSolutionStrategy, Metaheuristic as MetaheuristicKind, SolverConfig};
use routeforge_core::{Problem, Result, Solution, SolverError};

use crate::construction::{CheapestInsertion, PathCheapestArc};
use crate::localsearch::{GreedyDescent, GuidedLocalSearch, LocalSearchPhase};
use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::{NoTermination, Termination, TimeTermination};

/// Runs the solving pipeline described by a [`SolverConfig`]: a
/// construction phase that routes every node, then an improvement phase
/// driven by the configured metaheuristic, under the configured budget.
///
/// The solver is reusable across problems and can be cancelled from
/// another thread through [`terminate_early`](Solver::terminate_early).
/// Guided local search never stops on its own, so when it is selected
/// without any time or step limit the solver applies a default time
/// budget of [`DEFAULT_TIME_LIMIT`].
///
/// # Example
///
/// ```no_run
/// use routeforge_config::SolverConfig;
/// use routeforge_core::{Dimension, Problem};
/// use routeforge_solver::Solver;
///
/// # fn run() -> routeforge_core::Result<()> {
/// let problem = Problem::new(vec![vec![0, 5, 5], vec![5, 0, 3], vec![5, 3, 0]], 1, 0)?
///     .with_dimension(Dimension::new("weight", vec![0, 1, 1], vec![4]))?;
/// let solver = Solver::new(SolverConfig::default().with_termination_millis(200));
/// let solution = solver.solve(&problem)?;
/// println!("cost: {}", solution.total_cost(&problem));
/// # Ok(())
/// # }
/// ```
/// Budget applied when guided local search is selected without any time
/// or step limit.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    solving: Arc<AtomicBool>,
    terminate_early: Arc<AtomicBool>,
}

impl Solver {
    /// Creates a solver for the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            solving: Arc::new(AtomicBool::new(false)),
            terminate_early: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the configuration this solver runs with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Returns true while a [`solve`](Solver::solve) call is in progress.
    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// Requests cooperative cancellation of an in-flight solve. The solve
    /// returns the best solution found so far. Returns false if no solve
    /// was in progress.
    pub fn terminate_early(&self) -> bool {
        if !self.is_solving() {
            return false;
        }
        self.terminate_early.store(true, Ordering::SeqCst);
        true
    }

    /// Solves the problem and returns the best solution found.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Infeasible`] if total demand exceeds the
    /// fleet capacity in some dimension, and
    /// [`SolverError::NoFeasibleConstruction`] if the first-solution
    /// strategy cannot route every node.
    pub fn solve(&self, problem: &Problem) -> Result<Solution> {
        self.terminate_early.store(false, Ordering::SeqCst);
        self.solving.store(true, Ordering::SeqCst);
        let result = self.solve_inner(problem);
        self.solving.store(false, Ordering::SeqCst);
        result
    }

    fn solve_inner(&self, problem: &Problem) -> Result<Solution> {
        for dimension in problem.dimensions() {
            if dimension.total_demand() > dimension.total_capacity() {
                tracing::debug!(
                    dimension = dimension.name(),
                    demand = dimension.total_demand(),
                    capacity = dimension.total_capacity(),
                    "total demand exceeds fleet capacity"
                );
                return Err(SolverError::Infeasible);
            }
        }

        let mut scope = SolverScope::new(problem);
        scope.set_terminate_early_flag(self.terminate_early.clone());
        scope.start_solving();

        let step_limit = self.config.step_count_limit();
        // Guided local search only stops when a budget fires.
        let time_limit = self.config.time_limit().or_else(|| {
            if self.config.metaheuristic == MetaheuristicKind::GuidedLocalSearch
                && step_limit.is_none()
            {
                Some(DEFAULT_TIME_LIMIT)
            } else {
                None
            }
        });
        let time_termination = time_limit.map(TimeTermination::new);
        let termination: &dyn Termination = match &time_termination {
            Some(t) => t,
            None => &NoTermination,
        };

        let mut construction: Box<dyn Phase> = match self.config.first_solution_strategy {
            FirstSolutionStrategy::CheapestInsertion => Box::new(CheapestInsertion),
            FirstSolutionStrategy::PathCheapestArc => Box::new(PathCheapestArc),
        };
        construction.solve(&mut scope, termination)?;
        tracing::debug!(
            phase = construction.phase_type_name(),
            cost = scope.best_cost().unwrap_or_default(),
            "construction finished"
        );

        let lambda = self.config.guided_local_search.lambda;
        let mut improvement: Box<dyn Phase> = match self.config.metaheuristic {
            MetaheuristicKind::None => {
                Box::new(LocalSearchPhase::new(GreedyDescent).with_step_limit(step_limit))
            }
            MetaheuristicKind::GuidedLocalSearch => Box::new(
                LocalSearchPhase::new(GuidedLocalSearch::new(lambda)).with_step_limit(step_limit),
            ),
        };
        improvement.solve(&mut scope, termination)?;
        tracing::debug!(
            phase = improvement.phase_type_name(),
            steps = scope.total_step_count(),
            elapsed_millis = scope.elapsed().map(|e| e.as_millis() as u64),
            cost = scope.best_cost().unwrap_or_default(),
            "solving finished"
        );

        scope.take_best_solution().ok_or(SolverError::Infeasible)
    }
}
