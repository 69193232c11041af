//! The improvement loop.

use routeforge_core::Result;

use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::Termination;

use super::moves::{self, Move};
use super::Metaheuristic;

/// Steepest-descent local search driven by a [`Metaheuristic`].
///
/// Each step scans the full neighborhood, evaluates candidates against
/// the metaheuristic's working cost, and applies the feasible move with
/// the largest improvement. At a local optimum the metaheuristic decides
/// whether the search resumes (guided local search perturbs the cost
/// function) or the phase ends (greedy descent).
///
/// Termination is checked once per step so a fired time budget stops the
/// loop between moves, never mid-evaluation.
#[derive(Debug)]
pub struct LocalSearchPhase<M: Metaheuristic> {
    metaheuristic: M,
    step_limit: Option<u64>,
    moves: Vec<Move>,
}

impl<M: Metaheuristic> LocalSearchPhase<M> {
    /// Creates a local search phase around the given metaheuristic.
    pub fn new(metaheuristic: M) -> Self {
        Self {
            metaheuristic,
            step_limit: None,
            moves: Vec::new(),
        }
    }

    /// Caps the number of applied moves, counted across the whole solve.
    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }

    fn step_budget_spent(&self, scope: &SolverScope<'_>) -> bool {
        self.step_limit
            .is_some_and(|limit| scope.total_step_count() >= limit)
    }
}

impl<M: Metaheuristic> Phase for LocalSearchPhase<M> {
    fn solve(&mut self, scope: &mut SolverScope<'_>, termination: &dyn Termination) -> Result<()> {
        let problem = scope.problem();
        let depot = problem.depot();
        self.metaheuristic.phase_started(problem);
        let mut buffer = std::mem::take(&mut self.moves);

        loop {
            if scope.should_terminate(termination) || self.step_budget_spent(scope) {
                break;
            }

            moves::generate(scope.working(), &mut buffer);
            let best = {
                let meta = &self.metaheuristic;
                let arc = |from: usize, to: usize| meta.arc_cost(problem, from, to);
                let mut best: Option<(i64, Move)> = None;
                for &candidate in &buffer {
                    let delta = candidate.delta(scope.working(), depot, &arc);
                    if delta >= 0 {
                        continue;
                    }
                    if best.map_or(true, |(b, _)| delta < b)
                        && candidate.is_feasible(problem, scope.working())
                    {
                        best = Some((delta, candidate));
                    }
                }
                best
            };

            match best {
                Some((delta, mv)) => {
                    mv.apply(problem, scope.working_mut());
                    let step = scope.increment_step_count();
                    if scope.update_best_solution() {
                        tracing::debug!(
                            step,
                            delta,
                            cost = scope.best_cost().unwrap_or_default(),
                            "improved best solution"
                        );
                    }
                }
                None => {
                    tracing::trace!(
                        step = scope.total_step_count(),
                        cost = scope.working_cost(),
                        "local optimum reached"
                    );
                    if !self.metaheuristic.on_local_optimum(problem, scope.working()) {
                        break;
                    }
                }
            }
        }

        self.moves = buffer;
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "LocalSearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localsearch::{GreedyDescent, GuidedLocalSearch};
    use crate::termination::{NoTermination, StepCountTermination};
    use routeforge_core::{Dimension, Problem, Solution};

    fn problem() -> Problem {
        // 1 and 2 are close to each other, as are 3 and 4.
        let costs = vec![
            vec![0, 2, 3, 2, 3],
            vec![2, 0, 1, 6, 7],
            vec![3, 1, 0, 7, 8],
            vec![2, 6, 7, 0, 1],
            vec![3, 7, 8, 1, 0],
        ];
        Problem::new(costs, 2, 0)
            .unwrap()
            .with_dimension(Dimension::new("weight", vec![0, 1, 1, 1, 1], vec![2, 2]))
            .unwrap()
    }

    fn scope_with<'a>(problem: &'a Problem, routes: &[&[usize]]) -> SolverScope<'a> {
        let mut scope = SolverScope::new(problem);
        for (vehicle, nodes) in routes.iter().enumerate() {
            for (pos, &node) in nodes.iter().enumerate() {
                scope.working_mut().insert(problem, vehicle, pos, node);
            }
        }
        scope
    }

    #[test]
    fn test_descent_untangles_a_bad_assignment() {
        let problem = problem();
        // Pairing distant customers costs 2+6+3 + 3+7+2 = 23.
        let mut scope = scope_with(&problem, &[&[1, 3], &[4, 2]]);
        let start = scope.working_cost();

        let mut phase = LocalSearchPhase::new(GreedyDescent);
        assert_eq!(phase.phase_type_name(), "LocalSearch");
        phase.solve(&mut scope, &NoTermination).unwrap();

        let best = scope.best_cost().unwrap();
        assert!(best < start);
        // Optimal pairing: [1, 2] and [3, 4], cost 6 + 6.
        assert_eq!(best, 12);
    }

    #[test]
    fn test_descent_stops_at_local_optimum() {
        let problem = problem();
        let mut scope = scope_with(&problem, &[&[1, 2], &[3, 4]]);
        let mut phase = LocalSearchPhase::new(GreedyDescent);
        phase.solve(&mut scope, &NoTermination).unwrap();
        let steps = scope.total_step_count();

        // Already optimal: the loop must exit without applying anything.
        assert_eq!(steps, 0);
        assert_eq!(scope.working().route(0), &[1, 2]);
    }

    #[test]
    fn test_never_applies_an_infeasible_move() {
        let problem = problem();
        let mut scope = scope_with(&problem, &[&[1, 3], &[4, 2]]);
        let mut phase = LocalSearchPhase::new(GreedyDescent);
        phase.solve(&mut scope, &NoTermination).unwrap();

        let tracker = routeforge_core::CapacityTracker::new(&problem);
        for vehicle in 0..2 {
            assert!(tracker.route_feasible(scope.working().route(vehicle), vehicle));
        }
    }

    #[test]
    fn test_zero_step_budget_leaves_solution_untouched() {
        let problem = problem();
        let mut scope = scope_with(&problem, &[&[1, 3], &[4, 2]]);
        let before = scope.working().clone();

        let mut phase = LocalSearchPhase::new(GreedyDescent).with_step_limit(Some(0));
        phase.solve(&mut scope, &NoTermination).unwrap();
        assert_eq!(scope.working(), &before);
    }

    #[test]
    fn test_step_count_termination_stops_the_loop() {
        let problem = problem();
        let mut scope = scope_with(&problem, &[&[1, 3], &[4, 2]]);
        let mut phase = LocalSearchPhase::new(GuidedLocalSearch::new(0.1));
        phase.solve(&mut scope, &StepCountTermination::new(5)).unwrap();
        assert!(scope.total_step_count() <= 5);
    }

    #[test]
    fn test_guided_search_keeps_best_by_true_cost() {
        let problem = problem();
        let mut scope = scope_with(&problem, &[&[1, 3], &[4, 2]]);
        let mut phase =
            LocalSearchPhase::new(GuidedLocalSearch::new(0.1)).with_step_limit(Some(50));
        phase.solve(&mut scope, &NoTermination).unwrap();

        // Penalties may leave the working solution worse than the best.
        let best = scope.best_cost().unwrap();
        assert_eq!(best, 12);
        let solution: &Solution = scope.best_solution().unwrap();
        assert_eq!(best, solution.total_cost(&problem));
    }
}
