//! Local search: neighborhood moves and metaheuristics.

mod gls;
mod moves;
mod phase;

use std::fmt::Debug;

use routeforge_core::{Problem, Solution};

pub use gls::GuidedLocalSearch;
pub use moves::Move;
pub use phase::LocalSearchPhase;

/// Strategy hooks driving the improvement loop.
///
/// The metaheuristic owns the working cost function used to select moves
/// (the true objective is always tracked separately in the scope) and
/// decides what happens at a local optimum.
pub trait Metaheuristic: Send + Debug {
    /// Resets per-solve state. Called once when the phase starts.
    fn phase_started(&mut self, problem: &Problem);

    /// Returns the working cost of the arc `from -> to`.
    fn arc_cost(&self, problem: &Problem, from: usize, to: usize) -> i64;

    /// Called when no improving feasible move exists. Returns true if the
    /// search should continue (e.g. after perturbing the cost function),
    /// false to stop the phase.
    fn on_local_optimum(&mut self, problem: &Problem, solution: &Solution) -> bool;
}

/// Pure descent: the working cost is the true cost and the phase stops at
/// the first local optimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyDescent;

impl Metaheuristic for GreedyDescent {
    fn phase_started(&mut self, _problem: &Problem) {}

    fn arc_cost(&self, problem: &Problem, from: usize, to: usize) -> i64 {
        problem.cost(from, to)
    }

    fn on_local_optimum(&mut self, _problem: &Problem, _solution: &Solution) -> bool {
        false
    }
}
