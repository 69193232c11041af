//! Guided local search metaheuristic.

use routeforge_core::{Problem, Solution};

use super::Metaheuristic;

/// Dense arc-penalty store.
///
/// Penalties are kept in a contiguous row-major array indexed by
/// `(from, to)`, giving constant-time lookups on the move-evaluation hot
/// path. State belongs to one solve: the table is resized and zeroed when
/// the phase starts and discarded with the metaheuristic.
#[derive(Debug, Clone, Default)]
struct PenaltyTable {
    data: Vec<i64>,
    num_nodes: usize,
}

impl PenaltyTable {
    fn resize(&mut self, num_nodes: usize) {
        let size = num_nodes * num_nodes;
        if self.data.len() != size {
            self.data = vec![0; size];
        } else {
            self.data.fill(0);
        }
        self.num_nodes = num_nodes;
    }

    #[inline]
    fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.num_nodes + to]
    }

    fn add(&mut self, from: usize, to: usize, amount: i64) {
        self.data[from * self.num_nodes + to] += amount;
    }
}

/// Guided local search.
///
/// The working cost of an arc is its true cost plus the accumulated
/// penalty on that arc. At each local optimum the used arc with the
/// highest utility `cost / (1 + penalty)` is penalized by a fixed step
/// proportional to the mean used-arc cost (scaled by `lambda`), making
/// expensive-but-used arcs progressively less attractive without
/// forbidding them. The search then resumes instead of stopping.
///
/// Penalties bias move selection only; the best solution is always
/// tracked by its true cost in the solver scope.
#[derive(Debug, Clone)]
pub struct GuidedLocalSearch {
    lambda: f64,
    penalties: PenaltyTable,
}

impl GuidedLocalSearch {
    /// Creates a guided local search with the given penalty scaling factor.
    pub fn new(lambda: f64) -> Self {
        Self {
            lambda,
            penalties: PenaltyTable::default(),
        }
    }

    /// Returns the accumulated penalty on the arc `from -> to`.
    pub fn penalty(&self, from: usize, to: usize) -> i64 {
        self.penalties.get(from, to)
    }

    /// Picks the used arc with the highest `cost / (1 + penalty)` utility
    /// and raises its penalty by `max(1, lambda * mean used-arc cost)`.
    fn penalize(&mut self, problem: &Problem, solution: &Solution) {
        let depot = problem.depot();
        let mut arc_count = 0i64;
        let mut cost_sum = 0i64;
        let mut best_arc: Option<(usize, usize)> = None;
        let mut best_utility = f64::NEG_INFINITY;

        for vehicle in 0..solution.num_routes() {
            for (from, to) in solution.arcs(depot, vehicle) {
                let cost = problem.cost(from, to);
                arc_count += 1;
                cost_sum += cost;
                let utility = cost as f64 / (1.0 + self.penalties.get(from, to) as f64);
                if utility > best_utility {
                    best_utility = utility;
                    best_arc = Some((from, to));
                }
            }
        }

        let Some((from, to)) = best_arc else { return };
        let mean_cost = cost_sum as f64 / arc_count as f64;
        let step = (self.lambda * mean_cost).round() as i64;
        let step = step.max(1);
        self.penalties.add(from, to, step);
        tracing::debug!(from, to, step, "penalized arc at local optimum");
    }
}

impl Metaheuristic for GuidedLocalSearch {
    fn phase_started(&mut self, problem: &Problem) {
        self.penalties.resize(problem.num_nodes());
    }

    fn arc_cost(&self, problem: &Problem, from: usize, to: usize) -> i64 {
        problem.cost(from, to) + self.penalties.get(from, to)
    }

    fn on_local_optimum(&mut self, problem: &Problem, solution: &Solution) -> bool {
        self.penalize(problem, solution);
        true
    }
}
