//! Solution representation: one route per vehicle plus cached loads.

use crate::problem::Problem;

/// The ordered customer sequence of one vehicle.
///
/// The depot is implicit at both ends and is never stored; an empty route
/// means the vehicle stays at the depot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    nodes: Vec<usize>,
}

impl Route {
    /// Returns the customer sequence.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Returns the number of customers on the route.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the vehicle stays at the depot.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A set of routes, one per vehicle, with per-route per-dimension load
/// totals maintained incrementally on every mutation.
///
/// The solution is exclusively owned by whichever phase currently mutates
/// it. All mutating operations keep the cached loads consistent; cost is
/// derived from the problem's cost matrix on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    routes: Vec<Route>,
    /// Cached load totals, indexed `[vehicle][dimension]`.
    loads: Vec<Vec<i64>>,
}

impl Solution {
    /// Creates an all-depot solution: every vehicle has an empty route.
    pub fn empty(problem: &Problem) -> Self {
        Self {
            routes: vec![Route::default(); problem.num_vehicles()],
            loads: vec![vec![0; problem.dimensions().len()]; problem.num_vehicles()],
        }
    }

    /// Returns the number of routes (one per vehicle).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Returns the customer sequence of `vehicle`.
    pub fn route(&self, vehicle: usize) -> &[usize] {
        &self.routes[vehicle].nodes
    }

    /// Returns all routes.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the cached load totals of `vehicle`, one entry per dimension.
    pub fn loads(&self, vehicle: usize) -> &[i64] {
        &self.loads[vehicle]
    }

    /// Returns the cached load of `vehicle` in dimension `dimension`,
    /// i.e. the cumulative value at the end of the route.
    pub fn route_load(&self, vehicle: usize, dimension: usize) -> i64 {
        self.loads[vehicle][dimension]
    }

    /// Sum of the given dimension's load across all routes.
    pub fn total_load(&self, dimension: usize) -> i64 {
        self.loads.iter().map(|l| l[dimension]).sum()
    }

    /// Inserts `node` into the route of `vehicle` at `position`.
    pub fn insert(&mut self, problem: &Problem, vehicle: usize, position: usize, node: usize) {
        self.routes[vehicle].nodes.insert(position, node);
        for (di, dim) in problem.dimensions().iter().enumerate() {
            self.loads[vehicle][di] += dim.demand(node);
        }
    }

    /// Removes and returns the node at `position` in the route of `vehicle`.
    pub fn remove(&mut self, problem: &Problem, vehicle: usize, position: usize) -> usize {
        let node = self.routes[vehicle].nodes.remove(position);
        for (di, dim) in problem.dimensions().iter().enumerate() {
            self.loads[vehicle][di] -= dim.demand(node);
        }
        node
    }

    /// Exchanges the nodes at two positions, possibly across routes.
    pub fn swap_nodes(
        &mut self,
        problem: &Problem,
        first: (usize, usize),
        second: (usize, usize),
    ) {
        let (ra, pa) = first;
        let (rb, pb) = second;
        let a = self.routes[ra].nodes[pa];
        let b = self.routes[rb].nodes[pb];
        self.routes[ra].nodes[pa] = b;
        self.routes[rb].nodes[pb] = a;
        if ra != rb {
            for (di, dim) in problem.dimensions().iter().enumerate() {
                let shift = dim.demand(b) - dim.demand(a);
                self.loads[ra][di] += shift;
                self.loads[rb][di] -= shift;
            }
        }
    }

    /// Reverses the segment `start..=end` of the route of `vehicle`.
    /// Loads are unchanged by a reversal.
    pub fn reverse_segment(&mut self, vehicle: usize, start: usize, end: usize) {
        self.routes[vehicle].nodes[start..=end].reverse();
    }

    /// Returns the depot-to-depot arc sequence of the route of `vehicle`.
    /// An empty route yields no arcs.
    pub fn arcs(&self, depot: usize, vehicle: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let nodes = &self.routes[vehicle].nodes;
        let first = nodes.first().map(move |&n| (depot, n));
        let last = nodes.last().map(move |&n| (n, depot));
        first
            .into_iter()
            .chain(nodes.windows(2).map(|w| (w[0], w[1])))
            .chain(last)
    }

    /// Returns the cost of the route of `vehicle`, depot legs included.
    pub fn route_cost(&self, problem: &Problem, vehicle: usize) -> i64 {
        self.arcs(problem.depot(), vehicle)
            .map(|(i, j)| problem.cost(i, j))
            .sum()
    }

    /// Returns the total cost of all routes. This is the objective value.
    pub fn total_cost(&self, problem: &Problem) -> i64 {
        (0..self.routes.len())
            .map(|v| self.route_cost(problem, v))
            .sum()
    }

    /// Returns true if every customer node is visited exactly once.
    pub fn is_complete(&self, problem: &Problem) -> bool {
        let mut seen = vec![false; problem.num_nodes()];
        for route in &self.routes {
            for &node in &route.nodes {
                if node == problem.depot() || seen[node] {
                    return false;
                }
                seen[node] = true;
            }
        }
        problem.customers().all(|n| seen[n])
    }
}
