//! Construction heuristic phases.
//!
//! Both strategies are deterministic: candidates are scanned in
//! ascending (node, vehicle, position) order and only a strictly better
//! marginal cost displaces the incumbent, so ties resolve to the lowest
//! node index, then the lowest vehicle index, then the earliest position.
//!
//! Construction runs to completion without termination checks: a partial
//! assignment has no meaningful "best so far" to return.

use routeforge_core::{CapacityTracker, Result, SolverError};

use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::Termination;

/// Cheapest feasible insertion.
///
/// Starting from depot-only routes, repeatedly selects the (unrouted
/// node, vehicle, position) triple minimizing the marginal cost increase
/// `cost(prev, node) + cost(node, next) - cost(prev, next)` among
/// capacity-feasible insertions, until every node is routed.
#[derive(Debug, Default)]
pub struct CheapestInsertion;

impl Phase for CheapestInsertion {
    fn solve(&mut self, scope: &mut SolverScope<'_>, _termination: &dyn Termination) -> Result<()> {
        let problem = scope.problem();
        let tracker = CapacityTracker::new(problem);
        let depot = problem.depot();
        let mut unrouted: Vec<usize> = problem.customers().collect();

        while !unrouted.is_empty() {
            // (marginal cost, index into unrouted, vehicle, position)
            let mut best: Option<(i64, usize, usize, usize)> = None;
            for (ui, &node) in unrouted.iter().enumerate() {
                for vehicle in 0..problem.num_vehicles() {
                    if !tracker.fits(vehicle, scope.working().loads(vehicle), node) {
                        continue;
                    }
                    let route = scope.working().route(vehicle);
                    for position in 0..=route.len() {
                        let left = if position == 0 { depot } else { route[position - 1] };
                        let right = if position == route.len() { depot } else { route[position] };
                        let delta = problem.cost(left, node) + problem.cost(node, right)
                            - problem.cost(left, right);
                        if best.map_or(true, |(b, _, _, _)| delta < b) {
                            best = Some((delta, ui, vehicle, position));
                        }
                    }
                }
            }

            let Some((delta, ui, vehicle, position)) = best else {
                return Err(SolverError::NoFeasibleConstruction(format!(
                    "{} nodes have no capacity-feasible insertion",
                    unrouted.len()
                )));
            };
            let node = unrouted.remove(ui);
            scope.working_mut().insert(problem, vehicle, position, node);
            tracing::trace!(node, vehicle, position, delta, "inserted node");
        }

        scope.update_best_solution();
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "CheapestInsertion"
    }
}

/// Path cheapest arc.
///
/// Extends one vehicle path at a time with the cheapest feasible arc out
/// of the path's current end, opening the next vehicle when no feasible
/// extension remains.
#[derive(Debug, Default)]
pub struct PathCheapestArc;

impl Phase for PathCheapestArc {
    fn solve(&mut self, scope: &mut SolverScope<'_>, _termination: &dyn Termination) -> Result<()> {
        let problem = scope.problem();
        let tracker = CapacityTracker::new(problem);
        let depot = problem.depot();
        let mut unrouted: Vec<usize> = problem.customers().collect();

        for vehicle in 0..problem.num_vehicles() {
            loop {
                let last = scope.working().route(vehicle).last().copied().unwrap_or(depot);
                let mut best: Option<(i64, usize)> = None;
                for (ui, &node) in unrouted.iter().enumerate() {
                    if !tracker.fits(vehicle, scope.working().loads(vehicle), node) {
                        continue;
                    }
                    let cost = problem.cost(last, node);
                    if best.map_or(true, |(b, _)| cost < b) {
                        best = Some((cost, ui));
                    }
                }
                let Some((cost, ui)) = best else { break };
                let node = unrouted.remove(ui);
                let position = scope.working().route(vehicle).len();
                scope.working_mut().insert(problem, vehicle, position, node);
                tracing::trace!(node, vehicle, cost, "extended path");
            }
            if unrouted.is_empty() {
                break;
            }
        }

        if !unrouted.is_empty() {
            return Err(SolverError::NoFeasibleConstruction(format!(
                "{} nodes left unrouted after exhausting all vehicles",
                unrouted.len()
            )));
        }

        scope.update_best_solution();
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "PathCheapestArc"
    }
}
