//! Cumulative capacity tracking along routes.

use crate::problem::Problem;

/// Checks route feasibility against the per-vehicle capacity of every
/// dimension.
///
/// Cumulative demand starts at zero when the vehicle leaves the depot and
/// accumulates the demand of each visited node in order. A route is
/// infeasible for a vehicle as soon as any prefix exceeds capacity in any
/// dimension. Because demands are non-negative the prefix maximum is
/// always the route total, which is what the `fits_*` methods exploit:
/// move evaluation checks cached route totals in O(#dimensions) instead
/// of rescanning the route.
#[derive(Debug, Clone, Copy)]
pub struct CapacityTracker<'a> {
    problem: &'a Problem,
}

impl<'a> CapacityTracker<'a> {
    /// Creates a tracker over the given problem.
    pub fn new(problem: &'a Problem) -> Self {
        Self { problem }
    }

    /// Returns true if the route (customer sequence, depot implicit) is
    /// feasible for `vehicle`, checking every prefix of every dimension.
    pub fn route_feasible(&self, nodes: &[usize], vehicle: usize) -> bool {
        for dim in self.problem.dimensions() {
            let capacity = dim.capacity(vehicle);
            let mut cumul = 0i64;
            for &node in nodes {
                cumul += dim.demand(node);
                if cumul > capacity {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the cumulative demand of dimension `dimension` after
    /// visiting `nodes[position]`.
    ///
    /// # Panics
    ///
    /// Panics if `position` or `dimension` is out of range.
    pub fn cumulative_at(&self, nodes: &[usize], position: usize, dimension: usize) -> i64 {
        let dim = &self.problem.dimensions()[dimension];
        nodes[..=position].iter().map(|&n| dim.demand(n)).sum()
    }

    /// Returns true if adding `node` to a route with the given cached load
    /// totals keeps every dimension within the capacity of `vehicle`.
    pub fn fits(&self, vehicle: usize, loads: &[i64], node: usize) -> bool {
        self.problem
            .dimensions()
            .iter()
            .zip(loads)
            .all(|(dim, &load)| load + dim.demand(node) <= dim.capacity(vehicle))
    }

    /// Returns true if adding every node of `segment` to a route with the
    /// given cached load totals keeps the vehicle within capacity.
    pub fn fits_segment(&self, vehicle: usize, loads: &[i64], segment: &[usize]) -> bool {
        self.problem
            .dimensions()
            .iter()
            .zip(loads)
            .all(|(dim, &load)| {
                let added: i64 = segment.iter().map(|&n| dim.demand(n)).sum();
                load + added <= dim.capacity(vehicle)
            })
    }

    /// Returns true if replacing `removed` with `added` on a route with
    /// the given cached load totals keeps the vehicle within capacity.
    pub fn fits_exchange(
        &self,
        vehicle: usize,
        loads: &[i64],
        removed: usize,
        added: usize,
    ) -> bool {
        self.problem
            .dimensions()
            .iter()
            .zip(loads)
            .all(|(dim, &load)| {
                load - dim.demand(removed) + dim.demand(added) <= dim.capacity(vehicle)
            })
    }
}
