//! Neighborhood moves.
//!
//! Every move follows the same contract: `delta` and `is_feasible` are
//! pure evaluations of the candidate against the current solution, and
//! `apply` mutates only after the caller has accepted the move. A
//! rejected evaluation never touches the solution.
//!
//! Cross-route moves are evaluated in O(1) from the arcs they break and
//! create; moves that reorder within one route (same-route swap/or-opt,
//! 2-opt reversal) recompute the affected stretch, which stays cheap
//! because only one route is touched.

use smallvec::SmallVec;

use routeforge_core::{CapacityTracker, Problem, Solution};

/// Scratch buffer sized for typical route lengths.
type NodeBuf = SmallVec<[usize; 16]>;

/// A candidate mutation of the working solution.
///
/// Positions are customer indices within a route (the depot is implicit).
/// For a same-route [`Move::OrOpt`], `to_pos` is the insertion index
/// after the segment has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Move one node to a different route.
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    /// Exchange two nodes, possibly across routes.
    Swap {
        first_route: usize,
        first_pos: usize,
        second_route: usize,
        second_pos: usize,
    },
    /// Reverse the segment `start..=end` within one route.
    TwoOpt {
        route: usize,
        start: usize,
        end: usize,
    },
    /// Relocate a short contiguous segment (kept in order).
    OrOpt {
        from_route: usize,
        start: usize,
        len: usize,
        to_route: usize,
        to_pos: usize,
    },
}

#[inline]
fn prev(route: &[usize], depot: usize, pos: usize) -> usize {
    if pos == 0 {
        depot
    } else {
        route[pos - 1]
    }
}

#[inline]
fn next(route: &[usize], depot: usize, pos: usize) -> usize {
    if pos + 1 >= route.len() {
        depot
    } else {
        route[pos + 1]
    }
}

/// Neighbors of insertion slot `pos` (0..=len).
#[inline]
fn slot(route: &[usize], depot: usize, pos: usize) -> (usize, usize) {
    let left = if pos == 0 { depot } else { route[pos - 1] };
    let right = if pos == route.len() { depot } else { route[pos] };
    (left, right)
}

fn path_cost(depot: usize, nodes: &[usize], arc: &impl Fn(usize, usize) -> i64) -> i64 {
    let mut cost = 0;
    let mut from = depot;
    for &node in nodes {
        cost += arc(from, node);
        from = node;
    }
    if !nodes.is_empty() {
        cost += arc(from, depot);
    }
    cost
}

impl Move {
    /// Returns the change in working cost if this move were applied.
    /// Negative means improvement.
    pub fn delta(
        &self,
        solution: &Solution,
        depot: usize,
        arc: &impl Fn(usize, usize) -> i64,
    ) -> i64 {
        match *self {
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => {
                debug_assert_ne!(from_route, to_route);
                let from = solution.route(from_route);
                let to = solution.route(to_route);
                let node = from[from_pos];
                let d_remove = arc(prev(from, depot, from_pos), next(from, depot, from_pos))
                    - arc(prev(from, depot, from_pos), node)
                    - arc(node, next(from, depot, from_pos));
                let (left, right) = slot(to, depot, to_pos);
                let d_insert = arc(left, node) + arc(node, right) - arc(left, right);
                d_remove + d_insert
            }
            Move::Swap {
                first_route,
                first_pos,
                second_route,
                second_pos,
            } => {
                if first_route == second_route {
                    let route = solution.route(first_route);
                    let mut buf: NodeBuf = route.iter().copied().collect();
                    buf.swap(first_pos, second_pos);
                    path_cost(depot, &buf, arc) - path_cost(depot, route, arc)
                } else {
                    let ra = solution.route(first_route);
                    let rb = solution.route(second_route);
                    let a = ra[first_pos];
                    let b = rb[second_pos];
                    let (pa, na) = (prev(ra, depot, first_pos), next(ra, depot, first_pos));
                    let (pb, nb) = (prev(rb, depot, second_pos), next(rb, depot, second_pos));
                    arc(pa, b) + arc(b, na) - arc(pa, a) - arc(a, na) + arc(pb, a) + arc(a, nb)
                        - arc(pb, b)
                        - arc(b, nb)
                }
            }
            Move::TwoOpt { route, start, end } => {
                let r = solution.route(route);
                let p = prev(r, depot, start);
                let n = next(r, depot, end);
                let mut delta =
                    arc(p, r[end]) + arc(r[start], n) - arc(p, r[start]) - arc(r[end], n);
                for k in start..end {
                    delta += arc(r[k + 1], r[k]) - arc(r[k], r[k + 1]);
                }
                delta
            }
            Move::OrOpt {
                from_route,
                start,
                len,
                to_route,
                to_pos,
            } => {
                let from = solution.route(from_route);
                if from_route == to_route {
                    let mut buf: NodeBuf = from.iter().copied().collect();
                    let segment: SmallVec<[usize; 3]> = buf.drain(start..start + len).collect();
                    for (k, &node) in segment.iter().enumerate() {
                        buf.insert(to_pos + k, node);
                    }
                    path_cost(depot, &buf, arc) - path_cost(depot, from, arc)
                } else {
                    let to = solution.route(to_route);
                    let first = from[start];
                    let last = from[start + len - 1];
                    let before = prev(from, depot, start);
                    let after = next(from, depot, start + len - 1);
                    let d_remove = arc(before, after) - arc(before, first) - arc(last, after);
                    let (left, right) = slot(to, depot, to_pos);
                    let d_insert = arc(left, first) + arc(last, right) - arc(left, right);
                    d_remove + d_insert
                }
            }
        }
    }

    /// Returns true if every route this move touches stays within
    /// capacity afterwards.
    pub fn is_feasible(&self, problem: &Problem, solution: &Solution) -> bool {
        let tracker = CapacityTracker::new(problem);
        match *self {
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                ..
            } => {
                let node = solution.route(from_route)[from_pos];
                tracker.fits(to_route, solution.loads(to_route), node)
            }
            Move::Swap {
                first_route,
                first_pos,
                second_route,
                second_pos,
            } => {
                if first_route == second_route {
                    return true;
                }
                let a = solution.route(first_route)[first_pos];
                let b = solution.route(second_route)[second_pos];
                tracker.fits_exchange(first_route, solution.loads(first_route), a, b)
                    && tracker.fits_exchange(second_route, solution.loads(second_route), b, a)
            }
            Move::TwoOpt { .. } => true,
            Move::OrOpt {
                from_route,
                start,
                len,
                to_route,
                ..
            } => {
                if from_route == to_route {
                    return true;
                }
                let segment = &solution.route(from_route)[start..start + len];
                tracker.fits_segment(to_route, solution.loads(to_route), segment)
            }
        }
    }

    /// Applies the move. The caller must have checked feasibility.
    pub fn apply(&self, problem: &Problem, solution: &mut Solution) {
        match *self {
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => {
                let node = solution.remove(problem, from_route, from_pos);
                solution.insert(problem, to_route, to_pos, node);
            }
            Move::Swap {
                first_route,
                first_pos,
                second_route,
                second_pos,
            } => {
                solution.swap_nodes(
                    problem,
                    (first_route, first_pos),
                    (second_route, second_pos),
                );
            }
            Move::TwoOpt { route, start, end } => {
                solution.reverse_segment(route, start, end);
            }
            Move::OrOpt {
                from_route,
                start,
                len,
                to_route,
                to_pos,
            } => {
                let mut segment: SmallVec<[usize; 3]> = SmallVec::new();
                for _ in 0..len {
                    segment.push(solution.remove(problem, from_route, start));
                }
                for (k, &node) in segment.iter().enumerate() {
                    solution.insert(problem, to_route, to_pos + k, node);
                }
            }
        }
        debug_assert!(self.touched_routes_feasible(problem, solution));
    }

    fn touched_routes_feasible(&self, problem: &Problem, solution: &Solution) -> bool {
        let tracker = CapacityTracker::new(problem);
        (0..solution.num_routes())
            .all(|v| tracker.route_feasible(solution.route(v), v))
    }
}

/// Fills `moves` with the full neighborhood of the solution, in a fixed
/// deterministic order. The buffer is reused across steps.
pub(crate) fn generate(solution: &Solution, moves: &mut Vec<Move>) {
    moves.clear();
    let k = solution.num_routes();

    // Relocate: single node to another route.
    for from_route in 0..k {
        for from_pos in 0..solution.route(from_route).len() {
            for to_route in 0..k {
                if to_route == from_route {
                    continue;
                }
                for to_pos in 0..=solution.route(to_route).len() {
                    moves.push(Move::Relocate {
                        from_route,
                        from_pos,
                        to_route,
                        to_pos,
                    });
                }
            }
        }
    }

    // Swap: every unordered pair of positions.
    for first_route in 0..k {
        for first_pos in 0..solution.route(first_route).len() {
            for second_route in first_route..k {
                let begin = if second_route == first_route {
                    first_pos + 1
                } else {
                    0
                };
                for second_pos in begin..solution.route(second_route).len() {
                    moves.push(Move::Swap {
                        first_route,
                        first_pos,
                        second_route,
                        second_pos,
                    });
                }
            }
        }
    }

    // 2-opt: reverse each contiguous segment of length >= 2.
    for route in 0..k {
        let len = solution.route(route).len();
        for start in 0..len {
            for end in start + 1..len {
                moves.push(Move::TwoOpt { route, start, end });
            }
        }
    }

    // Or-opt: segments of length 1-3. Same-route for all lengths;
    // cross-route only for length >= 2 (length 1 duplicates Relocate).
    for from_route in 0..k {
        let from_len = solution.route(from_route).len();
        for len in 1..=from_len.min(3) {
            for start in 0..=from_len - len {
                for to_pos in 0..=from_len - len {
                    if to_pos == start {
                        continue;
                    }
                    moves.push(Move::OrOpt {
                        from_route,
                        start,
                        len,
                        to_route: from_route,
                        to_pos,
                    });
                }
                if len >= 2 {
                    for to_route in 0..k {
                        if to_route == from_route {
                            continue;
                        }
                        for to_pos in 0..=solution.route(to_route).len() {
                            moves.push(Move::OrOpt {
                                from_route,
                                start,
                                len,
                                to_route,
                                to_pos,
                            });
                        }
                    }
                }
            }
        }
    }
}
