//! Solver engine for RouteForge.
//!
//! The engine runs two phases over a shared [`SolverScope`]: a
//! construction phase that builds an initial feasible solution
//! (cheapest insertion or path-cheapest-arc), and a local search phase
//! that improves it with relocate / swap / 2-opt / or-opt moves, driven
//! either by pure descent or by a guided-local-search metaheuristic.
//! [`Solver`] assembles the phases from a
//! [`SolverConfig`](routeforge_config::SolverConfig) and owns the time
//! budget and cooperative cancellation.

pub mod construction;
pub mod localsearch;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod termination;

pub use construction::{CheapestInsertion, PathCheapestArc};
pub use localsearch::{GreedyDescent, GuidedLocalSearch, LocalSearchPhase, Metaheuristic};
pub use phase::Phase;
pub use scope::SolverScope;
pub use solver::{Solver, DEFAULT_TIME_LIMIT};
pub use termination::{NoTermination, StepCountTermination, Termination, TimeTermination};
