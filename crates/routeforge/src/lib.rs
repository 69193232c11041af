//! RouteForge - A capacitated vehicle routing solver in Rust
//!
//! Model a CVRP instance as a cost matrix plus named capacity
//! dimensions, then solve it under a time budget: cheapest-insertion
//! construction followed by guided local search.
//!
//! # Example
//!
//! ```
//! use routeforge::prelude::*;
//!
//! # fn run() -> routeforge::Result<()> {
//! let problem = Problem::new(
//!     vec![
//!         vec![0, 4, 6, 4],
//!         vec![4, 0, 3, 7],
//!         vec![6, 3, 0, 5],
//!         vec![4, 7, 5, 0],
//!     ],
//!     2,
//!     0,
//! )?
//! .with_dimension(Dimension::new("weight", vec![0, 2, 3, 1], vec![4, 4]))?;
//!
//! let config = SolverConfig::new().with_termination_millis(100);
//! let solution = Solver::new(config).solve(&problem)?;
//! assert!(solution.is_complete(&problem));
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```

// Problem model and solution types
pub use routeforge_core::{
    CapacityTracker, Dimension, Problem, Result, Route, Solution, SolverError,
};

// Configuration
pub use routeforge_config::{
    ConfigError, FirstSolutionStrategy, GuidedLocalSearchConfig, Metaheuristic, SolverConfig,
    TerminationConfig,
};

// Solver engine
pub use routeforge_solver::Solver;

/// Phase-level building blocks for callers assembling their own pipeline.
pub mod engine {
    pub use routeforge_solver::{
        CheapestInsertion, GreedyDescent, GuidedLocalSearch, LocalSearchPhase, NoTermination,
        PathCheapestArc, Phase, SolverScope, StepCountTermination, Termination, TimeTermination,
        DEFAULT_TIME_LIMIT,
    };
}

pub mod prelude {
    pub use super::{
        Dimension, FirstSolutionStrategy, Metaheuristic, Problem, Solution, Solver, SolverConfig,
        SolverError,
    };
}
