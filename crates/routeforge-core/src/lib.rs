//! Core types for the RouteForge vehicle routing engine.
//!
//! This crate defines the immutable problem model (cost matrix, demand
//! dimensions, vehicle capacities), the mutable solution representation
//! (one route per vehicle with cached load totals), the capacity tracker
//! that decides route feasibility, and the error types shared by the
//! solver crates.

pub mod capacity;
pub mod error;
pub mod problem;
pub mod solution;

pub use capacity::CapacityTracker;
pub use error::{Result, SolverError};
pub use problem::{Dimension, Problem};
pub use solution::{Route, Solution};
