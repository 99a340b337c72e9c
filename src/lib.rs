pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod phases;
pub mod setup;
pub mod solver;
pub mod utils;

pub use distance::matrix::{build_cost_matrix, fetch_travel_matrices, TravelMatrices};
pub use distance::providers::{DistanceOracle, GoogleDistanceMatrix};
pub use domain::types::{CostMatrix, CostMeasure, Route, RouteProblem};
pub use error::{PlannerError, Result};
pub use solver::cheapest_arc::{solve, SolveOutcome, SolverOptions};
