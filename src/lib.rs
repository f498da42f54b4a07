//! # u-tour
//!
//! Single-vehicle tour optimization (TSP) over an arbitrary, possibly
//! asymmetric, integer distance matrix. A nearest-neighbor construction
//! or a caller-supplied route (warm start) is improved by 2-opt and Or-opt
//! local search under an optional time or iteration budget.
//!
//! ## Modules
//!
//! - [`distance`]: Distance matrix and per-node candidate lists
//! - [`models`]: Route, budget, and solve result types
//! - [`constructive`]: Nearest-neighbor and identity starting routes
//! - [`local_search`]: 2-opt, Or-opt, swap, and double-bridge perturbation
//! - [`config`]: Solver configuration
//! - [`solver`]: The [`solve`] entry point
//!
//! ## Quick start
//!
//! ```
//! use u_tour::{solve, Budget};
//! use std::time::Duration;
//!
//! let matrix = vec![
//!     vec![0, 2, 1],
//!     vec![40, 0, 30],
//!     vec![600, 500, 0],
//! ];
//! let budget = Budget::unlimited().with_time_limit(Duration::from_millis(50));
//! let result = solve(matrix, None, Some(budget))?;
//!
//! assert_eq!(result.route().nodes(), &[0, 2, 1]);
//! assert_eq!(result.distance(), 541);
//! # Ok::<(), u_tour::Error>(())
//! ```

pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod local_search;
pub mod models;
pub mod solver;

pub use config::{Construction, Neighborhood, Perturbation, SolverConfig, Strategy};
pub use distance::{Cost, DistanceMatrix, NeighborLists};
pub use error::{Error, InputViolation, Result};
pub use models::{Budget, Route, SolveResult, StopReason};
pub use solver::{solve, Solver};
