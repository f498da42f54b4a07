//! Solve result types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Route;
use crate::distance::Cost;

/// Why the local search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A full scan found no improving move.
    LocalOptimum,
    /// The wall-clock limit ran out.
    TimeLimit,
    /// The applied-move limit was reached.
    IterationLimit,
    /// Perturbation stopped producing better routes.
    NonImprovingLimit,
    /// The caller's cancel token fired.
    Cancelled,
}

/// The outcome of one solve call.
///
/// # Examples
///
/// ```
/// use u_tour::{solve, StopReason};
///
/// let result = solve(vec![vec![0, 5], vec![5, 0]], None, None)?;
/// assert_eq!(result.route().nodes(), &[0, 1]);
/// assert_eq!(result.distance(), 10);
/// assert_eq!(result.stop_reason(), StopReason::LocalOptimum);
/// # Ok::<(), u_tour::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveResult {
    route: Route,
    distance: Cost,
    initial_distance: Cost,
    elapsed_micros: u64,
    iterations: u64,
    kicks: u64,
    stop_reason: StopReason,
    warm_start: bool,
}

impl SolveResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        route: Route,
        distance: Cost,
        initial_distance: Cost,
        elapsed: Duration,
        iterations: u64,
        kicks: u64,
        stop_reason: StopReason,
        warm_start: bool,
    ) -> Self {
        Self {
            route,
            distance,
            initial_distance,
            elapsed_micros: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
            iterations,
            kicks,
            stop_reason,
            warm_start,
        }
    }

    /// Final visiting order; the tour returns to the first node.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Consumes the result, returning the route.
    pub fn into_route(self) -> Route {
        self.route
    }

    /// Cyclic length of the final route.
    pub fn distance(&self) -> Cost {
        self.distance
    }

    /// Length of the route local search started from.
    pub fn initial_distance(&self) -> Cost {
        self.initial_distance
    }

    /// Wall-clock solve time in microseconds.
    pub fn elapsed_micros(&self) -> u64 {
        self.elapsed_micros
    }

    /// Wall-clock solve time.
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_micros)
    }

    /// Number of improving moves applied.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Number of perturbation rounds run.
    pub fn kicks(&self) -> u64 {
        self.kicks
    }

    /// Why the search ended.
    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    /// `true` if the caller supplied the starting route.
    pub fn is_warm_start(&self) -> bool {
        self.warm_start
    }
}
