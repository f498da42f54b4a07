//! Solve entry points.
//!
//! Validation happens once, up front: the matrix, then the initial route,
//! then the configuration. Nothing is optimized until all of them pass.

use std::time::Instant;

use crate::config::{Construction, SolverConfig};
use crate::constructive::build_initial_route;
use crate::distance::{Cost, DistanceMatrix};
use crate::error::{InputViolation, Result};
use crate::local_search::{CancelToken, LocalSearch};
use crate::models::{Budget, Route, SolveResult};

/// Solves a tour with the default configuration.
///
/// `init_route`, when given, is used as the starting point instead of the
/// construction heuristic (warm start). `budget` defaults to
/// [`Budget::unlimited`], which stops at the first local optimum.
///
/// # Errors
///
/// [`Error::InvalidInput`](crate::Error::InvalidInput) for a non-square or
/// negative matrix, fewer than two nodes, or an initial route that is not a
/// permutation of the matrix's nodes.
///
/// # Examples
///
/// ```
/// use u_tour::solve;
///
/// let matrix = vec![
///     vec![0, 10, 14, 10],
///     vec![10, 0, 10, 14],
///     vec![14, 10, 0, 10],
///     vec![10, 14, 10, 0],
/// ];
/// let cold = solve(matrix.clone(), None, None)?;
/// assert_eq!(cold.distance(), 40);
///
/// let warm = solve(matrix, Some(vec![0, 2, 1, 3]), None)?;
/// assert_eq!(warm.distance(), 40);
/// assert!(warm.is_warm_start());
/// # Ok::<(), u_tour::Error>(())
/// ```
pub fn solve(
    distance_matrix: Vec<Vec<Cost>>,
    init_route: Option<Vec<usize>>,
    budget: Option<Budget>,
) -> Result<SolveResult> {
    Solver::default().solve(distance_matrix, init_route, budget)
}

/// A configured solver; holds no state between calls.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_tour::{Budget, Solver, SolverConfig, Strategy};
///
/// let solver = Solver::new(SolverConfig::default().with_strategy(Strategy::BestImprovement));
/// let budget = Budget::unlimited().with_time_limit(Duration::from_millis(100));
/// let result = solver.solve(vec![vec![0, 5], vec![5, 0]], None, Some(budget))?;
/// assert_eq!(result.distance(), 10);
/// # Ok::<(), u_tour::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
    cancel: Option<CancelToken>,
}

impl Solver {
    /// Creates a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Stops running solves early once `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Validates raw input and solves.
    ///
    /// # Errors
    ///
    /// See [`solve`].
    pub fn solve(
        &self,
        distance_matrix: Vec<Vec<Cost>>,
        init_route: Option<Vec<usize>>,
        budget: Option<Budget>,
    ) -> Result<SolveResult> {
        let distances = DistanceMatrix::from_rows(distance_matrix)?;
        let route = init_route
            .map(|sequence| Route::with_size(sequence, distances.size()))
            .transpose()?;
        self.solve_matrix(&distances, route, budget)
    }

    /// Solves over an already validated matrix.
    ///
    /// # Errors
    ///
    /// [`InputViolation::RouteLengthMismatch`] if `init_route` does not
    /// cover the matrix; configuration problems as
    /// [`InputViolation::InvalidConfig`] or
    /// [`InputViolation::StartOutOfRange`].
    pub fn solve_matrix(
        &self,
        distances: &DistanceMatrix,
        init_route: Option<Route>,
        budget: Option<Budget>,
    ) -> Result<SolveResult> {
        let n = distances.size();
        if let Some(route) = &init_route {
            if route.len() != n {
                return Err(InputViolation::RouteLengthMismatch {
                    found: route.len(),
                    expected: n,
                }
                .into());
            }
        }
        self.config.validate()?;
        if let Construction::NearestNeighbor { start } = self.config.construction {
            if init_route.is_none() && start >= n {
                return Err(InputViolation::StartOutOfRange { start, nodes: n }.into());
            }
        }
        let budget = budget.unwrap_or_default();

        let started = Instant::now();
        let warm_start = init_route.is_some();
        let mut route = match init_route {
            Some(route) => route,
            None => build_initial_route(distances, self.config.construction)?,
        };

        let search = LocalSearch::new(distances, &self.config);
        let outcome = search.run_cancellable(&mut route, &budget, self.cancel.as_ref())?;
        let distance = route.length(distances);
        let elapsed = started.elapsed();
        debug_assert_eq!(distance, outcome.length);

        log::info!(
            "solved {} nodes ({} start): distance {} from {}, {} moves, {} kicks, {}us, {:?}",
            n,
            if warm_start { "warm" } else { "cold" },
            distance,
            outcome.initial_length,
            outcome.iterations,
            outcome.kicks,
            elapsed.as_micros(),
            outcome.stop_reason
        );

        Ok(SolveResult::new(
            route,
            distance,
            outcome.initial_length,
            elapsed,
            outcome.iterations,
            outcome.kicks,
            outcome.stop_reason,
            warm_start,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::StopReason;

    fn violation(err: Error) -> InputViolation {
        match err {
            Error::InvalidInput(v) => v,
        }
    }

    fn square() -> Vec<Vec<Cost>> {
        vec![
            vec![0, 10, 14, 10],
            vec![10, 0, 10, 14],
            vec![14, 10, 0, 10],
            vec![10, 14, 10, 0],
        ]
    }

    #[test]
    fn test_solver_asymmetric() {
        let matrix = vec![vec![0, 2, 1], vec![40, 0, 30], vec![600, 500, 0]];
        let result = solve(matrix, None, None).expect("solve");
        assert_eq!(result.distance(), 541);
        assert_eq!(result.route().nodes(), &[0, 2, 1]);
    }

    #[test]
    fn test_square_cold_start() {
        let result = solve(square(), None, None).expect("solve");
        assert_eq!(result.distance(), 40);
        assert_eq!(result.route().nodes(), &[0, 1, 2, 3]);
        assert!(!result.is_warm_start());
        assert_eq!(result.stop_reason(), StopReason::LocalOptimum);
    }

    #[test]
    fn test_warm_start_fixes_crossing() {
        let result = solve(square(), Some(vec![0, 2, 1, 3]), None).expect("solve");
        assert_eq!(result.initial_distance(), 48);
        assert_eq!(result.distance(), 40);
        assert!(result.iterations() >= 1);
    }

    #[test]
    fn test_identity_construction() {
        let solver = Solver::new(SolverConfig::default().with_construction(Construction::Identity));
        let result = solver
            .solve(square(), None, Some(Budget::unlimited().with_max_iterations(0)))
            .expect("solve");
        assert_eq!(result.route().nodes(), &[0, 1, 2, 3]);
        assert_eq!(result.stop_reason(), StopReason::IterationLimit);
    }

    #[test]
    fn test_matrix_checked_before_route() {
        let err = solve(vec![vec![0, -1], vec![1, 0]], Some(vec![0, 0]), None).unwrap_err();
        assert!(matches!(violation(err), InputViolation::NegativeCost { .. }));
    }

    #[test]
    fn test_shifted_concatenation_is_caught() {
        // Second half offset by one too many.
        let err = solve(square(), Some(vec![0, 1, 3, 4]), None).unwrap_err();
        assert_eq!(
            violation(err),
            InputViolation::NodeOutOfRange {
                position: 3,
                node: 4,
                nodes: 4
            }
        );
    }

    #[test]
    fn test_bad_start_rejected_only_on_cold_start() {
        let solver = Solver::new(
            SolverConfig::default().with_construction(Construction::NearestNeighbor { start: 9 }),
        );
        let err = solver.solve(square(), None, None).unwrap_err();
        assert_eq!(violation(err), InputViolation::StartOutOfRange { start: 9, nodes: 4 });
        assert!(solver.solve(square(), Some(vec![3, 2, 1, 0]), None).is_ok());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let solver = Solver::new(SolverConfig::default().with_neighbor_candidates(Some(0)));
        let err = solver.solve(square(), None, None).unwrap_err();
        assert!(matches!(violation(err), InputViolation::InvalidConfig(_)));
    }

    #[test]
    fn test_solve_matrix_size_mismatch() {
        let dm = DistanceMatrix::from_rows(square()).expect("valid");
        let err = Solver::default()
            .solve_matrix(&dm, Some(Route::identity(3)), None)
            .unwrap_err();
        assert_eq!(
            violation(err),
            InputViolation::RouteLengthMismatch {
                found: 3,
                expected: 4
            }
        );
    }

    #[test]
    fn test_cancelled_solver_returns_valid_route() {
        let token = CancelToken::new();
        token.cancel();
        let solver = Solver::default().with_cancel_token(token);
        let result = solver.solve(square(), Some(vec![0, 2, 1, 3]), None).expect("solve");
        assert_eq!(result.stop_reason(), StopReason::Cancelled);
        assert_eq!(result.route().nodes(), &[0, 2, 1, 3]);
        assert_eq!(result.distance(), 48);
    }
}
