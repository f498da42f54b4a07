//! Local search driver.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::moves::{Move, PathCosts, ScanContext};
use super::perturbation::{self, double_bridge};
use super::{or_opt, swap, two_opt};
use crate::config::{Neighborhood, Perturbation, SolverConfig, Strategy};
use crate::distance::{Cost, DistanceMatrix, NeighborLists};
use crate::error::{InputViolation, Result};
use crate::models::{Budget, Route, StopReason};

/// Candidate evaluations between two budget checks inside a scan.
const CHECK_INTERVAL: u64 = 256;

/// Cooperative cancellation flag shared with a running search.
///
/// # Examples
///
/// ```
/// use u_tour::local_search::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every search holding this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What a search run did to the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Tour length before the search.
    pub initial_length: Cost,
    /// Tour length after the search.
    pub length: Cost,
    /// Improving moves applied.
    pub iterations: u64,
    /// Perturbation rounds run.
    pub kicks: u64,
    /// Why the search ended.
    pub stop_reason: StopReason,
}

/// Improves routes over one distance matrix.
///
/// Neighbor lists are built once in [`LocalSearch::new`] and reused by
/// every [`run`](LocalSearch::run).
///
/// # Examples
///
/// ```
/// use u_tour::{Budget, DistanceMatrix, Route, SolverConfig, StopReason};
/// use u_tour::local_search::LocalSearch;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0, 10, 14, 10],
///     vec![10, 0, 10, 14],
///     vec![14, 10, 0, 10],
///     vec![10, 14, 10, 0],
/// ])?;
/// let search = LocalSearch::new(&dm, &SolverConfig::default());
/// let mut route = Route::new(vec![0, 2, 1, 3])?;
///
/// let outcome = search.run(&mut route, &Budget::unlimited())?;
/// assert_eq!(outcome.length, 40);
/// assert_eq!(outcome.stop_reason, StopReason::LocalOptimum);
/// # Ok::<(), u_tour::Error>(())
/// ```
#[derive(Debug)]
pub struct LocalSearch<'a> {
    distances: &'a DistanceMatrix,
    neighbors: NeighborLists,
    strategy: Strategy,
    neighborhoods: Vec<Neighborhood>,
    perturbation: Option<Perturbation>,
}

impl<'a> LocalSearch<'a> {
    /// Prepares a search over `distances` using the move policy in `config`.
    pub fn new(distances: &'a DistanceMatrix, config: &SolverConfig) -> Self {
        let neighbors = match config.neighbor_candidates {
            Some(k) => NeighborLists::build(distances, k),
            None => NeighborLists::full(distances),
        };
        log::debug!(
            "local search over {} nodes: {} candidates per node, {:?}, {:?}",
            distances.size(),
            neighbors.k(),
            config.strategy,
            config.neighborhoods
        );
        Self {
            distances,
            neighbors,
            strategy: config.strategy,
            neighborhoods: config.neighborhoods.clone(),
            perturbation: config.perturbation,
        }
    }

    /// Improves `route` in place until a local optimum or the budget ends.
    ///
    /// # Errors
    ///
    /// [`InputViolation::RouteLengthMismatch`] if the route does not cover
    /// the matrix.
    pub fn run(&self, route: &mut Route, budget: &Budget) -> Result<SearchOutcome> {
        self.run_cancellable(route, budget, None)
    }

    /// Like [`run`](Self::run), also stopping when `cancel` fires.
    pub fn run_cancellable(
        &self,
        route: &mut Route,
        budget: &Budget,
        cancel: Option<&CancelToken>,
    ) -> Result<SearchOutcome> {
        if route.len() != self.distances.size() {
            return Err(InputViolation::RouteLengthMismatch {
                found: route.len(),
                expected: self.distances.size(),
            }
            .into());
        }

        let clock = Clock::start(budget, cancel);
        let mut state = State {
            length: route.length(self.distances),
            iterations: 0,
            evaluations: 0,
            kicks: 0,
        };
        let initial_length = state.length;

        let stop_reason = match self.descend(route, &mut state, budget, &clock) {
            Some(reason) => reason,
            None => match self.perturbation {
                Some(Perturbation::DoubleBridge { seed }) if route.len() >= perturbation::MIN_NODES => {
                    self.iterate(route, &mut state, seed, budget, &clock)
                }
                _ => StopReason::LocalOptimum,
            },
        };

        debug_assert_eq!(state.length, route.length(self.distances));
        debug_assert!(route.is_permutation());

        Ok(SearchOutcome {
            initial_length,
            length: state.length,
            iterations: state.iterations,
            kicks: state.kicks,
            stop_reason,
        })
    }

    /// Applies improving moves until none is left. Returns `None` at a local
    /// optimum, or the reason the budget cut it short.
    fn descend(
        &self,
        route: &mut Route,
        state: &mut State,
        budget: &Budget,
        clock: &Clock<'_>,
    ) -> Option<StopReason> {
        loop {
            if budget.max_iterations.is_some_and(|max| state.iterations >= max) {
                return Some(StopReason::IterationLimit);
            }
            if let Some(reason) = clock.check() {
                return Some(reason);
            }

            let paths = (!self.distances.is_symmetric()).then(|| PathCosts::build(route, self.distances));
            let ctx = ScanContext {
                distances: self.distances,
                neighbors: &self.neighbors,
                paths: paths.as_ref(),
            };

            match self.find_move(route, &ctx, clock, &mut state.evaluations) {
                Scan::Found(mv, delta) => {
                    mv.apply(route);
                    state.length += delta;
                    state.iterations += 1;
                    log::trace!("applied {:?}, delta {}, length {}", mv, delta, state.length);
                }
                Scan::Exhausted => {
                    log::debug!(
                        "local optimum at length {} after {} moves",
                        state.length,
                        state.iterations
                    );
                    return None;
                }
                Scan::Interrupted(reason) => return Some(reason),
            }
        }
    }

    /// Scans the neighborhoods in order and picks the move to apply.
    fn find_move(
        &self,
        route: &Route,
        ctx: &ScanContext<'_>,
        clock: &Clock<'_>,
        evaluations: &mut u64,
    ) -> Scan {
        let first_improvement = self.strategy == Strategy::FirstImprovement;
        let mut best: Option<(Move, Cost)> = None;
        let mut interrupted = None;

        let mut visit = |mv: Move, delta: Cost| {
            *evaluations += 1;
            if *evaluations % CHECK_INTERVAL == 0 {
                if let Some(reason) = clock.check() {
                    interrupted = Some(reason);
                    return ControlFlow::Break(());
                }
            }
            if delta < 0 && best.map_or(true, |(_, d)| delta < d) {
                best = Some((mv, delta));
                if first_improvement {
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        };

        for neighborhood in &self.neighborhoods {
            let flow = match neighborhood {
                Neighborhood::TwoOpt => two_opt::scan(route, ctx, &mut visit),
                Neighborhood::OrOpt => or_opt::scan(route, ctx, &mut visit),
                Neighborhood::Swap => swap::scan(route, ctx, &mut visit),
            };
            if flow.is_break() {
                break;
            }
        }

        match (interrupted, best) {
            (Some(reason), _) => Scan::Interrupted(reason),
            (None, Some((mv, delta))) => Scan::Found(mv, delta),
            (None, None) => Scan::Exhausted,
        }
    }

    /// Iterated local search: kick, descend, keep the better route.
    fn iterate(
        &self,
        route: &mut Route,
        state: &mut State,
        seed: u64,
        budget: &Budget,
        clock: &Clock<'_>,
    ) -> StopReason {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut best = route.clone();
        let mut best_length = state.length;
        let mut non_improving = 0;

        loop {
            if non_improving >= budget.max_non_improving {
                return StopReason::NonImprovingLimit;
            }
            if budget.max_iterations.is_some_and(|max| state.iterations >= max) {
                return StopReason::IterationLimit;
            }
            if let Some(reason) = clock.check() {
                return reason;
            }

            double_bridge(route, &mut rng);
            state.length = route.length(self.distances);
            state.kicks += 1;

            let interrupted = self.descend(route, state, budget, clock);

            if state.length < best_length {
                log::debug!(
                    "kick {} improved {} -> {}",
                    state.kicks,
                    best_length,
                    state.length
                );
                best.clone_from(route);
                best_length = state.length;
                non_improving = 0;
            } else {
                route.clone_from(&best);
                state.length = best_length;
                non_improving += 1;
            }

            if let Some(reason) = interrupted {
                return reason;
            }
        }
    }
}

enum Scan {
    Found(Move, Cost),
    Exhausted,
    Interrupted(StopReason),
}

struct State {
    length: Cost,
    iterations: u64,
    evaluations: u64,
    kicks: u64,
}

struct Clock<'c> {
    deadline: Option<Instant>,
    cancel: Option<&'c CancelToken>,
}

impl<'c> Clock<'c> {
    fn start(budget: &Budget, cancel: Option<&'c CancelToken>) -> Self {
        let now = Instant::now();
        Self {
            deadline: budget.time_limit.and_then(|limit| now.checked_add(limit)),
            cancel,
        }
    }

    fn check(&self) -> Option<StopReason> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Some(StopReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(StopReason::TimeLimit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ring(n: usize) -> DistanceMatrix {
        // Nodes on a circle-ish integer grid: cost is the shorter way round.
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        let d = i.abs_diff(j);
                        (d.min(n - d) * 10) as Cost
                    })
                    .collect()
            })
            .collect();
        DistanceMatrix::from_rows(rows).expect("valid")
    }

    fn gcd(a: usize, b: usize) -> usize {
        if b == 0 {
            a
        } else {
            gcd(b, a % b)
        }
    }

    fn scrambled(n: usize) -> Route {
        // Stride through the ring so almost every edge is long.
        let stride = (3..n).find(|&s| gcd(s, n) == 1).unwrap_or(1);
        let sequence = (0..n).map(|k| (k * stride) % n).collect();
        Route::new(sequence).expect("valid")
    }

    #[test]
    fn test_reaches_ring_optimum() {
        let dm = ring(20);
        let search = LocalSearch::new(&dm, &SolverConfig::default().with_neighbor_candidates(None));
        let mut route = scrambled(20);
        let outcome = search.run(&mut route, &Budget::unlimited()).expect("run");
        assert_eq!(outcome.stop_reason, StopReason::LocalOptimum);
        assert_eq!(outcome.length, route.length(&dm));
        assert!(outcome.length < outcome.initial_length);
        assert!(route.is_permutation());
    }

    #[test]
    fn test_tracked_length_matches_after_every_budget() {
        let dm = ring(15);
        for strategy in [Strategy::FirstImprovement, Strategy::BestImprovement] {
            let config = SolverConfig::default()
                .with_strategy(strategy)
                .with_neighborhoods(vec![Neighborhood::TwoOpt, Neighborhood::OrOpt, Neighborhood::Swap]);
            let search = LocalSearch::new(&dm, &config);
            let mut previous = Cost::MAX;
            for max in 0..12 {
                let mut route = scrambled(15);
                let budget = Budget::unlimited().with_max_iterations(max);
                let outcome = search.run(&mut route, &budget).expect("run");
                assert!(route.is_permutation());
                assert_eq!(outcome.length, route.length(&dm));
                assert!(outcome.iterations <= max);
                assert!(outcome.length <= previous);
                previous = outcome.length;
            }
        }
    }

    #[test]
    fn test_zero_iterations_leaves_route() {
        let dm = ring(10);
        let search = LocalSearch::new(&dm, &SolverConfig::default());
        let mut route = scrambled(10);
        let original = route.clone();
        let outcome = search
            .run(&mut route, &Budget::unlimited().with_max_iterations(0))
            .expect("run");
        assert_eq!(outcome.stop_reason, StopReason::IterationLimit);
        assert_eq!(route, original);
    }

    #[test]
    fn test_asymmetric_descent_is_consistent() {
        let n = 12;
        let rows = (0..n)
            .map(|i: usize| (0..n).map(|j: usize| ((i * 31 + j * 17) % 23 + i.abs_diff(j)) as Cost).collect())
            .collect();
        let dm = DistanceMatrix::from_rows(rows).expect("valid");
        assert!(!dm.is_symmetric());
        let search = LocalSearch::new(
            &dm,
            &SolverConfig::default().with_neighborhoods(vec![
                Neighborhood::TwoOpt,
                Neighborhood::OrOpt,
                Neighborhood::Swap,
            ]),
        );
        let mut route = Route::identity(n);
        let outcome = search.run(&mut route, &Budget::unlimited()).expect("run");
        assert_eq!(outcome.length, route.length(&dm));
        assert!(outcome.length <= outcome.initial_length);
    }

    #[test]
    fn test_cancelled_before_start() {
        let dm = ring(10);
        let search = LocalSearch::new(&dm, &SolverConfig::default());
        let token = CancelToken::new();
        token.cancel();
        let mut route = scrambled(10);
        let outcome = search
            .run_cancellable(&mut route, &Budget::unlimited(), Some(&token))
            .expect("run");
        assert_eq!(outcome.stop_reason, StopReason::Cancelled);
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_zero_time_limit() {
        let dm = ring(10);
        let search = LocalSearch::new(&dm, &SolverConfig::default());
        let mut route = scrambled(10);
        let outcome = search
            .run(&mut route, &Budget::unlimited().with_time_limit(Duration::ZERO))
            .expect("run");
        assert_eq!(outcome.stop_reason, StopReason::TimeLimit);
        assert!(route.is_permutation());
    }

    #[test]
    fn test_time_limit_inside_a_scan() {
        // A full best-improvement scan over 1500 nodes takes far longer than
        // the limit, so the deadline passes between candidate evaluations.
        let n = 1500;
        let dm = ring(n);
        let config = SolverConfig::default()
            .with_strategy(Strategy::BestImprovement)
            .with_neighbor_candidates(None);
        let search = LocalSearch::new(&dm, &config);
        let mut route = scrambled(n);
        let original = route.clone();

        let outcome = search
            .run(&mut route, &Budget::unlimited().with_time_limit(Duration::from_millis(3)))
            .expect("run");
        assert_eq!(outcome.stop_reason, StopReason::TimeLimit);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(route, original);
        assert_eq!(outcome.length, route.length(&dm));
        assert!(route.is_permutation());
    }

    #[test]
    fn test_perturbation_is_seeded() {
        let dm = ring(16);
        let config = SolverConfig::default().with_seed(99);
        let search = LocalSearch::new(&dm, &config);
        let budget = Budget::unlimited().with_max_non_improving(5);

        let mut a = scrambled(16);
        let mut b = scrambled(16);
        let first = search.run(&mut a, &budget).expect("run");
        let second = search.run(&mut b, &budget).expect("run");
        assert_eq!(a, b);
        assert_eq!(first, second);
        assert_eq!(first.stop_reason, StopReason::NonImprovingLimit);
        assert!(first.kicks >= 5);
        assert_eq!(first.length, a.length(&dm));
    }

    #[test]
    fn test_rejects_wrong_size() {
        let dm = ring(6);
        let search = LocalSearch::new(&dm, &SolverConfig::default());
        let mut route = Route::identity(5);
        assert!(search.run(&mut route, &Budget::unlimited()).is_err());
    }
}
