//! Double-bridge perturbation.
//!
//! Cuts the tour into four parts `A B C D` and reconnects them as
//! `A C B D`. The kick cannot be undone by a single 2-opt or Or-opt move,
//! which makes it the standard restart step of iterated local search.
//!
//! # Reference
//!
//! Martin, O., Otto, S.W. & Felten, E.W. (1991). "Large-Step Markov Chains
//! for the Traveling Salesman Problem", *Complex Systems* 5(3), 299-326.

use rand::seq::index;
use rand::Rng;

use crate::models::Route;

/// Smallest route the kick is applied to.
pub const MIN_NODES: usize = 8;

/// Applies a double bridge with cut points drawn from `rng`.
///
/// # Panics
///
/// Panics if the route has fewer than [`MIN_NODES`] nodes.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_tour::Route;
/// use u_tour::local_search::double_bridge;
///
/// let mut route = Route::identity(10);
/// double_bridge(&mut route, &mut StdRng::seed_from_u64(1));
/// assert!(route.is_permutation());
/// assert_ne!(route.nodes(), Route::identity(10).nodes());
/// ```
pub fn double_bridge<R: Rng + ?Sized>(route: &mut Route, rng: &mut R) {
    let n = route.len();
    assert!(n >= MIN_NODES, "double bridge needs at least {MIN_NODES} nodes, got {n}");

    // Three distinct cut points in 1..n.
    let mut cuts = index::sample(rng, n - 1, 3).into_vec();
    cuts.sort_unstable();
    route.apply_double_bridge(cuts[0] + 1, cuts[1] + 1, cuts[2] + 1);
}
