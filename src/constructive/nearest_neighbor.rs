//! Nearest-neighbor constructive heuristic.
//!
//! Builds a tour greedily: starting from a given node, always travel to the
//! cheapest unvisited node. Ties go to the lowest index, so the result is
//! fixed for a fixed matrix.
//!
//! # Complexity
//!
//! O(n²) where n = number of nodes.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E. & Lewis, P.M. (1977). "An Analysis of
//! Several Heuristics for the Traveling Salesman Problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

use crate::distance::DistanceMatrix;
use crate::models::Route;

/// Constructs a tour with the nearest-neighbor heuristic.
///
/// # Panics
///
/// Panics if `start` is not a node of `distances`.
///
/// # Examples
///
/// ```
/// use u_tour::DistanceMatrix;
/// use u_tour::constructive::nearest_neighbor;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0, 10, 1, 5],
///     vec![10, 0, 2, 3],
///     vec![1, 2, 0, 9],
///     vec![5, 3, 9, 0],
/// ])?;
/// let route = nearest_neighbor(&dm, 0);
/// assert_eq!(route.nodes(), &[0, 2, 1, 3]);
/// # Ok::<(), u_tour::Error>(())
/// ```
pub fn nearest_neighbor(distances: &DistanceMatrix, start: usize) -> Route {
    let n = distances.size();
    assert!(start < n, "start node {start} out of range for {n} nodes");

    // Kept in ascending order so `nearest_neighbor` ties resolve to the lowest index.
    let mut unvisited: Vec<usize> = (0..n).filter(|&node| node != start).collect();
    let mut sequence = Vec::with_capacity(n);
    sequence.push(start);

    let mut current = start;
    while let Some(next) = distances.nearest_neighbor(current, &unvisited) {
        if let Ok(idx) = unvisited.binary_search(&next) {
            unvisited.remove(idx);
        }
        sequence.push(next);
        current = next;
    }

    Route::from_permutation(sequence)
}
