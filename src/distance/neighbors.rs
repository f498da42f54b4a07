//! Candidate neighbor lists.
//!
//! Restricting move evaluation to the K cheapest targets of every node turns
//! an O(n²) neighborhood scan into O(n·K). Lists are built once per solve and
//! ordered by `(cost, index)` so scans are reproducible.

use super::DistanceMatrix;

/// The K cheapest outgoing targets of every node.
///
/// # Examples
///
/// ```
/// use u_tour::{DistanceMatrix, NeighborLists};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0, 9, 2, 5],
///     vec![9, 0, 4, 1],
///     vec![2, 4, 0, 3],
///     vec![5, 1, 3, 0],
/// ])?;
/// let lists = NeighborLists::build(&dm, 2);
/// assert_eq!(lists.of(0), &[2, 3]);
/// assert_eq!(lists.of(1), &[3, 2]);
/// # Ok::<(), u_tour::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct NeighborLists {
    lists: Vec<Vec<usize>>,
    k: usize,
}

impl NeighborLists {
    /// Builds lists of at most `k` neighbors per node (capped at `n - 1`).
    pub fn build(distances: &DistanceMatrix, k: usize) -> Self {
        let n = distances.size();
        let k = k.min(n.saturating_sub(1));

        let lists = (0..n)
            .map(|from| {
                let mut targets: Vec<usize> = (0..n).filter(|&to| to != from).collect();
                let key = |&to: &usize| (distances.get(from, to), to);
                if k < targets.len() {
                    targets.select_nth_unstable_by_key(k, key);
                    targets.truncate(k);
                }
                targets.sort_unstable_by_key(key);
                targets
            })
            .collect();

        Self { lists, k }
    }

    /// Builds complete lists: every other node, cheapest first.
    pub fn full(distances: &DistanceMatrix) -> Self {
        Self::build(distances, distances.size())
    }

    /// Neighbors of `node`, cheapest first.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    #[inline]
    pub fn of(&self, node: usize) -> &[usize] {
        &self.lists[node]
    }

    /// Effective list length.
    pub fn k(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0, 9, 2, 5],
            vec![9, 0, 4, 1],
            vec![2, 4, 0, 3],
            vec![5, 1, 3, 0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_lists_are_sorted_by_cost() {
        let lists = NeighborLists::build(&sample(), 3);
        assert_eq!(lists.of(0), &[2, 3, 1]);
        assert_eq!(lists.of(2), &[0, 3, 1]);
        assert_eq!(lists.k(), 3);
    }

    #[test]
    fn test_k_is_capped() {
        let lists = NeighborLists::build(&sample(), 100);
        assert_eq!(lists.k(), 3);
        assert_eq!(lists.of(3).len(), 3);
    }

    #[test]
    fn test_full_excludes_self() {
        let lists = NeighborLists::full(&sample());
        for node in 0..4 {
            assert!(!lists.of(node).contains(&node));
        }
    }

    #[test]
    fn test_ties_break_by_index() {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0, 1, 1, 1],
            vec![1, 0, 1, 1],
            vec![1, 1, 0, 1],
            vec![1, 1, 1, 0],
        ])
        .expect("valid");
        let lists = NeighborLists::build(&dm, 2);
        assert_eq!(lists.of(0), &[1, 2]);
        assert_eq!(lists.of(3), &[0, 1]);
    }

    #[test]
    fn test_uses_outgoing_costs() {
        let dm = DistanceMatrix::from_rows(vec![vec![0, 1, 8], vec![8, 0, 1], vec![1, 8, 0]])
            .expect("valid");
        let lists = NeighborLists::build(&dm, 1);
        assert_eq!(lists.of(0), &[1]);
        assert_eq!(lists.of(1), &[2]);
        assert_eq!(lists.of(2), &[0]);
    }
}
