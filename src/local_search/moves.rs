//! Move representation and shared scan plumbing.

use std::ops::ControlFlow;

use crate::distance::{Cost, DistanceMatrix, NeighborLists};
use crate::models::Route;

/// A local transformation of a route, addressed by positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Remove edges `(r[i], r[i+1])` and `(r[j], r[j+1])`, reverse `i+1..=j`.
    TwoOpt {
        /// Position before the reversed path.
        i: usize,
        /// Last position of the reversed path.
        j: usize,
    },
    /// Move `len` nodes starting at `start` behind position `after`.
    OrOpt {
        /// First position of the segment.
        start: usize,
        /// Segment length (1–3).
        len: usize,
        /// Position the segment is reinserted behind.
        after: usize,
        /// Reinsert in reverse order.
        reversed: bool,
    },
    /// Exchange the nodes at positions `i < j`.
    Swap {
        /// First position.
        i: usize,
        /// Second position.
        j: usize,
    },
}

impl Move {
    /// Applies the move to `route`.
    ///
    /// # Panics
    ///
    /// Panics if the positions do not describe a valid move on `route`.
    pub fn apply(self, route: &mut Route) {
        match self {
            Move::TwoOpt { i, j } => route.apply_reversal(i + 1, j),
            Move::OrOpt {
                start,
                len,
                after,
                reversed,
            } => route.apply_relocation(start, len, after, reversed),
            Move::Swap { i, j } => route.apply_swap(i, j),
        }
    }

    /// Change in tour length if the move were applied to `route`.
    ///
    /// Exact for any matrix; O(1) on symmetric matrices, O(path length) for
    /// 2-opt on asymmetric ones.
    pub fn delta(self, route: &Route, distances: &DistanceMatrix) -> Cost {
        match self {
            Move::TwoOpt { i, j } => {
                let mut delta = super::two_opt::edge_delta(route, distances, i, j);
                if !distances.is_symmetric() {
                    delta += path_reversal_change(route, distances, i + 1, j);
                }
                delta
            }
            Move::OrOpt {
                start,
                len,
                after,
                reversed,
            } => super::or_opt::delta(route, distances, start, len, after, reversed),
            Move::Swap { i, j } => super::swap::delta(route, distances, i, j),
        }
    }
}

/// Prefix sums of the route's path cost in both directions.
///
/// Lets 2-opt price the reversal of an arbitrary path in O(1) on asymmetric
/// matrices. Must be rebuilt whenever the route changes.
#[derive(Debug)]
pub(crate) struct PathCosts {
    forward: Vec<Cost>,
    backward: Vec<Cost>,
}

impl PathCosts {
    pub(crate) fn build(route: &Route, distances: &DistanceMatrix) -> Self {
        let n = route.len();
        let mut forward = Vec::with_capacity(n);
        let mut backward = Vec::with_capacity(n);
        forward.push(0);
        backward.push(0);
        for p in 1..n {
            let (a, b) = (route.node_at(p - 1), route.node_at(p));
            forward.push(forward[p - 1] + distances.get(a, b));
            backward.push(backward[p - 1] + distances.get(b, a));
        }
        Self { forward, backward }
    }

    /// Cost change from traversing positions `from..=to` backwards.
    #[inline]
    pub(crate) fn reversal_change(&self, from: usize, to: usize) -> Cost {
        (self.backward[to] - self.backward[from]) - (self.forward[to] - self.forward[from])
    }
}

/// Cost change from traversing positions `from..=to` backwards, by direct
/// summation.
pub(crate) fn path_reversal_change(
    route: &Route,
    distances: &DistanceMatrix,
    from: usize,
    to: usize,
) -> Cost {
    (from..to)
        .map(|p| {
            let (a, b) = (route.node_at(p), route.node_at(p + 1));
            distances.get(b, a) - distances.get(a, b)
        })
        .sum()
}

/// Everything a scanner needs besides the route.
pub(crate) struct ScanContext<'a> {
    pub distances: &'a DistanceMatrix,
    pub neighbors: &'a NeighborLists,
    /// Present only for asymmetric matrices.
    pub paths: Option<&'a PathCosts>,
}

/// Receives every candidate move with its delta; `Break` ends the scan.
pub(crate) type Visitor<'v> = dyn FnMut(Move, Cost) -> ControlFlow<()> + 'v;
