//! Node swap.
//!
//! # Algorithm
//!
//! Exchanges the positions of two nodes. The delta sums the outgoing edges
//! of the (at most four) positions whose successor changes, before and after
//! the exchange, which covers adjacent pairs and the wrap-around pair
//! without special cases.
//!
//! # Complexity
//!
//! O(n·K) per scan with K candidates per node.

use std::ops::ControlFlow;

use super::moves::{Move, ScanContext, Visitor};
use crate::distance::{Cost, DistanceMatrix};
use crate::models::Route;

/// Offers every candidate swap to `visit`, positions ascending.
pub(crate) fn scan(route: &Route, ctx: &ScanContext<'_>, visit: &mut Visitor<'_>) -> ControlFlow<()> {
    let n = route.len();
    if n < 3 {
        return ControlFlow::Continue(());
    }

    for p in 0..n {
        let a = route.node_at(p);
        for &c in ctx.neighbors.of(a) {
            let q = route.position_of(c);
            let (i, j) = if p < q { (p, q) } else { (q, p) };
            visit(Move::Swap { i, j }, delta(route, ctx.distances, i, j))?;
        }
    }
    ControlFlow::Continue(())
}

/// Cost change of exchanging the nodes at positions `i` and `j`.
pub(crate) fn delta(route: &Route, distances: &DistanceMatrix, i: usize, j: usize) -> Cost {
    let n = route.len();
    let node = |pos: usize| route.node_at(pos);
    let swapped = |pos: usize| {
        if pos == i {
            route.node_at(j)
        } else if pos == j {
            route.node_at(i)
        } else {
            route.node_at(pos)
        }
    };

    // Positions whose outgoing edge changes.
    let mut touched = [(i + n - 1) % n, i, (j + n - 1) % n, j];
    touched.sort_unstable();

    let mut delta = 0;
    for (k, &pos) in touched.iter().enumerate() {
        if k > 0 && touched[k - 1] == pos {
            continue;
        }
        let next = (pos + 1) % n;
        delta += distances.get(swapped(pos), swapped(next)) - distances.get(node(pos), node(next));
    }
    delta
}
