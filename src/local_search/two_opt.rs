//! 2-opt edge exchange.
//!
//! # Algorithm
//!
//! For positions `i + 2 <= j`, remove edges `(r[i], r[i+1])` and
//! `(r[j], r[j+1])` and reconnect by reversing the path between them:
//!
//! ```text
//! delta = d(r[i], r[j]) + d(r[i+1], r[j+1]) - d(r[i], r[i+1]) - d(r[j], r[j+1])
//! ```
//!
//! plus, on asymmetric matrices, the cost difference of walking the reversed
//! path backwards. Candidate pairs come from the neighbor lists: for the node
//! `a` at position `p`, every listed neighbor `c` at position `q` proposes the
//! two moves that create the edge `a–c`, one reconnecting the successors
//! (`i = p`, `j = q`) and one reconnecting the predecessors
//! (`i = p - 1`, `j = q - 1`).
//!
//! # Complexity
//!
//! O(n·K) per scan with K candidates per node.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use std::ops::ControlFlow;

use super::moves::{Move, ScanContext, Visitor};
use crate::distance::{Cost, DistanceMatrix};
use crate::models::Route;

/// Offers every candidate 2-opt move to `visit`, positions ascending.
pub(crate) fn scan(route: &Route, ctx: &ScanContext<'_>, visit: &mut Visitor<'_>) -> ControlFlow<()> {
    let n = route.len();
    if n < 3 {
        return ControlFlow::Continue(());
    }

    for p in 0..n {
        let a = route.node_at(p);
        for &c in ctx.neighbors.of(a) {
            let q = route.position_of(c);
            // a–c joined with the successors reconnected
            offer(route, ctx, visit, p, q)?;
            // a–c joined with the predecessors reconnected
            offer(route, ctx, visit, (p + n - 1) % n, (q + n - 1) % n)?;
        }
    }
    ControlFlow::Continue(())
}

fn offer(
    route: &Route,
    ctx: &ScanContext<'_>,
    visit: &mut Visitor<'_>,
    x: usize,
    y: usize,
) -> ControlFlow<()> {
    let (i, j) = if x < y { (x, y) } else { (y, x) };
    if j < i + 2 {
        return ControlFlow::Continue(());
    }
    let mut delta = edge_delta(route, ctx.distances, i, j);
    if let Some(paths) = ctx.paths {
        delta += paths.reversal_change(i + 1, j);
    }
    visit(Move::TwoOpt { i, j }, delta)
}

/// Change in the two exchanged edges only.
///
/// Before: `r[i] → r[i+1] ... r[j] → r[j+1]`
/// After:  `r[i] → r[j] ... r[i+1] → r[j+1]`
#[inline]
pub(crate) fn edge_delta(route: &Route, distances: &DistanceMatrix, i: usize, j: usize) -> Cost {
    let n = route.len();
    let a = route.node_at(i);
    let b = route.node_at(i + 1);
    let c = route.node_at(j);
    let d = route.node_at((j + 1) % n);

    distances.get(a, c) + distances.get(b, d) - distances.get(a, b) - distances.get(c, d)
}
