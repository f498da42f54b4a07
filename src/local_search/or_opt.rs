//! Or-opt segment relocation.
//!
//! # Algorithm
//!
//! Takes a segment of 1, 2, or 3 consecutive nodes out of the tour, closes
//! the gap, and reinserts the segment between two other consecutive nodes,
//! either in its original orientation or reversed:
//!
//! ```text
//! removal   = d(p, s1) + d(sL, q) - d(p, q)
//! insertion = d(u, s1) + d(sL, v) - d(u, v)        (forward)
//!           | d(u, sL) + d(s1, v) - d(u, v) + rev  (reversed)
//! delta     = insertion - removal
//! ```
//!
//! Insertion points are drawn from the neighbor lists of the segment's end
//! nodes, so every proposed move creates an edge to a listed neighbor.
//! Segments do not wrap past the end of the sequence.
//!
//! # Complexity
//!
//! O(n·K) per scan with K candidates per node.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use std::ops::ControlFlow;

use super::moves::{Move, ScanContext, Visitor};
use crate::distance::{Cost, DistanceMatrix};
use crate::models::Route;

/// Longest segment moved as a unit.
pub const MAX_SEGMENT_LEN: usize = 3;

/// Offers every candidate relocation to `visit`: shorter segments first,
/// then ascending start position.
pub(crate) fn scan(route: &Route, ctx: &ScanContext<'_>, visit: &mut Visitor<'_>) -> ControlFlow<()> {
    let n = route.len();

    for len in 1..=MAX_SEGMENT_LEN {
        if n < len + 2 {
            break;
        }
        // A single node has no orientation.
        let flip = len > 1;

        for start in 0..=(n - len) {
            let end = start + len - 1;
            let before = (start + n - 1) % n;
            let outside = |pos: usize| pos < start || pos > end;
            let allowed = |pos: usize| outside(pos) && pos != before;

            let first = route.node_at(start);
            for &c in ctx.neighbors.of(first) {
                let pc = route.position_of(c);
                if !outside(pc) {
                    continue;
                }
                // c -> first
                if allowed(pc) {
                    offer(route, ctx, visit, start, len, pc, false)?;
                }
                // first -> c
                let pred = (pc + n - 1) % n;
                if allowed(pred) {
                    offer(route, ctx, visit, start, len, pred, flip)?;
                }
            }

            if !flip {
                continue;
            }
            let last = route.node_at(end);
            for &c in ctx.neighbors.of(last) {
                let pc = route.position_of(c);
                if !outside(pc) {
                    continue;
                }
                // last -> c
                let pred = (pc + n - 1) % n;
                if allowed(pred) {
                    offer(route, ctx, visit, start, len, pred, false)?;
                }
                // c -> last
                if allowed(pc) {
                    offer(route, ctx, visit, start, len, pc, true)?;
                }
            }
        }
    }
    ControlFlow::Continue(())
}

fn offer(
    route: &Route,
    ctx: &ScanContext<'_>,
    visit: &mut Visitor<'_>,
    start: usize,
    len: usize,
    after: usize,
    reversed: bool,
) -> ControlFlow<()> {
    let mv = Move::OrOpt {
        start,
        len,
        after,
        reversed,
    };
    visit(mv, delta(route, ctx.distances, start, len, after, reversed))
}

/// Cost change of moving `start..start+len` behind position `after`.
///
/// `after` must lie outside the segment and must not be the position right
/// before it.
pub(crate) fn delta(
    route: &Route,
    distances: &DistanceMatrix,
    start: usize,
    len: usize,
    after: usize,
    reversed: bool,
) -> Cost {
    let n = route.len();
    let first = route.node_at(start);
    let last = route.node_at(start + len - 1);
    let prev = route.node_at((start + n - 1) % n);
    let next = route.node_at((start + len) % n);
    let u = route.node_at(after);
    let v = route.node_at((after + 1) % n);

    let removal = distances.get(prev, first) + distances.get(last, next) - distances.get(prev, next);
    let insertion = if reversed {
        distances.get(u, last) + distances.get(first, v)
            + super::moves::path_reversal_change(route, distances, start, start + len - 1)
    } else {
        distances.get(u, first) + distances.get(last, v)
    } - distances.get(u, v);

    insertion - removal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::NeighborLists;

    fn grid(points: &[(i64, i64)]) -> DistanceMatrix {
        let rows = points
            .iter()
            .map(|&(ax, ay)| {
                points
                    .iter()
                    .map(|&(bx, by)| (ax - bx).abs() + (ay - by).abs())
                    .collect()
            })
            .collect();
        DistanceMatrix::from_rows(rows).expect("valid")
    }

    fn collect(route: &Route, dm: &DistanceMatrix, k: usize) -> Vec<(Move, Cost)> {
        let neighbors = NeighborLists::build(dm, k);
        let ctx = ScanContext {
            distances: dm,
            neighbors: &neighbors,
            paths: None,
        };
        let mut seen = Vec::new();
        let _ = scan(route, &ctx, &mut |mv, delta| {
            seen.push((mv, delta));
            ControlFlow::Continue(())
        });
        seen
    }

    #[test]
    fn test_moves_misplaced_node_home() {
        // Points on a line; nodes 4 and 1 (x=1, x=2) visited out of place.
        let dm = grid(&[(0, 0), (2, 0), (3, 0), (4, 0), (1, 0)]);
        let route = Route::new(vec![0, 2, 4, 1, 3]).expect("valid");
        assert_eq!(route.length(&dm), 12);
        let moves = collect(&route, &dm, 4);
        let (mv, d) = *moves.iter().min_by_key(|(_, d)| *d).expect("some move");
        assert!(d < 0);

        let mut fixed = route.clone();
        mv.apply(&mut fixed);
        assert_eq!(fixed.length(&dm), route.length(&dm) + d);
        assert_eq!(fixed.length(&dm), 8);
    }

    #[test]
    fn test_every_delta_is_exact() {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0, 3, 9, 4, 7, 1, 6],
            vec![1, 0, 2, 8, 6, 5, 3],
            vec![5, 7, 0, 1, 3, 9, 2],
            vec![2, 9, 6, 0, 4, 2, 8],
            vec![8, 2, 5, 3, 0, 6, 1],
            vec![4, 4, 1, 7, 2, 0, 5],
            vec![3, 6, 8, 2, 9, 4, 0],
        ])
        .expect("valid");
        let route = Route::new(vec![6, 2, 5, 3, 0, 4, 1]).expect("valid");
        let before = route.length(&dm);
        let moves = collect(&route, &dm, 6);
        assert!(moves.len() > 20);
        for (mv, d) in moves {
            let mut changed = route.clone();
            mv.apply(&mut changed);
            assert!(changed.is_permutation());
            assert_eq!(changed.length(&dm) - before, d, "{mv:?}");
            assert_ne!(changed, route, "no-op proposed: {mv:?}");
        }
    }

    #[test]
    fn test_small_routes() {
        let dm = grid(&[(0, 0), (0, 1)]);
        assert!(collect(&Route::identity(2), &dm, 1).is_empty());

        let dm = grid(&[(0, 0), (0, 1), (1, 1)]);
        let moves = collect(&Route::identity(3), &dm, 2);
        assert!(moves.iter().all(|(mv, _)| matches!(mv, Move::OrOpt { len: 1, .. })));
    }
}
