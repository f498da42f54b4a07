//! Route representation.

use serde::{Deserialize, Serialize};

use crate::distance::{Cost, DistanceMatrix};
use crate::error::{Error, InputViolation, Result};

/// A cyclic visiting order: a permutation of `0..n`.
///
/// The last node connects back to the first. Alongside the sequence the
/// route keeps a position index so successor, predecessor and position
/// lookups are O(1). Every constructor validates the permutation and every
/// mutation preserves it.
///
/// Serializes as the plain node sequence.
///
/// # Examples
///
/// ```
/// use u_tour::Route;
///
/// let mut route = Route::new(vec![0, 3, 2, 1])?;
/// assert_eq!(route.position_of(2), 2);
/// assert_eq!(route.successor(1), 0);
///
/// route.apply_reversal(1, 3);
/// assert_eq!(route.nodes(), &[0, 1, 2, 3]);
/// # Ok::<(), u_tour::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Route {
    sequence: Vec<usize>,
    positions: Vec<usize>,
}

impl Route {
    /// Validates `sequence` as a permutation of `0..sequence.len()`.
    ///
    /// # Errors
    ///
    /// [`InputViolation::TooFewNodes`] below two nodes,
    /// [`InputViolation::NodeOutOfRange`] or [`InputViolation::DuplicateNode`]
    /// for the first offending position.
    pub fn new(sequence: Vec<usize>) -> Result<Self> {
        let n = sequence.len();
        if n < 2 {
            return Err(InputViolation::TooFewNodes { nodes: n }.into());
        }

        let mut positions = vec![usize::MAX; n];
        for (position, &node) in sequence.iter().enumerate() {
            if node >= n {
                return Err(InputViolation::NodeOutOfRange {
                    position,
                    node,
                    nodes: n,
                }
                .into());
            }
            if positions[node] != usize::MAX {
                return Err(InputViolation::DuplicateNode {
                    node,
                    first: positions[node],
                    second: position,
                }
                .into());
            }
            positions[node] = position;
        }

        Ok(Self {
            sequence,
            positions,
        })
    }

    /// Validates `sequence` against a matrix of `nodes` nodes.
    ///
    /// The length is checked first so an off-by-one concatenation reports a
    /// length mismatch or an out-of-range index rather than a duplicate.
    ///
    /// # Errors
    ///
    /// [`InputViolation::RouteLengthMismatch`] plus everything
    /// [`Route::new`] reports.
    pub fn with_size(sequence: Vec<usize>, nodes: usize) -> Result<Self> {
        if sequence.len() != nodes {
            return Err(InputViolation::RouteLengthMismatch {
                found: sequence.len(),
                expected: nodes,
            }
            .into());
        }
        Self::new(sequence)
    }

    /// The route `0, 1, ..., n-1`.
    ///
    /// # Panics
    ///
    /// Panics if `n < 2`.
    pub fn identity(n: usize) -> Self {
        assert!(n >= 2, "a route needs at least 2 nodes");
        Self {
            sequence: (0..n).collect(),
            positions: (0..n).collect(),
        }
    }

    /// Wraps a sequence already known to be a permutation.
    pub(crate) fn from_permutation(sequence: Vec<usize>) -> Self {
        let mut positions = vec![0; sequence.len()];
        for (position, &node) in sequence.iter().enumerate() {
            positions[node] = position;
        }
        let route = Self {
            sequence,
            positions,
        };
        debug_assert!(route.is_permutation());
        route
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Always `false`: a valid route has at least two nodes.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The visiting order.
    pub fn nodes(&self) -> &[usize] {
        &self.sequence
    }

    /// Consumes the route, returning the visiting order.
    pub fn into_vec(self) -> Vec<usize> {
        self.sequence
    }

    /// Node visited at `position`.
    #[inline]
    pub fn node_at(&self, position: usize) -> usize {
        self.sequence[position]
    }

    /// Position of `node` in the visiting order.
    #[inline]
    pub fn position_of(&self, node: usize) -> usize {
        self.positions[node]
    }

    /// Node visited after `node`, wrapping to the start.
    pub fn successor(&self, node: usize) -> usize {
        let next = (self.positions[node] + 1) % self.len();
        self.sequence[next]
    }

    /// Node visited before `node`, wrapping to the end.
    pub fn predecessor(&self, node: usize) -> usize {
        let n = self.len();
        let prev = (self.positions[node] + n - 1) % n;
        self.sequence[prev]
    }

    /// Cyclic tour length including the closing edge.
    pub fn length(&self, distances: &DistanceMatrix) -> Cost {
        let closing = distances.get(self.sequence[self.len() - 1], self.sequence[0]);
        self.sequence
            .windows(2)
            .map(|w| distances.get(w[0], w[1]))
            .sum::<Cost>()
            + closing
    }

    /// Reverses the nodes at positions `i..=j`.
    ///
    /// # Panics
    ///
    /// Panics unless `i <= j < len()`.
    pub fn apply_reversal(&mut self, i: usize, j: usize) {
        assert!(i <= j && j < self.len(), "invalid reversal {i}..={j}");
        self.sequence[i..=j].reverse();
        self.reindex(i, j);
    }

    /// Moves the `len` nodes starting at position `start` so they follow the
    /// node currently at position `after`, optionally reversing them.
    ///
    /// # Panics
    ///
    /// Panics if the segment runs past the end of the sequence, covers the
    /// whole route, or contains `after`.
    pub fn apply_relocation(&mut self, start: usize, len: usize, after: usize, reversed: bool) {
        let n = self.len();
        assert!(
            len >= 1 && len < n && start + len <= n,
            "invalid segment {start}+{len} for {n} nodes"
        );
        assert!(
            after < n && (after < start || after >= start + len),
            "insertion point {after} lies inside segment {start}+{len}"
        );

        let mut segment: Vec<usize> = self.sequence.drain(start..start + len).collect();
        if reversed {
            segment.reverse();
        }
        let insert_at = if after < start { after + 1 } else { after + 1 - len };
        self.sequence.splice(insert_at..insert_at, segment);

        self.reindex(start.min(after), (start + len - 1).max(after));
    }

    /// Exchanges the nodes at positions `i` and `j`.
    pub fn apply_swap(&mut self, i: usize, j: usize) {
        self.sequence.swap(i, j);
        self.positions[self.sequence[i]] = i;
        self.positions[self.sequence[j]] = j;
    }

    /// Double-bridge reconnection: `A B C D` becomes `A C B D` where the
    /// cuts sit at positions `p1 < p2 < p3`.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < p1 < p2 < p3 < len()`.
    pub fn apply_double_bridge(&mut self, p1: usize, p2: usize, p3: usize) {
        assert!(
            0 < p1 && p1 < p2 && p2 < p3 && p3 < self.len(),
            "invalid double bridge cuts {p1}, {p2}, {p3}"
        );
        self.sequence[p1..p3].rotate_left(p2 - p1);
        self.reindex(p1, p3 - 1);
    }

    /// Checks that the sequence is a permutation and the index agrees.
    pub fn is_permutation(&self) -> bool {
        let n = self.len();
        let mut seen = vec![false; n];
        for (position, &node) in self.sequence.iter().enumerate() {
            if node >= n || seen[node] || self.positions[node] != position {
                return false;
            }
            seen[node] = true;
        }
        true
    }

    fn reindex(&mut self, from: usize, to: usize) {
        for position in from..=to {
            self.positions[self.sequence[position]] = position;
        }
    }
}

impl TryFrom<Vec<usize>> for Route {
    type Error = Error;

    fn try_from(sequence: Vec<usize>) -> Result<Self> {
        Self::new(sequence)
    }
}

impl From<Route> for Vec<usize> {
    fn from(route: Route) -> Self {
        route.sequence
    }
}

impl AsRef<[usize]> for Route {
    fn as_ref(&self) -> &[usize] {
        &self.sequence
    }
}
