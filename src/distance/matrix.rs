//! Dense distance matrix.

use crate::error::{InputViolation, Result};

/// Integer travel cost between two nodes.
pub type Cost = i64;

/// A dense, validated n×n cost matrix stored in row-major order.
///
/// Costs are non-negative integers and need not be symmetric. The matrix is
/// immutable once built; the diagonal is never read by the solver.
///
/// # Examples
///
/// ```
/// use u_tour::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0, 3, 4],
///     vec![3, 0, 5],
///     vec![4, 5, 0],
/// ])?;
/// assert_eq!(dm.get(0, 2), 4);
/// assert_eq!(dm.size(), 3);
/// assert!(dm.is_symmetric());
/// # Ok::<(), u_tour::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<Cost>,
    size: usize,
    symmetric: bool,
}

impl DistanceMatrix {
    /// Builds a matrix from one row per node.
    ///
    /// # Errors
    ///
    /// [`InputViolation::TooFewNodes`] below two rows,
    /// [`InputViolation::NotSquare`] if any row length differs from the row
    /// count, [`InputViolation::NegativeCost`] for any entry below zero,
    /// [`InputViolation::CostOverflow`] if costs are too large for tour
    /// lengths over this many nodes to stay in range.
    pub fn from_rows(rows: Vec<Vec<Cost>>) -> Result<Self> {
        let size = rows.len();
        if size < 2 {
            return Err(InputViolation::TooFewNodes { nodes: size }.into());
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(InputViolation::NotSquare {
                    row,
                    found: values.len(),
                    expected: size,
                }
                .into());
            }
        }
        Self::from_data(size, rows.into_iter().flatten().collect())
    }

    /// Builds a matrix from a flat row-major grid of `size * size` entries.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DistanceMatrix::from_rows`]; a grid of the wrong
    /// length reports the first short or overlong row.
    pub fn from_data(size: usize, data: Vec<Cost>) -> Result<Self> {
        if size < 2 {
            return Err(InputViolation::TooFewNodes { nodes: size }.into());
        }
        if data.len() != size * size {
            let row = (data.len() / size).min(size - 1);
            return Err(InputViolation::NotSquare {
                row,
                found: data.len().saturating_sub(row * size),
                expected: size,
            }
            .into());
        }
        if let Some(idx) = data.iter().position(|&c| c < 0) {
            return Err(InputViolation::NegativeCost {
                from: idx / size,
                to: idx % size,
                cost: data[idx],
            }
            .into());
        }
        let max = data.iter().copied().max().unwrap_or(0);
        if !fits_tour_arithmetic(max, size) {
            return Err(InputViolation::CostOverflow { max, nodes: size }.into());
        }

        let mut dm = Self {
            data,
            size,
            symmetric: false,
        };
        dm.symmetric = dm.check_symmetric();
        Ok(dm)
    }

    /// Returns the cost of travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> Cost {
        self.data[from * self.size + to]
    }

    /// Number of nodes in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `get(i, j) == get(j, i)` for every pair.
    ///
    /// Computed once at construction.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Returns the cheapest target from `from` among `candidates`.
    ///
    /// Ties go to the candidate listed first. Returns `None` if `candidates`
    /// is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by_key(|&to| self.get(from, to))
    }

    fn check_symmetric(&self) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }
}

/// Tour lengths are at most `n * max`; a 2-opt delta on an asymmetric matrix
/// combines two path sums and four edges, so `(2n + 4) * max` must fit.
fn fits_tour_arithmetic(max: Cost, size: usize) -> bool {
    Cost::try_from(size)
        .ok()
        .and_then(|n| n.checked_mul(2))
        .and_then(|n| n.checked_add(4))
        .and_then(|terms| terms.checked_mul(max))
        .is_some()
}
