//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::{InputViolation, Result};

/// Which improving move is applied after a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Apply the first improving move found, then rescan.
    #[default]
    FirstImprovement,
    /// Scan every candidate and apply the most improving one.
    BestImprovement,
}

/// A move family scanned by local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// Remove two edges and reverse the path between them.
    TwoOpt,
    /// Move a segment of 1–3 nodes elsewhere, optionally reversed.
    OrOpt,
    /// Exchange the positions of two nodes.
    Swap,
}

/// How the starting route is built on a cold start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Construction {
    /// Greedy nearest neighbor from `start`, ties to the lowest index.
    NearestNeighbor {
        /// First node of the tour.
        start: usize,
    },
    /// The visiting order `0, 1, ..., n-1`.
    Identity,
}

impl Default for Construction {
    fn default() -> Self {
        Self::NearestNeighbor { start: 0 }
    }
}

/// Escape from local optima once the descent stalls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perturbation {
    /// Random double-bridge kick followed by a new descent; the better of
    /// the two routes is kept. Cut points come from a generator seeded with
    /// `seed`.
    DoubleBridge {
        /// Generator seed.
        seed: u64,
    },
}

/// Configuration for [`Solver`](crate::Solver).
///
/// # Examples
///
/// ```
/// use u_tour::{Neighborhood, SolverConfig, Strategy};
///
/// let config = SolverConfig::default()
///     .with_strategy(Strategy::BestImprovement)
///     .with_neighbor_candidates(Some(8))
///     .with_neighborhoods(vec![Neighborhood::TwoOpt, Neighborhood::OrOpt, Neighborhood::Swap])
///     .with_seed(7);
/// assert_eq!(config.neighbor_candidates, Some(8));
/// assert!(config.perturbation.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// First- or best-improvement.
    pub strategy: Strategy,
    /// Move families, scanned in this order.
    pub neighborhoods: Vec<Neighborhood>,
    /// Candidate list length per node; `None` scans every pair.
    pub neighbor_candidates: Option<usize>,
    /// Cold-start construction.
    pub construction: Construction,
    /// Optional seeded perturbation layer.
    pub perturbation: Option<Perturbation>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::FirstImprovement,
            neighborhoods: vec![Neighborhood::TwoOpt, Neighborhood::OrOpt],
            neighbor_candidates: Some(16),
            construction: Construction::default(),
            perturbation: None,
        }
    }
}

impl SolverConfig {
    /// Sets the improvement strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the scanned move families and their order.
    pub fn with_neighborhoods(mut self, neighborhoods: Vec<Neighborhood>) -> Self {
        self.neighborhoods = neighborhoods;
        self
    }

    /// Sets the candidate list length (`None` for a full scan).
    pub fn with_neighbor_candidates(mut self, k: Option<usize>) -> Self {
        self.neighbor_candidates = k;
        self
    }

    /// Sets the cold-start construction.
    pub fn with_construction(mut self, construction: Construction) -> Self {
        self.construction = construction;
        self
    }

    /// Enables double-bridge perturbation with the given seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.perturbation = Some(Perturbation::DoubleBridge { seed });
        self
    }

    /// Checks settings that do not depend on the instance.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.neighborhoods.is_empty() {
            return Err(InputViolation::invalid_config("at least one neighborhood is required").into());
        }
        if self.neighbor_candidates == Some(0) {
            return Err(InputViolation::invalid_config("neighbor_candidates must be positive").into());
        }
        Ok(())
    }
}
