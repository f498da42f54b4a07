//! Stopping policy for a single solve.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Limits on how long one solve may keep improving its route.
///
/// Without any limit the search stops at the first local optimum, or, with
/// perturbation enabled, after `max_non_improving` unsuccessful rounds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_tour::Budget;
///
/// let budget = Budget::default()
///     .with_time_limit(Duration::from_millis(250))
///     .with_max_iterations(10_000);
/// assert_eq!(budget.max_iterations, Some(10_000));
/// assert_eq!(budget.max_non_improving, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    /// Wall-clock limit for the local search phase.
    pub time_limit: Option<Duration>,
    /// Maximum number of applied improving moves.
    pub max_iterations: Option<u64>,
    /// Consecutive perturbation rounds without a new best before stopping.
    pub max_non_improving: u64,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            time_limit: None,
            max_iterations: None,
            max_non_improving: 50,
        }
    }
}

impl Budget {
    /// No time or iteration limit.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the maximum number of applied moves.
    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the number of unsuccessful perturbation rounds tolerated.
    pub fn with_max_non_improving(mut self, n: u64) -> Self {
        self.max_non_improving = n;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let budget = Budget::default();
        assert_eq!(budget, Budget::unlimited());
        assert!(budget.time_limit.is_none());
        assert!(budget.max_iterations.is_none());
    }

    #[test]
    fn test_builders() {
        let budget = Budget::unlimited()
            .with_time_limit(Duration::from_secs(2))
            .with_max_iterations(5)
            .with_max_non_improving(3);
        assert_eq!(budget.time_limit, Some(Duration::from_secs(2)));
        assert_eq!(budget.max_iterations, Some(5));
        assert_eq!(budget.max_non_improving, 3);
    }

    #[test]
    fn test_partial_json() {
        let budget: Budget = serde_json::from_str(r#"{"max_iterations": 7}"#).expect("parse");
        assert_eq!(budget.max_iterations, Some(7));
        assert_eq!(budget.max_non_improving, 50);
    }
}
