//! Local search over a single tour.
//!
//! - [`LocalSearch`]: first- or best-improvement descent with optional
//!   seeded double-bridge restarts
//! - `two_opt`: 2-opt edge exchange
//! - `or_opt`: Or-opt relocation of 1–3 node segments
//! - `swap`: pairwise node exchange
//! - [`double_bridge`]: perturbation kick

mod engine;
mod moves;
mod or_opt;
mod perturbation;
mod swap;
mod two_opt;

pub use engine::{CancelToken, LocalSearch, SearchOutcome};
pub use moves::Move;
pub use or_opt::MAX_SEGMENT_LEN;
pub use perturbation::{double_bridge, MIN_NODES as DOUBLE_BRIDGE_MIN_NODES};
