//! Constructive heuristics for cold-start tours.
//!
//! - [`nearest_neighbor`]: Greedy nearest-neighbor tour, O(n²)
//! - [`build_initial_route`]: Dispatches on [`Construction`]

mod nearest_neighbor;

pub use nearest_neighbor::nearest_neighbor;

use crate::config::Construction;
use crate::distance::DistanceMatrix;
use crate::error::{InputViolation, Result};
use crate::models::Route;

/// Builds the starting route for a cold start.
///
/// # Errors
///
/// [`InputViolation::StartOutOfRange`] if a nearest-neighbor start node is
/// not part of the matrix.
pub fn build_initial_route(distances: &DistanceMatrix, construction: Construction) -> Result<Route> {
    let n = distances.size();
    let route = match construction {
        Construction::NearestNeighbor { start } => {
            if start >= n {
                return Err(InputViolation::StartOutOfRange { start, nodes: n }.into());
            }
            nearest_neighbor(distances, start)
        }
        Construction::Identity => Route::identity(n),
    };
    log::debug!(
        "constructed {:?} tour over {} nodes, length {}",
        construction,
        n,
        route.length(distances)
    );
    Ok(route)
}
