//! Travel costs between nodes.
//!
//! Provides the validated cost matrix and the candidate neighbor lists that
//! local search draws its moves from.

mod matrix;
mod neighbors;

pub use matrix::{Cost, DistanceMatrix};
pub use neighbors::NeighborLists;
