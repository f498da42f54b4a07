//! Domain model types for the tour solver.
//!
//! A [`Route`] is the permutation being optimized, a [`Budget`] bounds one
//! solve, and a [`SolveResult`] is what the caller gets back.

mod budget;
mod result;
mod route;

pub use budget::Budget;
pub use result::{SolveResult, StopReason};
pub use route::Route;
