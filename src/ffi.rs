//! C ABI boundary speaking JSON.
//!
//! Enabled with the `ffi` feature. A request is a JSON object:
//!
//! ```json
//! {
//!   "distance_matrix": [[0, 5], [5, 0]],
//!   "init_route": [1, 0],
//!   "time_limit_ms": 100,
//!   "max_iterations": 1000,
//!   "config": { "strategy": "best_improvement" }
//! }
//! ```
//!
//! Only `distance_matrix` is required. The response is either
//! `{"ok": <SolveResult>}` or `{"error": "<message>"}`.
//!
//! # Memory Management
//!
//! Strings returned by [`u_tour_solve_json`] are allocated by Rust and must
//! be released with [`u_tour_free_string`].

use std::ffi::{CStr, CString};
use std::ptr;
use std::time::Duration;

use libc::c_char;
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::distance::Cost;
use crate::models::{Budget, SolveResult};
use crate::solver::Solver;

/// A solve call as received over the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct SolveRequest {
    /// Square, non-negative cost matrix.
    pub distance_matrix: Vec<Vec<Cost>>,
    /// Warm-start route.
    #[serde(default)]
    pub init_route: Option<Vec<usize>>,
    /// Wall-clock limit for the search, in milliseconds.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
    /// Cap on applied improving moves.
    #[serde(default)]
    pub max_iterations: Option<u64>,
    /// Consecutive unsuccessful kicks allowed when perturbation is on.
    #[serde(default)]
    pub max_non_improving: Option<u64>,
    /// Solver settings; missing fields take their defaults.
    #[serde(default)]
    pub config: SolverConfig,
}

impl SolveRequest {
    fn budget(&self) -> Option<Budget> {
        if self.time_limit_ms.is_none() && self.max_iterations.is_none() && self.max_non_improving.is_none() {
            return None;
        }
        let mut budget = Budget::unlimited();
        budget.time_limit = self.time_limit_ms.map(Duration::from_millis);
        budget.max_iterations = self.max_iterations;
        if let Some(limit) = self.max_non_improving {
            budget.max_non_improving = limit;
        }
        Some(budget)
    }
}

/// The reply sent back over the boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveResponse {
    /// The solve succeeded.
    Ok(SolveResult),
    /// The request was malformed or rejected.
    Error(String),
}

/// Solves a JSON request and returns the JSON response.
///
/// # Examples
///
/// ```
/// let reply = u_tour::ffi::solve_json(r#"{"distance_matrix": [[0, 5], [5, 0]]}"#);
/// assert!(reply.starts_with(r#"{"ok":"#));
/// ```
pub fn solve_json(request: &str) -> String {
    let response = match serde_json::from_str::<SolveRequest>(request) {
        Ok(request) => {
            let budget = request.budget();
            match Solver::new(request.config).solve(request.distance_matrix, request.init_route, budget) {
                Ok(result) => SolveResponse::Ok(result),
                Err(err) => SolveResponse::Error(err.to_string()),
            }
        }
        Err(err) => SolveResponse::Error(format!("invalid request: {err}")),
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|err| format!(r#"{{"error":"failed to encode response: {err}"}}"#))
}

/// Solves the null-terminated JSON request in `request`.
///
/// Returns a newly allocated JSON response, or NULL if `request` is NULL or
/// not valid UTF-8.
///
/// # Safety
///
/// `request` must be NULL or point to a valid null-terminated string that
/// stays alive for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn u_tour_solve_json(request: *const c_char) -> *mut c_char {
    if request.is_null() {
        return ptr::null_mut();
    }
    let request = match CStr::from_ptr(request).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };
    match CString::new(solve_json(request)) {
        Ok(reply) => reply.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Releases a string returned by [`u_tour_solve_json`].
///
/// # Safety
///
/// `reply` must be NULL or a pointer obtained from [`u_tour_solve_json`]
/// that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn u_tour_free_string(reply: *mut c_char) {
    if !reply.is_null() {
        drop(CString::from_raw(reply));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn reply(request: &str) -> Value {
        serde_json::from_str(&solve_json(request)).expect("valid json")
    }

    #[test]
    fn test_solve_json_ok() {
        let value = reply(
            r#"{"distance_matrix": [[0, 2, 1], [40, 0, 30], [600, 500, 0]], "time_limit_ms": 50}"#,
        );
        assert_eq!(value["ok"]["distance"], 541);
        assert_eq!(value["ok"]["route"], serde_json::json!([0, 2, 1]));
    }

    #[test]
    fn test_solve_json_warm_start_and_config() {
        let value = reply(
            r#"{
                "distance_matrix": [[0,10,14,10],[10,0,10,14],[14,10,0,10],[10,14,10,0]],
                "init_route": [0, 2, 1, 3],
                "config": {"strategy": "best_improvement", "neighbor_candidates": null}
            }"#,
        );
        assert_eq!(value["ok"]["distance"], 40);
        assert_eq!(value["ok"]["warm_start"], true);
    }

    #[test]
    fn test_solve_json_invalid_input() {
        let value = reply(r#"{"distance_matrix": [[0, 1], [1, 0]], "init_route": [0, 0]}"#);
        let message = value["error"].as_str().expect("error message");
        assert!(message.starts_with("invalid input"), "{message}");
    }

    #[test]
    fn test_solve_json_malformed() {
        let value = reply(r#"{"matrix": []}"#);
        assert!(value["error"].as_str().expect("error").starts_with("invalid request"));
    }

    #[test]
    fn test_c_roundtrip() {
        let request = CString::new(r#"{"distance_matrix": [[0, 3], [4, 0]]}"#).expect("cstring");
        unsafe {
            let raw = u_tour_solve_json(request.as_ptr());
            assert!(!raw.is_null());
            let text = CStr::from_ptr(raw).to_str().expect("utf8").to_owned();
            u_tour_free_string(raw);
            assert!(text.contains(r#""distance":7"#));
        }
        unsafe {
            assert!(u_tour_solve_json(ptr::null()).is_null());
            u_tour_free_string(ptr::null_mut());
        }
    }
}
