//! VNS (Variable Neighborhood Search) bridge for arc routing.
//!
//! - [`CarpVnsProblem`] — [`VnsProblem`](u_metaheur::vns::VnsProblem)
//!   implementation: random relocation shaking around the local search engine

mod problem;

pub use problem::{CarpVnsProblem, UNSERVED_PENALTY};
