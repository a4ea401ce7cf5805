//! # carp-routing
//!
//! Heuristic solver for the capacitated arc routing problem on mixed graphs:
//! required nodes, undirected edges and directed arcs are partitioned into
//! capacity-bounded routes that start and end at a depot.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Instance, Service, Placement, Route, Solution)
//! - [`distance`] — Dijkstra shortest paths and the cached graph model
//! - [`evaluation`] — Route cost, capacity checks and solution audit
//! - [`constructive`] — Greedy insertion construction
//! - [`local_search`] — Relocate, Swap and 2-opt under a time-budgeted engine
//! - [`vns`] — Variable neighborhood search bridge (u-metaheur)
//! - [`solver`] — End-to-end pipeline and report
//!
//! ## Quick start
//!
//! ```
//! use carp_routing::models::Instance;
//! use carp_routing::solver::{CarpSolver, SolverConfig};
//!
//! let instance = Instance::builder(10, 1)
//!     .required_node(2, 4, 1)
//!     .required_node(3, 4, 1)
//!     .required_edge(2, 3, 2, 3, 1)
//!     .edge(1, 2, 1)
//!     .edge(1, 3, 2)
//!     .build();
//!
//! let report = CarpSolver::new(&instance, SolverConfig::default())?.solve();
//! assert!(report.is_complete());
//! assert!(report.final_cost <= report.initial_cost);
//! # Ok::<(), carp_routing::CarpError>(())
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod solver;
pub mod vns;

pub use error::CarpError;
