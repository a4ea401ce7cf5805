//! Local search operators and the improvement engine.
//!
//! - [`relocate`](best_relocate) — Inter-route service relocation
//! - [`swap`](best_swap) — Inter-route service exchange
//! - [`two_opt`](two_opt_route) — Intra-route segment reversal
//! - [`LocalSearchEngine`] — Best-improvement loop over the three with a
//!   wall-clock budget

mod config;
mod engine;
mod relocate;
mod swap;
mod two_opt;

pub use config::SearchConfig;
pub use engine::{LocalSearchEngine, Neighborhood, SearchOutcome, Termination};
pub use relocate::{apply_relocate, best_relocate, Relocate, RelocateMove};
pub use swap::{apply_swap, best_swap, Swap, SwapMove};
pub use two_opt::{two_opt_route, TwoOpt};
