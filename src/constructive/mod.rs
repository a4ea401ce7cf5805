//! Constructive heuristics for building initial CARP solutions.
//!
//! - [`greedy_insertion`] — Route-by-route cheapest-next-service insertion, O(S²)

mod greedy_insertion;

pub use greedy_insertion::greedy_insertion;
