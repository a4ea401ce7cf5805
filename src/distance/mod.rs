//! Shortest-path distances over the instance graph.
//!
//! - [`shortest_paths`] — single-source Dijkstra over an [`Adjacency`]
//! - [`GraphModel`] — the instance graph with a per-source distance cache
//!   and route cost evaluation

mod dijkstra;
mod graph;

pub use dijkstra::{shortest_paths, Adjacency};
pub use graph::GraphModel;
