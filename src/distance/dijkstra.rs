//! Single-source shortest paths.
//!
//! # Algorithm
//!
//! Label-setting (Dijkstra) with a binary heap keyed by tentative distance.
//! Stale heap entries are skipped on extraction; every outgoing arc of a
//! settled vertex is relaxed and strictly shorter labels are re-queued.
//! Weights are non-negative integers, summed exactly in `u64`.
//!
//! # Complexity
//!
//! O((V + A) log V) per source.
//!
//! # Reference
//!
//! Dijkstra, E.W. (1959). "A note on two problems in connexion with graphs",
//! *Numerische Mathematik* 1, 269-271.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Directed adjacency lists over vertices `1..=vertex_count`.
///
/// Two-way edges are stored as a pair of opposite arcs. Index 0 exists but
/// is never connected.
///
/// # Examples
///
/// ```
/// use carp_routing::distance::Adjacency;
///
/// let mut adj = Adjacency::new(3);
/// adj.add_edge(1, 2, 4);
/// adj.add_arc(2, 3, 1);
/// assert_eq!(adj.neighbors(2), &[(1, 4), (3, 1)]);
/// assert!(adj.neighbors(3).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Adjacency {
    arcs: Vec<Vec<(usize, u32)>>,
}

impl Adjacency {
    /// Creates an adjacency with no arcs.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            arcs: vec![Vec::new(); vertex_count + 1],
        }
    }

    /// Adds a one-way arc `from → to`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is greater than the vertex count.
    pub fn add_arc(&mut self, from: usize, to: usize, weight: u32) {
        self.arcs[from].push((to, weight));
    }

    /// Adds a two-way edge as two opposite arcs.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: u32) {
        self.add_arc(u, v, weight);
        self.add_arc(v, u, weight);
    }

    /// Highest vertex id.
    pub fn vertex_count(&self) -> usize {
        self.arcs.len() - 1
    }

    /// Outgoing `(head, weight)` pairs of `vertex`. Empty if out of range.
    pub fn neighbors(&self, vertex: usize) -> &[(usize, u32)] {
        self.arcs.get(vertex).map_or(&[], Vec::as_slice)
    }
}

/// Computes the shortest path cost from `source` to every vertex.
///
/// The returned row is indexed by vertex id and has `vertex_count + 1`
/// entries; unreachable vertices (and the unused index 0) hold
/// `f64::INFINITY`.
///
/// # Examples
///
/// ```
/// use carp_routing::distance::{shortest_paths, Adjacency};
///
/// let mut adj = Adjacency::new(4);
/// adj.add_arc(1, 2, 3);
/// adj.add_arc(2, 3, 3);
/// adj.add_arc(1, 3, 10);
///
/// let row = shortest_paths(&adj, 1);
/// assert_eq!(row[1], 0.0);
/// assert_eq!(row[3], 6.0);
/// assert!(row[4].is_infinite());
/// ```
pub fn shortest_paths(adjacency: &Adjacency, source: usize) -> Vec<f64> {
    let n = adjacency.vertex_count();
    let mut dist = vec![u64::MAX; n + 1];
    if source > n {
        return vec![f64::INFINITY; n + 1];
    }

    dist[source] = 0;
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0u64, source)));

    while let Some(Reverse((d, u))) = heap.pop() {
        if d > dist[u] {
            continue;
        }
        for &(v, weight) in adjacency.neighbors(u) {
            let candidate = d + u64::from(weight);
            if candidate < dist[v] {
                dist[v] = candidate;
                heap.push(Reverse((candidate, v)));
            }
        }
    }

    dist.into_iter()
        .map(|d| if d == u64::MAX { f64::INFINITY } else { d as f64 })
        .collect()
}
