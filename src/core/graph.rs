/*!
# Weighted Graph

This module defines the graph container consumed by the engine: an undirected
graph with positive integer edge weights and contiguous vertex ids `0..V`.
The `WeightedGraph` struct is a thin wrapper around petgraph's `Graph` that
fixes the node payload and exposes a plain `usize` vertex API, which is all
the shortest-path core needs (vertex count plus neighbour enumeration).

Vertices are never removed, so petgraph's indices stay contiguous and can be
used directly as vertex ids.
*/

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::core::mst::Edge;

/// An undirected graph with `u64` edge weights and `usize` vertex ids.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    graph: UnGraph<(), u64>,
}

impl Default for WeightedGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightedGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            graph: UnGraph::with_capacity(0, 0),
        }
    }

    /// Creates a graph with `n` isolated vertices `0..n`.
    pub fn with_vertices(n: usize) -> Self {
        let mut graph = UnGraph::with_capacity(n, n);
        for _ in 0..n {
            graph.add_node(());
        }
        Self { graph }
    }

    /// Adds a vertex and returns its id.
    pub fn add_vertex(&mut self) -> usize {
        self.graph.add_node(()).index()
    }

    /// Adds an undirected edge between `u` and `v` with weight `w`.
    ///
    /// Vertices are created on demand, and adding an edge that already exists
    /// updates its weight instead of introducing a parallel edge.
    pub fn add_edge(&mut self, u: usize, v: usize, w: u64) {
        let highest = u.max(v);
        while self.graph.node_count() <= highest {
            self.graph.add_node(());
        }
        self.graph
            .update_edge(NodeIndex::new(u), NodeIndex::new(v), w);
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over the neighbours of `v` together with the connecting edge
    /// weights.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.graph.edges(NodeIndex::new(v)).map(move |e| {
            let other = if e.source().index() == v {
                e.target().index()
            } else {
                e.source().index()
            };
            (other, *e.weight())
        })
    }

    /// Iterates over all edges, each reported once.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.edge_references().map(|e| Edge {
            source: e.source().index(),
            target: e.target().index(),
            weight: *e.weight(),
        })
    }

    /// Access to the underlying petgraph graph, e.g. for running petgraph
    /// algorithms against the same topology.
    pub fn inner(&self) -> &UnGraph<(), u64> {
        &self.graph
    }
}
