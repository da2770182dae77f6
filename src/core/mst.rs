/*!
# msb-Minimum Spanning Trees

A modified Kruskal's algorithm computing *msb-minimum* spanning trees: edges
are bucketed by the index of their weight's most significant bit and consumed
in bucket order, ties broken by insertion order. The resulting tree minimizes
the maximum `msb(weight)` over its edges, or equivalently, every non-tree
edge's msb is at least the largest msb on the tree path between its
endpoints. That is all the component hierarchy needs; edges of equal msb
are mutually substitutable for the shortest-path computation.

The algorithm is exposed behind the one-method [`MstAlgorithm`] capability so
the engine stays independent of how the tree is produced.
*/

use crate::core::error::{Result, ThorupError};
use crate::core::graph::WeightedGraph;
use crate::core::union_find::UnionFind;

/// An undirected weighted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: u64,
}

/// Index of the most significant bit of `x`, i.e. `⌊log₂ x⌋`.
///
/// Only defined for positive values; edge weights are validated to be
/// positive before this is ever applied.
pub fn msb(x: u64) -> u32 {
    debug_assert!(x > 0);
    63 - x.leading_zeros()
}

/// Collects the graph's edges sorted into ascending-msb buckets, preserving
/// insertion order inside each bucket.
pub fn sort_edges_by_msb(graph: &WeightedGraph) -> Vec<Edge> {
    let mut buckets: Vec<Vec<Edge>> = (0..64).map(|_| Vec::new()).collect();
    for edge in graph.edges() {
        buckets[msb(edge.weight) as usize].push(edge);
    }
    buckets.into_iter().flatten().collect()
}

/// An algorithm for the computation of spanning trees.
pub trait MstAlgorithm {
    /// Produces a spanning structure of `source_graph` in the same graph
    /// shape, covering the same vertex set.
    fn spawn_tree(&self, source_graph: &WeightedGraph) -> Result<WeightedGraph>;
}

/// Modified Kruskal's algorithm for the computation of msb-minimum spanning
/// trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct KruskalMstAlgorithm;

impl MstAlgorithm for KruskalMstAlgorithm {
    fn spawn_tree(&self, source_graph: &WeightedGraph) -> Result<WeightedGraph> {
        if source_graph.vertex_count() == 0 {
            return Err(ThorupError::invalid_graph(
                "graph is empty, cannot compute a spanning tree",
            ));
        }
        for edge in source_graph.edges() {
            if edge.weight == 0 {
                return Err(ThorupError::invalid_graph(format!(
                    "edge ({}, {}) has weight 0; weights must be positive",
                    edge.source, edge.target
                )));
            }
        }

        let vertices = source_graph.vertex_count();
        let mut uf = UnionFind::new(vertices);
        let mut tree = WeightedGraph::with_vertices(vertices);

        for edge in sort_edges_by_msb(source_graph) {
            let source_root = uf.find(edge.source);
            let target_root = uf.find(edge.target);
            if source_root != target_root {
                tree.add_edge(edge.source, edge.target, edge.weight);
                uf.union(edge.source, edge.target);
            }
        }

        Ok(tree)
    }
}
