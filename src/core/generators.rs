/*!
# Random Graph Generators

Seeded generators producing inputs the engine accepts: connected, undirected,
positive integer weights. Connectivity is guaranteed by a random spanning
tree backbone; additional edges are sprinkled on top of it.
*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::error::{Result, ThorupError};
use crate::core::graph::WeightedGraph;

/// Generates a connected weighted undirected graph with `vertices` vertices,
/// weights drawn uniformly from `1..=maximum_edge_weight`, and about
/// `extra_edges_per_vertex` additional random edges per vertex beyond the
/// spanning backbone.
pub fn random_connected_graph(
    vertices: usize,
    maximum_edge_weight: u64,
    extra_edges_per_vertex: usize,
    seed: u64,
) -> Result<WeightedGraph> {
    if vertices == 0 {
        return Err(ThorupError::invalid_argument(
            "a connected graph needs at least one vertex",
        ));
    }
    if maximum_edge_weight == 0 {
        return Err(ThorupError::invalid_argument(
            "edge weights must be positive",
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = WeightedGraph::with_vertices(vertices);

    for v in 1..vertices {
        let anchor = rng.random_range(0..v);
        let weight = rng.random_range(1..=maximum_edge_weight);
        graph.add_edge(v, anchor, weight);
    }

    for v in 0..vertices {
        for _ in 0..extra_edges_per_vertex {
            let other = rng.random_range(0..vertices);
            if other == v {
                continue;
            }
            let weight = rng.random_range(1..=maximum_edge_weight);
            graph.add_edge(v, other, weight);
        }
    }

    Ok(graph)
}
