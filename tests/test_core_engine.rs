//! End-to-end tests of the shortest-path engine: fixed scenarios, error
//! paths, repeated queries, and agreement with Dijkstra's algorithm on
//! generated graphs.

use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;

use thorup::core::engine::{ThorupEngine, UNREACHABLE};
use thorup::core::error::ThorupError;
use thorup::core::generators::random_connected_graph;
use thorup::core::graph::WeightedGraph;
use thorup::core::mst::KruskalMstAlgorithm;

fn build_graph(edges: &[(usize, usize, u64)], vertices: usize) -> WeightedGraph {
    let mut graph = WeightedGraph::with_vertices(vertices);
    for &(u, v, w) in edges {
        graph.add_edge(u, v, w);
    }
    graph
}

fn constructed_engine(graph: WeightedGraph) -> ThorupEngine {
    let mut engine = ThorupEngine::new(graph);
    engine
        .construct_minimum_spanning_tree(&KruskalMstAlgorithm)
        .expect("valid graph");
    engine
        .construct_other_data_structures()
        .expect("connected graph");
    engine
}

fn engine_distances(graph: &WeightedGraph, source: usize) -> Vec<u64> {
    let mut engine = constructed_engine(graph.clone());
    engine.find_shortest_paths(source).expect("valid source")
}

fn dijkstra_distances(graph: &WeightedGraph, source: usize) -> Vec<u64> {
    let map = dijkstra(graph.inner(), NodeIndex::new(source), None, |e| *e.weight());
    (0..graph.vertex_count())
        .map(|v| map.get(&NodeIndex::new(v)).copied().unwrap_or(UNREACHABLE))
        .collect()
}

#[test]
fn test_two_branches_from_source() {
    let graph = build_graph(&[(0, 1, 1), (0, 2, 2)], 3);
    assert_eq!(engine_distances(&graph, 0), vec![0, 1, 2]);
}

#[test]
fn test_cycle_with_heavy_chord() {
    let graph = build_graph(&[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 3, 100)], 4);
    assert_eq!(engine_distances(&graph, 0), vec![0, 1, 2, 3]);
}

#[test]
fn test_single_edge_reversed_source() {
    let graph = build_graph(&[(0, 1, 5)], 2);
    assert_eq!(engine_distances(&graph, 1), vec![5, 0]);
}

#[test]
fn test_diamond_with_tail() {
    let graph = build_graph(&[(0, 1, 2), (0, 2, 2), (1, 3, 4), (2, 3, 4), (3, 4, 1)], 5);
    assert_eq!(engine_distances(&graph, 0), vec![0, 2, 2, 6, 7]);
}

#[test]
fn test_single_vertex_no_edges() {
    let graph = WeightedGraph::with_vertices(1);
    assert_eq!(engine_distances(&graph, 0), vec![0]);
}

#[test]
fn test_heavy_light_path_straddles_bucket_levels() {
    let graph = build_graph(&[(0, 1, 1), (1, 2, 8), (2, 3, 1), (3, 4, 8)], 5);
    assert_eq!(engine_distances(&graph, 0), vec![0, 1, 9, 10, 18]);
}

#[test]
fn test_every_source_on_a_small_cycle() {
    let graph = build_graph(&[(0, 1, 3), (1, 2, 4), (2, 3, 6), (3, 0, 2)], 4);
    for source in 0..4 {
        assert_eq!(
            engine_distances(&graph, source),
            dijkstra_distances(&graph, source),
            "source {}",
            source
        );
    }
}

#[test]
fn test_uniform_weights() {
    let graph = build_graph(
        &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1), (4, 0, 1), (1, 3, 1)],
        5,
    );
    for source in 0..5 {
        assert_eq!(
            engine_distances(&graph, source),
            dijkstra_distances(&graph, source)
        );
    }
}

#[test]
fn test_power_of_two_weights() {
    // Weights sitting exactly on bit boundaries exercise the level windows.
    let graph = build_graph(
        &[
            (0, 1, 1),
            (1, 2, 2),
            (2, 3, 4),
            (3, 4, 8),
            (4, 5, 16),
            (5, 0, 32),
            (1, 4, 16),
            (2, 5, 2),
        ],
        6,
    );
    for source in 0..6 {
        assert_eq!(
            engine_distances(&graph, source),
            dijkstra_distances(&graph, source),
            "source {}",
            source
        );
    }
}

#[test]
fn test_agrees_with_dijkstra_on_random_graphs() {
    for seed in 0..20u64 {
        let vertices = 10 + (seed as usize % 5) * 12;
        let max_weight = [1, 7, 16, 100, 1000][seed as usize % 5];
        let graph = random_connected_graph(vertices, max_weight, 3, seed)
            .expect("valid parameters");
        let source = seed as usize % vertices;
        assert_eq!(
            engine_distances(&graph, source),
            dijkstra_distances(&graph, source),
            "seed {} vertices {} max weight {}",
            seed,
            vertices,
            max_weight
        );
    }
}

#[test]
fn test_triangle_inequality_holds() {
    let graph = random_connected_graph(40, 50, 2, 99).expect("valid parameters");
    let distances = engine_distances(&graph, 0);
    for edge in graph.edges() {
        assert!(distances[edge.target] <= distances[edge.source] + edge.weight);
        assert!(distances[edge.source] <= distances[edge.target] + edge.weight);
    }
}

#[test]
fn test_clean_up_is_idempotent_across_queries() {
    let graph = random_connected_graph(25, 60, 2, 5).expect("valid parameters");
    let mut engine = constructed_engine(graph);

    let first = engine.find_shortest_paths(3).expect("constructed engine");
    engine.clean_up_between_queries().expect("constructed engine");
    let second = engine.find_shortest_paths(3).expect("constructed engine");
    assert_eq!(first, second);

    engine.clean_up_between_queries().expect("constructed engine");
    let other = engine.find_shortest_paths(11).expect("constructed engine");
    engine.clean_up_between_queries().expect("constructed engine");
    let other_again = engine.find_shortest_paths(11).expect("constructed engine");
    assert_eq!(other, other_again);
}

#[test]
fn test_source_distance_is_zero() {
    for seed in [2u64, 4, 8] {
        let graph = random_connected_graph(15, 30, 2, seed).expect("valid parameters");
        for source in [0usize, 7, 14] {
            assert_eq!(engine_distances(&graph, source)[source], 0);
        }
    }
}

#[test]
fn test_invalid_source_is_rejected() {
    let graph = build_graph(&[(0, 1, 1)], 2);
    let mut engine = constructed_engine(graph);
    assert!(matches!(
        engine.find_shortest_paths(2),
        Err(ThorupError::InvalidArgument(_))
    ));
}

#[test]
fn test_query_requires_construction_steps() {
    let graph = build_graph(&[(0, 1, 1)], 2);
    let mut engine = ThorupEngine::new(graph);
    assert!(matches!(
        engine.find_shortest_paths(0),
        Err(ThorupError::PreconditionViolation(_))
    ));
    assert!(matches!(
        engine.construct_other_data_structures(),
        Err(ThorupError::PreconditionViolation(_))
    ));
}

#[test]
fn test_disconnected_graph_is_rejected_at_construction() {
    let graph = build_graph(&[(0, 1, 1), (2, 3, 1)], 4);
    let mut engine = ThorupEngine::new(graph);
    engine
        .construct_minimum_spanning_tree(&KruskalMstAlgorithm)
        .expect("forest is produced");
    assert!(matches!(
        engine.construct_other_data_structures(),
        Err(ThorupError::InvalidGraph(_))
    ));
}

#[test]
fn test_second_query_without_clean_up_is_rejected() {
    let graph = build_graph(&[(0, 1, 2)], 2);
    let mut engine = constructed_engine(graph);
    engine.find_shortest_paths(0).expect("constructed engine");
    assert!(matches!(
        engine.find_shortest_paths(1),
        Err(ThorupError::PreconditionViolation(_))
    ));
}

#[test]
fn test_larger_star_and_chain_mix() {
    // A star with a long tail; several weight magnitudes at once.
    let mut edges = vec![];
    for leaf in 1..=6usize {
        edges.push((0, leaf, leaf as u64 * 3));
    }
    edges.push((6, 7, 1));
    edges.push((7, 8, 40));
    edges.push((8, 9, 2));
    let graph = build_graph(&edges, 10);
    for source in [0usize, 5, 9] {
        assert_eq!(
            engine_distances(&graph, source),
            dijkstra_distances(&graph, source),
            "source {}",
            source
        );
    }
}
