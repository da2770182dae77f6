/*!
# Shortest-Path Engine

Thorup's deterministic linear-time single-source shortest-paths algorithm for
connected undirected graphs with positive integer edge weights.

A query runs in three stages. `construct_minimum_spanning_tree` produces the
msb-minimum spanning tree through the supplied algorithm;
`construct_other_data_structures` builds the component tree over it and wraps
the tree in the unvisited structure; `find_shortest_paths` then descends the
component tree recursively, driving per-node bucket arrays keyed by shifted
tentative distances. A component at level `h` buckets its children by
`distance >> (h - 1)`: its internal diameter is below `2^h`, so once a bucket
becomes current every vertex inside settles within one round of the parent's
bucket width. This is what removes the sorting bottleneck of Dijkstra.

The source vertex is special-cased throughout the descent: its own tentative
distance stays +∞ (its reported distance is the final `d[source] = 0`
override), its neighbors are relaxed up front, expansion of its lowest
internal ancestor accounts for it in the unvisited counters instead of
bucketing it, and no edge ever relaxes back into it.

An engine instance answers one query at a time; `clean_up_between_queries`
restores the constructed structures for the next one.
*/

use tracing::debug;

use crate::core::component_tree::{ComponentTree, TreeNodeId};
use crate::core::error::{Result, ThorupError};
use crate::core::graph::WeightedGraph;
use crate::core::mst::MstAlgorithm;
use crate::core::split_findmin::INFINITE_COST;
use crate::core::unvisited::UnvisitedStructure;

/// Distance reported for vertices the source cannot reach; on a connected
/// input every reported distance is finite.
pub const UNREACHABLE: u64 = INFINITE_COST;

/// Thorup's single-source shortest-paths engine over one graph.
#[derive(Debug)]
pub struct ThorupEngine {
    source_graph: WeightedGraph,
    spanning_tree: Option<WeightedGraph>,
    component_tree: Option<ComponentTree>,
    unvisited: Option<UnvisitedStructure>,
    visited_vertices: Vec<bool>,
    queried: bool,
}

impl ThorupEngine {
    /// Creates an engine for `source_graph`.
    pub fn new(source_graph: WeightedGraph) -> Self {
        let vertices = source_graph.vertex_count();
        Self {
            source_graph,
            spanning_tree: None,
            component_tree: None,
            unvisited: None,
            visited_vertices: vec![false; vertices],
            queried: false,
        }
    }

    /// The graph this engine answers queries about.
    pub fn source_graph(&self) -> &WeightedGraph {
        &self.source_graph
    }

    /// The msb-minimum spanning tree, once constructed.
    pub fn spanning_tree(&self) -> Option<&WeightedGraph> {
        self.spanning_tree.as_ref()
    }

    /// Runs `algorithm` over the source graph to obtain the msb-minimum
    /// spanning tree.
    pub fn construct_minimum_spanning_tree(
        &mut self,
        algorithm: &dyn MstAlgorithm,
    ) -> Result<()> {
        let tree = algorithm.spawn_tree(&self.source_graph)?;
        debug!(
            vertices = tree.vertex_count(),
            edges = tree.edge_count(),
            "constructed msb-minimum spanning tree"
        );
        self.spanning_tree = Some(tree);
        Ok(())
    }

    /// Builds the component tree over the spanning tree and the unvisited
    /// structure over the component tree.
    pub fn construct_other_data_structures(&mut self) -> Result<()> {
        let Some(spanning_tree) = self.spanning_tree.as_ref() else {
            return Err(ThorupError::precondition_violation(
                "the spanning tree must be constructed first",
            ));
        };
        let mut component_tree = ComponentTree::build(spanning_tree)?;
        let unvisited = UnvisitedStructure::new(&mut component_tree);
        debug!(
            nodes = component_tree.node_count(),
            "constructed component tree and unvisited structure"
        );
        self.component_tree = Some(component_tree);
        self.unvisited = Some(unvisited);
        Ok(())
    }

    /// Computes the weight of a shortest path from `source_vertex` to every
    /// vertex. Requires both construction steps; a repeated query requires
    /// `clean_up_between_queries` in between.
    pub fn find_shortest_paths(&mut self, source_vertex: usize) -> Result<Vec<u64>> {
        let vertices = self.source_graph.vertex_count();
        if source_vertex >= vertices {
            return Err(ThorupError::invalid_argument(format!(
                "{} is no valid source vertex",
                source_vertex
            )));
        }
        if self.queried {
            return Err(ThorupError::precondition_violation(
                "call clean_up_between_queries before the next query",
            ));
        }
        let (Some(component_tree), Some(unvisited)) =
            (self.component_tree.as_mut(), self.unvisited.as_mut())
        else {
            return Err(ThorupError::precondition_violation(
                "construct the spanning tree and the other data structures before querying",
            ));
        };
        self.queried = true;

        self.visited_vertices[source_vertex] = true;
        for (neighbor, weight) in self.source_graph.neighbors(source_vertex) {
            if neighbor != source_vertex {
                unvisited.decrease_super_distance(neighbor, weight);
            }
        }

        let mut traversal = Traversal {
            source_graph: &self.source_graph,
            component_tree: &mut *component_tree,
            unvisited: &mut *unvisited,
            visited_vertices: &mut self.visited_vertices,
            source_vertex,
        };
        let root = traversal.component_tree.root();
        traversal.visit_node(root);
        drop(traversal);

        let mut distances: Vec<u64> = (0..vertices).map(|v| unvisited.super_distance(v)).collect();
        distances[source_vertex] = 0;
        Ok(distances)
    }

    /// Restores the engine for another query: tentative distances back to
    /// +∞, every component-tree node unvisited with its initial counter, all
    /// bucket state dropped.
    pub fn clean_up_between_queries(&mut self) -> Result<()> {
        let (Some(component_tree), Some(unvisited)) =
            (self.component_tree.as_mut(), self.unvisited.as_mut())
        else {
            return Err(ThorupError::precondition_violation(
                "there is nothing to clean up before construction",
            ));
        };
        component_tree.reset_traversal_state();
        unvisited.reset();
        self.visited_vertices = vec![false; self.source_graph.vertex_count()];
        self.queried = false;
        Ok(())
    }
}

/// One query's traversal state borrowed out of the engine.
struct Traversal<'a> {
    source_graph: &'a WeightedGraph,
    component_tree: &'a mut ComponentTree,
    unvisited: &'a mut UnvisitedStructure,
    visited_vertices: &'a mut [bool],
    source_vertex: usize,
}

impl Traversal<'_> {
    /// Recursive descent over the component tree (steps F.1 to F.5).
    fn visit_node(&mut self, node: TreeNodeId) {
        let parent = self.component_tree.node(node).parent();
        let level = self.component_tree.node(node).hierarchy_level();

        // F.1: a leaf settles its vertex and leaves its bucket.
        if level == 0 {
            self.visit(node.0);
            self.decrement_unvisited_from(parent);
            self.component_tree.remove_from_parent_bucket(node);
            return;
        }

        // F.2: first arrival allocates buckets and distributes the children.
        if !self.component_tree.node(node).visited {
            self.expand(node);
        }

        // F.3: drain buckets while this component still owns the parent's
        // current bucket. The root has no parent window and drains until
        // every leaf below it is settled.
        let window_shift = parent.map(|p| {
            self.component_tree.node(p).hierarchy_level() - level
        });
        let entry_index = self.component_tree.node(node).next_bucket_index;
        let entry_window = window_shift.map(|s| entry_index >> s);
        loop {
            let n = self.component_tree.node(node);
            if n.unvisited_count == 0 {
                break;
            }
            if let (Some(shift), Some(window)) = (window_shift, entry_window) {
                if n.next_bucket_index >> shift != window {
                    break;
                }
            }
            let current = self.component_tree.node(node).next_bucket_index;
            while let Some(child) = self.component_tree.bucket_head(node, current) {
                self.visit_node(child);
            }
            self.component_tree.node_mut(node).next_bucket_index += 1;
        }

        // F.4 / F.5: pause into the parent's next window or retire.
        if let Some(parent) = parent {
            if self.component_tree.node(node).unvisited_count > 0 {
                if let Some(shift) = window_shift {
                    let index = self.component_tree.node(node).next_bucket_index >> shift;
                    self.component_tree.move_to_bucket(node, parent, index);
                }
            } else {
                self.component_tree.remove_from_parent_bucket(node);
            }
        }
    }

    /// F.2: computes the bucket window from the minimum tentative distance
    /// below `node`, severs the node's split-findmin list at its child
    /// boundaries, and distributes the children into the buckets.
    fn expand(&mut self, node: TreeNodeId) {
        let level = self.component_tree.node(node).hierarchy_level();
        let shift = level - 1;
        let minimum = self
            .unvisited
            .min_super_distance(self.component_tree, node)
            .map_or(0, |m| m >> shift);
        {
            let n = self.component_tree.node_mut(node);
            n.lowest_bucket_index = minimum;
            n.highest_bucket_index = minimum + n.delta;
            n.next_bucket_index = minimum;
        }
        self.component_tree.initialize_buckets(node);
        self.unvisited.delete_root(self.component_tree, node);

        let children = self.component_tree.node(node).children().to_vec();
        for child in children {
            let child_node = self.component_tree.node(child);
            if child_node.is_leaf() && child.0 == self.source_vertex {
                // The source is settled from the start; account for it here
                // instead of ever bucketing its leaf.
                self.decrement_unvisited_from(Some(node));
                continue;
            }
            if let Some(minimum) = self.unvisited.min_super_distance(self.component_tree, child)
            {
                self.component_tree
                    .insert_to_bucket(node, child, minimum >> shift);
            }
        }
        self.component_tree.node_mut(node).visited = true;
    }

    /// F.1.1: settles `vertex` and relaxes its outgoing edges. A neighbor
    /// whose tentative distance drops moves its unvisited root into the
    /// bucket matching the new minimum.
    fn visit(&mut self, vertex: usize) {
        if vertex == self.source_vertex {
            return;
        }
        self.visited_vertices[vertex] = true;
        let distance = self.unvisited.super_distance(vertex);

        for (neighbor, weight) in self.source_graph.neighbors(vertex) {
            if neighbor == self.source_vertex || neighbor == vertex {
                continue;
            }
            let new_distance = distance + weight;
            if new_distance == 0 || new_distance >= self.unvisited.super_distance(neighbor) {
                continue;
            }
            let unvisited_root = self.unvisited.unvisited_root(self.component_tree, neighbor);
            let Some(root_parent) = self.component_tree.node(unvisited_root).parent() else {
                self.unvisited.decrease_super_distance(neighbor, new_distance);
                continue;
            };
            let shift = self.component_tree.node(root_parent).hierarchy_level() - 1;
            let old_index = self
                .unvisited
                .min_super_distance(self.component_tree, unvisited_root)
                .map(|m| m >> shift);
            self.unvisited.decrease_super_distance(neighbor, new_distance);
            let new_index = self
                .unvisited
                .min_super_distance(self.component_tree, unvisited_root)
                .map(|m| m >> shift);
            if let Some(new_index) = new_index {
                if old_index.is_none_or(|old| new_index < old) {
                    self.component_tree
                        .move_to_bucket(unvisited_root, root_parent, new_index);
                }
            }
        }
    }

    /// Decrements the unvisited counter on `start` and every ancestor above
    /// it.
    fn decrement_unvisited_from(&mut self, start: Option<TreeNodeId>) {
        let mut current = start;
        while let Some(id) = current {
            self.component_tree.node_mut(id).unvisited_count -= 1;
            current = self.component_tree.node(id).parent();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mst::KruskalMstAlgorithm;

    fn solve(edges: &[(usize, usize, u64)], vertices: usize, source: usize) -> Vec<u64> {
        let mut graph = WeightedGraph::with_vertices(vertices);
        for &(u, v, w) in edges {
            graph.add_edge(u, v, w);
        }
        let mut engine = ThorupEngine::new(graph);
        engine
            .construct_minimum_spanning_tree(&KruskalMstAlgorithm)
            .expect("valid graph");
        engine
            .construct_other_data_structures()
            .expect("connected graph");
        engine.find_shortest_paths(source).expect("valid source")
    }

    #[test]
    fn test_two_branches() {
        assert_eq!(solve(&[(0, 1, 1), (0, 2, 2)], 3, 0), vec![0, 1, 2]);
    }

    #[test]
    fn test_cycle_prefers_light_path() {
        assert_eq!(
            solve(&[(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 3, 100)], 4, 0),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_nonzero_source() {
        assert_eq!(solve(&[(0, 1, 5)], 2, 1), vec![5, 0]);
    }

    #[test]
    fn test_diamond() {
        assert_eq!(
            solve(&[(0, 1, 2), (0, 2, 2), (1, 3, 4), (2, 3, 4), (3, 4, 1)], 5, 0),
            vec![0, 2, 2, 6, 7]
        );
    }

    #[test]
    fn test_single_vertex() {
        assert_eq!(solve(&[], 1, 0), vec![0]);
    }

    #[test]
    fn test_heavy_light_alternation_straddles_levels() {
        assert_eq!(
            solve(&[(0, 1, 1), (1, 2, 8), (2, 3, 1), (3, 4, 8)], 5, 0),
            vec![0, 1, 9, 10, 18]
        );
    }

    #[test]
    fn test_invalid_source_is_rejected() {
        let graph = WeightedGraph::with_vertices(2);
        let mut engine = ThorupEngine::new(graph);
        assert!(matches!(
            engine.find_shortest_paths(5),
            Err(ThorupError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_query_before_construction_is_rejected() {
        let mut graph = WeightedGraph::with_vertices(2);
        graph.add_edge(0, 1, 1);
        let mut engine = ThorupEngine::new(graph);
        assert!(matches!(
            engine.find_shortest_paths(0),
            Err(ThorupError::PreconditionViolation(_))
        ));

        engine
            .construct_minimum_spanning_tree(&KruskalMstAlgorithm)
            .expect("valid graph");
        assert!(engine.find_shortest_paths(0).is_err());
    }

    #[test]
    fn test_other_structures_require_spanning_tree() {
        let graph = WeightedGraph::with_vertices(2);
        let mut engine = ThorupEngine::new(graph);
        assert!(matches!(
            engine.construct_other_data_structures(),
            Err(ThorupError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_second_query_requires_clean_up() {
        let mut graph = WeightedGraph::with_vertices(3);
        graph.add_edge(0, 1, 2);
        graph.add_edge(1, 2, 3);
        let mut engine = ThorupEngine::new(graph);
        engine
            .construct_minimum_spanning_tree(&KruskalMstAlgorithm)
            .expect("valid graph");
        engine
            .construct_other_data_structures()
            .expect("connected graph");

        let first = engine.find_shortest_paths(0).expect("first query");
        assert!(engine.find_shortest_paths(0).is_err());

        engine.clean_up_between_queries().expect("constructed engine");
        let second = engine.find_shortest_paths(0).expect("second query");
        assert_eq!(first, second);

        engine.clean_up_between_queries().expect("constructed engine");
        let other = engine.find_shortest_paths(2).expect("other source");
        assert_eq!(other, vec![5, 3, 0]);
    }
}
