/*!
# Unvisited Structure

Bridges the component tree and the split-findmin structure during a query.
The tree's left-to-right leaf order induces a permutation of the vertices;
one split-findmin element per permutation position carries the vertex's
tentative distance (its *super-distance*), starting at +∞. Because every
tree node covers a contiguous position range ending at its recorded maximum,
the minimum tentative distance below a node is an O(1) list-cost lookup, and
expanding a node is a sequence of splits at its children's range boundaries.
*/

use crate::core::component_tree::{ComponentTree, TreeNodeId};
use crate::core::split_findmin::{ElementId, INFINITE_COST, SplitFindminStructure};

/// Tentative-distance bookkeeping for the unvisited part of the graph.
#[derive(Debug)]
pub struct UnvisitedStructure {
    /// Vertex id -> position in the leaf permutation.
    vertex_index: Vec<usize>,
    /// Position -> split-findmin element carrying that vertex's distance.
    containers: Vec<ElementId>,
    split_findmin: SplitFindminStructure,
}

impl UnvisitedStructure {
    /// Assigns the leaf permutation on `tree` and builds the split-findmin
    /// over it, every position starting at cost +∞.
    pub fn new(tree: &mut ComponentTree) -> Self {
        let vertex_index = tree.initialize_mapping();
        let vertices = tree.vertex_count();
        let (split_findmin, containers) = Self::build_split_findmin(vertices);
        Self {
            vertex_index,
            containers,
            split_findmin,
        }
    }

    fn build_split_findmin(vertices: usize) -> (SplitFindminStructure, Vec<ElementId>) {
        let mut split_findmin = SplitFindminStructure::new(vertices, vertices);
        let mut containers = Vec::with_capacity(vertices);
        for position in 0..vertices {
            // The structure is freshly created, so adding cannot be rejected.
            if let Ok(element) = split_findmin.add(position, INFINITE_COST) {
                containers.push(element);
            }
        }
        let _ = split_findmin.initialize_head();
        (split_findmin, containers)
    }

    /// Rebuilds the split-findmin state for a fresh query; the leaf
    /// permutation is a property of the tree and stays as it is.
    pub fn reset(&mut self) {
        let (split_findmin, containers) = Self::build_split_findmin(self.containers.len());
        self.split_findmin = split_findmin;
        self.containers = containers;
    }

    /// Lowers the tentative distance of `vertex` to `min(current, distance)`.
    pub fn decrease_super_distance(&mut self, vertex: usize, distance: u64) {
        let element = self.containers[self.vertex_index[vertex]];
        self.split_findmin.decrease_cost(element, distance);
    }

    /// Current tentative distance of `vertex` (`INFINITE_COST` when unset).
    pub fn super_distance(&self, vertex: usize) -> u64 {
        let element = self.containers[self.vertex_index[vertex]];
        self.split_findmin.element_cost(element)
    }

    /// Minimum tentative distance over the unvisited leaves below `node`:
    /// the cost of the split-findmin list currently holding the node's
    /// rightmost position. `None` stands for +∞.
    pub fn min_super_distance(&self, tree: &ComponentTree, node: TreeNodeId) -> Option<u64> {
        let position = tree.node(node).max_unvisited_vertex_index;
        let cost = self.split_findmin.element_list_cost(self.containers[position]);
        if cost == INFINITE_COST { None } else { Some(cost) }
    }

    /// Highest not-yet-visited ancestor of `vertex`'s leaf: the walk stops
    /// as soon as the parent has been visited (the root is always visited
    /// once the descent has begun).
    pub fn unvisited_root(&self, tree: &ComponentTree, vertex: usize) -> TreeNodeId {
        let mut current = tree.leaf(vertex);
        while let Some(parent) = tree.node(current).parent() {
            if tree.node(parent).visited {
                break;
            }
            current = parent;
        }
        current
    }

    /// Severs `node`'s list at every inner child boundary, so that each
    /// child's range becomes its own split-findmin list and can answer
    /// minimum queries independently.
    pub fn delete_root(&mut self, tree: &ComponentTree, node: TreeNodeId) {
        let children = tree.node(node).children();
        for &child in children.iter().take(children.len().saturating_sub(1)) {
            let position = tree.node(child).max_unvisited_vertex_index;
            self.split_findmin.split(self.containers[position]);
        }
    }
}
