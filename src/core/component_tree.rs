/*!
# Component Tree

The laminar component hierarchy of a weighted undirected graph, built from
its msb-minimum spanning tree by Algorithm G: edges are consumed in ascending
`msb(weight)` order, endpoints are merged in a union-find, and whenever the
msb of the next edge rises (or the edges run out) every component touched
since the previous rise is closed under a fresh internal node.

Leaves are the graph's vertices (`TreeNodeId(v)` for vertex `v`); an internal
node `u` carries its hierarchy level `h(u) = msb(w) + 1`, its bucket count
`δ(u) = ⌈S(u) / 2^msb(w)⌉` where `S(u)` is the edge weight absorbed inside
the component, and its unvisited leaf counters. The leaves below any node
form a contiguous range of the left-to-right leaf permutation, so the
rightmost position (`max_unvisited_vertex_index`) identifies the node's
range inside the engine's split-findmin list.

Buckets hold child nodes keyed by shifted tentative distance. They are
intrusive lists with a back-reference on the member, so insertion and removal
are O(1). A node's buckets nominally cover `[lowest, lowest + δ]`; a child
whose tentative distance arrived over a heavy non-tree edge can park beyond
that window, so the bucket vector grows on demand and reads past its end are
empty.
*/

use crate::core::error::{Result, ThorupError};
use crate::core::graph::WeightedGraph;
use crate::core::linked_list::{ContainerId, ListArena, ListHandle};
use crate::core::mst::{msb, sort_edges_by_msb};
use crate::core::union_find::UnionFind;

/// Handle of a component tree node. Leaves occupy `0..V` and coincide with
/// vertex ids; internal nodes follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeNodeId(pub usize);

/// A node of the component tree.
#[derive(Debug)]
pub struct ComponentTreeNode {
    /// `msb(w) + 1` of the level that closed this component; 0 for leaves.
    pub(crate) hierarchy_level: u32,
    /// Bucket count `⌈S / 2^(h-1)⌉`; 0 for leaves.
    pub(crate) delta: u64,
    pub(crate) parent: Option<TreeNodeId>,
    pub(crate) children: Vec<TreeNodeId>,
    pub(crate) unvisited_count: usize,
    pub(crate) unvisited_initial: usize,
    pub(crate) visited: bool,
    /// Rightmost leaf-permutation position below this node.
    pub(crate) max_unvisited_vertex_index: usize,
    pub(crate) bucket_index_offset: u64,
    pub(crate) lowest_bucket_index: u64,
    pub(crate) highest_bucket_index: u64,
    pub(crate) next_bucket_index: u64,
    buckets: Vec<Option<ListHandle>>,
    containing_bucket: Option<(TreeNodeId, u64)>,
    container: Option<ContainerId>,
}

impl ComponentTreeNode {
    fn new(hierarchy_level: u32, unvisited: usize) -> Self {
        Self {
            hierarchy_level,
            delta: 0,
            parent: None,
            children: Vec::new(),
            unvisited_count: unvisited,
            unvisited_initial: unvisited,
            visited: false,
            max_unvisited_vertex_index: 0,
            bucket_index_offset: 0,
            lowest_bucket_index: 0,
            highest_bucket_index: 0,
            next_bucket_index: 0,
            buckets: Vec::new(),
            containing_bucket: None,
            container: None,
        }
    }

    pub fn hierarchy_level(&self) -> u32 {
        self.hierarchy_level
    }

    pub fn delta(&self) -> u64 {
        self.delta
    }

    pub fn parent(&self) -> Option<TreeNodeId> {
        self.parent
    }

    pub fn children(&self) -> &[TreeNodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.hierarchy_level == 0
    }

    /// Number of leaves below this node (the query-independent snapshot).
    pub fn unvisited_initial(&self) -> usize {
        self.unvisited_initial
    }

    /// Rightmost leaf-permutation position below this node; only meaningful
    /// after the mapping has been assigned.
    pub fn max_unvisited_vertex_index(&self) -> usize {
        self.max_unvisited_vertex_index
    }
}

/// The component tree of a connected graph.
#[derive(Debug)]
pub struct ComponentTree {
    nodes: Vec<ComponentTreeNode>,
    vertices: usize,
    root: TreeNodeId,
    bucket_links: ListArena<TreeNodeId>,
}

impl ComponentTree {
    /// Builds the tree from an msb-minimum spanning tree (Algorithm G).
    pub fn build(spanning_tree: &WeightedGraph) -> Result<Self> {
        let vertices = spanning_tree.vertex_count();
        if vertices == 0 {
            return Err(ThorupError::invalid_graph(
                "cannot build a component tree for an empty graph",
            ));
        }

        let mut nodes: Vec<ComponentTreeNode> =
            (0..vertices).map(|_| ComponentTreeNode::new(0, 1)).collect();

        if vertices == 1 {
            return Ok(Self {
                nodes,
                vertices,
                root: TreeNodeId(0),
                bucket_links: ListArena::new(),
            });
        }

        let edges = sort_edges_by_msb(spanning_tree);
        if edges.len() + 1 < vertices {
            return Err(ThorupError::invalid_graph(
                "spanning tree does not connect all vertices",
            ));
        }

        let mut uf = UnionFind::new(vertices);
        // Per union-find root: the tree node currently representing the
        // component, and the edge weight absorbed inside it.
        let mut component: Vec<TreeNodeId> = (0..vertices).map(TreeNodeId).collect();
        let mut weight_sum: Vec<u64> = vec![0; vertices];
        // Roots touched since the previous level close, in first-touch order
        // so the leaf permutation is deterministic.
        let mut touched: Vec<usize> = Vec::new();
        let mut is_touched: Vec<bool> = vec![false; vertices];

        for (i, edge) in edges.iter().enumerate() {
            let source_root = uf.find(edge.source);
            let target_root = uf.find(edge.target);
            for root in [source_root, target_root] {
                if !is_touched[root] {
                    is_touched[root] = true;
                    touched.push(root);
                }
            }

            let merged_sum = weight_sum[source_root] + weight_sum[target_root] + edge.weight;
            uf.union(edge.source, edge.target);
            weight_sum[uf.find(edge.source)] = merged_sum;

            let closes_level =
                i + 1 == edges.len() || msb(edge.weight) < msb(edges[i + 1].weight);
            if !closes_level {
                continue;
            }

            let level_msb = msb(edge.weight);
            // Fresh internal node per surviving root of the touched set.
            let mut new_roots: Vec<usize> = Vec::new();
            let mut new_component: Vec<Option<TreeNodeId>> = vec![None; vertices];
            for &t in &touched {
                let root = uf.find(t);
                if new_component[root].is_none() {
                    let id = TreeNodeId(nodes.len());
                    let mut node = ComponentTreeNode::new(level_msb + 1, 0);
                    node.delta = weight_sum[root].div_ceil(1u64 << level_msb);
                    nodes.push(node);
                    new_component[root] = Some(id);
                    new_roots.push(root);
                }
            }

            for &t in &touched {
                let Some(parent) = new_component[uf.find(t)] else {
                    continue;
                };
                let child = component[t];
                nodes[child.0].parent = Some(parent);
                let child_unvisited = nodes[child.0].unvisited_initial;
                nodes[parent.0].children.push(child);
                nodes[parent.0].unvisited_count += child_unvisited;
                nodes[parent.0].unvisited_initial += child_unvisited;
            }

            for &root in &new_roots {
                if let Some(id) = new_component[root] {
                    component[root] = id;
                }
            }
            for &t in &touched {
                is_touched[t] = false;
            }
            touched.clear();
        }

        let root = component[uf.find(0)];
        Ok(Self {
            nodes,
            vertices,
            root,
            bucket_links: ListArena::new(),
        })
    }

    pub fn root(&self) -> TreeNodeId {
        self.root
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The leaf node of vertex `v`.
    pub fn leaf(&self, v: usize) -> TreeNodeId {
        TreeNodeId(v)
    }

    pub fn node(&self, id: TreeNodeId) -> &ComponentTreeNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: TreeNodeId) -> &mut ComponentTreeNode {
        &mut self.nodes[id.0]
    }

    /// Assigns leaf-permutation positions by a left-to-right descent,
    /// recording for every node the rightmost position below it. Returns the
    /// positions indexed by vertex id.
    pub fn initialize_mapping(&mut self) -> Vec<usize> {
        let mut positions = vec![0; self.vertices];
        let mut next_index = 0;
        let root = self.root;
        self.assign_positions(root, &mut next_index, &mut positions);
        positions
    }

    fn assign_positions(
        &mut self,
        node: TreeNodeId,
        next_index: &mut usize,
        positions: &mut [usize],
    ) {
        if self.nodes[node.0].children.is_empty() {
            positions[node.0] = *next_index;
            self.nodes[node.0].max_unvisited_vertex_index = *next_index;
            *next_index += 1;
            return;
        }
        let children = self.nodes[node.0].children.clone();
        for child in children {
            self.assign_positions(child, next_index, positions);
        }
        self.nodes[node.0].max_unvisited_vertex_index = *next_index - 1;
    }

    /// Allocates the buckets of `node` for absolute indices
    /// `[lowest_bucket_index, highest_bucket_index]`.
    pub(crate) fn initialize_buckets(&mut self, node: TreeNodeId) {
        let n = &mut self.nodes[node.0];
        n.bucket_index_offset = n.lowest_bucket_index;
        let size = (n.highest_bucket_index - n.lowest_bucket_index + 1) as usize;
        n.buckets = Vec::with_capacity(size);
        n.buckets.resize_with(size, || None);
    }

    /// Inserts `child` into `node`'s bucket at absolute index `index`,
    /// growing the bucket vector if the index lies beyond the window.
    pub(crate) fn insert_to_bucket(&mut self, node: TreeNodeId, child: TreeNodeId, index: u64) {
        let offset = self.nodes[node.0].bucket_index_offset;
        let slot = (index - offset) as usize;
        if slot >= self.nodes[node.0].buckets.len() {
            self.nodes[node.0].buckets.resize_with(slot + 1, || None);
        }
        if self.nodes[node.0].buckets[slot].is_none() {
            let list = self.bucket_links.new_list();
            self.nodes[node.0].buckets[slot] = Some(list);
        }
        let Some(bucket) = self.nodes[node.0].buckets[slot].as_mut() else {
            return;
        };
        let container = self.bucket_links.append(bucket, child);
        self.nodes[child.0].containing_bucket = Some((node, index));
        self.nodes[child.0].container = Some(container);
    }

    /// Removes `node` from whatever bucket currently holds it, if any.
    pub(crate) fn remove_from_parent_bucket(&mut self, node: TreeNodeId) {
        let Some((owner, index)) = self.nodes[node.0].containing_bucket.take() else {
            return;
        };
        let Some(container) = self.nodes[node.0].container.take() else {
            return;
        };
        let offset = self.nodes[owner.0].bucket_index_offset;
        let slot = (index - offset) as usize;
        if let Some(bucket) = self
            .nodes[owner.0]
            .buckets
            .get_mut(slot)
            .and_then(|b| b.as_mut())
        {
            self.bucket_links.remove(bucket, container);
        }
    }

    /// Moves `node` into `parent`'s bucket at absolute index `index`.
    pub(crate) fn move_to_bucket(&mut self, node: TreeNodeId, parent: TreeNodeId, index: u64) {
        self.remove_from_parent_bucket(node);
        self.insert_to_bucket(parent, node, index);
    }

    /// Head of `node`'s bucket at absolute index `index`; empty when the
    /// index falls outside the allocated range.
    pub(crate) fn bucket_head(&self, node: TreeNodeId, index: u64) -> Option<TreeNodeId> {
        let n = &self.nodes[node.0];
        if index < n.bucket_index_offset {
            return None;
        }
        let slot = (index - n.bucket_index_offset) as usize;
        let bucket = n.buckets.get(slot)?.as_ref()?;
        self.bucket_links
            .first(bucket)
            .and_then(|c| self.bucket_links.item(c))
    }

    /// Resets every node's traversal state to its post-construction value,
    /// dropping all bucket storage.
    pub(crate) fn reset_traversal_state(&mut self) {
        for node in &mut self.nodes {
            node.unvisited_count = node.unvisited_initial;
            node.visited = false;
            node.bucket_index_offset = 0;
            node.lowest_bucket_index = 0;
            node.highest_bucket_index = 0;
            node.next_bucket_index = 0;
            node.buckets = Vec::new();
            node.containing_bucket = None;
            node.container = None;
        }
        self.bucket_links = ListArena::new();
    }

    /// Leaves below `node` in left-to-right order (vertex ids).
    pub fn leaves_below(&self, node: TreeNodeId) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if self.nodes[current.0].children.is_empty() {
                out.push(current.0);
            } else {
                for &child in self.nodes[current.0].children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Internal node ids, root included.
    pub fn internal_nodes(&self) -> Vec<TreeNodeId> {
        (self.vertices..self.nodes.len()).map(TreeNodeId).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mst::{KruskalMstAlgorithm, MstAlgorithm};

    fn tree_for(edges: &[(usize, usize, u64)], vertices: usize) -> ComponentTree {
        let mut graph = WeightedGraph::with_vertices(vertices);
        for &(u, v, w) in edges {
            graph.add_edge(u, v, w);
        }
        let mst = KruskalMstAlgorithm
            .spawn_tree(&graph)
            .expect("valid input graph");
        ComponentTree::build(&mst).expect("connected input graph")
    }

    #[test]
    fn test_single_vertex_tree_is_one_leaf() {
        let graph = WeightedGraph::with_vertices(1);
        let tree = ComponentTree::build(&graph).expect("one vertex needs no edges");
        assert_eq!(tree.root(), TreeNodeId(0));
        assert_eq!(tree.node_count(), 1);
        assert!(tree.node(tree.root()).is_leaf());
    }

    #[test]
    fn test_uniform_msb_collapses_to_one_level() {
        // All weights share msb 0, so one internal node adopts every leaf.
        let tree = tree_for(&[(0, 1, 1), (1, 2, 1), (2, 3, 1)], 4);
        let root = tree.node(tree.root());
        assert_eq!(root.hierarchy_level(), 1);
        assert_eq!(root.children().len(), 4);
        assert_eq!(root.delta(), 3);
        assert_eq!(root.unvisited_initial, 4);
    }

    #[test]
    fn test_two_msb_levels_nest() {
        // Light edges bind {0,1} and {2,3}; the weight-8 edge closes the root
        // two levels higher.
        let tree = tree_for(&[(0, 1, 1), (2, 3, 1), (1, 2, 8)], 4);
        let root = tree.node(tree.root());
        assert_eq!(root.hierarchy_level(), 4);
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.delta(), (1 + 1 + 8u64).div_ceil(8));
        for &child in root.children() {
            let c = tree.node(child);
            assert_eq!(c.hierarchy_level(), 1);
            assert_eq!(c.children().len(), 2);
            assert!(c.hierarchy_level() < root.hierarchy_level());
        }
    }

    #[test]
    fn test_levels_strictly_increase_towards_root() {
        let tree = tree_for(
            &[(0, 1, 1), (1, 2, 8), (2, 3, 1), (3, 4, 8), (0, 4, 3)],
            5,
        );
        for id in tree.internal_nodes() {
            let node = tree.node(id);
            for &child in node.children() {
                assert!(
                    tree.node(child).hierarchy_level() < node.hierarchy_level(),
                    "child level must be strictly below its parent"
                );
            }
        }
    }

    #[test]
    fn test_leaf_ranges_are_contiguous() {
        let mut tree = tree_for(
            &[(0, 1, 2), (0, 2, 2), (1, 3, 4), (2, 3, 4), (3, 4, 1)],
            5,
        );
        let positions = tree.initialize_mapping();

        // Every node's leaves occupy a contiguous position range ending at
        // its recorded maximum.
        let mut all_ids: Vec<TreeNodeId> = (0..tree.node_count()).map(TreeNodeId).collect();
        all_ids.retain(|id| !tree.node(*id).is_leaf());
        for id in all_ids {
            let leaves = tree.leaves_below(id);
            let mut leaf_positions: Vec<usize> = leaves.iter().map(|&v| positions[v]).collect();
            leaf_positions.sort_unstable();
            let hi = tree.node(id).max_unvisited_vertex_index;
            let lo = hi + 1 - leaf_positions.len();
            assert_eq!(leaf_positions, (lo..=hi).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_laminar_leaf_sets() {
        let tree = tree_for(
            &[(0, 1, 1), (1, 2, 8), (2, 3, 1), (3, 4, 8), (4, 5, 2)],
            6,
        );
        let internal = tree.internal_nodes();
        for &a in &internal {
            for &b in &internal {
                let la = tree.leaves_below(a);
                let lb = tree.leaves_below(b);
                let overlap = la.iter().filter(|v| lb.contains(v)).count();
                assert!(
                    overlap == 0 || overlap == la.len() || overlap == lb.len(),
                    "leaf sets must be disjoint or nested"
                );
            }
        }
    }

    #[test]
    fn test_subtree_counts_sum() {
        let tree = tree_for(
            &[(0, 1, 1), (1, 2, 8), (2, 3, 1), (3, 4, 8), (0, 4, 3)],
            5,
        );
        for id in tree.internal_nodes() {
            let node = tree.node(id);
            let sum: usize = node
                .children()
                .iter()
                .map(|&c| tree.node(c).unvisited_initial)
                .sum();
            assert_eq!(node.unvisited_initial, sum);
            assert_eq!(node.unvisited_initial, tree.leaves_below(id).len());
        }
    }

    #[test]
    fn test_disconnected_input_is_rejected() {
        let mut graph = WeightedGraph::with_vertices(4);
        graph.add_edge(0, 1, 1);
        graph.add_edge(2, 3, 1);
        let mst = KruskalMstAlgorithm.spawn_tree(&graph).expect("forest");
        assert!(ComponentTree::build(&mst).is_err());
    }

    #[test]
    fn test_buckets_insert_move_remove() {
        let mut tree = tree_for(&[(0, 1, 1), (1, 2, 1)], 3);
        let root = tree.root();
        tree.node_mut(root).lowest_bucket_index = 2;
        tree.node_mut(root).highest_bucket_index = 5;
        tree.initialize_buckets(root);

        let a = tree.leaf(0);
        let b = tree.leaf(1);
        tree.insert_to_bucket(root, a, 2);
        tree.insert_to_bucket(root, b, 2);
        assert_eq!(tree.bucket_head(root, 2), Some(a));

        tree.move_to_bucket(a, root, 4);
        assert_eq!(tree.bucket_head(root, 2), Some(b));
        assert_eq!(tree.bucket_head(root, 4), Some(a));

        // Indices beyond the window grow the vector instead of dropping.
        tree.move_to_bucket(b, root, 9);
        assert_eq!(tree.bucket_head(root, 2), None);
        assert_eq!(tree.bucket_head(root, 9), Some(b));
        assert_eq!(tree.bucket_head(root, 7), None);

        tree.remove_from_parent_bucket(b);
        assert_eq!(tree.bucket_head(root, 9), None);
    }
}
