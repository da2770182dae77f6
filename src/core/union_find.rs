/*!
# Union-Find

A disjoint-set forest over `0..n` with union by size and full path
compression, in the style of Tarjan's structure: `find` first walks to the
root and then repoints every node on the walked path directly at it.
*/

/// Disjoint-set forest with union by size and path compression.
#[derive(Debug)]
pub struct UnionFind {
    parent: Vec<Option<usize>>,
    subtree_size: Vec<usize>,
}

impl UnionFind {
    /// Creates `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: vec![None; n],
            subtree_size: vec![1; n],
        }
    }

    /// Returns the representative of the set containing `x` and compresses
    /// the walked path onto the root.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while let Some(p) = self.parent[root] {
            root = p;
        }

        let mut current = x;
        while current != root {
            let next = self.parent[current].unwrap_or(root);
            self.parent[current] = Some(root);
            current = next;
        }

        root
    }

    /// Merges the sets containing `a` and `b`; the larger root wins ties.
    pub fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }

        if self.subtree_size[root_a] < self.subtree_size[root_b] {
            self.parent[root_a] = Some(root_b);
            self.subtree_size[root_b] += self.subtree_size[root_a];
        } else {
            self.parent[root_b] = Some(root_a);
            self.subtree_size[root_a] += self.subtree_size[root_b];
        }
    }
}
