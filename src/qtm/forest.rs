//! Index-based rooted forest overlaid on the graph's vertices
//!
//! All vertices live in one arena. Indices `0..n` are the graph's vertices
//! and index `n` is the synthetic universal root, whose parent is itself.
//! Parent and children are stored as arena indices, so reparenting never
//! aliases a live reference.

use crate::error::{QtmError, Result};

/// Tree state of one vertex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    /// Degree in the original graph, set once
    pub degree: u32,
    pub depth: u32,
    pub parent: usize,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forest {
    vertices: Vec<Vertex>,
    root: usize,
}

impl Forest {
    /// Every vertex starts as a depth-1 child of the root
    pub fn new(degrees: &[u32]) -> Self {
        let root = degrees.len();
        let mut vertices: Vec<Vertex> = degrees
            .iter()
            .map(|&degree| Vertex {
                degree,
                depth: 1,
                parent: root,
                children: Vec::new(),
            })
            .collect();
        vertices.push(Vertex {
            degree: root as u32,
            depth: 0,
            parent: root,
            children: (0..root).collect(),
        });
        Self { vertices, root }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Number of vertices, root included
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root == 0
    }

    pub fn vertex(&self, v: usize) -> &Vertex {
        &self.vertices[v]
    }

    pub fn parent(&self, v: usize) -> usize {
        self.vertices[v].parent
    }

    pub fn children(&self, v: usize) -> &[usize] {
        &self.vertices[v].children
    }

    pub fn depth(&self, v: usize) -> u32 {
        self.vertices[v].depth
    }

    pub fn degree(&self, v: usize) -> u32 {
        self.vertices[v].degree
    }

    pub fn set_depth(&mut self, v: usize, depth: u32) {
        self.vertices[v].depth = depth;
    }

    /// Move `child` under `new_parent`, keeping both children lists in sync.
    /// The child is appended at the end of its new parent's children.
    pub fn change_parent(&mut self, child: usize, new_parent: usize) {
        let old_parent = self.vertices[child].parent;
        let siblings = &mut self.vertices[old_parent].children;
        if let Some(pos) = siblings.iter().position(|&c| c == child) {
            siblings.remove(pos);
        }
        self.vertices[child].parent = new_parent;
        self.vertices[new_parent].children.push(child);
    }

    /// Detach `v` from the tree: its children move up to its parent, their
    /// subtrees one level shallower, and `v` is parked under the root at depth 1.
    pub fn detach(&mut self, v: usize) -> Result<()> {
        let old_parent = self.vertices[v].parent;
        let old_children = std::mem::take(&mut self.vertices[v].children);

        self.change_parent(v, self.root);
        self.vertices[v].depth = 1;

        for &c in &old_children {
            self.shift_subtree_depth(c, -1)?;
            self.vertices[c].parent = old_parent;
        }
        self.vertices[old_parent].children.extend(old_children);
        Ok(())
    }

    /// Attach `v` under `new_parent` and let it adopt `adopted` (children of
    /// `new_parent`), whose subtrees move one level deeper.
    pub fn reattach(&mut self, v: usize, new_parent: usize, adopted: &[usize]) -> Result<()> {
        if v == new_parent {
            return Err(QtmError::internal(format!(
                "vertex {} chosen as its own parent",
                v
            )));
        }

        self.change_parent(v, new_parent);
        self.vertices[v].depth = self.vertices[new_parent].depth + 1;

        if adopted.is_empty() {
            return Ok(());
        }
        self.vertices[new_parent]
            .children
            .retain(|c| !adopted.contains(c));
        for &c in adopted {
            self.shift_subtree_depth(c, 1)?;
            self.vertices[c].parent = v;
        }
        self.vertices[v].children = adopted.to_vec();
        Ok(())
    }

    /// Add `delta` to the depth of every vertex in the subtree of `v`
    pub fn shift_subtree_depth(&mut self, v: usize, delta: i32) -> Result<()> {
        let mut stack = vec![v];
        while let Some(u) = stack.pop() {
            let vertex = &mut self.vertices[u];
            vertex.depth = vertex.depth.checked_add_signed(delta).ok_or_else(|| {
                QtmError::internal(format!("depth of vertex {} out of range", u))
            })?;
            stack.extend_from_slice(&vertex.children);
        }
        Ok(())
    }

    /// Recompute every depth top-down from the root
    pub fn compute_depths(&mut self) -> Result<()> {
        let mut visited = 0usize;
        let mut stack = vec![(self.root, 0u32)];
        while let Some((v, depth)) = stack.pop() {
            self.vertices[v].depth = depth;
            visited += 1;
            if visited > self.vertices.len() {
                return Err(QtmError::internal("cycle below the root"));
            }
            for &c in &self.vertices[v].children {
                if c != self.root {
                    stack.push((c, depth + 1));
                }
            }
        }

        if visited != self.vertices.len() {
            return Err(QtmError::internal(format!(
                "{} vertices are not reachable from the root",
                self.vertices.len() - visited
            )));
        }
        Ok(())
    }

    /// Vertices in strictly decreasing depth order (children before parents),
    /// bucketed by depth
    pub fn by_decreasing_depth(&self) -> Vec<usize> {
        let max_depth = self.vertices.iter().map(|v| v.depth).max().unwrap_or(0) as usize;
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); max_depth + 1];
        for (idx, vertex) in self.vertices.iter().enumerate() {
            buckets[vertex.depth as usize].push(idx);
        }
        buckets.into_iter().rev().flatten().collect()
    }

    /// Pre-order walk from the root yielding `(vertex, ancestors)` for every
    /// non-root vertex. `ancestors` runs from the top-level vertex down to the
    /// parent and excludes the root.
    pub fn walk_with_ancestors(&self, mut visit: impl FnMut(usize, &[usize])) {
        let mut path: Vec<usize> = Vec::new();
        // (vertex, depth below the root)
        let mut stack: Vec<(usize, usize)> =
            self.children(self.root).iter().rev().map(|&c| (c, 0)).collect();

        while let Some((v, level)) = stack.pop() {
            path.truncate(level);
            visit(v, &path);
            path.push(v);
            for &c in self.children(v).iter().rev() {
                stack.push((c, level + 1));
            }
        }
    }

    /// Entry/exit times of a pre-order walk; `a` is an ancestor of `b` iff
    /// `tin[a] <= tin[b] && tout[b] <= tout[a]`
    pub fn euler_times(&self) -> (Vec<u32>, Vec<u32>) {
        let n = self.vertices.len();
        let mut tin = vec![0u32; n];
        let mut tout = vec![0u32; n];
        let mut clock = 0u32;
        let mut stack = vec![(self.root, false)];

        while let Some((v, done)) = stack.pop() {
            if done {
                tout[v] = clock;
                continue;
            }
            tin[v] = clock;
            clock += 1;
            stack.push((v, true));
            for &c in self.children(v).iter().rev() {
                stack.push((c, false));
            }
        }
        (tin, tout)
    }

    /// Check parent/children consistency, reachability from the root and the
    /// depth of every vertex
    pub fn validate(&self) -> Result<()> {
        let root = &self.vertices[self.root];
        if root.parent != self.root || root.depth != 0 {
            return Err(QtmError::internal("root must be its own parent at depth 0"));
        }

        for (idx, vertex) in self.vertices.iter().enumerate() {
            if idx != self.root && !self.vertices[vertex.parent].children.contains(&idx) {
                return Err(QtmError::internal(format!(
                    "vertex {} missing from the children of its parent {}",
                    idx, vertex.parent
                )));
            }
            for &c in &vertex.children {
                if c == self.root || self.vertices[c].parent != idx {
                    return Err(QtmError::internal(format!(
                        "child {} of vertex {} points to another parent",
                        c, idx
                    )));
                }
                if self.vertices[c].depth != vertex.depth + 1 {
                    return Err(QtmError::internal(format!(
                        "vertex {} at depth {} under parent at depth {}",
                        c, self.vertices[c].depth, vertex.depth
                    )));
                }
            }
        }

        let mut copy = self.clone();
        copy.compute_depths()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root(3) -> 0 -> 1 -> 2
    fn chain() -> Forest {
        let mut forest = Forest::new(&[1, 2, 1]);
        forest.change_parent(1, 0);
        forest.change_parent(2, 1);
        forest.compute_depths().unwrap();
        forest
    }

    #[test]
    fn starts_as_a_star() {
        let forest = Forest::new(&[2, 1, 3]);
        assert_eq!(forest.root(), 3);
        assert_eq!(forest.children(3), &[0, 1, 2]);
        assert_eq!(forest.degree(1), 1);
        assert_eq!(forest.degree(2), 3);
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn detach_lifts_children() {
        let mut forest = chain();
        assert_eq!(forest.depth(2), 3);

        forest.detach(1).unwrap();
        assert_eq!(forest.parent(2), 0);
        assert_eq!(forest.depth(2), 2);
        assert_eq!(forest.parent(1), 3);
        assert_eq!(forest.depth(1), 1);
        assert!(forest.children(1).is_empty());
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn reattach_adopts_children() {
        let mut forest = chain();
        forest.detach(1).unwrap();
        forest.reattach(1, 0, &[2]).unwrap();

        assert_eq!(forest, chain());
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn reattach_refuses_self_parent() {
        let mut forest = chain();
        assert!(forest.reattach(1, 1, &[]).is_err());
    }

    #[test]
    fn compute_depths_detects_cycles() {
        let mut forest = chain();
        // 0 -> 1 -> 0, detached from the root
        forest.change_parent(0, 1);
        assert!(forest.compute_depths().is_err());
        assert!(forest.validate().is_err());
    }

    #[test]
    fn validate_catches_stale_depths() {
        let mut forest = chain();
        forest.set_depth(2, 7);
        assert!(forest.validate().is_err());
    }

    #[test]
    fn depth_order_puts_leaves_first() {
        let forest = chain();
        assert_eq!(forest.by_decreasing_depth(), vec![2, 1, 0, 3]);
    }

    #[test]
    fn walk_reports_ancestors() {
        let mut forest = chain();
        forest.change_parent(2, 0);
        forest.compute_depths().unwrap();

        let mut seen = Vec::new();
        forest.walk_with_ancestors(|v, ancestors| seen.push((v, ancestors.to_vec())));
        assert_eq!(seen, vec![(0, vec![]), (1, vec![0]), (2, vec![0])]);
    }

    #[test]
    fn euler_times_encode_ancestry() {
        let forest = chain();
        let (tin, tout) = forest.euler_times();
        let is_ancestor = |a: usize, b: usize| tin[a] <= tin[b] && tout[b] <= tout[a];
        assert!(is_ancestor(0, 2));
        assert!(!is_ancestor(2, 0));
    }
}
