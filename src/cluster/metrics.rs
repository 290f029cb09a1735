//! Cluster statistics and metrics

use std::collections::HashSet;

use rayon::prelude::*;

use crate::cluster::Cluster;
use crate::graph::{CompressedGraph, VertexId};
use crate::qtm::Forest;

/// Fill in size, density and height of a cluster from its members and centre
pub fn calculate_cluster_metrics<N: VertexId + Sync>(
    cluster: &mut Cluster,
    graph: &CompressedGraph<N>,
    forest: &Forest,
) {
    cluster.size = cluster.members.len();
    cluster.density = calculate_density(graph, &cluster.members);
    cluster.height = subtree_height(forest, cluster.center as usize);
}

/// Calculate density (actual edges / potential edges) of an undirected graph
/// restricted to `members`, in parallel for larger clusters
pub fn calculate_density<N: VertexId + Sync>(graph: &CompressedGraph<N>, members: &[u32]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }

    let potential_edges = n * (n - 1) / 2;
    let members_set: HashSet<u32> = members.iter().copied().collect();
    let count_inner = |&node: &u32| {
        graph
            .neighbors(node as usize)
            .iter()
            .filter(|&&other| node < other && members_set.contains(&other))
            .count()
    };

    // For small clusters, use sequential processing
    let actual_edges: usize = if n < 1000 {
        members.iter().map(count_inner).sum()
    } else {
        members.par_iter().map(count_inner).sum()
    };

    actual_edges as f32 / potential_edges as f32
}

/// Number of levels in the subtree rooted at `top`
pub fn subtree_height(forest: &Forest, top: usize) -> u32 {
    let mut height = 0;
    let mut stack = vec![(top, 1u32)];
    while let Some((v, level)) = stack.pop() {
        height = height.max(level);
        for &c in forest.children(v) {
            stack.push((c, level + 1));
        }
    }
    height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn density_of_triangle_and_path() {
        let graph =
            GraphBuilder::from_edges(0..5, vec![(0, 1), (1, 2), (0, 2), (3, 4)]).unwrap();
        assert_eq!(calculate_density(&graph, &[0, 1, 2]), 1.0);
        assert_eq!(calculate_density(&graph, &[0, 1, 3, 4]), 2.0 / 6.0);
        assert_eq!(calculate_density(&graph, &[4]), 1.0);
    }

    #[test]
    fn parallel_density_matches() {
        let n = 1200u32;
        let edges: Vec<(u32, u32)> = (1..n).map(|v| (v - 1, v)).collect();
        let graph = GraphBuilder::from_edges(0..n, edges).unwrap();
        let members: Vec<u32> = (0..n).collect();

        let expected = (n - 1) as f32 / (n as f32 * (n - 1) as f32 / 2.0);
        assert!((calculate_density(&graph, &members) - expected).abs() < 1e-6);
    }

    #[test]
    fn recomputes_metrics() {
        let graph = GraphBuilder::from_edges(0..3, vec![(0, 1), (1, 2)]).unwrap();
        let mut forest = Forest::new(&[1, 2, 1]);
        forest.change_parent(0, 1);
        forest.change_parent(2, 0);
        forest.compute_depths().unwrap();

        let mut cluster = Cluster {
            id: 0,
            members: vec![1, 0, 2],
            size: 0,
            density: 0.0,
            center: 1,
            height: 0,
        };
        calculate_cluster_metrics(&mut cluster, &graph, &forest);
        assert_eq!(cluster.size, 3);
        assert_eq!(cluster.height, 3);
        assert!((cluster.density - 2.0 / 3.0).abs() < 1e-6);
    }
}
