//! Community detection on the quasi-threshold forest

use rayon::prelude::*;

use crate::cluster::metrics::calculate_cluster_metrics;
use crate::cluster::Cluster;
use crate::graph::{CompressedGraph, VertexId};
use crate::qtm::Forest;

/// Members of the subtree rooted at `top`, in pre-order
pub fn subtree_members(forest: &Forest, top: usize) -> Vec<u32> {
    let mut members = Vec::new();
    let mut stack = vec![top];
    while let Some(v) = stack.pop() {
        members.push(v as u32);
        stack.extend(forest.children(v).iter().rev());
    }
    members
}

/// Turn every top-level subtree of the forest into a community.
///
/// Communities smaller than `min_cluster_size` are dropped. The rest are
/// sorted by size (largest first, ties by the centre's id) and numbered in
/// that order.
pub fn find_communities<N: VertexId + Sync>(
    graph: &CompressedGraph<N>,
    forest: &Forest,
    min_cluster_size: usize,
) -> Vec<Cluster> {
    log::info!("Extracting communities from the quasi-threshold forest");

    let subtrees: Vec<(usize, Vec<u32>)> = forest
        .children(forest.root())
        .iter()
        .map(|&top| (top, subtree_members(forest, top)))
        .filter(|(_, members)| members.len() >= min_cluster_size)
        .collect();

    let mut clusters: Vec<Cluster> = subtrees
        .into_par_iter()
        .map(|(top, members)| {
            let mut cluster = Cluster {
                id: 0,
                members,
                size: 0,
                density: 0.0,
                center: top as u32,
                height: 0,
            };
            calculate_cluster_metrics(&mut cluster, graph, forest);
            cluster
        })
        .collect();

    clusters.sort_by(|a, b| {
        b.size
            .cmp(&a.size)
            .then_with(|| graph.id(a.center as usize).cmp(graph.id(b.center as usize)))
    });
    for (id, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = id as u32;
    }

    log::info!(
        "Found {} communities with {} or more members",
        clusters.len(),
        min_cluster_size
    );

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn one_community_per_top_level_subtree() {
        // Triangle {0, 1, 2}, edge {3, 4}, isolated 5
        let graph = GraphBuilder::from_edges(
            0..6,
            vec![(0, 1), (1, 2), (0, 2), (3, 4)],
        )
        .unwrap();
        let mut forest = Forest::new(&[2, 2, 2, 1, 1, 0]);
        forest.change_parent(1, 0);
        forest.change_parent(2, 1);
        forest.change_parent(4, 3);
        forest.compute_depths().unwrap();

        let clusters = find_communities(&graph, &forest, 1);
        assert_eq!(clusters.len(), 3);

        assert_eq!(clusters[0].id, 0);
        assert_eq!(clusters[0].members, vec![0, 1, 2]);
        assert_eq!(clusters[0].center, 0);
        assert_eq!(clusters[0].height, 3);
        assert_eq!(clusters[0].density, 1.0);

        assert_eq!(clusters[1].members, vec![3, 4]);
        assert_eq!(clusters[2].members, vec![5]);

        let large = find_communities(&graph, &forest, 2);
        assert_eq!(large.len(), 2);
    }
}
