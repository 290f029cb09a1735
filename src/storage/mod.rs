//! Results persistence module

use std::fmt::Display;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::cluster::Cluster;
use crate::graph::{CompressedGraph, VertexId};
use crate::qtm::{EditCount, Forest, QtGraph};

/// Save analysis results to the specified directory
pub fn save_results<N: VertexId + Display>(
    clusters: &[Cluster],
    graph: &CompressedGraph<N>,
    forest: &Forest,
    result: &QtGraph<N>,
    edits: EditCount,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} communities to {}", clusters.len(), output_dir);

    fs::create_dir_all(output_dir)?;

    save_summary(clusters, graph, result, edits, output_dir)?;
    save_clusters(clusters, graph, output_dir)?;
    save_tree(graph, forest, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;
    Ok(())
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Save summary information
fn save_summary<N: VertexId + Display>(
    clusters: &[Cluster],
    graph: &CompressedGraph<N>,
    result: &QtGraph<N>,
    edits: EditCount,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving summary information");

    let summary = json!({
        "graph_stats": {
            "node_count": graph.node_count,
            "edge_count": graph.edge_count(),
            "avg_degree": average(2.0 * graph.edge_count() as f64, graph.node_count),
        },
        "result": {
            "mode": if result.is_directed() { "skeleton" } else { "closure" },
            "edge_count": result.edge_count(),
            "edits": edits,
            "total_edits": edits.total(),
        },
        "cluster_stats": {
            "cluster_count": clusters.len(),
            "total_clustered_nodes": clusters.iter().map(|c| c.size).sum::<usize>(),
            "largest_cluster_size": clusters.first().map_or(0, |c| c.size),
            "smallest_cluster_size": clusters.last().map_or(0, |c| c.size),
            "avg_cluster_size": average(
                clusters.iter().map(|c| c.size as f64).sum(),
                clusters.len()
            ),
            "avg_density": average(
                clusters.iter().map(|c| c.density as f64).sum(),
                clusters.len()
            ),
        }
    });

    write_json(&Path::new(output_dir).join("summary.json"), &summary)
}

/// Save individual cluster information
fn save_clusters<N: VertexId + Display>(
    clusters: &[Cluster],
    graph: &CompressedGraph<N>,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving individual community information");

    let clusters_dir = Path::new(output_dir).join("clusters");
    fs::create_dir_all(&clusters_dir)?;

    for cluster in clusters {
        let member_ids: Vec<String> = cluster
            .members
            .iter()
            .map(|&idx| graph.id(idx as usize).to_string())
            .collect();

        let cluster_json = json!({
            "id": cluster.id,
            "size": cluster.size,
            "density": cluster.density,
            "center": graph.id(cluster.center as usize).to_string(),
            "height": cluster.height,
            "members": member_ids
        });

        write_json(
            &clusters_dir.join(format!("cluster_{}.json", cluster.id)),
            &cluster_json,
        )?;
    }

    let clusters_json = json!({
        "clusters": clusters.iter().map(|c| {
            json!({
                "id": c.id,
                "size": c.size,
                "density": c.density,
                "center": graph.id(c.center as usize).to_string(),
                "height": c.height
            })
        }).collect::<Vec<_>>()
    });

    write_json(&Path::new(output_dir).join("all_clusters.json"), &clusters_json)
}

/// Save the parent and depth of every vertex; top-level vertices have a null parent
fn save_tree<N: VertexId + Display>(
    graph: &CompressedGraph<N>,
    forest: &Forest,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving forest structure");

    let root = forest.root();
    let vertices: Vec<serde_json::Value> = (0..graph.node_count)
        .map(|v| {
            let parent = forest.parent(v);
            json!({
                "id": graph.id(v).to_string(),
                "parent": (parent != root).then(|| graph.id(parent).to_string()),
                "depth": forest.depth(v),
            })
        })
        .collect();

    write_json(
        &Path::new(output_dir).join("tree.json"),
        &json!({ "vertices": vertices }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::detection::find_communities;
    use crate::graph::GraphBuilder;
    use crate::qtm::QuasiThresholdMover;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn writes_all_result_files() {
        let ids: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let edges = vec![
            (ids[0].clone(), ids[1].clone()),
            (ids[1].clone(), ids[2].clone()),
            (ids[0].clone(), ids[2].clone()),
        ];
        let graph = GraphBuilder::from_edges(ids, edges).unwrap();

        let mut qtm = QuasiThresholdMover::new(graph, "root".to_string()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let result = qtm.run(true, &mut rng).unwrap();
        let forest = qtm.forest().unwrap();
        let clusters = find_communities(qtm.graph(), forest, 1);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        save_results(
            &clusters,
            qtm.graph(),
            forest,
            &result,
            qtm.edit_count().unwrap(),
            out,
        )
        .unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(summary["graph_stats"]["node_count"], 4);
        assert_eq!(summary["result"]["mode"], "closure");
        assert_eq!(summary["result"]["total_edits"], 0);
        assert_eq!(summary["cluster_stats"]["cluster_count"], 2);

        let tree: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("tree.json")).unwrap())
                .unwrap();
        assert_eq!(tree["vertices"].as_array().unwrap().len(), 4);

        assert!(dir.path().join("all_clusters.json").exists());
        assert!(dir.path().join("clusters").join("cluster_0.json").exists());
        assert!(dir.path().join("clusters").join("cluster_1.json").exists());
    }
}
