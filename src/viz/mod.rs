//! Visualization export module

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use polars::prelude::*;

use crate::cluster::Cluster;
use crate::graph::{CompressedGraph, VertexId};
use crate::qtm::{Forest, QtGraph};

/// Write the result graph and per-node data for external visualization tools
pub fn generate_visualizations<N: VertexId + Display>(
    clusters: &[Cluster],
    graph: &CompressedGraph<N>,
    forest: &Forest,
    result: &QtGraph<N>,
    output_dir: &str,
) -> Result<()> {
    log::info!("Generating visualization files");

    let viz_dir = Path::new(output_dir).join("visualizations");
    fs::create_dir_all(&viz_dir)?;

    write_graphml(result, &viz_dir.join("qt_graph.graphml"))?;
    write_nodes_csv(clusters, graph, forest, &viz_dir.join("nodes.csv"))?;

    log::info!("Visualization files generated successfully");

    Ok(())
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Write the result graph as GraphML: directed for the skeleton,
/// undirected for the closure
pub fn write_graphml<N: VertexId + Display>(result: &QtGraph<N>, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let edge_default = if result.is_directed() {
        "directed"
    } else {
        "undirected"
    };

    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(file, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(
        file,
        "  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>"
    )?;
    writeln!(file, "  <graph id=\"G\" edgedefault=\"{}\">", edge_default)?;

    let ids = result.node_ids();
    let mut node_index: HashMap<&N, usize> = HashMap::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        node_index.insert(id, i);
        writeln!(
            file,
            "    <node id=\"n{}\">\n      <data key=\"label\">{}</data>\n    </node>",
            i,
            escape_xml(&id.to_string())
        )?;
    }

    for (edge_id, (source, target)) in result.edge_list().iter().enumerate() {
        writeln!(
            file,
            "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\"/>",
            edge_id, node_index[source], node_index[target]
        )?;
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;
    file.flush()?;

    Ok(())
}

/// Write one CSV row per vertex: id, parent, depth and community id.
/// Top-level vertices and vertices outside every community leave the
/// corresponding field empty.
pub fn write_nodes_csv<N: VertexId + Display>(
    clusters: &[Cluster],
    graph: &CompressedGraph<N>,
    forest: &Forest,
    path: &Path,
) -> Result<()> {
    let mut cluster_of: Vec<Option<u32>> = vec![None; graph.node_count];
    for cluster in clusters {
        for &member in &cluster.members {
            cluster_of[member as usize] = Some(cluster.id);
        }
    }

    let root = forest.root();
    let ids: Vec<String> = (0..graph.node_count)
        .map(|v| graph.id(v).to_string())
        .collect();
    let parents: Vec<Option<String>> = (0..graph.node_count)
        .map(|v| {
            let parent = forest.parent(v);
            (parent != root).then(|| graph.id(parent).to_string())
        })
        .collect();
    let depths: Vec<u32> = (0..graph.node_count).map(|v| forest.depth(v)).collect();

    let mut df = df!(
        "id" => ids,
        "parent" => parents,
        "depth" => depths,
        "cluster_id" => cluster_of
    )?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;

    Ok(())
}
