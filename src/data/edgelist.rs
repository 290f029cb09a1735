//! Edge list files (Parquet or CSV) for graph data

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use polars::prelude::*;

use crate::graph::{CompressedGraph, GraphBuilder};

/// Column names of the source and target endpoints
#[derive(Debug, Clone)]
pub struct EdgeColumns {
    pub source: String,
    pub target: String,
}

impl Default for EdgeColumns {
    fn default() -> Self {
        Self {
            source: "source".to_string(),
            target: "target".to_string(),
        }
    }
}

/// Load an undirected graph from an edge list.
///
/// Files ending in `.csv` are read as CSV with a header, anything else as
/// Parquet. Ids are read as strings. Self-loops and repeated edges (in
/// either direction) are skipped.
pub fn load_edge_list(path: &str, columns: &EdgeColumns) -> Result<CompressedGraph<String>> {
    log::info!("Reading edge list: {}", path);

    if !Path::new(path).exists() {
        return Err(anyhow!("File not found: {}", path));
    }

    let frame = if path.ends_with(".csv") {
        LazyCsvReader::new(path)
            .with_has_header(true)
            .finish()
            .with_context(|| format!("failed to read CSV file {}", path))?
    } else {
        LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("failed to read Parquet file {}", path))?
    };

    let df = frame
        .select([
            col(columns.source.as_str()).cast(DataType::String),
            col(columns.target.as_str()).cast(DataType::String),
        ])
        .collect()
        .with_context(|| {
            format!(
                "edge list needs columns '{}' and '{}'",
                columns.source, columns.target
            )
        })?;

    log::info!("Loaded {} edge rows", df.height());

    let sources = df.column(columns.source.as_str())?.str()?;
    let targets = df.column(columns.target.as_str())?.str()?;

    let mut builder = GraphBuilder::with_capacity(df.height());
    let mut skipped_loops = 0usize;
    let mut skipped_duplicates = 0usize;
    let mut skipped_nulls = 0usize;

    for (src, dst) in sources.into_iter().zip(targets.into_iter()) {
        let (src, dst) = match (src, dst) {
            (Some(src), Some(dst)) => (src.to_string(), dst.to_string()),
            _ => {
                skipped_nulls += 1;
                continue;
            }
        };

        builder.get_or_create_node(&src);
        builder.get_or_create_node(&dst);
        if src == dst {
            skipped_loops += 1;
            continue;
        }
        if builder.contains_edge(&src, &dst) {
            skipped_duplicates += 1;
            continue;
        }
        builder.add_edge(&src, &dst)?;
    }

    if skipped_loops + skipped_duplicates + skipped_nulls > 0 {
        log::info!(
            "Skipped {} self-loops, {} repeated edges and {} rows with missing ids",
            skipped_loops,
            skipped_duplicates,
            skipped_nulls
        );
    }

    let graph = builder.build();
    log::info!(
        "Built graph with {} nodes and {} edges ({:.1} MiB)",
        graph.node_count,
        graph.edge_count(),
        graph.memory_usage() as f64 / (1024.0 * 1024.0)
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_csv_and_skips_noise() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "source,target").unwrap();
        writeln!(file, "1,2").unwrap();
        writeln!(file, "2,1").unwrap();
        writeln!(file, "2,3").unwrap();
        writeln!(file, "3,3").unwrap();
        drop(file);

        let graph = load_edge_list(path.to_str().unwrap(), &EdgeColumns::default()).unwrap();
        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree(graph.index_of(&"2".to_string()).unwrap()), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = load_edge_list("/nonexistent/edges.parquet", &EdgeColumns::default());
        assert!(result.is_err());
    }
}
