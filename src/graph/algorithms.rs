//! Graph algorithms for analysis

use std::cmp::{Ordering, Reverse};

use crate::graph::{CompressedGraph, EdgeTable, VertexId};

/// Order vertices by descending degree, ties broken by ascending id.
/// Position in the returned vector is the vertex's rank.
pub fn degree_order<N: VertexId>(graph: &CompressedGraph<N>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..graph.node_count).collect();
    order.sort_by(|&a, &b| compare_by_degree(graph, a, b));
    order
}

fn compare_by_degree<N: VertexId>(graph: &CompressedGraph<N>, a: usize, b: usize) -> Ordering {
    Reverse(graph.degree(a))
        .cmp(&Reverse(graph.degree(b)))
        .then_with(|| graph.id(a).cmp(graph.id(b)))
}

/// Count, for every edge, the triangles of the graph it belongs to.
///
/// Forward counting: vertices are visited by rank (see [`degree_order`]).
/// For each edge `s - t` with `s` ranked before `t`, the common entries of
/// `A(s)` and `A(t)` close a triangle, then `s` is appended to `A(t)`.
/// Each triangle is found exactly once, from its two lowest-ranked vertices.
pub fn count_all_triangles<N: VertexId>(graph: &CompressedGraph<N>) -> EdgeTable {
    let mut table = EdgeTable::from_graph(graph);
    let order = degree_order(graph);

    let mut rank = vec![0u32; graph.node_count];
    for (r, &v) in order.iter().enumerate() {
        rank[v] = r as u32;
    }

    // A(v): ranks of already visited neighbours that point at v.
    // Ranks are appended in increasing order, so every list stays sorted.
    let mut ahead: Vec<Vec<u32>> = vec![Vec::new(); graph.node_count];
    let mut common = Vec::new();
    let mut triangles = 0usize;

    for &s in &order {
        for &t in graph.neighbors(s) {
            let t = t as usize;
            if rank[s] >= rank[t] {
                continue;
            }

            common.clear();
            intersect_sorted(&ahead[s], &ahead[t], &mut common);
            for &r in &common {
                let v = order[r as usize];
                for (a, b) in [(s, t), (s, v), (v, t)] {
                    if let Some(record) = table.get_mut(a, b) {
                        record.num_triangles += 1;
                    }
                }
                triangles += 1;
            }

            ahead[t].push(rank[s]);
        }
    }

    log::debug!(
        "Counted {} triangles over {} edges",
        triangles,
        table.len()
    );

    table
}

fn intersect_sorted(a: &[u32], b: &[u32], out: &mut Vec<u32>) {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
}

/// Number of triangles edge `a - b` participates in, by intersecting the
/// two neighbourhoods directly
pub fn count_triangles<N: VertexId>(graph: &CompressedGraph<N>, a: usize, b: usize) -> usize {
    let mut common = Vec::new();
    intersect_sorted(graph.neighbors(a), graph.neighbors(b), &mut common);
    common.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn path_has_no_triangles() {
        let graph =
            GraphBuilder::from_edges(1..=5, vec![(1, 2), (2, 3), (3, 4), (4, 5)]).unwrap();
        let table = count_all_triangles(&graph);

        assert_eq!(table.len(), 4);
        assert!(table.iter().all(|(_, record)| record.num_triangles == 0));
    }

    #[test]
    fn complete_graph_counts() {
        let nodes: Vec<u32> = (0..5).collect();
        let edges: Vec<(u32, u32)> = nodes
            .iter()
            .flat_map(|&a| nodes.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
            .collect();
        let graph = GraphBuilder::from_edges(nodes, edges).unwrap();
        let table = count_all_triangles(&graph);

        // In K5 every edge closes a triangle with each of the other 3 vertices
        assert_eq!(table.len(), 10);
        assert!(table.iter().all(|(_, record)| record.num_triangles == 3));
    }

    #[test]
    fn matches_neighbourhood_intersection() {
        // Two triangles sharing edge 2-3, plus a pendant vertex
        let graph = GraphBuilder::from_edges(
            1..=5,
            vec![(1, 2), (1, 3), (2, 3), (2, 4), (3, 4), (4, 5)],
        )
        .unwrap();
        let table = count_all_triangles(&graph);

        for (u, v) in graph.edge_pairs() {
            assert_eq!(
                table.triangles(u, v).unwrap() as usize,
                count_triangles(&graph, u, v)
            );
        }
        let (two, three) = (graph.index_of(&2).unwrap(), graph.index_of(&3).unwrap());
        assert_eq!(table.triangles(two, three), Some(2));
    }

    #[test]
    fn orders_by_degree_then_id() {
        let graph = GraphBuilder::from_edges(1..=4, vec![(3, 1), (3, 2), (4, 2)]).unwrap();
        let order: Vec<u32> = degree_order(&graph)
            .into_iter()
            .map(|v| *graph.id(v))
            .collect();
        assert_eq!(order, vec![2, 3, 1, 4]);
    }
}
