use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::algorithms::connectivity::{classify, ConnectivityConfig};
use crate::events::{ProgressEvent, ProgressObserver};
use crate::geometry::bbox::Bbox;
use crate::model::Polyline;

#[cfg(feature = "threads")]
use rayon::prelude::*;

// A box spanning more cells than this is paired by direct bbox checks
// instead of being registered in every cell.
const MAX_CELLS_PER_BOX: i64 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Skip pairs whose bounding boxes (padded by the distance tolerance)
    /// cannot meet. Never changes the resulting edge set.
    pub prefilter: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions { prefilter: true }
    }
}

/// Undirected simple graph over input indices. Edges are stored once as
/// `(i, j)` with `i < j`, sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectivityGraph {
    node_count: usize,
    edges: Vec<(u32, u32)>,
    adjacency: Vec<Vec<u32>>,
}

impl ConnectivityGraph {
    pub fn empty(node_count: usize) -> Self {
        ConnectivityGraph { node_count, edges: Vec::new(), adjacency: vec![Vec::new(); node_count] }
    }

    /// Builds from an arbitrary edge list; self loops, out-of-range ids and
    /// duplicates (in either orientation) are dropped.
    pub fn from_edges(node_count: usize, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut list: Vec<(u32, u32)> = edges
            .into_iter()
            .filter(|&(a, b)| a != b && (a as usize) < node_count && (b as usize) < node_count)
            .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        list.sort_unstable();
        list.dedup();
        let mut adjacency = vec![Vec::new(); node_count];
        for &(a, b) in &list {
            adjacency[a as usize].push(b);
            adjacency[b as usize].push(a);
        }
        for nbrs in adjacency.iter_mut() {
            nbrs.sort_unstable();
        }
        ConnectivityGraph { node_count, edges: list, adjacency }
    }

    pub fn node_count(&self) -> usize { self.node_count }
    pub fn edge_count(&self) -> usize { self.edges.len() }
    pub fn edges(&self) -> &[(u32, u32)] { &self.edges }

    pub fn neighbors(&self, node: u32) -> &[u32] {
        self.adjacency.get(node as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, node: u32) -> usize { self.neighbors(node).len() }

    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edges.binary_search(&key).is_ok()
    }
}

/// Pairs worth evaluating: all `i < j` whose padded boxes overlap, found
/// with a uniform grid. Sorted and unique.
pub fn candidate_pairs(lines: &[&Polyline], pad: f64) -> Vec<(u32, u32)> {
    let boxes: Vec<Option<Bbox>> = lines.iter().map(|l| Bbox::of_polyline(l).map(|b| b.expand(pad))).collect();
    let present: Vec<(u32, Bbox)> = boxes
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.map(|b| (i as u32, b)))
        .collect();
    if present.len() < 2 {
        return Vec::new();
    }

    // Cell size heuristic: mean box extent
    let mut extent = 0.0;
    let mut origin = (f64::INFINITY, f64::INFINITY);
    for (_, b) in &present {
        extent += b.width().max(b.height());
        origin.0 = origin.0.min(b.min_x);
        origin.1 = origin.1.min(b.min_y);
    }
    let mut cell = extent / present.len() as f64;
    if !cell.is_finite() || cell <= 0.0 {
        cell = 1.0;
    }
    let cell_ix = |v: f64, o: f64| -> i64 { ((v - o) / cell).floor() as i64 };

    let mut buckets: HashMap<(i64, i64), Vec<u32>> = HashMap::new();
    let mut large: Vec<u32> = Vec::new();
    for &(i, b) in &present {
        let ix0 = cell_ix(b.min_x, origin.0); let ix1 = cell_ix(b.max_x, origin.0);
        let iy0 = cell_ix(b.min_y, origin.1); let iy1 = cell_ix(b.max_y, origin.1);
        let span = (ix1 - ix0 + 1).saturating_mul(iy1 - iy0 + 1);
        if span > MAX_CELLS_PER_BOX {
            large.push(i);
            continue;
        }
        for ix in ix0..=ix1 { for iy in iy0..=iy1 { buckets.entry((ix, iy)).or_default().push(i); } }
    }

    let overlap = |i: u32, j: u32| -> bool {
        match (boxes[i as usize], boxes[j as usize]) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    };
    let ordered = |i: u32, j: u32| if i < j { (i, j) } else { (j, i) };

    let mut pairs: Vec<(u32, u32)> = Vec::new();
    for list in buckets.values() {
        if list.len() < 2 { continue; }
        for a in 0..list.len() {
            for b in (a + 1)..list.len() {
                let (i, j) = (list[a], list[b]);
                if overlap(i, j) { pairs.push(ordered(i, j)); }
            }
        }
    }
    for &i in &large {
        for &(j, _) in &present {
            if i != j && overlap(i, j) { pairs.push(ordered(i, j)); }
        }
    }
    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

fn evaluate(lines: &[&Polyline], cfg: &ConnectivityConfig, i: u32, j: u32) -> Option<(u32, u32, f64)> {
    classify(lines[i as usize], lines[j as usize], cfg)
        .filter(|c| c.connected)
        .map(|c| (i, j, c.angle_deg))
}

#[cfg(not(feature = "threads"))]
fn evaluate_pairs(lines: &[&Polyline], cfg: &ConnectivityConfig, pairs: &[(u32, u32)]) -> Vec<(u32, u32, f64)> {
    pairs.iter().filter_map(|&(i, j)| evaluate(lines, cfg, i, j)).collect()
}

#[cfg(feature = "threads")]
fn evaluate_pairs(lines: &[&Polyline], cfg: &ConnectivityConfig, pairs: &[(u32, u32)]) -> Vec<(u32, u32, f64)> {
    pairs.par_iter().filter_map(|&(i, j)| evaluate(lines, cfg, i, j)).collect()
}

#[cfg(not(feature = "threads"))]
fn evaluate_all(lines: &[&Polyline], cfg: &ConnectivityConfig) -> Vec<(u32, u32, f64)> {
    let n = lines.len() as u32;
    let mut found = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(hit) = evaluate(lines, cfg, i, j) { found.push(hit); }
        }
    }
    found
}

#[cfg(feature = "threads")]
fn evaluate_all(lines: &[&Polyline], cfg: &ConnectivityConfig) -> Vec<(u32, u32, f64)> {
    let n = lines.len() as u32;
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| ((i + 1)..n).filter_map(move |j| evaluate(lines, cfg, i, j)))
        .collect()
}

/// Builds the street graph: one node per input line, one edge per pair the
/// predicate accepts. Evaluation order never affects the result.
pub fn build_graph(
    lines: &[&Polyline],
    cfg: &ConnectivityConfig,
    opts: &BuildOptions,
    observer: &dyn ProgressObserver,
) -> ConnectivityGraph {
    let n = lines.len();
    let all_pairs = (n as u64) * (n as u64).saturating_sub(1) / 2;

    let (mut found, evaluated) = if opts.prefilter {
        let pairs = candidate_pairs(lines, cfg.distance_tolerance);
        tracing::debug!(nodes = n, all_pairs, candidates = pairs.len(), "prefilter");
        observer.on_event(&ProgressEvent::BuildStarted { nodes: n, candidate_pairs: pairs.len() as u64 });
        (evaluate_pairs(lines, cfg, &pairs), pairs.len() as u64)
    } else {
        observer.on_event(&ProgressEvent::BuildStarted { nodes: n, candidate_pairs: all_pairs });
        (evaluate_all(lines, cfg), all_pairs)
    };
    found.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    for &(a, b, angle_deg) in &found {
        observer.on_event(&ProgressEvent::EdgeAdded { a, b, angle_deg });
    }
    let graph = ConnectivityGraph::from_edges(n, found.iter().map(|&(a, b, _)| (a, b)));
    observer.on_event(&ProgressEvent::BuildFinished { edges: graph.edge_count(), evaluated_pairs: evaluated });
    tracing::debug!(nodes = n, edges = graph.edge_count(), evaluated, "graph built");
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoopObserver;

    fn lines(v: &[Polyline]) -> Vec<&Polyline> { v.iter().collect() }

    #[test]
    fn from_edges_normalizes() {
        let g = ConnectivityGraph::from_edges(4, vec![(2, 1), (1, 2), (3, 3), (0, 9), (0, 3)]);
        assert_eq!(g.edges(), &[(0, 3), (1, 2)]);
        assert_eq!(g.neighbors(3), &[0]);
        assert!(g.has_edge(2, 1));
        assert!(!g.has_edge(0, 1));
        assert_eq!(g.degree(9), 0);
    }

    #[test]
    fn chain_builds_path_graph() {
        let v = vec![
            Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0)]),
            Polyline::from_xy(&[(1.0, 0.0), (2.0, 0.0)]),
            Polyline::from_xy(&[(2.0, 0.0), (3.0, 0.1)]),
        ];
        for prefilter in [true, false] {
            let g = build_graph(&lines(&v), &ConnectivityConfig::default(), &BuildOptions { prefilter }, &NoopObserver);
            assert_eq!(g.node_count(), 3);
            assert_eq!(g.edges(), &[(0, 1), (1, 2)]);
        }
    }

    #[test]
    fn empty_input_gives_empty_graph() {
        let g = build_graph(&[], &ConnectivityConfig::default(), &BuildOptions::default(), &NoopObserver);
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn prefilter_skips_far_pairs_but_keeps_touching_ones() {
        let v = vec![
            Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0)]),
            Polyline::from_xy(&[(1.0, 0.0), (2.0, 0.0)]),
            Polyline::from_xy(&[(50.0, 50.0), (51.0, 50.0)]),
            Polyline::default(),
        ];
        let pairs = candidate_pairs(&lines(&v), 1e-6);
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn long_lines_are_paired_without_grid_cells() {
        // One very long line among many short ones
        let mut v: Vec<Polyline> = (0..300)
            .map(|i| Polyline::from_xy(&[(i as f64 * 10.0, 5.0), (i as f64 * 10.0 + 1.0, 5.0)]))
            .collect();
        v.push(Polyline::from_xy(&[(-10.0, 4.0), (3010.0, 6.0)]));
        let pairs = candidate_pairs(&lines(&v), 1e-6);
        assert_eq!(pairs.len(), 300);
        assert!(pairs.iter().all(|&(_, j)| j == 300));
    }

    #[test]
    fn observer_sees_each_edge_once() {
        use std::cell::RefCell;
        let v = vec![
            Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0)]),
            Polyline::from_xy(&[(1.0, 0.0), (2.0, 0.0)]),
        ];
        let seen = RefCell::new(Vec::new());
        let obs = |e: &ProgressEvent| seen.borrow_mut().push(e.clone());
        build_graph(&lines(&v), &ConnectivityConfig::default(), &BuildOptions::default(), &obs);
        let seen = seen.into_inner();
        assert!(matches!(seen[0], ProgressEvent::BuildStarted { nodes: 2, .. }));
        assert!(matches!(seen[1], ProgressEvent::EdgeAdded { a: 0, b: 1, .. }));
        assert_eq!(seen[2], ProgressEvent::BuildFinished { edges: 1, evaluated_pairs: 1 });
    }
}
