use std::collections::HashSet;
use std::fmt::Debug;

use log::trace;
use num_traits::{Float, Zero};

use crate::algorithm::{ShortestPathAlgorithm, ShortestPathResult};
use crate::data_structures::VertexHeap;
use crate::graph::Graph;
use crate::{Error, Result};

/// Classic Dijkstra's algorithm implementation
#[derive(Debug, Default)]
pub struct Dijkstra;

impl Dijkstra {
    /// Creates a new Dijkstra algorithm instance
    pub fn new() -> Self {
        Dijkstra
    }
}

impl<W, G> ShortestPathAlgorithm<W, G> for Dijkstra
where
    W: Float + Zero + Debug + Copy + Ord,
    G: Graph<W>,
{
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn compute_shortest_paths(&self, graph: &G, source: usize) -> Result<ShortestPathResult<W>> {
        if !graph.has_vertex(source) {
            return Err(Error::SourceNotFound(source));
        }

        let n = graph.vertex_count();
        let mut distances = vec![W::infinity(); n];
        let mut predecessors = vec![None; n];
        distances[source] = W::zero();

        settle_from_seeds(graph, &[source], &mut distances, &mut predecessors);

        Ok(ShortestPathResult::from_dense(source, distances, predecessors))
    }
}

/// Runs Dijkstra relaxation from every seed at its current distance.
///
/// This is both the body of the classical algorithm (one seed, the source) and
/// the completion pass that repairs BMSSP output (every vertex with a finite
/// distance as a seed). Returns the number of distance improvements made.
pub fn settle_from_seeds<W, G>(
    graph: &G,
    seeds: &[usize],
    distances: &mut [W],
    predecessors: &mut [Option<usize>],
) -> usize
where
    W: Float + Zero + Debug + Copy + Ord,
    G: Graph<W>,
{
    let mut queue = VertexHeap::with_capacity(seeds.len());
    for &seed in seeds {
        if distances[seed].is_finite() {
            queue.push(seed, distances[seed]);
        }
    }

    let mut improvements = 0;
    while let Some((u, dist_u)) = queue.pop_live(distances) {
        for (v, weight) in graph.outgoing_edges(u) {
            let new_dist = dist_u + weight;
            if new_dist < distances[v] {
                distances[v] = new_dist;
                predecessors[v] = Some(u);
                queue.push(v, new_dist);
                improvements += 1;
            }
        }
    }

    improvements
}

/// Outcome of a bounded expansion or of one BMSSP level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelResult<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// New boundary value B'
    pub new_bound: W,

    /// Vertices whose distances are final below `new_bound`
    pub vertices: Vec<usize>,
}

/// Mini-Dijkstra used as the BMSSP base case.
///
/// Expands from `source` at its current distance, finalising at most `k + 1`
/// vertices and never settling anything at or above `bound`. When at most `k`
/// vertices were finalised the whole neighbourhood fit and the bound is kept.
/// Otherwise the bound shrinks to the largest finalised distance and only the
/// vertices strictly below it are returned.
pub fn bounded_expand<W, G>(
    graph: &G,
    source: usize,
    bound: W,
    distances: &mut [W],
    predecessors: &mut [Option<usize>],
    k: usize,
) -> LevelResult<W>
where
    W: Float + Zero + Debug + Copy + Ord,
    G: Graph<W>,
{
    let mut heap = VertexHeap::with_capacity(k * 2);
    let mut finalized = Vec::with_capacity(k + 1);
    let mut seen = HashSet::with_capacity(k + 1);

    heap.push(source, distances[source]);

    while finalized.len() < k + 1 {
        let Some((u, dist_u)) = heap.pop_live(distances) else {
            break;
        };
        if dist_u >= bound {
            break;
        }
        if !seen.insert(u) {
            continue;
        }
        finalized.push(u);

        for (v, weight) in graph.outgoing_edges(u) {
            let new_dist = dist_u + weight;
            if new_dist < distances[v] && new_dist < bound {
                distances[v] = new_dist;
                predecessors[v] = Some(u);
                heap.push(v, new_dist);
            }
        }
    }

    trace!(
        "bounded_expand from {} finalised {} vertices (k={})",
        source,
        finalized.len(),
        k
    );

    if finalized.len() <= k {
        return LevelResult {
            new_bound: bound,
            vertices: finalized,
        };
    }

    let new_bound = finalized
        .iter()
        .map(|&v| distances[v])
        .fold(W::neg_infinity(), std::cmp::max);
    let vertices = finalized
        .into_iter()
        .filter(|&v| distances[v] < new_bound)
        .collect();

    LevelResult {
        new_bound,
        vertices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DirectedGraph;
    use ordered_float::OrderedFloat;

    type W = OrderedFloat<f64>;

    #[test]
    fn seeded_pass_repairs_overestimates() {
        // 0 -> 1 -> 2 -> 3 plus a shortcut 0 -> 3
        let graph = DirectedGraph::from_edge_list(
            4,
            vec![
                (0, 1, OrderedFloat(1.0)),
                (1, 2, OrderedFloat(1.0)),
                (2, 3, OrderedFloat(1.0)),
                (0, 3, OrderedFloat(10.0)),
            ],
        )
        .unwrap();
        let inf = OrderedFloat(f64::INFINITY);
        // 3 holds the long way round, 1 and 2 were never reached
        let mut dist: Vec<W> = vec![OrderedFloat(0.0), inf, inf, OrderedFloat(10.0)];
        let mut pred = vec![None, None, None, Some(0)];

        let updates = settle_from_seeds(&graph, &[0, 3], &mut dist, &mut pred);

        assert_eq!(updates, 3);
        let expected: Vec<W> = [0.0, 1.0, 2.0, 3.0].into_iter().map(OrderedFloat).collect();
        assert_eq!(dist, expected);
        assert_eq!(pred, vec![None, Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn bounded_expand_stops_after_k_plus_one() {
        let graph = DirectedGraph::from_edge_list(
            5,
            (0..4).map(|i| (i, i + 1, OrderedFloat(1.0))),
        )
        .unwrap();
        let mut dist: Vec<W> = vec![OrderedFloat(f64::INFINITY); 5];
        dist[0] = OrderedFloat(0.0);
        let mut pred = vec![None; 5];

        let bound = OrderedFloat(f64::INFINITY);
        let result = bounded_expand(&graph, 0, bound, &mut dist, &mut pred, 2);

        assert_eq!(result.new_bound, OrderedFloat(2.0));
        assert_eq!(result.vertices, vec![0, 1]);
        // the frontier beyond the last settled vertex has been relaxed
        assert_eq!(dist[3], OrderedFloat(3.0));
        assert!(dist[4].is_infinite());
    }
}
