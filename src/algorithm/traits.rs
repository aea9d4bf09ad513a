use std::fmt::Debug;

use log::warn;
use num_traits::{Float, Zero};

use crate::graph::Graph;
use crate::Result;

/// Result of a shortest path algorithm execution
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathResult<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Distances from source to each vertex, `None` when unreachable
    pub distances: Vec<Option<W>>,

    /// Predecessor vertices in the shortest path tree, `None` for the source
    /// and for unreachable vertices
    pub predecessors: Vec<Option<usize>>,

    /// Source vertex ID
    pub source: usize,
}

impl<W> ShortestPathResult<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Builds a result from dense working arrays, mapping infinite distances to `None`
    pub fn from_dense(source: usize, distances: Vec<W>, predecessors: Vec<Option<usize>>) -> Self {
        let distances = distances
            .into_iter()
            .map(|d| if d.is_finite() { Some(d) } else { None })
            .collect();

        ShortestPathResult {
            distances,
            predecessors,
            source,
        }
    }

    /// Distance to `vertex`, infinity when unreachable or out of range
    pub fn distance(&self, vertex: usize) -> W {
        self.distances
            .get(vertex)
            .copied()
            .flatten()
            .unwrap_or_else(W::infinity)
    }

    pub fn is_reachable(&self, vertex: usize) -> bool {
        matches!(self.distances.get(vertex), Some(Some(_)))
    }

    /// Number of vertices with a finite distance
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }

    /// Walks the predecessor chain from `target` back to the source.
    ///
    /// Returns `None` when the target is unreachable or the chain is broken.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        if !self.is_reachable(target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while current != self.source {
            match self.predecessors.get(current).copied().flatten() {
                Some(pred) => {
                    path.push(pred);
                    current = pred;
                }
                None => {
                    warn!("Predecessor chain from {} breaks at {}", target, current);
                    return None;
                }
            }

            if path.len() > self.predecessors.len() {
                warn!("Predecessor chain from {} contains a cycle", target);
                return None;
            }
        }

        path.reverse();
        Some(path)
    }
}

/// Trait for shortest path algorithms
pub trait ShortestPathAlgorithm<W, G>
where
    W: Float + Zero + Debug + Copy,
    G: Graph<W>,
{
    /// Compute shortest paths from a source vertex to all other vertices
    fn compute_shortest_paths(&self, graph: &G, source: usize) -> Result<ShortestPathResult<W>>;

    /// Get the name of the algorithm
    fn name(&self) -> &'static str;
}
