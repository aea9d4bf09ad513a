use num_traits::{Float, Zero};
use std::collections::HashSet;
use std::fmt::Debug;
use std::marker::PhantomData;

use log::{debug, warn};

use crate::algorithm::dijkstra::{bounded_expand, LevelResult};
use crate::algorithm::pivots::{find_pivots, Pivots};
use crate::data_structures::PartialSortingQueue;
use crate::graph::Graph;
use crate::{Error, Result};

/// Implementation of the Bounded Multi-Source Shortest Path (BMSSP) recursion as described in
/// the paper "Breaking the Sorting Barrier for Directed Single-Source Shortest Paths"
///
/// `distances` and `predecessors` are owned by the caller and borrowed mutably
/// by every level; each write is a strict improvement.
#[derive(Debug)]
pub struct BMSSP<W, G>
where
    W: Float + Zero + Debug + Copy,
    G: Graph<W>,
{
    /// Relaxation rounds and base-case budget, about log^(1/3)(n)
    k: usize,

    /// Level growth factor, about log^(2/3)(n)
    t: usize,

    /// Deepest level `execute` accepts
    max_depth: usize,

    /// Graph type marker
    _graph_marker: PhantomData<G>,

    /// Weight type marker
    _weight_marker: PhantomData<W>,
}

/// Collects vertices once each, keeping discovery order
#[derive(Debug, Default)]
struct VertexSet {
    order: Vec<usize>,
    members: HashSet<usize>,
}

impl VertexSet {
    fn insert(&mut self, v: usize) {
        if self.members.insert(v) {
            self.order.push(v);
        }
    }

    fn extend(&mut self, vertices: &[usize]) {
        for &v in vertices {
            self.insert(v);
        }
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

impl<W, G> BMSSP<W, G>
where
    W: Float + Zero + Debug + Copy + Ord,
    G: Graph<W>,
{
    /// Create a BMSSP instance with explicit parameters, both clamped to at least 1
    pub fn new(k: usize, t: usize, max_depth: usize) -> Self {
        BMSSP {
            k: k.max(1),
            t: t.max(1),
            max_depth,
            _graph_marker: PhantomData,
            _weight_marker: PhantomData,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn t(&self) -> usize {
        self.t
    }

    /// Queue capacity M = 2(l-1)t at level `level`
    pub fn queue_capacity(&self, level: usize) -> usize {
        (2 * level.saturating_sub(1) * self.t).max(1)
    }

    /// Cap on |U| at level `level`: k * 2^l * t
    pub fn result_capacity(&self, level: usize) -> usize {
        let growth = u32::try_from(level)
            .ok()
            .and_then(|l| 1usize.checked_shl(l))
            .unwrap_or(usize::MAX);
        self.k.saturating_mul(growth).saturating_mul(self.t).max(1)
    }

    /// Safety cap on queue iterations at one recursion node
    pub fn iteration_cap(pivot_count: usize) -> usize {
        10_000usize.max(pivot_count.saturating_mul(10).saturating_add(1_000))
    }

    /// Execute BMSSP at `level` with bound `bound` from `sources`.
    ///
    /// Returns the new bound B' and the vertices completed below it.
    pub fn execute(
        &self,
        graph: &G,
        level: usize,
        bound: W,
        sources: &[usize],
        distances: &mut [W],
        predecessors: &mut [Option<usize>],
    ) -> Result<LevelResult<W>> {
        if level > self.max_depth {
            return Err(Error::RecursionLimit {
                level,
                limit: self.max_depth,
            });
        }

        if level == 0 {
            return Ok(self.base_case(graph, bound, sources, distances, predecessors));
        }

        if sources.is_empty() {
            return Err(Error::EmptySources);
        }

        let Pivots { pivots, work_set } =
            find_pivots(graph, distances, predecessors, sources, bound, self.k);

        let capacity = self.queue_capacity(level);
        let mut queue = PartialSortingQueue::new(capacity, bound);
        for &pivot in &pivots {
            if distances[pivot].is_finite() {
                queue.insert(pivot, distances[pivot]);
            }
        }

        debug!(
            "BMSSP level {}: {} sources, {} pivots, work set {}, M={}",
            level,
            sources.len(),
            pivots.len(),
            work_set.len(),
            capacity
        );

        let result_cap = self.result_capacity(level);
        let max_iterations = Self::iteration_cap(pivots.len());
        let mut completed = VertexSet::default();
        let mut iterations = 0;

        while !queue.is_empty() && completed.len() < result_cap {
            if iterations >= max_iterations {
                warn!(
                    "BMSSP level {} hit the iteration cap of {}, finalising early",
                    level, max_iterations
                );
                break;
            }
            iterations += 1;

            let (pulled, pull_bound) = queue.pull();
            if pulled.is_empty() {
                break;
            }

            let LevelResult {
                new_bound: child_bound,
                vertices: child_vertices,
            } = self.execute(graph, level - 1, pull_bound, &pulled, distances, predecessors)?;
            completed.extend(&child_vertices);

            let mut prepend = Vec::new();
            for &u in &child_vertices {
                let dist_u = distances[u];
                if !dist_u.is_finite() {
                    continue;
                }
                for (v, weight) in graph.outgoing_edges(u) {
                    let new_dist = dist_u + weight;
                    if new_dist < distances[v] {
                        distances[v] = new_dist;
                        predecessors[v] = Some(u);

                        if new_dist >= pull_bound && new_dist < bound {
                            queue.insert(v, new_dist);
                        } else if new_dist >= child_bound && new_dist < pull_bound {
                            prepend.push((v, new_dist));
                        }
                    }
                }
            }

            // Pulled sources the child level could not complete go back too
            for &x in &pulled {
                let dist_x = distances[x];
                if dist_x >= child_bound && dist_x < pull_bound {
                    prepend.push((x, dist_x));
                }
            }
            queue.batch_prepend(prepend);

            if queue.is_empty() {
                return Ok(LevelResult {
                    new_bound: std::cmp::min(child_bound, bound),
                    vertices: completed.order,
                });
            }
            if completed.len() >= result_cap {
                debug!(
                    "BMSSP level {}: result capacity {} reached, bound {:?}",
                    level, result_cap, child_bound
                );
                return Ok(LevelResult {
                    new_bound: child_bound,
                    vertices: completed.order,
                });
            }
        }

        for &x in &work_set {
            if distances[x] < bound {
                completed.insert(x);
            }
        }

        Ok(LevelResult {
            new_bound: bound,
            vertices: completed.order,
        })
    }

    /// Base case (level 0): a bounded mini-Dijkstra from each source, results unioned
    fn base_case(
        &self,
        graph: &G,
        bound: W,
        sources: &[usize],
        distances: &mut [W],
        predecessors: &mut [Option<usize>],
    ) -> LevelResult<W> {
        let mut completed = VertexSet::default();
        let mut new_bound = bound;

        for &source in sources {
            let result = bounded_expand(graph, source, bound, distances, predecessors, self.k);
            completed.extend(&result.vertices);
            new_bound = std::cmp::min(new_bound, result.new_bound);
        }

        LevelResult {
            new_bound,
            vertices: completed.order,
        }
    }
}
