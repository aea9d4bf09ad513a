use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

use log::trace;
use num_traits::{Float, Zero};

use crate::graph::Graph;

/// Output of [`find_pivots`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pivots {
    /// Sources worth recursing on, a non-empty subset of the input sources
    pub pivots: Vec<usize>,

    /// Every vertex reached by the bounded relaxation, sources included
    pub work_set: Vec<usize>,
}

/// FindPivots (Lemma 3.2).
///
/// Runs `k` rounds of Bellman-Ford style relaxation from `sources`, never
/// writing a distance at or above `bound`. If the reached set grows past
/// `k * |sources|` every source stays a pivot. Otherwise the relaxation forest
/// is built over the reached set and only sources rooting a subtree of at
/// least `k` vertices are kept.
pub fn find_pivots<W, G>(
    graph: &G,
    distances: &mut [W],
    predecessors: &mut [Option<usize>],
    sources: &[usize],
    bound: W,
    k: usize,
) -> Pivots
where
    W: Float + Zero + Debug + Copy + Ord,
    G: Graph<W>,
{
    let mut in_work_set: HashSet<usize> = HashSet::with_capacity(sources.len() * (k + 1));
    let mut work_set = Vec::with_capacity(sources.len() * (k + 1));
    for &s in sources {
        if in_work_set.insert(s) {
            work_set.push(s);
        }
    }
    let source_list = work_set.clone();
    let limit = k.saturating_mul(source_list.len().max(1));

    // Parent of each vertex in the relaxation forest
    let mut parent: HashMap<usize, usize> = HashMap::new();
    let mut frontier = source_list.clone();

    for round in 0..k {
        let mut next_frontier = Vec::new();
        let mut in_next = HashSet::new();

        for &u in &frontier {
            let dist_u = distances[u];
            if dist_u >= bound {
                continue;
            }
            for (v, weight) in graph.outgoing_edges(u) {
                let new_dist = dist_u + weight;
                if new_dist < distances[v] && new_dist < bound {
                    distances[v] = new_dist;
                    predecessors[v] = Some(u);
                    parent.insert(v, u);
                    if in_next.insert(v) {
                        next_frontier.push(v);
                    }
                    if in_work_set.insert(v) {
                        work_set.push(v);
                    }
                }
            }
        }

        if work_set.len() > limit {
            trace!(
                "find_pivots: work set {} exceeds {} after round {}, keeping all {} sources",
                work_set.len(),
                limit,
                round + 1,
                source_list.len()
            );
            return Pivots {
                pivots: source_list,
                work_set,
            };
        }

        if next_frontier.is_empty() {
            break;
        }
        frontier = next_frontier;
    }

    let subtree_sizes = forest_subtree_sizes(&work_set, &in_work_set, &parent, &source_list);

    let mut pivots: Vec<usize> = source_list
        .iter()
        .copied()
        .filter(|s| subtree_sizes.get(s).map_or(false, |&size| size >= k))
        .collect();
    if pivots.is_empty() {
        pivots = source_list;
    }

    trace!(
        "find_pivots: {} pivots, work set {}",
        pivots.len(),
        work_set.len()
    );

    Pivots { pivots, work_set }
}

/// Subtree sizes of the forest over `work_set` defined by `parent`.
///
/// Roots are vertices whose parent lies outside the work set and sources with
/// no recorded parent. Sizes are computed with an explicit stack.
fn forest_subtree_sizes(
    work_set: &[usize],
    in_work_set: &HashSet<usize>,
    parent: &HashMap<usize, usize>,
    sources: &[usize],
) -> HashMap<usize, usize> {
    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();

    for &v in work_set {
        match parent.get(&v) {
            Some(&p) if in_work_set.contains(&p) && p != v => {
                children.entry(p).or_default().push(v);
            }
            Some(_) => roots.push(v),
            None => {}
        }
    }
    for &s in sources {
        if !parent.contains_key(&s) {
            roots.push(s);
        }
    }

    let mut sizes: HashMap<usize, usize> = HashMap::with_capacity(work_set.len());
    for root in roots {
        if sizes.contains_key(&root) {
            continue;
        }
        // (vertex, children already pushed)
        let mut stack = vec![(root, false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                let size = 1 + children.get(&v).map_or(0, |kids| {
                    kids.iter()
                        .map(|child| sizes.get(child).copied().unwrap_or(0))
                        .sum()
                });
                sizes.insert(v, size);
                continue;
            }
            if sizes.contains_key(&v) {
                continue;
            }
            stack.push((v, true));
            if let Some(kids) = children.get(&v) {
                for &child in kids {
                    if !sizes.contains_key(&child) {
                        stack.push((child, false));
                    }
                }
            }
        }
    }

    sizes
}
