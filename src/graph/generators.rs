use crate::graph::{DirectedGraph, MutableGraph};
use crate::Result;
use ordered_float::OrderedFloat;
use rand::prelude::*;
use std::collections::HashSet;
use std::ops::Range;

/// Generates a random sparse directed graph where every vertex gets
/// `avg_degree` distinct out-neighbours (no self-loops) and weights drawn
/// uniformly from `weights`.
pub fn generate_random_sparse<R: Rng>(
    n: usize,
    avg_degree: usize,
    weights: Range<f64>,
    rng: &mut R,
) -> Result<DirectedGraph<OrderedFloat<f64>>> {
    let mut graph = DirectedGraph::with_vertices(n);
    let degree = avg_degree.min(n.saturating_sub(1));

    for u in 0..n {
        let mut neighbors = HashSet::with_capacity(degree);
        let mut targets = Vec::with_capacity(degree);
        while targets.len() < degree {
            let v = rng.gen_range(0..n);
            if v != u && neighbors.insert(v) {
                targets.push(v);
            }
        }
        for v in targets {
            let weight = OrderedFloat(rng.gen_range(weights.clone()));
            graph.add_edge(u, v, weight)?;
        }
    }

    Ok(graph)
}

/// A four-neighbour grid with blocked cells.
///
/// Cell `(row, col)` is vertex `row * cols + col`. Obstacles stay in the graph
/// as isolated vertices so ids remain dense.
#[derive(Debug, Clone)]
pub struct GridWorld {
    pub graph: DirectedGraph<OrderedFloat<f64>>,
    pub rows: usize,
    pub cols: usize,
    pub obstacles: Vec<(usize, usize)>,
}

impl GridWorld {
    /// Vertex id of a cell
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Cell of a vertex id
    pub fn cell(&self, vertex: usize) -> (usize, usize) {
        (vertex / self.cols, vertex % self.cols)
    }

    pub fn is_obstacle(&self, row: usize, col: usize) -> bool {
        self.obstacles.contains(&(row, col))
    }
}

/// Generates a `rows x cols` grid world with unit-weight moves between free
/// neighbouring cells in both directions. Each cell is blocked with
/// probability `obstacle_prob`.
pub fn generate_grid_world<R: Rng>(
    rows: usize,
    cols: usize,
    obstacle_prob: f64,
    rng: &mut R,
) -> Result<GridWorld> {
    let mut blocked = vec![false; rows * cols];
    let mut obstacles = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if rng.gen_bool(obstacle_prob.clamp(0.0, 1.0)) {
                blocked[row * cols + col] = true;
                obstacles.push((row, col));
            }
        }
    }

    let mut graph = DirectedGraph::with_vertices(rows * cols);
    let directions: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    for row in 0..rows {
        for col in 0..cols {
            let current = row * cols + col;
            if blocked[current] {
                continue;
            }
            for (dr, dc) in directions {
                let nr = row as isize + dr;
                let nc = col as isize + dc;
                if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                    continue;
                }
                let neighbor = nr as usize * cols + nc as usize;
                if !blocked[neighbor] {
                    graph.add_edge(current, neighbor, OrderedFloat(1.0))?;
                }
            }
        }
    }

    Ok(GridWorld {
        graph,
        rows,
        cols,
        obstacles,
    })
}
