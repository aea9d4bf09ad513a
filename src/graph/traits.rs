use std::fmt::Debug;
use std::ops::Range;

use num_traits::{Float, Zero};

use crate::{Error, Result};

/// Trait representing a weighted directed graph over the dense vertex range `0..n`.
///
/// The shortest path algorithms only borrow the graph; it must not change while
/// a query is running.
pub trait Graph<W>: Debug
where
    W: Float + Zero + Debug + Copy,
{
    /// Returns the number of vertices in the graph
    fn vertex_count(&self) -> usize;

    /// Returns the vertex identifiers, always `0..vertex_count()`
    fn vertices(&self) -> Range<usize> {
        0..self.vertex_count()
    }

    /// Returns the number of edges in the graph
    fn edge_count(&self) -> usize;

    /// Returns an iterator over the outgoing edges from a vertex, in insertion order
    fn outgoing_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_>;

    /// Returns true if the vertex exists in the graph
    fn has_vertex(&self, vertex: usize) -> bool {
        vertex < self.vertex_count()
    }

    /// Returns true if there's an edge between the two vertices
    fn has_edge(&self, from: usize, to: usize) -> bool {
        self.outgoing_edges(from).any(|(target, _)| target == to)
    }

    /// Gets the smallest weight among edges `from -> to`, if any
    fn get_edge_weight(&self, from: usize, to: usize) -> Option<W> {
        self.outgoing_edges(from)
            .filter(|(target, _)| *target == to)
            .map(|(_, weight)| weight)
            .fold(None, |best: Option<W>, w| match best {
                Some(b) if b <= w => Some(b),
                _ => Some(w),
            })
    }

    /// Fails with [`Error::NegativeWeight`] on the first negative or NaN weight
    fn validate_non_negative(&self) -> Result<()> {
        for v in self.vertices() {
            for (_, weight) in self.outgoing_edges(v) {
                if !(weight >= W::zero()) {
                    return Err(Error::NegativeWeight(weight.to_f64().unwrap_or(f64::NAN)));
                }
            }
        }
        Ok(())
    }
}

/// Trait for building graphs
pub trait MutableGraph<W>: Graph<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Adds a vertex to the graph and returns its ID
    fn add_vertex(&mut self) -> usize;

    /// Adds a directed edge between existing vertices.
    ///
    /// Fails with [`crate::Error::InvalidEdge`] for unknown endpoints and with
    /// [`crate::Error::NegativeWeight`] for negative or NaN weights.
    fn add_edge(&mut self, from: usize, to: usize, weight: W) -> Result<()>;
}
