use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Debug;

/// Min-heap of `(vertex, distance)` entries with lazy deletion.
///
/// Decrease-key is done by pushing a fresh entry; older entries for the same
/// vertex become stale and are dropped by [`VertexHeap::pop_live`].
#[derive(Debug)]
pub struct VertexHeap<P>
where
    P: PartialOrd + Copy + Debug + Ord,
{
    heap: BinaryHeap<Reverse<(P, usize)>>,
}

impl<P> Default for VertexHeap<P>
where
    P: PartialOrd + Copy + Debug + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> VertexHeap<P>
where
    P: PartialOrd + Copy + Debug + Ord,
{
    /// Creates a new empty heap
    pub fn new() -> Self {
        VertexHeap {
            heap: BinaryHeap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        VertexHeap {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, vertex: usize, distance: P) {
        self.heap.push(Reverse((distance, vertex)));
    }

    /// Removes the entry with the smallest distance, stale or not
    fn pop(&mut self) -> Option<(usize, P)> {
        self.heap.pop().map(|Reverse((distance, vertex))| (vertex, distance))
    }

    /// Removes the smallest entry whose distance still matches `distances`,
    /// discarding stale entries on the way
    pub fn pop_live(&mut self, distances: &[P]) -> Option<(usize, P)> {
        while let Some((vertex, distance)) = self.pop() {
            if distance <= distances[vertex] {
                return Some((vertex, distance));
            }
        }
        None
    }
}
