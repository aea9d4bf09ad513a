pub mod partial_sort;
pub mod priority_queue;

pub use partial_sort::PartialSortingQueue;
pub use priority_queue::VertexHeap;
