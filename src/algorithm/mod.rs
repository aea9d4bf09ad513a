pub mod traits;
pub mod dijkstra;
pub mod pivots;
pub mod bmssp;
pub mod solver;

pub use traits::{ShortestPathAlgorithm, ShortestPathResult};
