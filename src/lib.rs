//! BMSSP - Bounded Multi-Source Shortest Path
//!
//! Single-source shortest paths on directed graphs with real non-negative edge
//! weights. Two algorithms are provided:
//!
//! - [`Dijkstra`], the classical binary-heap algorithm, used as the baseline
//!   and as the correctness oracle.
//! - [`BmsspSolver`], the recursive level/bound/frontier algorithm from
//!   "Breaking the Sorting Barrier for Directed Single-Source Shortest Paths"
//!   (Duan et al.), which batches relaxation work across recursion levels
//!   through pivot selection and a partial-sorting queue.
//!
//! The solver runs in one of two [`Mode`]s. `Safe` finishes every query with a
//! seeded Dijkstra completion pass and always returns exact distances. `Fast`
//! skips that pass; its distances are upper bounds on the true ones.

pub mod algorithm;
pub mod data_structures;
pub mod graph;

pub use algorithm::{
    dijkstra::Dijkstra,
    solver::{BmsspOutput, BmsspSolver, Diagnostics, Mode, SolverConfig},
    ShortestPathAlgorithm, ShortestPathResult,
};
/// Re-export main types for convenient use
pub use graph::directed::DirectedGraph;

/// Error types for the library
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid edge: from {0} to {1}")]
    InvalidEdge(usize, usize),

    #[error("Negative edge weight: {0}")]
    NegativeWeight(f64),

    #[error("Source vertex {0} not found in graph")]
    SourceNotFound(usize),

    #[error("Unknown mode '{0}', expected 'safe' or 'fast'")]
    InvalidMode(String),

    #[error("BMSSP called with an empty source set")]
    EmptySources,

    #[error("Recursion level {level} exceeds the configured limit of {limit}")]
    RecursionLimit { level: usize, limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;
