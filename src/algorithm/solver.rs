use std::fmt::{self, Debug};
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::{info, warn};
use num_traits::{Float, Zero};
use serde::{Deserialize, Serialize};

use crate::algorithm::bmssp::BMSSP;
use crate::algorithm::dijkstra::{settle_from_seeds, LevelResult};
use crate::algorithm::{ShortestPathAlgorithm, ShortestPathResult};
use crate::graph::Graph;
use crate::{Error, Result};

/// How the solver finishes a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Run the recursion, then a Dijkstra completion pass seeded with every
    /// reached vertex. Distances are exact.
    #[default]
    Safe,
    /// Return the recursion's distances as they are. They are never below the
    /// true distances but may be above them, and reachable vertices may be
    /// reported unreachable. On large sparse graphs the recursion can settle
    /// only a handful of vertices, so a fast query may reach almost nothing
    /// beyond the source's immediate neighbourhood.
    Fast,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Mode::Safe),
            "fast" => Ok(Mode::Fast),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Safe => write!(f, "safe"),
            Mode::Fast => write!(f, "fast"),
        }
    }
}

/// Solver configuration.
///
/// `k`, `t` and `level` default to values derived from the graph size:
/// k = floor(ln(n+1)^(1/3)), t = floor(ln(n+1)^(2/3)), both at least 1, and
/// level = ceil(ln(n+1) / t).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub mode: Mode,
    pub k: Option<usize>,
    pub t: Option<usize>,
    pub level: Option<usize>,
    /// Deepest recursion level accepted before the one-level-shallower retry
    pub max_depth: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Safe,
            k: None,
            t: None,
            level: None,
            max_depth: 64,
        }
    }
}

impl SolverConfig {
    /// Parses a JSON configuration; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SolverConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == Some(0) {
            return Err(Error::InvalidConfig("k must be at least 1".to_string()));
        }
        if self.t == Some(0) {
            return Err(Error::InvalidConfig("t must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Resolves (k, t, level) for a graph with `n` vertices
    pub fn parameters(&self, n: usize) -> (usize, usize, usize) {
        let ln = ((n + 1) as f64).ln();
        let k = self
            .k
            .unwrap_or_else(|| ln.powf(1.0 / 3.0).floor() as usize)
            .max(1);
        let t = self
            .t
            .unwrap_or_else(|| ln.powf(2.0 / 3.0).floor() as usize)
            .max(1);
        let level = self
            .level
            .unwrap_or_else(|| (ln / t as f64).ceil().max(0.0) as usize);
        (k, t, level)
    }
}

/// Per-query diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub mode: Mode,
    pub k: usize,
    pub t: usize,
    /// Top recursion level actually used
    pub level: usize,
    pub elapsed: Duration,
    /// Vertices the recursion completed before the completion pass
    pub finalized: usize,
    /// Bound returned by the top level
    pub final_bound: f64,
    /// Distance improvements made by the completion pass
    pub completion_updates: usize,
}

/// Distances, predecessors and diagnostics of one BMSSP query
#[derive(Debug, Clone)]
pub struct BmsspOutput<W>
where
    W: Float + Zero + Debug + Copy,
{
    pub result: ShortestPathResult<W>,
    pub diagnostics: Diagnostics,
}

/// Single-source shortest paths through the BMSSP recursion
#[derive(Debug, Clone, Default)]
pub struct BmsspSolver {
    config: SolverConfig,
}

impl BmsspSolver {
    /// Create a solver in safe mode with size-derived parameters
    pub fn new() -> Self {
        BmsspSolver {
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(config: SolverConfig) -> Self {
        BmsspSolver { config }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Override k and t
    pub fn with_params(mut self, k: usize, t: usize) -> Self {
        self.config.k = Some(k);
        self.config.t = Some(t);
        self
    }

    /// Override the top recursion level
    pub fn with_level(mut self, level: usize) -> Self {
        self.config.level = Some(level);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Computes shortest paths from `source` and reports diagnostics
    pub fn solve<W, G>(&self, graph: &G, source: usize) -> Result<BmsspOutput<W>>
    where
        W: Float + Zero + Debug + Copy + Ord,
        G: Graph<W>,
    {
        self.config.validate()?;
        if !graph.has_vertex(source) {
            return Err(Error::SourceNotFound(source));
        }
        graph.validate_non_negative()?;

        let n = graph.vertex_count();
        let (k, t, level) = self.config.parameters(n);
        info!(
            "BMSSP ({}) on {} vertices / {} edges from {}: k={}, t={}, level={}",
            self.config.mode,
            n,
            graph.edge_count(),
            source,
            k,
            t,
            level
        );

        let start = Instant::now();
        let mut distances = vec![W::infinity(); n];
        let mut predecessors = vec![None; n];
        distances[source] = W::zero();

        let bmssp = BMSSP::new(k, t, self.config.max_depth);
        let (top, used_level) = match bmssp.execute(
            graph,
            level,
            W::infinity(),
            &[source],
            &mut distances,
            &mut predecessors,
        ) {
            Ok(top) => (top, level),
            Err(Error::RecursionLimit { .. }) if level > 0 => {
                warn!(
                    "Recursion level {} exceeds max depth {}, retrying at level {}",
                    level,
                    self.config.max_depth,
                    level - 1
                );
                let top = bmssp.execute(
                    graph,
                    level - 1,
                    W::infinity(),
                    &[source],
                    &mut distances,
                    &mut predecessors,
                )?;
                (top, level - 1)
            }
            Err(e) => return Err(e),
        };
        let LevelResult {
            new_bound,
            vertices,
        } = top;

        let completion_updates = match self.config.mode {
            Mode::Safe => {
                let seeds: Vec<usize> = (0..n).filter(|&v| distances[v].is_finite()).collect();
                settle_from_seeds(graph, &seeds, &mut distances, &mut predecessors)
            }
            Mode::Fast => 0,
        };

        let diagnostics = Diagnostics {
            mode: self.config.mode,
            k: bmssp.k(),
            t: bmssp.t(),
            level: used_level,
            elapsed: start.elapsed(),
            finalized: vertices.len(),
            final_bound: new_bound.to_f64().unwrap_or(f64::INFINITY),
            completion_updates,
        };
        info!(
            "BMSSP finished in {:?}: {} vertices completed by the recursion, {} completion updates",
            diagnostics.elapsed, diagnostics.finalized, diagnostics.completion_updates
        );

        Ok(BmsspOutput {
            result: ShortestPathResult::from_dense(source, distances, predecessors),
            diagnostics,
        })
    }
}

impl<W, G> ShortestPathAlgorithm<W, G> for BmsspSolver
where
    W: Float + Zero + Debug + Copy + Ord,
    G: Graph<W>,
{
    fn name(&self) -> &'static str {
        match self.config.mode {
            Mode::Safe => "BMSSP (safe)",
            Mode::Fast => "BMSSP (fast)",
        }
    }

    fn compute_shortest_paths(&self, graph: &G, source: usize) -> Result<ShortestPathResult<W>> {
        self.solve(graph, source).map(|output| output.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing() {
        assert_eq!("safe".parse::<Mode>(), Ok(Mode::Safe));
        assert_eq!(" FAST ".parse::<Mode>(), Ok(Mode::Fast));
        assert_eq!(
            "turbo".parse::<Mode>(),
            Err(Error::InvalidMode("turbo".to_string()))
        );
        assert_eq!(Mode::Fast.to_string(), "fast");
    }

    #[test]
    fn parameters_from_graph_size() {
        let config = SolverConfig::default();
        // ln(4) = 1.386: k = floor(1.115) = 1, t = floor(1.243) = 1, level = ceil(1.386) = 2
        assert_eq!(config.parameters(3), (1, 1, 2));
        // ln(1_000_001) = 13.8: k = 2, t = 5, level = ceil(2.76) = 3
        assert_eq!(config.parameters(1_000_000), (2, 5, 3));
        // an empty graph still gets usable parameters
        assert_eq!(config.parameters(0), (1, 1, 0));
    }

    #[test]
    fn config_from_json() {
        let config = SolverConfig::from_json_str(r#"{"mode": "fast", "k": 3}"#).unwrap();
        assert_eq!(config.mode, Mode::Fast);
        assert_eq!(config.k, Some(3));
        assert_eq!(config.t, None);
        assert_eq!(config.max_depth, 64);

        assert!(matches!(
            SolverConfig::from_json_str(r#"{"mode": "turbo"}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            SolverConfig::from_json_str(r#"{"t": 0}"#),
            Err(Error::InvalidConfig(_))
        ));
    }
}
