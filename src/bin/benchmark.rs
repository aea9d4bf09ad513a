use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use log::{error, info};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use bmssp::algorithm::{ShortestPathAlgorithm, ShortestPathResult};
use bmssp::graph::generators::generate_random_sparse;
use bmssp::graph::Graph;
use bmssp::{BmsspSolver, Diagnostics, Dijkstra, Mode, SolverConfig};

type W = OrderedFloat<f64>;

/// Distances closer than this count as equal
const TOLERANCE: f64 = 1e-6;

/// Compare Dijkstra and BMSSP on a seeded random sparse graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct BenchmarkCli {
    /// Number of vertices
    #[arg(
        long,
        default_value_t = 2000,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    n: usize,

    /// Out-degree of every vertex
    #[arg(long = "deg", default_value_t = 2)]
    avg_degree: usize,

    /// safe or fast
    #[arg(long, default_value_t = Mode::Safe)]
    mode: Mode,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(
        long,
        default_value_t = 1,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    trials: usize,

    /// JSON solver configuration; `--mode` overrides its mode
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BenchmarkReport {
    n: usize,
    avg_degree: usize,
    seed: u64,
    trials: usize,
    mode: Mode,
    dijkstra_ms: f64,
    bmssp_ms: f64,
    mismatches: usize,
    diagnostics: Diagnostics,
}

/// Vertices whose distances differ by more than the tolerance or whose reachability disagrees
fn count_mismatches(expected: &ShortestPathResult<W>, actual: &ShortestPathResult<W>) -> usize {
    expected
        .distances
        .iter()
        .zip(&actual.distances)
        .filter(|(e, a)| match (e, a) {
            (Some(e), Some(a)) => (e.0 - a.0).abs() > TOLERANCE,
            (None, None) => false,
            _ => true,
        })
        .count()
}

fn run(options: BenchmarkCli) -> Result<BenchmarkReport, Box<dyn std::error::Error>> {
    let mut config = match &options.config {
        Some(path) => SolverConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => SolverConfig::default(),
    };
    config.mode = options.mode;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let graph = generate_random_sparse(options.n, options.avg_degree, 1.0..10.0, &mut rng)?;
    let source = 0;
    info!(
        "Generated graph with {} vertices and {} edges (seed {})",
        graph.vertex_count(),
        graph.edge_count(),
        options.seed
    );

    let dijkstra = Dijkstra::new();
    let solver = BmsspSolver::with_config(config);

    let mut dijkstra_total = 0.0;
    let mut bmssp_total = 0.0;
    let mut last = None;

    for trial in 0..options.trials {
        let start = Instant::now();
        let expected = dijkstra.compute_shortest_paths(&graph, source)?;
        dijkstra_total += start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let output = solver.solve(&graph, source)?;
        bmssp_total += start.elapsed().as_secs_f64() * 1000.0;

        info!(
            "Trial {}: {} reachable, {} mismatches",
            trial + 1,
            expected.reachable_count(),
            count_mismatches(&expected, &output.result)
        );
        last = Some((expected, output));
    }

    let (expected, output) = last.ok_or("no trials were run")?;
    let trials = options.trials as f64;

    Ok(BenchmarkReport {
        n: options.n,
        avg_degree: options.avg_degree,
        seed: options.seed,
        trials: options.trials,
        mode: options.mode,
        dijkstra_ms: dijkstra_total / trials,
        bmssp_ms: bmssp_total / trials,
        mismatches: count_mismatches(&expected, &output.result),
        diagnostics: output.diagnostics,
    })
}

fn main() {
    env_logger::init();

    let options = BenchmarkCli::parse();

    match run(options) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialise report: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Benchmark failed: {}", e);
            process::exit(1);
        }
    }
}
