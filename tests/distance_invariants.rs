use bmssp::algorithm::bmssp::BMSSP;
use bmssp::algorithm::dijkstra::bounded_expand;
use bmssp::algorithm::pivots::find_pivots;
use bmssp::graph::generators::{generate_grid_world, generate_random_sparse};
use bmssp::graph::{DirectedGraph, Graph};
use bmssp::{BmsspSolver, Dijkstra, Mode, ShortestPathAlgorithm};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;

type W = OrderedFloat<f64>;

const INF: W = OrderedFloat(f64::INFINITY);

/// Working arrays shared by every stage, with the previous snapshot
struct State {
    distances: Vec<W>,
    predecessors: Vec<Option<usize>>,
    last_distances: Vec<W>,
    last_predecessors: Vec<Option<usize>>,
}

impl State {
    fn new(n: usize, source: usize) -> Self {
        let mut distances = vec![INF; n];
        distances[source] = OrderedFloat(0.0);
        let predecessors = vec![None; n];
        State {
            last_distances: distances.clone(),
            last_predecessors: predecessors.clone(),
            distances,
            predecessors,
        }
    }

    // Distances only go down, and a predecessor only changes with a strict improvement
    fn check_and_snapshot(&mut self, stage: &str) {
        for v in 0..self.distances.len() {
            let (before, after) = (self.last_distances[v], self.distances[v]);
            assert!(
                after <= before,
                "{}: distance of {} rose from {} to {}",
                stage,
                v,
                before,
                after
            );
            if self.predecessors[v] != self.last_predecessors[v] {
                assert!(after < before, "{}: predecessor of {} moved without improving", stage, v);
            }
        }
        self.last_distances.clone_from(&self.distances);
        self.last_predecessors.clone_from(&self.predecessors);
    }
}

#[test]
fn test_every_stage_only_improves_distances() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = generate_random_sparse(400, 3, 1.0..10.0, &mut rng).unwrap();
        let n = graph.vertex_count();
        let mut state = State::new(n, 0);

        let pivots = find_pivots(
            &graph,
            &mut state.distances,
            &mut state.predecessors,
            &[0],
            INF,
            2,
        );
        state.check_and_snapshot("find_pivots");

        for &pivot in &pivots.work_set {
            let bound = state.distances[pivot] + OrderedFloat(15.0);
            bounded_expand(
                &graph,
                pivot,
                bound,
                &mut state.distances,
                &mut state.predecessors,
                3,
            );
            state.check_and_snapshot("bounded_expand");
        }

        let bmssp = BMSSP::<W, DirectedGraph<W>>::new(2, 2, 8);
        let bound = OrderedFloat(40.0);
        let sources: Vec<usize> = (0..n).filter(|&v| state.distances[v] < bound).collect();
        bmssp
            .execute(
                &graph,
                1,
                bound,
                &sources,
                &mut state.distances,
                &mut state.predecessors,
            )
            .unwrap();
        state.check_and_snapshot("execute level 1");

        for level in 2..=3 {
            bmssp
                .execute(
                    &graph,
                    level,
                    INF,
                    &[0],
                    &mut state.distances,
                    &mut state.predecessors,
                )
                .unwrap();
            state.check_and_snapshot("execute");
        }

        // every write was a real path length
        let exact = Dijkstra::new().compute_shortest_paths(&graph, 0).unwrap();
        for v in 0..n {
            assert!(state.distances[v] >= exact.distance(v), "seed {} vertex {}", seed, v);
        }
    }
}

#[test]
fn test_predecessor_exists_exactly_for_reached_vertices() {
    let mut graphs = Vec::new();
    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        graphs.push(generate_random_sparse(1500, 2, 1.0..10.0, &mut rng).unwrap());
    }
    let mut rng = StdRng::seed_from_u64(42);
    graphs.push(generate_grid_world(30, 30, 0.2, &mut rng).unwrap().graph);

    for (i, graph) in graphs.iter().enumerate() {
        for mode in [Mode::Safe, Mode::Fast] {
            let result = BmsspSolver::new()
                .with_mode(mode)
                .solve(graph, 0)
                .unwrap()
                .result;
            for v in graph.vertices() {
                let expected = result.distances[v].is_some() && v != result.source;
                assert_eq!(
                    result.predecessors[v].is_some(),
                    expected,
                    "graph {} mode {} vertex {}",
                    i,
                    mode,
                    v
                );
            }
        }
    }
}
