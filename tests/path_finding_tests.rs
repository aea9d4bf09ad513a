use bmssp::algorithm::ShortestPathResult;
use bmssp::graph::generators::{generate_grid_world, GridWorld};
use bmssp::graph::{DirectedGraph, Graph, MutableGraph};
use bmssp::{BmsspSolver, Dijkstra, Mode, ShortestPathAlgorithm};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;

type W = OrderedFloat<f64>;

const EPS: f64 = 1e-6;

fn dijkstra(graph: &DirectedGraph<W>, source: usize) -> ShortestPathResult<W> {
    Dijkstra::new().compute_shortest_paths(graph, source).unwrap()
}

fn bmssp(graph: &DirectedGraph<W>, source: usize, mode: Mode) -> ShortestPathResult<W> {
    BmsspSolver::new()
        .with_mode(mode)
        .solve(graph, source)
        .unwrap()
        .result
}

// Sum of edge weights along a path, None if a step is not an edge
fn path_cost(graph: &DirectedGraph<W>, path: &[usize]) -> Option<f64> {
    path.windows(2)
        .map(|step| graph.get_edge_weight(step[0], step[1]).map(|w| w.0))
        .sum()
}

fn scenario_a() -> DirectedGraph<W> {
    DirectedGraph::from_edge_list(
        4,
        vec![
            (0, 1, OrderedFloat(1.0)),
            (0, 2, OrderedFloat(4.0)),
            (1, 2, OrderedFloat(2.0)),
            (2, 3, OrderedFloat(1.0)),
        ],
    )
    .unwrap()
}

#[test]
fn test_small_graph_distances() {
    let graph = scenario_a();
    let expected = [0.0, 1.0, 3.0, 4.0];

    let reference = dijkstra(&graph, 0);
    let safe = bmssp(&graph, 0, Mode::Safe);
    let fast = bmssp(&graph, 0, Mode::Fast);

    for (v, &d) in expected.iter().enumerate() {
        assert!((reference.distance(v).0 - d).abs() < EPS, "Dijkstra distance to {}", v);
        assert!((safe.distance(v).0 - d).abs() < EPS, "safe distance to {}", v);
        // fast may overshoot but never undershoots
        assert!(fast.distance(v).0 >= d - EPS, "fast distance to {}", v);
    }

    assert_eq!(safe.path_to(3), Some(vec![0, 1, 2, 3]));
    assert_eq!(reference.path_to(3), Some(vec![0, 1, 2, 3]));
}

#[test]
fn test_disconnected_vertex_is_unreachable() {
    let mut graph = scenario_a();
    let isolated = graph.add_vertex();

    for result in [
        dijkstra(&graph, 0),
        bmssp(&graph, 0, Mode::Safe),
        bmssp(&graph, 0, Mode::Fast),
    ] {
        assert_eq!(result.distances[isolated], None);
        assert!(result.distance(isolated).is_infinite());
        assert_eq!(result.predecessors[isolated], None);
        assert_eq!(result.path_to(isolated), None);
        assert_eq!(result.predecessors[0], None);
    }
}

fn first_free_cell(world: &GridWorld) -> usize {
    (0..world.rows * world.cols)
        .find(|&v| {
            let (row, col) = world.cell(v);
            !world.is_obstacle(row, col)
        })
        .unwrap()
}

#[test]
fn test_grid_world_paths_match_dijkstra() {
    let mut rng = StdRng::seed_from_u64(42);
    let world = generate_grid_world(50, 50, 0.15, &mut rng).unwrap();
    let graph = &world.graph;
    let source = first_free_cell(&world);

    let reference = dijkstra(graph, source);
    let safe = bmssp(graph, source, Mode::Safe);

    assert!(reference.reachable_count() > 1);
    assert_eq!(reference.reachable_count(), safe.reachable_count());

    for target in graph.vertices() {
        let (row, col) = world.cell(target);
        let expected_path = reference.path_to(target);
        let actual_path = safe.path_to(target);

        if world.is_obstacle(row, col) && target != source {
            assert_eq!(actual_path, None, "obstacle {:?} reached", (row, col));
            continue;
        }

        match (expected_path, actual_path) {
            (None, None) => {}
            (Some(expected), Some(actual)) => {
                assert_eq!(actual, expected, "path to {}", target);
                assert_eq!(actual.first(), Some(&source));
                assert_eq!(actual.last(), Some(&target));
                let expected_cost = path_cost(graph, &expected).unwrap();
                let actual_cost = path_cost(graph, &actual).unwrap();
                assert!((expected_cost - actual_cost).abs() < EPS, "cost to {}", target);
                assert!((actual_cost - safe.distance(target).0).abs() < EPS);
                for &v in &actual {
                    let (r, c) = world.cell(v);
                    assert!(!world.is_obstacle(r, c), "path crosses obstacle {:?}", (r, c));
                }
            }
            (expected, actual) => panic!(
                "reachability of {} differs: Dijkstra {:?}, BMSSP {:?}",
                target, expected, actual
            ),
        }
    }
}

#[test]
fn test_grid_world_without_obstacles() {
    let mut rng = StdRng::seed_from_u64(1);
    let world = generate_grid_world(12, 9, 0.0, &mut rng).unwrap();
    let corner = world.index(11, 8);

    for mode in [Mode::Safe, Mode::Fast] {
        let result = bmssp(&world.graph, 0, mode);
        // Manhattan distance is the best possible, fast may exceed it
        assert!(result.distance(corner).0 >= 19.0 - EPS);
        if mode == Mode::Safe {
            assert!((result.distance(corner).0 - 19.0).abs() < EPS);
            assert_eq!(result.path_to(corner).map(|p| p.len()), Some(20));
        }
    }
}
