use std::collections::{HashMap, VecDeque};

use npuzzle_astar::{Heuristic, PuzzleError, PuzzleState, Pruning, Solver, SolverConfig};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Breadth-first distance from every board reachable from the goal.
fn distances_from_goal(size: usize) -> HashMap<PuzzleState, usize> {
    let goal = PuzzleState::goal(size);
    let mut dist = HashMap::from([(goal.clone(), 0)]);
    let mut queue = VecDeque::from([goal]);

    while let Some(state) = queue.pop_front() {
        let d = dist[&state];
        for next in state.neighbors() {
            if !dist.contains_key(&next) {
                dist.insert(next.clone(), d + 1);
                queue.push_back(next);
            }
        }
    }
    dist
}

/// Breadth-first distance from `start` to the goal, searching no deeper than
/// `limit` moves.
fn bfs_moves(start: &PuzzleState, limit: usize) -> Option<usize> {
    let mut dist = HashMap::from([(start.clone(), 0)]);
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(state) = queue.pop_front() {
        let d = dist[&state];
        if state.is_goal() {
            return Some(d);
        }
        if d == limit {
            continue;
        }
        for next in state.neighbors() {
            if !dist.contains_key(&next) {
                dist.insert(next.clone(), d + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

fn permutations(items: &[u32]) -> Vec<Vec<u32>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

fn assert_valid_solution(solver: &Solver, initial: &PuzzleState) {
    let solution = solver.solution();
    assert_eq!(solution.len(), solver.moves() + 1);
    assert_eq!(solution.first(), Some(initial));
    assert!(solution.last().is_some_and(PuzzleState::is_goal));
    for pair in solution.windows(2) {
        assert!(
            pair[0].neighbors().contains(&pair[1]),
            "{} -> {} is not a single slide",
            pair[0],
            pair[1]
        );
    }
    assert_eq!(solver.move_sequence().len(), solver.moves());
}

#[test]
fn every_2x2_board_matches_breadth_first_search() {
    let reachable = distances_from_goal(2);
    assert_eq!(reachable.len(), 12);

    for tiles in permutations(&[0, 1, 2, 3]) {
        let initial = PuzzleState::from_flat(2, tiles);
        match reachable.get(&initial) {
            Some(&optimal) => {
                assert!(initial.is_solvable(), "{}", initial);
                let solver = Solver::new(initial.clone()).unwrap();
                assert_eq!(solver.moves(), optimal, "{}", initial);
                assert_valid_solution(&solver, &initial);
            }
            None => {
                assert!(!initial.is_solvable(), "{}", initial);
                assert_eq!(Solver::new(initial).unwrap_err(), PuzzleError::Unsolvable);
            }
        }
    }
}

#[test]
fn parity_matches_reachability_on_3x3() {
    let reachable = distances_from_goal(3);
    assert_eq!(reachable.len(), 181_440);

    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let mut tiles: Vec<u32> = (0..9).collect();
        tiles.shuffle(&mut rng);
        let state = PuzzleState::from_flat(3, tiles);
        assert_eq!(state.is_solvable(), reachable.contains_key(&state), "{}", state);
    }
}

#[test]
fn short_3x3_scrambles_are_solved_optimally() {
    let mut rng = StdRng::seed_from_u64(42);
    for steps in 0..=12 {
        for _ in 0..5 {
            let initial = PuzzleState::random_walk(3, steps, &mut rng);
            let optimal = bfs_moves(&initial, steps).expect("walk is within its own length");

            let solver = Solver::new(initial.clone()).unwrap();
            assert_eq!(solver.moves(), optimal, "{}", initial);
            assert_valid_solution(&solver, &initial);
        }
    }
}

#[test]
fn alternative_configurations_are_also_optimal() {
    let mut rng = StdRng::seed_from_u64(9);
    let configs = [
        SolverConfig {
            heuristic: Heuristic::Hamming,
            pruning: Pruning::ClosedSet,
        },
        SolverConfig {
            heuristic: Heuristic::LinearConflict,
            pruning: Pruning::ParentOnly,
        },
        SolverConfig {
            heuristic: Heuristic::LinearConflict,
            pruning: Pruning::ClosedSet,
        },
    ];

    for _ in 0..10 {
        let initial = PuzzleState::random_walk(3, 14, &mut rng);
        let optimal = bfs_moves(&initial, 14).expect("walk is within its own length");
        for config in configs {
            let solver = Solver::with_config(initial.clone(), config).unwrap();
            assert_eq!(solver.moves(), optimal, "{:?} on {}", config, initial);
            assert_valid_solution(&solver, &initial);
        }
    }
}

#[test]
fn random_15_puzzle_walk_is_solved() {
    let mut rng = StdRng::seed_from_u64(1);
    let initial = PuzzleState::random_walk(4, 20, &mut rng);
    let solver = Solver::with_config(
        initial.clone(),
        SolverConfig {
            heuristic: Heuristic::LinearConflict,
            pruning: Pruning::ClosedSet,
        },
    )
    .unwrap();

    assert!(solver.moves() <= 20);
    assert_eq!(solver.moves() % 2, 0);
    assert_valid_solution(&solver, &initial);
}
