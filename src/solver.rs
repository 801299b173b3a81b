use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::PuzzleError;
use crate::puzzle::{Move, PuzzleState};

const PROGRESS_INTERVAL: usize = 100_000;

/// Lower bound on the remaining moves, used to order the frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Hamming,
    /// Manhattan distance plus two moves per linear conflict.
    LinearConflict,
}

impl Heuristic {
    pub fn estimate(&self, state: &PuzzleState) -> usize {
        match self {
            Heuristic::Manhattan => state.manhattan_distance(),
            Heuristic::Hamming => state.hamming_distance(),
            Heuristic::LinearConflict => state.manhattan_distance() + 2 * state.linear_conflicts(),
        }
    }
}

/// Which successors are discarded before they reach the frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pruning {
    /// Drop only the neighbour that recreates the parent's board. Other
    /// repeated boards may be expanded again.
    #[default]
    ParentOnly,
    /// Remember the cheapest move count seen for every board and drop any
    /// node that does not improve on it.
    ClosedSet,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub heuristic: Heuristic,
    pub pruning: Pruning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the frontier, including the goal.
    pub expanded: usize,
    /// Nodes pushed onto the frontier, including the root.
    pub generated: usize,
    pub max_frontier: usize,
}

struct SearchNode {
    state: PuzzleState,
    /// Index of the predecessor in the node arena.
    parent: Option<usize>,
    g: usize,
    h: usize,
}

impl SearchNode {
    fn priority(&self) -> usize {
        self.g + self.h
    }
}

#[derive(Debug, PartialEq, Eq)]
struct FrontierEntry {
    f: usize,
    h: usize,
    seq: u64,
    node: usize,
}

// Reversed so the max-heap pops the smallest f, then the smallest h, then
// the oldest entry.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct PriorityFrontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
}

impl PriorityFrontier {
    fn push(&mut self, node: usize, f: usize, h: usize) {
        self.heap.push(FrontierEntry {
            f,
            h,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
    }

    fn pop_min(&mut self) -> Option<usize> {
        self.heap.pop().map(|entry| entry.node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Optimal solution of a single board, computed once at construction.
#[derive(Debug, Clone)]
pub struct Solver {
    solution: Vec<PuzzleState>,
    stats: SearchStats,
}

impl Solver {
    /// Solve with Manhattan distance and parent-only pruning.
    pub fn new(initial: PuzzleState) -> Result<Self, PuzzleError> {
        Self::with_config(initial, SolverConfig::default())
    }

    /// Fails with [`PuzzleError::Unsolvable`] before searching if the parity
    /// test rules the board out.
    pub fn with_config(initial: PuzzleState, config: SolverConfig) -> Result<Self, PuzzleError> {
        if !initial.is_solvable() {
            warn!(size = initial.size(), "rejecting unsolvable board");
            return Err(PuzzleError::Unsolvable);
        }

        let (solution, stats) = search(initial, config)?;
        Ok(Self { solution, stats })
    }

    /// Minimum number of moves from the initial board to the goal.
    pub fn moves(&self) -> usize {
        self.solution.len() - 1
    }

    /// Boards from the initial one to the goal, inclusive.
    pub fn solution(&self) -> &[PuzzleState] {
        &self.solution
    }

    pub fn into_solution(self) -> Vec<PuzzleState> {
        self.solution
    }

    /// Blank movements that replay the solution.
    pub fn move_sequence(&self) -> Vec<Move> {
        self.solution
            .windows(2)
            .filter_map(|pair| {
                Move::ALL
                    .iter()
                    .copied()
                    .find(|&mv| pair[0].apply(mv).as_ref() == Some(&pair[1]))
            })
            .collect()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

fn search(
    initial: PuzzleState,
    config: SolverConfig,
) -> Result<(Vec<PuzzleState>, SearchStats), PuzzleError> {
    let started = Instant::now();
    info!(
        size = initial.size(),
        heuristic = ?config.heuristic,
        pruning = ?config.pruning,
        "starting A* search"
    );

    let mut nodes: Vec<SearchNode> = Vec::new();
    let mut frontier = PriorityFrontier::default();
    let mut best_g: FxHashMap<PuzzleState, usize> = FxHashMap::default();
    let mut stats = SearchStats::default();

    let h = config.heuristic.estimate(&initial);
    if config.pruning == Pruning::ClosedSet {
        best_g.insert(initial.clone(), 0);
    }
    nodes.push(SearchNode {
        state: initial,
        parent: None,
        g: 0,
        h,
    });
    frontier.push(0, nodes[0].priority(), h);
    stats.generated = 1;
    stats.max_frontier = 1;

    let goal = loop {
        let Some(current) = frontier.pop_min() else {
            // Only reachable if the parity test was wrong.
            return Err(PuzzleError::Unsolvable);
        };

        let node = &nodes[current];
        // Skip entries superseded by a cheaper path to the same board.
        if config.pruning == Pruning::ClosedSet
            && best_g.get(&node.state).is_some_and(|&g| g < node.g)
        {
            continue;
        }

        stats.expanded += 1;
        if stats.expanded % PROGRESS_INTERVAL == 0 {
            debug!(
                expanded = stats.expanded,
                frontier = frontier.len(),
                f = node.priority(),
                "search progress"
            );
        }

        if node.state.is_goal() {
            break current;
        }

        let g = node.g + 1;
        let parent_state = node.parent.map(|p| &nodes[p].state);
        let children: Vec<PuzzleState> = node
            .state
            .neighbors()
            .into_iter()
            .filter(|n| parent_state != Some(n))
            .collect();

        for child in children {
            if config.pruning == Pruning::ClosedSet {
                match best_g.get(&child) {
                    Some(&seen) if seen <= g => continue,
                    _ => {
                        best_g.insert(child.clone(), g);
                    }
                }
            }

            let h = config.heuristic.estimate(&child);
            let index = nodes.len();
            nodes.push(SearchNode {
                state: child,
                parent: Some(current),
                g,
                h,
            });
            frontier.push(index, g + h, h);
            stats.generated += 1;
        }
        stats.max_frontier = stats.max_frontier.max(frontier.len());
    };

    let mut path = Vec::with_capacity(nodes[goal].g + 1);
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        path.push(nodes[index].state.clone());
        cursor = nodes[index].parent;
    }
    path.reverse();

    info!(
        moves = path.len() - 1,
        expanded = stats.expanded,
        generated = stats.generated,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "search finished"
    );

    Ok((path, stats))
}
