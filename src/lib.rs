//! Optimal solver for the `n x n` sliding tile puzzle.
//!
//! [`PuzzleState`] is an immutable board that knows its heuristics,
//! neighbours and solvability. [`Solver`] runs A* from an initial board to the
//! sorted goal and keeps the shortest sequence of boards it found.
//!
//! ```
//! use npuzzle_astar::{PuzzleState, Solver};
//!
//! let initial = PuzzleState::from_rows(vec![vec![0, 1, 3], vec![4, 2, 5], vec![7, 8, 6]]);
//! let solver = Solver::new(initial).unwrap();
//! assert_eq!(solver.moves(), 4);
//! ```

pub mod board_io;
pub mod error;
pub mod puzzle;
pub mod solver;

pub use error::PuzzleError;
pub use puzzle::{Move, PuzzleState};
pub use solver::{Heuristic, Pruning, SearchStats, Solver, SolverConfig};
