use rand::{seq::SliceRandom, Rng};
use std::fmt;

use crate::error::PuzzleError;

/// Direction the blank travels when a tile slides into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Expansion order used by [`PuzzleState::neighbors`].
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// `(row, col)` delta applied to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Immutable snapshot of an `n x n` board.
///
/// Tiles are stored flat in row-major order with `0` for the blank. Every
/// operation that changes the arrangement returns a new state.
///
/// Constructors assume the tiles are a permutation of `0..n*n` with `n >= 2`;
/// validating untrusted input is the job of [`crate::board_io::parse_board`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    size: usize,
    tiles: Vec<u32>,
    blank: usize,
}

impl PuzzleState {
    /// The solved board: `1..n*n-1` in order, blank last.
    pub fn goal(size: usize) -> Self {
        let cells = size * size;
        let mut tiles: Vec<u32> = (1..cells as u32).collect();
        tiles.push(0); // The empty space is represented by 0

        Self {
            size,
            tiles,
            blank: cells - 1,
        }
    }

    /// Build from a grid where `rows[row][col]` is the tile at `(row, col)`.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Self {
        let size = rows.len();
        let tiles = rows.into_iter().flatten().collect();
        Self::from_flat(size, tiles)
    }

    pub fn from_flat(size: usize, tiles: Vec<u32>) -> Self {
        debug_assert_eq!(tiles.len(), size * size);
        let blank = tiles.iter().position(|&t| t == 0).unwrap_or(0);

        Self { size, tiles, blank }
    }

    /// A uniformly random solvable arrangement.
    pub fn scrambled<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut tiles = Self::goal(size).tiles;

        loop {
            tiles.shuffle(rng);
            let state = Self::from_flat(size, tiles.clone());
            if state.is_solvable() {
                return state;
            }
        }
    }

    /// Walk the blank `steps` times from the goal, never undoing the previous
    /// step. The result is at most `steps` moves from solved.
    pub fn random_walk<R: Rng + ?Sized>(size: usize, steps: usize, rng: &mut R) -> Self {
        let mut state = Self::goal(size);
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let options: Vec<(Move, PuzzleState)> = Move::ALL
                .iter()
                .filter(|&&mv| last.map_or(true, |l| mv != l.opposite()))
                .filter_map(|&mv| state.apply(mv).map(|next| (mv, next)))
                .collect();

            // A board with n >= 2 always has at least one non-reversing move.
            let Some((mv, next)) = options.choose(rng).cloned() else {
                break;
            };
            state = next;
            last = Some(mv);
        }

        state
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// `(row, col)` of the blank.
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// Tile at `(row, col)`, `0` for the blank.
    pub fn tile_at(&self, row: usize, col: usize) -> Result<u32, PuzzleError> {
        if row >= self.size || col >= self.size {
            return Err(PuzzleError::OutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        Ok(self.tiles[row * self.size + col])
    }

    /// Number of non-blank tiles out of place.
    pub fn hamming_distance(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(i, &value)| value != 0 && value as usize != i + 1)
            .count()
    }

    /// Sum of L1 distances from each tile to its goal cell.
    pub fn manhattan_distance(&self) -> usize {
        let mut distance = 0;
        for (i, &value) in self.tiles.iter().enumerate() {
            if value != 0 {
                let (target_row, target_col) = self.goal_cell(value);
                distance += (i / self.size).abs_diff(target_row);
                distance += (i % self.size).abs_diff(target_col);
            }
        }
        distance
    }

    /// Extra moves forced by tiles that share their goal row (or column) but
    /// sit in the wrong relative order.
    ///
    /// For each line, every tile outside the longest correctly ordered
    /// subsequence has to leave the line and come back, which costs at least
    /// two moves beyond its Manhattan distance. Adding `2 * linear_conflicts()`
    /// to the Manhattan distance therefore stays admissible.
    pub fn linear_conflicts(&self) -> usize {
        let mut conflicts = 0;
        let mut line = Vec::with_capacity(self.size);

        // Row conflicts
        for row in 0..self.size {
            line.clear();
            for col in 0..self.size {
                let value = self.tiles[row * self.size + col];
                if value != 0 && self.goal_cell(value).0 == row {
                    line.push(value);
                }
            }
            conflicts += line.len() - longest_increasing(&line);
        }

        // Column conflicts
        for col in 0..self.size {
            line.clear();
            for row in 0..self.size {
                let value = self.tiles[row * self.size + col];
                if value != 0 && self.goal_cell(value).1 == col {
                    line.push(value);
                }
            }
            conflicts += line.len() - longest_increasing(&line);
        }

        conflicts
    }

    pub fn is_goal(&self) -> bool {
        self.tiles[..self.tiles.len() - 1]
            .iter()
            .enumerate()
            .all(|(i, &value)| value as usize == i + 1)
    }

    /// The state reached by moving the blank one cell, or `None` if that
    /// leaves the board.
    pub fn apply(&self, movement: Move) -> Option<Self> {
        let (dr, dc) = movement.as_offset();
        let (row, col) = self.blank_position();

        let new_row = row.checked_add_signed(dr).filter(|&r| r < self.size)?;
        let new_col = col.checked_add_signed(dc).filter(|&c| c < self.size)?;
        let target = new_row * self.size + new_col;

        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);

        Some(Self {
            size: self.size,
            tiles,
            blank: target,
        })
    }

    /// Every state one move away, in [`Move::ALL`] order.
    pub fn neighbors(&self) -> Vec<Self> {
        Move::ALL.iter().filter_map(|&mv| self.apply(mv)).collect()
    }

    /// Inversion parity test.
    ///
    /// Odd widths are solvable when the inversion count is even. Even widths
    /// are solvable when inversions plus the blank's row (counted from the
    /// top, starting at zero) is odd.
    pub fn is_solvable(&self) -> bool {
        let inversions = Self::count_inversions(&self.tiles);

        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.blank / self.size) % 2 == 1
        }
    }

    fn count_inversions(flattened: &[u32]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }

    fn goal_cell(&self, value: u32) -> (usize, usize) {
        let index = value as usize - 1;
        (index / self.size, index % self.size)
    }
}

fn longest_increasing(values: &[u32]) -> usize {
    let mut best = vec![1usize; values.len()];
    for i in 0..values.len() {
        for j in 0..i {
            if values[j] < values[i] && best[j] + 1 > best[i] {
                best[i] = best[j] + 1;
            }
        }
    }
    best.into_iter().max().unwrap_or(0)
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();

        writeln!(f, "{}", self.size)?;
        for row in self.tiles.chunks(self.size) {
            for (col, &val) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>width$}", val, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
