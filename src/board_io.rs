//! Text input and output for boards.
//!
//! Boards are written as the dimension `n` followed by `n * n` tile values in
//! row-major order, whitespace separated, with `0` for the blank:
//!
//! ```text
//! 3
//!  0  1  3
//!  4  2  5
//!  7  8  6
//! ```

use crossterm::style::Stylize;
use std::fmt::Write;

use crate::error::PuzzleError;
use crate::puzzle::PuzzleState;

/// Parse and validate a board. Everything [`PuzzleState`] assumes about its
/// tiles is checked here.
pub fn parse_board(text: &str) -> Result<PuzzleState, PuzzleError> {
    let mut tokens = Vec::new();
    for (index, line) in text.lines().enumerate() {
        for word in line.split_whitespace() {
            let value: u32 = word.parse().map_err(|_| PuzzleError::Parse {
                line: index + 1,
                message: format!("expected a non-negative integer, found {:?}", word),
            })?;
            tokens.push(value);
        }
    }

    let Some((&size, tiles)) = tokens.split_first() else {
        return Err(PuzzleError::InvalidBoard("input is empty".to_string()));
    };
    let size = size as usize;
    if size < 2 {
        return Err(PuzzleError::InvalidBoard(format!(
            "dimension must be at least 2, got {}",
            size
        )));
    }

    let cells = size * size;
    if tiles.len() != cells {
        return Err(PuzzleError::InvalidBoard(format!(
            "expected {} tiles for a {}x{} board, found {}",
            cells,
            size,
            size,
            tiles.len()
        )));
    }

    let mut seen = vec![false; cells];
    for &tile in tiles {
        let slot = seen.get_mut(tile as usize).ok_or_else(|| {
            PuzzleError::InvalidBoard(format!("tile {} is outside 0..{}", tile, cells))
        })?;
        if *slot {
            return Err(PuzzleError::InvalidBoard(format!("tile {} appears twice", tile)));
        }
        *slot = true;
    }

    Ok(PuzzleState::from_flat(size, tiles.to_vec()))
}

/// Plain rendering, the same text [`parse_board`] accepts.
pub fn render_board(state: &PuzzleState) -> String {
    state.to_string()
}

/// Terminal rendering: the blank is dimmed and tiles already on their goal
/// cell are green.
pub fn render_board_styled(state: &PuzzleState) -> String {
    let size = state.size();
    let width = (size * size - 1).to_string().len();
    let mut out = String::new();

    for (row, line) in state.tiles().chunks(size).enumerate() {
        for (col, &val) in line.iter().enumerate() {
            if col > 0 {
                out.push(' ');
            }
            let cell = format!("{:>width$}", val, width = width);
            let in_place = val as usize == row * size + col + 1;
            // Writing to a String cannot fail.
            let _ = if val == 0 {
                write!(out, "{}", cell.dark_grey())
            } else if in_place {
                write!(out, "{}", cell.green())
            } else {
                write!(out, "{}", cell.bold())
            };
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_algs4_layout() {
        let board = parse_board("3\n 0  1  3\n 4  2  5\n 7  8  6\n").unwrap();
        assert_eq!(board.size(), 3);
        assert_eq!(board.tiles(), &[0, 1, 3, 4, 2, 5, 7, 8, 6]);
        assert_eq!(board.blank_position(), (0, 0));
    }

    #[test]
    fn render_round_trips_through_parse() {
        let board = parse_board("2\n1 0\n3 2").unwrap();
        assert_eq!(parse_board(&render_board(&board)).unwrap(), board);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            parse_board("3\n1 2 x\n"),
            Err(PuzzleError::Parse { line: 2, .. })
        ));
        assert!(matches!(parse_board(""), Err(PuzzleError::InvalidBoard(_))));
        assert!(matches!(parse_board("1\n0"), Err(PuzzleError::InvalidBoard(_))));
        assert!(matches!(
            parse_board("2\n1 2\n3"),
            Err(PuzzleError::InvalidBoard(_))
        ));
        assert!(matches!(
            parse_board("2\n1 2\n3 4"),
            Err(PuzzleError::InvalidBoard(_))
        ));
        assert!(matches!(
            parse_board("2\n1 1\n3 0"),
            Err(PuzzleError::InvalidBoard(_))
        ));
    }

    #[test]
    fn styled_rendering_keeps_tile_values() {
        let styled = render_board_styled(&PuzzleState::goal(2));
        assert_eq!(styled.lines().count(), 2);
        for digit in ["1", "2", "3", "0"] {
            assert!(styled.contains(digit));
        }
    }
}
