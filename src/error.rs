use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("tile ({row}, {col}) is outside a {size}x{size} board")]
    OutOfRange { row: usize, col: usize, size: usize },
    #[error("board is unsolvable")]
    Unsolvable,
    #[error("invalid board: {0}")]
    InvalidBoard(String),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}
