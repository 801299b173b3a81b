//! Command line driver: solve a board from a file or generate a new one.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{rngs::StdRng, thread_rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use npuzzle_astar::board_io::{parse_board, render_board, render_board_styled};
use npuzzle_astar::{Heuristic, PuzzleError, PuzzleState, Pruning, Solver, SolverConfig};

#[derive(Parser)]
#[command(name = "npuzzle")]
#[command(about = "Find shortest solutions to n-by-n sliding tile puzzles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a board read from a file ("-" for stdin).
    Solve {
        input: PathBuf,
        /// Heuristic guiding the search
        #[arg(long, value_enum, default_value_t = HeuristicArg::Manhattan)]
        heuristic: HeuristicArg,
        /// Track every visited board instead of only skipping the parent
        #[arg(long)]
        closed_set: bool,
        /// Print boards without colour
        #[arg(long)]
        plain: bool,
    },

    /// Print a random solvable board in the input format.
    Generate {
        /// Board dimension
        #[arg(short, long, default_value = "3")]
        size: usize,
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Scramble with this many random moves instead of a full shuffle
        #[arg(long)]
        walk: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HeuristicArg {
    Manhattan,
    Hamming,
    LinearConflict,
}

impl From<HeuristicArg> for Heuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Manhattan => Heuristic::Manhattan,
            HeuristicArg::Hamming => Heuristic::Hamming,
            HeuristicArg::LinearConflict => Heuristic::LinearConflict,
        }
    }
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read board from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read board from {}", path.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Solve {
            input,
            heuristic,
            closed_set,
            plain,
        } => {
            let text = read_input(&input)?;
            let initial = parse_board(&text)
                .with_context(|| format!("invalid board in {}", input.display()))?;

            let config = SolverConfig {
                heuristic: heuristic.into(),
                pruning: if closed_set {
                    Pruning::ClosedSet
                } else {
                    Pruning::ParentOnly
                },
            };

            let solver = match Solver::with_config(initial, config) {
                Ok(solver) => solver,
                Err(PuzzleError::Unsolvable) => {
                    println!("No solution possible");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };

            println!("Minimum number of moves = {}", solver.moves());
            for board in solver.solution() {
                if plain {
                    println!("{}", render_board(board));
                } else {
                    println!("{}\n{}", board.size(), render_board_styled(board));
                }
            }
        }

        Commands::Generate { size, seed, walk } => {
            anyhow::ensure!(size >= 2, "board dimension must be at least 2");

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_rng(thread_rng()).context("failed to seed rng")?,
            };
            let board = match walk {
                Some(steps) => PuzzleState::random_walk(size, steps, &mut rng),
                None => PuzzleState::scrambled(size, &mut rng),
            };
            print!("{}", render_board(&board));
        }
    }

    Ok(())
}
