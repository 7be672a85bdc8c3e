use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};

use std::path::PathBuf;

use connect4_search::{
    board::Board,
    engine::opening_move,
    mcts::{Mcts, NodeId},
    minimax::Minimax,
    opening_book::{OpeningBook, DEFAULT_BOOK_DIR, DEFAULT_BOOK_PLIES},
};

mod arena;
use arena::*;

mod display;
use display::display;

/// Heuristic minimax and Monte Carlo Tree Search agents for Connect 4
#[derive(Parser)]
#[command(name = "connect4")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the opening book tables (moves_1.txt, moves_2.txt, ...)
    #[arg(long, global = true, default_value = DEFAULT_BOOK_DIR)]
    book_dir: PathBuf,

    /// Consult the opening book while at most this many moves have been played
    #[arg(long, global = true, default_value_t = DEFAULT_BOOK_PLIES)]
    book_plies: usize,
}

#[derive(Args)]
struct SearchArgs {
    /// Minimax search depth in plies
    #[arg(short, long, default_value_t = 5)]
    depth: usize,

    /// MCTS iterations per move
    #[arg(short, long, default_value_t = 1000)]
    iterations: usize,

    /// Random seed for reproducible tie-breaks and playouts
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the move an engine picks in a position
    Analyse {
        /// Moves played so far as 1-indexed column digits, player 1 first
        #[arg(default_value = "")]
        moves: String,

        #[arg(short, long, value_enum, default_value_t = EngineKind::Minimax)]
        engine: EngineKind,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play a series of games between two engines
    Arena {
        /// Number of games to play
        #[arg(short, long, default_value_t = 50)]
        games: usize,

        #[arg(long, value_enum, default_value_t = EngineKind::Minimax)]
        first: EngineKind,

        #[arg(long, value_enum, default_value_t = EngineKind::MinimaxBasic)]
        second: EngineKind,

        /// Search depth of the second engine, if different
        #[arg(long)]
        second_depth: Option<usize>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let opening_book = OpeningBook::load(&cli.book_dir, cli.book_plies)?;

    match cli.command {
        Commands::Analyse {
            moves,
            engine,
            search,
        } => {
            let settings = EngineSettings {
                kind: engine,
                depth: search.depth,
                iterations: search.iterations,
                book_plies: cli.book_plies,
                opening_book,
            };
            analyse(&moves, &settings, search.seed)
        }
        Commands::Arena {
            games,
            first,
            second,
            second_depth,
            search,
        } => {
            let first = EngineSettings {
                kind: first,
                depth: search.depth,
                iterations: search.iterations,
                book_plies: cli.book_plies,
                opening_book,
            };
            let second = EngineSettings {
                kind: second,
                depth: second_depth.unwrap_or(search.depth),
                ..first.clone()
            };
            arena::run(&first, &second, games, search.seed)
        }
    }
}

fn analyse(moves: &str, settings: &EngineSettings, seed: Option<u64>) -> Result<()> {
    let board = Board::from_moves(moves)?;
    display(&board)?;

    if let Some(winner) = board.winner() {
        println!("Game over, {:?} has won", winner);
        return Ok(());
    }
    if board.is_full() {
        println!("Game over, draw");
        return Ok(());
    }
    let piece = board.next_piece();
    let book_move = opening_move(
        &board,
        moves,
        Some(&settings.opening_book),
        settings.book_plies,
    );

    let best_move = match settings.kind {
        EngineKind::Minimax | EngineKind::MinimaxBasic => {
            let mut minimax = Minimax::new(piece, settings.minimax_config(seed));
            let scores = minimax.score_moves(&board);
            for &(column, score) in scores.iter() {
                println!("Column {}: {}", column + 1, score);
            }
            book_move.or_else(|| minimax.pick_best(&scores))
        }
        EngineKind::Mcts => {
            let mut mcts = Mcts::new(piece, settings.mcts_config(seed));
            let tree = mcts.build_tree(&board);
            for child in tree.children(NodeId::ROOT) {
                if let Some(column) = child.column {
                    println!(
                        "Column {}: {} visits, win rate {:.3}",
                        column + 1,
                        child.visits,
                        child.win_rate()
                    );
                }
            }
            book_move.or_else(|| tree.best_child().and_then(|child| child.column))
        }
    };
    if book_move.is_some() {
        println!("Opening move, no search needed");
    }

    let best_move = best_move.ok_or_else(|| anyhow!("no move found for {}", moves))?;
    println!("{:?} to move, best move: {}", piece, best_move + 1);
    Ok(())
}
