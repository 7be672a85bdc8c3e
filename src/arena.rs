use anyhow::{anyhow, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use std::time::{Duration, Instant};

use connect4_search::{
    board::Piece,
    engine::Engine,
    evaluator::Heuristic,
    game::{Game, GameState},
    mcts::{Mcts, MctsConfig},
    minimax::{Minimax, MinimaxConfig},
    opening_book::OpeningBook,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// Minimax with the weighted heuristic
    Minimax,
    /// Minimax with the basic heuristic
    MinimaxBasic,
    /// Monte Carlo Tree Search
    Mcts,
}

/// Everything needed to build an engine for one side of a game
#[derive(Clone, Debug)]
pub struct EngineSettings {
    pub kind: EngineKind,
    pub depth: usize,
    pub iterations: usize,
    pub book_plies: usize,
    pub opening_book: OpeningBook,
}

impl EngineSettings {
    pub fn minimax_config(&self, seed: Option<u64>) -> MinimaxConfig {
        let heuristic = match self.kind {
            EngineKind::MinimaxBasic => Heuristic::basic(),
            _ => Heuristic::weighted(),
        };
        MinimaxConfig {
            depth: self.depth,
            heuristic,
            book_plies: self.book_plies,
            seed,
        }
    }

    pub fn mcts_config(&self, seed: Option<u64>) -> MctsConfig {
        MctsConfig {
            iterations: self.iterations,
            book_plies: self.book_plies,
            seed,
            ..MctsConfig::default()
        }
    }

    pub fn build(&self, piece: Piece, seed: Option<u64>) -> Box<dyn Engine + Send> {
        match self.kind {
            EngineKind::Minimax | EngineKind::MinimaxBasic => Box::new(
                Minimax::new(piece, self.minimax_config(seed))
                    .with_opening_book(self.opening_book.clone()),
            ),
            EngineKind::Mcts => Box::new(
                Mcts::new(piece, self.mcts_config(seed))
                    .with_opening_book(self.opening_book.clone()),
            ),
        }
    }
}

/// The outcome of one game between the two engines
struct GameRecord {
    state: GameState,
    // total thinking time of each engine
    times: [Duration; 2],
}

/// Plays one game; the first engine plays player one, the second player two
fn play_game(
    engines: &mut [Box<dyn Engine + Send>; 2],
    first: Piece,
) -> Result<GameRecord> {
    let mut game = Game::with_first_player(first);
    let mut times = [Duration::default(); 2];

    loop {
        let index = match game.to_move() {
            Piece::PlayerOne => 0,
            Piece::PlayerTwo => 1,
        };
        let engine = &mut engines[index];

        let start = Instant::now();
        let column = engine
            .get_move(game.board(), game.history())
            .ok_or_else(|| anyhow!("{} found no move in {}", engine.name(), game.history()))?;
        times[index] += start.elapsed();

        let state = game.play(column)?;
        if state.is_over() {
            return Ok(GameRecord { state, times });
        }
    }
}

/// Plays `games` games between two engines in parallel and prints a summary
///
/// The engine starting each game alternates, beginning with the first engine.
pub fn run(
    first: &EngineSettings,
    second: &EngineSettings,
    games: usize,
    seed: Option<u64>,
) -> Result<()> {
    let progress = ProgressBar::new(games as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Playing games: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let start = Instant::now();
    let records = (0..games)
        .into_par_iter()
        .map(|game| {
            // distinct, reproducible seeds for both engines of every game
            let seeds = match seed {
                Some(seed) => [
                    Some(seed.wrapping_add(2 * game as u64)),
                    Some(seed.wrapping_add(2 * game as u64 + 1)),
                ],
                None => [None, None],
            };
            let mut engines = [
                first.build(Piece::PlayerOne, seeds[0]),
                second.build(Piece::PlayerTwo, seeds[1]),
            ];
            let starting = if game % 2 == 0 {
                Piece::PlayerOne
            } else {
                Piece::PlayerTwo
            };
            let record = play_game(&mut engines, starting);
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();

    let mut wins = [0; 2];
    let mut draws = 0;
    let mut times = [Duration::default(); 2];
    for record in records.iter() {
        match record.state.winner() {
            Some(Piece::PlayerOne) => wins[0] += 1,
            Some(Piece::PlayerTwo) => wins[1] += 1,
            None => draws += 1,
        }
        times[0] += record.times[0];
        times[1] += record.times[1];
    }

    println!(
        "Played {} games in {:.1}s",
        records.len(),
        start.elapsed().as_secs_f64()
    );
    println!("{:?} (player 1) wins: {}", first.kind, wins[0]);
    println!("{:?} (player 2) wins: {}", second.kind, wins[1]);
    println!("Draws: {}", draws);
    println!(
        "Total thinking time for {:?} (player 1): {:.3}s",
        first.kind,
        times[0].as_secs_f64()
    );
    println!(
        "Total thinking time for {:?} (player 2): {:.3}s",
        second.kind,
        times[1].as_secs_f64()
    );
    Ok(())
}
