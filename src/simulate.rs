//! Plays complete games against randomly moving ghosts.

use std::fmt::Write;

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::agents::{random_move, Agent, MinimaxAgent};
use crate::env::{Direction, Player};
use crate::game::{Game, Outcome, PACMAN};

pub const FOOD_SCORE: i64 = 10;
pub const WIN_SCORE: i64 = 500;
pub const LOSE_SCORE: i64 = -500;
pub const MOVE_SCORE: i64 = -1;

/// How a game is played.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Stop after this many pacman turns, the game then has no winner.
    /// Games that cannot end anymore are always stopped without a winner.
    pub max_turns: Option<usize>,
    /// Play minimax turn by turn instead of deciding after a single search.
    pub turn_based: bool,
    /// Record the text transcript of every move.
    pub transcript: bool,
}

/// Result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub winner: Outcome,
    pub score: i64,
    /// Number of recorded single moves, stuck players included.
    pub moves: usize,
    pub transcript: String,
}

/// Plays one game of `agent` against random ghosts.
///
/// The rng is seeded with `seed` or from entropy. Minimax agents run the
/// single search mode unless [`Options::turn_based`] is set.
pub fn play(agent: &Agent, game: &Game, seed: Option<u64>, options: &Options) -> GameRecord {
    if let Agent::Minimax(minimax) = agent {
        if !options.turn_based {
            return single_shot(minimax, game, seed, options);
        }
    }

    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let mut sim = Simulation::new(game.clone(), seed, options.transcript);

    let mut turns = 0;
    while sim.outcome() == Outcome::None {
        if options.max_turns.map_or(false, |max| turns >= max) {
            debug!("turn limit {turns} reached");
            break;
        }
        if !sim.game.can_end() {
            warn!("pacman can reach neither food nor ghosts, stopping after {turns} turns");
            break;
        }
        turns += 1;

        let dir = agent.step(&sim.game, &mut rng);
        sim.apply(Player::Pacman, dir);

        for i in 0..sim.game.ghosts.len() {
            if sim.outcome() != Outcome::None {
                break;
            }
            let ghost = Player::Ghost(i as u8);
            let dir = random_move(&sim.game, ghost, &mut rng);
            sim.apply(ghost, dir);
        }
    }
    sim.finish()
}

/// A single bounded search from the initial board.
///
/// Pacman wins if any visited leaf has no food left, otherwise the ghosts
/// win. Nothing is played on the live board.
pub fn single_shot(
    agent: &MinimaxAgent,
    game: &Game,
    seed: Option<u64>,
    options: &Options,
) -> GameRecord {
    warn!(
        "minimax decides the game with a single search of depth {}",
        agent.depth
    );
    let result = agent.search(game);
    let winner = if result.winning_leaf {
        Outcome::Pacman
    } else {
        Outcome::Ghosts
    };

    let mut transcript = String::new();
    if options.transcript {
        transcript = header(game, seed);
        let _ = write!(transcript, "WIN: {winner}");
    }
    GameRecord {
        winner,
        score: 0,
        moves: 0,
        transcript,
    }
}

fn header(game: &Game, seed: Option<u64>) -> String {
    match seed {
        Some(seed) => format!("seed: {seed}\n0\n{game}"),
        None => format!("seed: -1\n0\n{game}"),
    }
}

/// The live board of a running game with its score.
struct Simulation {
    game: Game,
    score: i64,
    moves: usize,
    transcript: Option<String>,
}

impl Simulation {
    fn new(game: Game, seed: Option<u64>, transcript: bool) -> Simulation {
        let transcript = transcript.then(|| header(&game, seed));
        Simulation {
            game,
            score: 0,
            moves: 0,
            transcript,
        }
    }

    fn outcome(&self) -> Outcome {
        self.game.outcome()
    }

    /// Executes and scores a single move. Players without a valid move
    /// stay where they are but their turn is recorded.
    fn apply(&mut self, player: Player, dir: Option<Direction>) {
        if let Some(dir) = dir {
            let food = self.game.food.len();
            self.game.step(player, dir);

            if player.is_pacman() {
                if self.game.food.len() < food {
                    self.score += FOOD_SCORE;
                    if self.game.food.is_empty() {
                        self.score += WIN_SCORE;
                    }
                }
                self.score += MOVE_SCORE;
            }
            if self.game.is_captured() {
                self.score += LOSE_SCORE;
            }
        }

        self.moves += 1;
        if let Some(transcript) = &mut self.transcript {
            let id = match player {
                Player::Pacman => PACMAN,
                Player::Ghost(i) => self.game.ghosts[i as usize].id,
            };
            let dir = dir.map(|d| d.to_string()).unwrap_or_default();
            let _ = write!(
                transcript,
                "{}: {id} moving {dir}\n{}score: {}\n",
                self.moves, self.game, self.score
            );
        }
    }

    fn finish(self) -> GameRecord {
        let winner = self.outcome();
        let mut transcript = self.transcript.unwrap_or_default();
        if winner != Outcome::None && !transcript.is_empty() {
            let _ = write!(transcript, "WIN: {winner}");
        }
        debug!(
            "game over: {winner} score={} moves={}",
            self.score, self.moves
        );
        GameRecord {
            winner,
            score: self.score,
            moves: self.moves,
            transcript,
        }
    }
}
