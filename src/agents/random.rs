use rand::rngs::SmallRng;
use rand::seq::IteratorRandom;

use crate::env::{Direction, Player};
use crate::game::Game;

/// Moves pacman uniformly at random.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RandomAgent;

impl RandomAgent {
    pub fn step(&self, game: &Game, rng: &mut SmallRng) -> Option<Direction> {
        random_move(game, Player::Pacman, rng)
    }
}

/// Uniform choice among the valid moves of any player.
/// This is also how the ghosts move.
pub fn random_move(game: &Game, player: Player, rng: &mut SmallRng) -> Option<Direction> {
    game.valid_moves(player).choose(rng)
}
