use crate::env::{Direction, Player, Pos};
use crate::game::search::{Distance, Weights};
use crate::game::Game;

/// One step lookahead with manhattan distances.
///
/// Every move is rated by the closest food and the closest ghost
/// from pacman's new position. The ghost weight depends on how many
/// ghosts are on the board.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GreedyAgent {
    /// Ghost weight for a single ghost.
    pub single: f64,
    /// Ghost weight for more than one ghost.
    pub multi: f64,
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self {
            single: 1.5,
            multi: 2.0,
        }
    }
}

impl GreedyAgent {
    pub fn step(&self, game: &Game) -> Option<Direction> {
        let mut best: Option<(Direction, f64)> = None;
        for d in game.valid_moves(Player::Pacman) {
            let score = self.rate(game, game.pacman.apply(d));
            // first best in direction order
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((d, score));
            }
        }
        best.map(|(d, _)| d)
    }

    /// Rating of pacman standing at `p` with the current food and ghosts.
    pub fn rate(&self, game: &Game, p: Pos) -> f64 {
        let ghost = if game.ghosts.len() > 1 {
            self.multi
        } else {
            self.single
        };
        let ghosts: Vec<Pos> = game.ghosts.iter().map(|g| g.pos).collect();
        let food = Distance::Manhattan.closest(&game.grid, p, &game.food);
        let ghost_distance = Distance::Manhattan.closest(&game.grid, p, &ghosts);
        Weights::new(1.0, ghost).score(food, ghost_distance)
    }
}
