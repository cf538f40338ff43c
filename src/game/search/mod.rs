mod heuristic;
pub use heuristic::*;
mod minimax;
pub use minimax::*;
mod expectimax;
pub use expectimax::*;

use std::fmt::Debug;

use super::{Game, Outcome, ValidMoves};
use crate::env::{Direction, Player};

pub const WIN: f64 = 10000.0;
pub const LOSS: f64 = -10000.0;

/// A heuristic that evaluates the game state at the leafs of a tree search.
pub trait Heuristic: Debug {
    fn eval(&self, game: &Game) -> f64;
}

/// The result of a tree search from pacman's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Best move of pacman, `None` if pacman cannot move at all.
    pub dir: Option<Direction>,
    pub value: f64,
    /// A leaf where pacman has eaten all food was visited.
    pub winning_leaf: bool,
    /// Number of visited nodes.
    pub nodes: usize,
}

/// A state in the search tree: the board, the remaining depth and who moves next.
#[derive(Debug, Clone)]
pub struct Node {
    pub game: Game,
    /// Remaining single moves (not rounds).
    pub depth: usize,
    pub player: Player,
}

impl Node {
    pub fn root(game: &Game, depth: usize) -> Node {
        Node {
            game: game.clone(),
            depth,
            player: Player::Pacman,
        }
    }

    /// The node after the current player moved in `dir`.
    pub fn child(&self, dir: Direction) -> Node {
        let game = self.game.simulate(self.player, dir);
        Node {
            player: self.player.next(game.ghosts.len()),
            depth: self.depth.saturating_sub(1),
            game,
        }
    }

    pub fn moves(&self) -> ValidMoves {
        self.game.valid_moves(self.player)
    }

    /// Depth is exhausted or the game is over.
    pub fn is_terminal(&self) -> bool {
        self.depth == 0 || self.game.outcome() != Outcome::None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::Pos;

    #[test]
    fn node_child() {
        let game = Game::parse("%%%%%%\n%P . %\n%W  X%\n%%%%%%").unwrap();
        let root = Node::root(&game, 3);
        assert!(!root.is_terminal());
        // moving onto a ghost is allowed for pacman
        assert!(root.moves().eq([Direction::East, Direction::South]));

        let child = root.child(Direction::East);
        assert_eq!(child.depth, 2);
        assert_eq!(child.player, Player::Ghost(0));
        assert_eq!(child.game.pacman, Pos::new(1, 2));
        // the parent is untouched
        assert_eq!(root.game.pacman, Pos::new(1, 1));

        let child = child.child(Direction::East);
        assert_eq!(child.player, Player::Ghost(1));
        let child = child.child(Direction::North);
        assert_eq!(child.player, Player::Pacman);
        assert_eq!(child.depth, 0);
        assert!(child.is_terminal());
    }
}
