use std::time::Instant;

use log::debug;

use super::{Heuristic, Node, SearchResult};
use crate::env::{Direction, Player};
use crate::game::{Game, Outcome};

/// Alpha-Beta tree search.
///
/// @see https://en.wikipedia.org/wiki/Alpha%E2%80%93beta_pruning
/// - Pacman is maximizing, every ghost is minimizing
/// - Agents move one after another, each move consumes one depth level
/// - A ghost that cannot move is worth `+inf`
///
/// The result also reports whether any visited leaf was won by pacman.
pub fn alphabeta<H: Heuristic>(game: &Game, depth: usize, heuristic: &H) -> SearchResult {
    let start = Instant::now();
    let mut search = AlphaBeta::new(heuristic);
    let root = Node::root(game, depth);
    let (dir, value) = search.max_value(&root, f64::NEG_INFINITY, f64::INFINITY);

    debug!(
        ">>> alphabeta {} {:?}ms {:?} {} nodes={} win={}",
        depth,
        start.elapsed().as_millis(),
        dir,
        value,
        search.nodes,
        search.winning_leaf
    );

    SearchResult {
        dir,
        value,
        winning_leaf: search.winning_leaf,
        nodes: search.nodes,
    }
}

struct AlphaBeta<'a, H: Heuristic> {
    heuristic: &'a H,
    winning_leaf: bool,
    nodes: usize,
}

impl<'a, H: Heuristic> AlphaBeta<'a, H> {
    fn new(heuristic: &'a H) -> Self {
        Self {
            heuristic,
            winning_leaf: false,
            nodes: 0,
        }
    }

    fn is_terminal(&mut self, node: &Node) -> bool {
        if node.game.outcome() == Outcome::Pacman {
            self.winning_leaf = true;
        }
        node.is_terminal()
    }

    fn value(&mut self, node: &Node, alpha: f64, beta: f64) -> f64 {
        match node.player {
            Player::Pacman => self.max_value(node, alpha, beta).1,
            Player::Ghost(_) => self.min_value(node, alpha, beta).1,
        }
    }

    fn max_value(&mut self, node: &Node, mut alpha: f64, beta: f64) -> (Option<Direction>, f64) {
        self.nodes += 1;
        if self.is_terminal(node) {
            return (None, self.heuristic.eval(&node.game));
        }

        let mut best = (None, f64::NEG_INFINITY);
        for d in node.moves() {
            let value = self.value(&node.child(d), alpha, beta);
            if best.0.is_none() || value > best.1 {
                best = (Some(d), value);
            }
            alpha = alpha.max(best.1);
            if alpha >= beta {
                break;
            }
        }
        best
    }

    fn min_value(&mut self, node: &Node, alpha: f64, mut beta: f64) -> (Option<Direction>, f64) {
        self.nodes += 1;
        if self.is_terminal(node) {
            return (None, self.heuristic.eval(&node.game));
        }

        // A stuck ghost returns the max value
        let mut best = (None, f64::INFINITY);
        for d in node.moves() {
            let value = self.value(&node.child(d), alpha, beta);
            if value < best.1 {
                best = (Some(d), value);
            }
            beta = beta.min(best.1);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

/// Exhaustive minimax without pruning.
///
/// Visits the same tree as [`alphabeta`] and chooses the same move,
/// but evaluates every leaf.
pub fn minimax<H: Heuristic>(game: &Game, depth: usize, heuristic: &H) -> SearchResult {
    let mut result = SearchResult {
        dir: None,
        value: 0.0,
        winning_leaf: false,
        nodes: 0,
    };
    let (dir, value) = minimax_rec(&Node::root(game, depth), heuristic, &mut result);
    result.dir = dir;
    result.value = value;
    result
}

fn minimax_rec<H: Heuristic>(
    node: &Node,
    heuristic: &H,
    result: &mut SearchResult,
) -> (Option<Direction>, f64) {
    result.nodes += 1;
    if node.game.outcome() == Outcome::Pacman {
        result.winning_leaf = true;
    }
    if node.is_terminal() {
        return (None, heuristic.eval(&node.game));
    }

    let maximize = node.player.is_pacman();
    let mut best = (
        None,
        if maximize {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        },
    );
    for d in node.moves() {
        let (_, value) = minimax_rec(&node.child(d), heuristic, result);
        let better = if maximize {
            best.0.is_none() || value > best.1
        } else {
            value < best.1
        };
        if better {
            best = (Some(d), value);
        }
    }
    best
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::Pos;
    use crate::game::search::{DistanceHeuristic, HeuristicConfig, LOSS, WIN};
    use crate::logging;
    use Direction::*;

    fn heuristic(game: &Game) -> DistanceHeuristic {
        DistanceHeuristic::new(&HeuristicConfig::default(), &game.grid)
    }

    #[test]
    fn corridor_win() {
        logging();
        let game = Game::parse("%%%%%\n%P.W%\n%%%%%").unwrap();
        let result = alphabeta(&game, 2, &heuristic(&game));
        assert_eq!(result.dir, Some(East));
        assert_eq!(result.value, WIN);
        assert!(result.winning_leaf);
    }

    #[test]
    fn avoid_capture() {
        logging();
        // Going south eats the food below, going east runs into the ghost's reach.
        let game = Game::parse(
            "%%%%%%\n\
             %P  W%\n\
             %.%%%%\n\
             %  . %\n\
             %%%%%%",
        )
        .unwrap();
        let h = heuristic(&game);
        let result = alphabeta(&game, 4, &h);
        assert_eq!(result.dir, Some(South));
        assert!(!result.winning_leaf);
    }

    #[test]
    fn no_win_within_depth() {
        let game = Game::parse("%%%%%%%%\n%P    .%\n%%%%%%W%\n%%%%%%%%").unwrap();
        let result = alphabeta(&game, 3, &heuristic(&game));
        assert_eq!(result.dir, Some(East));
        assert!(!result.winning_leaf);

        // pacman needs 5 moves, 8 single moves are only 4 of them
        let result = alphabeta(&game, 8, &heuristic(&game));
        assert!(!result.winning_leaf);
    }

    #[test]
    fn winning_leaf_deeper() {
        // the ghost is too far away to interfere
        let game = Game::parse("%%%%%%%%\n%P  .  %\n%%%%%% %\n%W     %\n%%%%%%%%").unwrap();
        let h = heuristic(&game);
        assert!(!alphabeta(&game, 4, &h).winning_leaf);
        let result = alphabeta(&game, 5, &h);
        assert!(result.winning_leaf);
        assert_eq!(result.dir, Some(East));
        assert_eq!(result.value, WIN);
    }

    #[test]
    fn stuck_ghost_is_max() {
        let game = Game::parse("%%%%%%\n%P. .%\n%%%%%%\n%%W%%%\n%%%%%%").unwrap();
        let h = heuristic(&game);
        let result = alphabeta(&game, 2, &h);
        assert_eq!(result.value, f64::INFINITY);
        assert_eq!(result.dir, Some(East));

        // the search never gets past the stuck ghost, so the win stays hidden
        let result = alphabeta(&game, 6, &h);
        assert_eq!(result.value, f64::INFINITY);
        assert!(!result.winning_leaf);
    }

    #[test]
    fn captured_root() {
        let game = Game::parse("%%%%\n%PW%\n%.%%\n%%%%").unwrap();
        let game = game.simulate(Player::Pacman, East);
        let result = alphabeta(&game, 3, &heuristic(&game));
        assert_eq!(result.dir, None);
        assert_eq!(result.value, LOSS);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn alphabeta_equals_minimax() {
        logging();
        let layouts = [
            "%%%%%%%\n%P  . %\n% %%% %\n%.  W %\n%%%%%%%",
            "%%%%%%%%\n%P.   .%\n%  %%  %\n%W    X%\n%%%%%%%%",
            "%%%%%%%\n%. . .%\n% %P% %\n%W   .%\n%%%%%%%",
            "%%%%%%%%%\n%P     .%\n% %%%%% %\n%.  X  W%\n%%%%%%%%%",
        ];
        for layout in layouts {
            let game = Game::parse(layout).unwrap();
            let h = heuristic(&game);
            for depth in 0..7 {
                let pruned = alphabeta(&game, depth, &h);
                let full = minimax(&game, depth, &h);
                assert_eq!(pruned.dir, full.dir, "{layout} depth {depth}");
                assert_eq!(pruned.value, full.value, "{layout} depth {depth}");
                assert!(pruned.nodes <= full.nodes);
            }
        }
    }

    #[test]
    fn pruning_saves_work() {
        let game = Game::parse("%%%%%%%%\n%P.   .%\n%  %%  %\n%W    X%\n%%%%%%%%").unwrap();
        let h = heuristic(&game);
        let pruned = alphabeta(&game, 6, &h);
        let full = minimax(&game, 6, &h);
        assert!(pruned.nodes < full.nodes);
    }

    #[test]
    fn search_does_not_mutate() {
        let game = Game::parse("%%%%%%%\n%P  . %\n% %%% %\n%.  W %\n%%%%%%%").unwrap();
        let copy = game.clone();
        alphabeta(&game, 5, &heuristic(&game));
        assert_eq!(game, copy);
        assert_eq!(game.pacman, Pos::new(1, 1));
    }
}
