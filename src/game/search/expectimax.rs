use std::ops::{Deref, DerefMut};
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{sentinel, Heuristic, Node, SearchResult};
use crate::env::{Direction, Player, Pos};
use crate::game::{Game, Outcome};

/// Pacman positions on the path from the search root to the current node.
///
/// Positions are pushed before descending into a pacman move and popped
/// when the returned [`TrailGuard`] goes out of scope.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Trail {
    positions: Vec<Pos>,
}

impl Trail {
    pub fn new() -> Trail {
        Trail::default()
    }

    /// How often `pos` occurs on the current path.
    pub fn count(&self, pos: Pos) -> usize {
        self.positions.iter().filter(|&&p| p == pos).count()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Pushes `pos` until the guard is dropped.
    pub fn enter(&mut self, pos: Pos) -> TrailGuard<'_> {
        self.positions.push(pos);
        TrailGuard { trail: self }
    }
}

/// Scoped entry of a [`Trail`].
pub struct TrailGuard<'a> {
    trail: &'a mut Trail,
}

impl Deref for TrailGuard<'_> {
    type Target = Trail;
    fn deref(&self) -> &Trail {
        self.trail
    }
}

impl DerefMut for TrailGuard<'_> {
    fn deref_mut(&mut self) -> &mut Trail {
        self.trail
    }
}

impl Drop for TrailGuard<'_> {
    fn drop(&mut self) {
        self.trail.positions.pop();
    }
}

/// Rewards for making progress that the distances alone cannot see.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    /// Per food eaten since the root.
    pub food_bonus: f64,
    /// Per occurrence of pacman's position on the trail.
    pub revisit_penalty: f64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            food_bonus: 100.0,
            revisit_penalty: 100.0,
        }
    }
}

/// Expectimax tree search.
///
/// Pacman maximizes, every ghost is a chance node that averages over
/// its valid moves. A ghost that cannot move evaluates the board as is.
/// There is no pruning.
///
/// The trail is balanced again when the search returns.
pub fn expectimax<H: Heuristic>(
    game: &Game,
    depth: usize,
    heuristic: &H,
    progress: &Progress,
    trail: &mut Trail,
) -> SearchResult {
    let start = Instant::now();
    let mut search = Expectimax {
        heuristic,
        progress,
        root_food: game.food.len(),
        winning_leaf: false,
        nodes: 0,
    };
    let root = Node::root(game, depth);
    let (dir, value) = search.max_value(&root, trail);

    debug!(
        ">>> expectimax {} {:?}ms {:?} {} nodes={}",
        depth,
        start.elapsed().as_millis(),
        dir,
        value,
        search.nodes
    );

    SearchResult {
        dir,
        value,
        winning_leaf: search.winning_leaf,
        nodes: search.nodes,
    }
}

struct Expectimax<'a, H: Heuristic> {
    heuristic: &'a H,
    progress: &'a Progress,
    root_food: usize,
    winning_leaf: bool,
    nodes: usize,
}

impl<'a, H: Heuristic> Expectimax<'a, H> {
    fn is_terminal(&mut self, node: &Node) -> bool {
        if node.game.outcome() == Outcome::Pacman {
            self.winning_leaf = true;
        }
        node.is_terminal()
    }

    fn evaluate(&self, game: &Game, trail: &Trail) -> f64 {
        if let Some(value) = sentinel(game) {
            return value;
        }
        let eaten = self.root_food.saturating_sub(game.food.len());
        let visits = trail.count(game.pacman);
        self.progress.food_bonus * eaten as f64
            - self.progress.revisit_penalty * visits as f64
            + self.heuristic.eval(game)
    }

    fn value(&mut self, node: &Node, trail: &mut Trail) -> f64 {
        match node.player {
            Player::Pacman => self.max_value(node, trail).1,
            Player::Ghost(_) => self.chance_value(node, trail),
        }
    }

    fn max_value(&mut self, node: &Node, trail: &mut Trail) -> (Option<Direction>, f64) {
        self.nodes += 1;
        if self.is_terminal(node) {
            return (None, self.evaluate(&node.game, trail));
        }

        let mut best = (None, f64::NEG_INFINITY);
        for d in node.moves() {
            let child = node.child(d);
            let mut trail = trail.enter(child.game.pacman);
            let value = self.value(&child, &mut trail);
            if best.0.is_none() || value > best.1 {
                best = (Some(d), value);
            }
        }
        best
    }

    fn chance_value(&mut self, node: &Node, trail: &mut Trail) -> f64 {
        self.nodes += 1;
        if self.is_terminal(node) {
            return self.evaluate(&node.game, trail);
        }

        let mut total = 0.0;
        let mut count = 0;
        for d in node.moves() {
            total += self.value(&node.child(d), trail);
            count += 1;
        }
        if count == 0 {
            self.evaluate(&node.game, trail)
        } else {
            total / count as f64
        }
    }
}
