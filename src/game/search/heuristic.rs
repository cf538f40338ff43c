use serde::{Deserialize, Serialize};

use super::{Heuristic, LOSS, WIN};
use crate::env::Pos;
use crate::game::{Game, Grid};

/// Wall count from which on the walking distance is computed with a BFS.
pub const WALL_THRESHOLD: usize = 100;

/// How distances between two cells are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    /// Ignores walls.
    Manhattan,
    /// Shortest walk around the walls.
    Bfs,
}

impl Distance {
    /// Sparse boards are fine with the manhattan distance,
    /// on dense boards walls force too many detours.
    pub fn for_grid(grid: &Grid, wall_threshold: usize) -> Distance {
        if grid.wall_count() < wall_threshold {
            Distance::Manhattan
        } else {
            Distance::Bfs
        }
    }

    /// Distance from `start` to the closest of `targets`.
    /// Infinite if there are no (reachable) targets.
    pub fn closest(self, grid: &Grid, start: Pos, targets: &[Pos]) -> f64 {
        let distance = match self {
            Distance::Manhattan => targets.iter().map(|&p| (p - start).manhattan()).min(),
            Distance::Bfs => grid.bfs(start, |p| targets.contains(&p)),
        };
        distance.map_or(f64::INFINITY, |d| d as f64)
    }
}

/// Factors for the distance to the closest food and ghost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub food: f64,
    pub ghost: f64,
}

impl Weights {
    pub const fn new(food: f64, ghost: f64) -> Weights {
        Weights { food, ghost }
    }

    /// Food should be close, ghosts far away.
    /// The score is 0 if pacman can reach neither.
    pub fn score(&self, food_distance: f64, ghost_distance: f64) -> f64 {
        let score = -self.food * food_distance + self.ghost * ghost_distance;
        if score.is_nan() {
            0.0
        } else {
            score
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Weights::new(1.0, 2.0)
    }
}

/// Tunables of the distance heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub wall_threshold: usize,
    pub manhattan: Weights,
    pub bfs: Weights,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            wall_threshold: WALL_THRESHOLD,
            manhattan: Weights::new(1.0, 2.0),
            bfs: Weights::new(1.0, 2.0),
        }
    }
}

impl HeuristicConfig {
    /// On walled boards food is weighted more, so that pacman does not run in circles.
    pub fn exploring() -> Self {
        Self {
            bfs: Weights::new(3.0, 1.0),
            ..Self::default()
        }
    }
}

/// Rates a board by the distances of pacman to the closest food and ghost.
///
/// The distance metric is chosen once from the wall count of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceHeuristic {
    pub distance: Distance,
    pub weights: Weights,
}

impl DistanceHeuristic {
    pub fn new(config: &HeuristicConfig, grid: &Grid) -> DistanceHeuristic {
        let distance = Distance::for_grid(grid, config.wall_threshold);
        let weights = match distance {
            Distance::Manhattan => config.manhattan,
            Distance::Bfs => config.bfs,
        };
        DistanceHeuristic { distance, weights }
    }

    /// Only the distance based part of the evaluation, without the terminal checks.
    pub fn distances(&self, game: &Game) -> f64 {
        let ghosts: Vec<Pos> = game.ghosts.iter().map(|g| g.pos).collect();
        let food = self.distance.closest(&game.grid, game.pacman, &game.food);
        let ghost = self.distance.closest(&game.grid, game.pacman, &ghosts);
        self.weights.score(food, ghost)
    }
}

impl Heuristic for DistanceHeuristic {
    fn eval(&self, game: &Game) -> f64 {
        if let Some(value) = sentinel(game) {
            return value;
        }
        self.distances(game)
    }
}

/// Fixed scores of finished games.
/// Eaten up food takes priority over a capture.
pub fn sentinel(game: &Game) -> Option<f64> {
    if game.food.is_empty() {
        Some(WIN)
    } else if game.is_captured() {
        Some(LOSS)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::Player;

    /// 148 walls, a long corridor around a center block.
    fn dense() -> Game {
        let mut rows = vec!["%".repeat(30)];
        rows.push(format!("%P{}.%", " ".repeat(26)));
        for _ in 0..3 {
            rows.push(format!("% {} %", "%".repeat(26)));
        }
        rows.push(format!("%{}W%", " ".repeat(27)));
        rows.push("%".repeat(30));
        Game::parse(&rows.join("\n")).unwrap()
    }

    #[test]
    fn sentinels() {
        let h = DistanceHeuristic::new(&HeuristicConfig::default(), &Grid::new(1, 1));

        // captured with food left
        let game = Game::parse("%%%%%\n%P.W%\n%%%%%").unwrap();
        let game = game.simulate(Player::Ghost(0), crate::env::Direction::West);
        let game = game.simulate(Player::Ghost(0), crate::env::Direction::West);
        assert!(game.is_captured());
        assert_eq!(game.food.len(), 1);
        assert_eq!(h.eval(&game), LOSS);

        // no food left wins even if captured
        let game = Game::parse("%%%%\n%PW%\n%%%%").unwrap();
        let game = game.simulate(Player::Pacman, crate::env::Direction::East);
        assert!(game.is_captured());
        assert_eq!(h.eval(&game), WIN);
    }

    #[test]
    fn distance_selection() {
        let config = HeuristicConfig::default();
        let sparse = Game::parse("%%%%%\n%P.W%\n%%%%%").unwrap();
        assert_eq!(
            DistanceHeuristic::new(&config, &sparse.grid).distance,
            Distance::Manhattan
        );

        let dense = dense();
        assert!(dense.wall_count() >= WALL_THRESHOLD);
        let h = DistanceHeuristic::new(&config, &dense.grid);
        assert_eq!(h.distance, Distance::Bfs);
        assert_eq!(h.weights, Weights::new(1.0, 2.0));

        let h = DistanceHeuristic::new(&HeuristicConfig::exploring(), &dense.grid);
        assert_eq!(h.weights, Weights::new(3.0, 1.0));
    }

    #[test]
    fn distances() {
        let game = dense();
        let food = game.food[0];
        let ghost = game.ghosts[0].pos;

        assert_eq!(
            Distance::Manhattan.closest(&game.grid, game.pacman, &[food]),
            27.0
        );
        assert_eq!(Distance::Bfs.closest(&game.grid, game.pacman, &[food]), 27.0);
        assert_eq!(
            Distance::Manhattan.closest(&game.grid, game.pacman, &[ghost]),
            31.0
        );
        assert_eq!(Distance::Bfs.closest(&game.grid, game.pacman, &[ghost]), 31.0);
        assert_eq!(
            Distance::Bfs.closest(&game.grid, game.pacman, &[]),
            f64::INFINITY
        );

        let h = DistanceHeuristic::new(&HeuristicConfig::default(), &game.grid);
        assert_eq!(h.eval(&game), -27.0 + 2.0 * 31.0);
    }

    #[test]
    fn ghost_distance_dominates() {
        // Same food distance, but the ghost is further away in the second board.
        let config = HeuristicConfig::default();
        let near = Game::parse("%%%%%%%\n%WP   %\n%     %\n%  .  %\n%%%%%%%").unwrap();
        let far = Game::parse("%%%%%%%\n%W  P %\n%     %\n%  .  %\n%%%%%%%").unwrap();
        let h = DistanceHeuristic::new(&config, &near.grid);
        assert_eq!(h.distance, Distance::Manhattan);
        assert!(h.eval(&near) < h.eval(&far));
        assert_eq!(h.eval(&near), -3.0 + 2.0);
        assert_eq!(h.eval(&far), -3.0 + 6.0);
    }

    #[test]
    fn unreachable() {
        let w = Weights::default();
        assert_eq!(w.score(f64::INFINITY, f64::INFINITY), 0.0);
        assert_eq!(w.score(f64::INFINITY, 3.0), f64::NEG_INFINITY);
        assert_eq!(w.score(2.0, f64::INFINITY), f64::INFINITY);
    }
}
