use crate::env::Direction;
use crate::game::search::{
    expectimax, DistanceHeuristic, HeuristicConfig, Progress, SearchResult, Trail,
};
use crate::game::Game;

/// Expectimax search against randomly moving ghosts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExpectimaxAgent {
    /// Number of single moves to look ahead.
    pub depth: usize,
    pub heuristic: HeuristicConfig,
    pub progress: Progress,
}

impl Default for ExpectimaxAgent {
    fn default() -> Self {
        Self {
            depth: 4,
            heuristic: HeuristicConfig::exploring(),
            progress: Progress::default(),
        }
    }
}

impl ExpectimaxAgent {
    pub fn step(&self, game: &Game) -> Option<Direction> {
        self.search(game).dir
    }

    /// Every search starts with an empty trail.
    pub fn search(&self, game: &Game) -> SearchResult {
        let heuristic = DistanceHeuristic::new(&self.heuristic, &game.grid);
        let mut trail = Trail::new();
        expectimax(game, self.depth, &heuristic, &self.progress, &mut trail)
    }
}
