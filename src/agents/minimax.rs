use crate::env::Direction;
use crate::game::search::{alphabeta, DistanceHeuristic, HeuristicConfig, SearchResult};
use crate::game::Game;

/// Alpha-beta search against minimizing ghosts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MinimaxAgent {
    /// Number of single moves to look ahead.
    pub depth: usize,
    pub heuristic: HeuristicConfig,
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self {
            depth: 6,
            heuristic: HeuristicConfig::default(),
        }
    }
}

impl MinimaxAgent {
    pub fn step(&self, game: &Game) -> Option<Direction> {
        self.search(game).dir
    }

    pub fn search(&self, game: &Game) -> SearchResult {
        let heuristic = DistanceHeuristic::new(&self.heuristic, &game.grid);
        alphabeta(game, self.depth, &heuristic)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minimax_agent() {
        let game = Game::parse("%%%%%\n%P.W%\n%%%%%").unwrap();
        let agent = MinimaxAgent {
            depth: 2,
            ..Default::default()
        };
        let result = agent.search(&game);
        assert!(result.winning_leaf);
        assert_eq!(agent.step(&game), Some(Direction::East));
    }
}
