use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;

mod random;
pub use random::*;
mod greedy;
pub use greedy::*;
mod minimax;
pub use minimax::*;
mod expectimax;
pub use expectimax::*;

use crate::env::Direction;
use crate::game::Game;

/// Pacman policies, configured as JSON, e.g. `{"Minimax":{"depth":4}}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Agent {
    Random(RandomAgent),
    Greedy(GreedyAgent),
    Minimax(MinimaxAgent),
    Expectimax(ExpectimaxAgent),
}

impl Default for Agent {
    fn default() -> Self {
        Self::Expectimax(ExpectimaxAgent::default())
    }
}

impl Agent {
    /// Chooses pacman's next move, `None` if pacman cannot move.
    /// The rng is only used by randomized agents.
    pub fn step(&self, game: &Game, rng: &mut SmallRng) -> Option<Direction> {
        match self {
            Agent::Random(agent) => agent.step(game, rng),
            Agent::Greedy(agent) => agent.step(game),
            Agent::Minimax(agent) => agent.step(game),
            Agent::Expectimax(agent) => agent.step(game),
        }
    }
}

impl FromStr for Agent {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::search::HeuristicConfig;

    #[test]
    fn agent_config() {
        let agent: Agent = r#"{"Minimax":{"depth":3}}"#.parse().unwrap();
        assert_eq!(
            agent,
            Agent::Minimax(MinimaxAgent {
                depth: 3,
                heuristic: HeuristicConfig::default(),
            })
        );

        let agent: Agent = r#"{"Expectimax":{}}"#.parse().unwrap();
        assert_eq!(agent, Agent::default());

        let agent: Agent = r#"{"Greedy":{"multi":3.0}}"#.parse().unwrap();
        let Agent::Greedy(greedy) = agent else {
            panic!("not a greedy agent");
        };
        assert_eq!(greedy.single, 1.5);
        assert_eq!(greedy.multi, 3.0);

        assert!("Minimax".parse::<Agent>().is_err());
    }

    #[test]
    fn agent_display() {
        let agent = Agent::Minimax(MinimaxAgent::default());
        let parsed: Agent = agent.to_string().parse().unwrap();
        assert_eq!(parsed, agent);
    }
}
