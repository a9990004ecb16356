use crate::search::SearchError;
use crate::Agent;
use gridhunt_core::{Action, GameState, PLAYER};
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Uniform random baseline. Also serves as the ghost policy in the
/// runners, so it can control any agent index.
pub struct RandomAgent {
    name: String,
    agent: usize,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::for_agent(PLAYER)
    }

    /// A random policy for the given agent index.
    pub fn for_agent(agent: usize) -> Self {
        RandomAgent {
            name: "Random".to_string(),
            agent,
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn choose_action(&mut self, state: &GameState) -> Result<Action, SearchError> {
        let actions = state.legal_actions(self.agent);
        let mut rng = thread_rng();
        actions
            .choose(&mut rng)
            .copied()
            .ok_or(SearchError::NoLegalActions { agent: self.agent })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridhunt_core::{layouts, Layout};

    #[test]
    fn test_random_agent_stays_legal() {
        let state = GameState::new(Layout::parse(layouts::MINI).unwrap());
        let mut player = RandomAgent::new();
        let mut ghost = RandomAgent::for_agent(1);

        for _ in 0..20 {
            let action = player.choose_action(&state).unwrap();
            assert!(state.legal_actions(0).contains(&action));
            let action = ghost.choose_action(&state).unwrap();
            assert!(state.legal_actions(1).contains(&action));
        }
    }
}
