pub mod config;
pub mod evaluation;
pub mod minimax;
pub mod random;
pub mod reflex;
pub mod search;

use gridhunt_core::{Action, GameState, InvalidMove};
use std::fmt;

use crate::search::SearchError;

/// Core trait for game-playing agents.
pub trait Agent {
    /// Pick an action for the agent this instance controls.
    fn choose_action(&mut self, state: &GameState) -> Result<Action, SearchError>;

    /// Get the agent's name.
    fn name(&self) -> &str;
}

/// The game surface the look-ahead search is written against. Agent 0 is
/// the maximizing player; agents 1..N-1 are adversaries. Successors are
/// fresh states, so siblings in the search tree never share mutations.
pub trait GameModel: Sized {
    type Action: Copy + PartialEq + fmt::Debug;

    /// Number of agents in the game, at least 1.
    fn num_agents(&self) -> usize;

    fn is_win(&self) -> bool;

    fn is_lose(&self) -> bool;

    /// Legal actions for the agent, in a stable order. May include the
    /// no-op sentinel; the search filters it via [`GameModel::is_stop`].
    fn legal_actions(&self, agent: usize) -> Vec<Self::Action>;

    /// The state after the agent takes the action. Fails if the action is
    /// not legal for that agent here.
    fn successor(&self, agent: usize, action: Self::Action) -> Result<Self, InvalidMove>;

    /// The running game score the default evaluation reads.
    fn score(&self) -> f64;

    /// Identifies the no-op sentinel. Games without one keep the default.
    fn is_stop(_action: &Self::Action) -> bool {
        false
    }
}

impl GameModel for GameState {
    type Action = Action;

    fn num_agents(&self) -> usize {
        GameState::num_agents(self)
    }

    fn is_win(&self) -> bool {
        GameState::is_win(self)
    }

    fn is_lose(&self) -> bool {
        GameState::is_lose(self)
    }

    fn legal_actions(&self, agent: usize) -> Vec<Action> {
        GameState::legal_actions(self, agent)
    }

    fn successor(&self, agent: usize, action: Action) -> Result<Self, InvalidMove> {
        self.generate_successor(agent, action)
    }

    fn score(&self) -> f64 {
        GameState::score(self)
    }

    fn is_stop(action: &Action) -> bool {
        action.is_stop()
    }
}

pub use config::{AgentConfig, Algorithm, ConfigError, Evaluation};
pub use evaluation::*;
pub use minimax::{AlphaBetaAgent, ExpectimaxAgent, MinimaxAgent};
pub use random::RandomAgent;
pub use reflex::ReflexAgent;
pub use search::*;
