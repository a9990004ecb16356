use crate::evaluation::{score_evaluation, EvalFn};
use crate::search::{self, SearchError};
use crate::Agent;
use gridhunt_core::{Action, GameState};

/// Full-width adversarial look-ahead.
pub struct MinimaxAgent {
    name: String,
    depth: u32,
    eval: EvalFn<GameState>,
}

impl MinimaxAgent {
    pub fn new(depth: u32) -> Self {
        Self::with_evaluation(depth, score_evaluation)
    }

    pub fn with_evaluation(depth: u32, eval: EvalFn<GameState>) -> Self {
        MinimaxAgent {
            name: format!("Minimax(depth={depth})"),
            depth,
            eval,
        }
    }
}

impl Agent for MinimaxAgent {
    fn choose_action(&mut self, state: &GameState) -> Result<Action, SearchError> {
        search::minimax(state, self.depth, self.eval).map(|result| result.action)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Minimax with alpha-beta pruning: same values, fewer visited nodes.
pub struct AlphaBetaAgent {
    name: String,
    depth: u32,
    eval: EvalFn<GameState>,
}

impl AlphaBetaAgent {
    pub fn new(depth: u32) -> Self {
        Self::with_evaluation(depth, score_evaluation)
    }

    pub fn with_evaluation(depth: u32, eval: EvalFn<GameState>) -> Self {
        AlphaBetaAgent {
            name: format!("AlphaBeta(depth={depth})"),
            depth,
            eval,
        }
    }
}

impl Agent for AlphaBetaAgent {
    fn choose_action(&mut self, state: &GameState) -> Result<Action, SearchError> {
        search::alpha_beta(state, self.depth, self.eval).map(|result| result.action)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Look-ahead against adversaries modeled as uniformly random.
pub struct ExpectimaxAgent {
    name: String,
    depth: u32,
    eval: EvalFn<GameState>,
}

impl ExpectimaxAgent {
    pub fn new(depth: u32) -> Self {
        Self::with_evaluation(depth, score_evaluation)
    }

    pub fn with_evaluation(depth: u32, eval: EvalFn<GameState>) -> Self {
        ExpectimaxAgent {
            name: format!("Expectimax(depth={depth})"),
            depth,
            eval,
        }
    }
}

impl Agent for ExpectimaxAgent {
    fn choose_action(&mut self, state: &GameState) -> Result<Action, SearchError> {
        search::expectimax(state, self.depth, self.eval).map(|result| result.action)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
