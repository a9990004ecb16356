use crate::evaluation::{proximity_evaluation, score_evaluation, EvalFn};
use crate::minimax::{AlphaBetaAgent, ExpectimaxAgent, MinimaxAgent};
use crate::random::RandomAgent;
use crate::reflex::ReflexAgent;
use crate::Agent;
use gridhunt_core::GameState;
use std::fmt;
use std::str::FromStr;

/// Strategy configuration error types. All of these fire before any
/// search begins.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownAlgorithm(String),
    UnknownEvaluation(String),
    ZeroDepth,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownAlgorithm(name) => write!(f, "Unknown algorithm: {name}"),
            ConfigError::UnknownEvaluation(name) => write!(f, "Unknown evaluation: {name}"),
            ConfigError::ZeroDepth => write!(f, "Look-ahead algorithms need a depth of at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The decision policies an agent can be built around.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Algorithm {
    Minimax,
    AlphaBeta,
    Expectimax,
    Reflex,
    Random,
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, ConfigError> {
        match name {
            "minimax" => Ok(Algorithm::Minimax),
            "alphabeta" => Ok(Algorithm::AlphaBeta),
            "expectimax" => Ok(Algorithm::Expectimax),
            "reflex" => Ok(Algorithm::Reflex),
            "random" => Ok(Algorithm::Random),
            _ => Err(ConfigError::UnknownAlgorithm(name.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Minimax => "minimax",
            Algorithm::AlphaBeta => "alphabeta",
            Algorithm::Expectimax => "expectimax",
            Algorithm::Reflex => "reflex",
            Algorithm::Random => "random",
        };
        write!(f, "{name}")
    }
}

/// Leaf evaluations selectable by name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Evaluation {
    Score,
    Proximity,
}

impl Evaluation {
    /// The function reference handed to the search.
    pub fn function(self) -> EvalFn<GameState> {
        match self {
            Evaluation::Score => score_evaluation,
            Evaluation::Proximity => proximity_evaluation,
        }
    }
}

impl FromStr for Evaluation {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, ConfigError> {
        match name {
            "score" => Ok(Evaluation::Score),
            "proximity" => Ok(Evaluation::Proximity),
            _ => Err(ConfigError::UnknownEvaluation(name.to_string())),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Evaluation::Score => "score",
            Evaluation::Proximity => "proximity",
        };
        write!(f, "{name}")
    }
}

/// Everything needed to build a player agent. Depth only matters for the
/// look-ahead algorithms; reflex and random ignore it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentConfig {
    pub algorithm: Algorithm,
    pub evaluation: Evaluation,
    pub depth: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            algorithm: Algorithm::Minimax,
            evaluation: Evaluation::Score,
            depth: 2,
        }
    }
}

impl AgentConfig {
    pub fn build(&self) -> Result<Box<dyn Agent>, ConfigError> {
        let eval = self.evaluation.function();
        match self.algorithm {
            Algorithm::Minimax | Algorithm::AlphaBeta | Algorithm::Expectimax
                if self.depth == 0 =>
            {
                Err(ConfigError::ZeroDepth)
            }
            Algorithm::Minimax => Ok(Box::new(MinimaxAgent::with_evaluation(self.depth, eval))),
            Algorithm::AlphaBeta => Ok(Box::new(AlphaBetaAgent::with_evaluation(self.depth, eval))),
            Algorithm::Expectimax => {
                Ok(Box::new(ExpectimaxAgent::with_evaluation(self.depth, eval)))
            }
            Algorithm::Reflex => Ok(Box::new(ReflexAgent::new())),
            Algorithm::Random => Ok(Box::new(RandomAgent::new())),
        }
    }
}
