use crate::evaluation::{ghost_repulsion, pellet_attraction};
use crate::search::SearchError;
use crate::Agent;
use gridhunt_core::{Action, GameState, InvalidMove, PLAYER};
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Bonus per pellet the action eats.
const EATEN_BONUS: f64 = 20.0;
/// Discourages standing still instead of filtering the no-op outright.
const STOP_PENALTY: f64 = 50.0;

/// Scores taking `action` from `state` by the state it leads to: the
/// successor's score and geometry, a bonus for pellets the move eats and
/// a penalty for choosing the no-op.
pub fn reflex_evaluation(state: &GameState, action: Action) -> Result<f64, InvalidMove> {
    let next = state.generate_successor(PLAYER, action)?;
    if next.is_lose() {
        return Ok(f64::NEG_INFINITY);
    }
    if next.is_win() {
        return Ok(f64::INFINITY);
    }

    let mut value = next.score();
    value -= ghost_repulsion(&next);
    value += pellet_attraction(&next);
    value += EATEN_BONUS * (state.pellets_left() - next.pellets_left()) as f64;
    if action.is_stop() {
        value -= STOP_PENALTY;
    }
    Ok(value)
}

/// One-ply greedy policy: no look-ahead, just [`reflex_evaluation`] over
/// each legal action with uniform random tie-breaking.
pub struct ReflexAgent {
    name: String,
}

impl ReflexAgent {
    pub fn new() -> Self {
        ReflexAgent {
            name: "Reflex".to_string(),
        }
    }
}

impl Default for ReflexAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for ReflexAgent {
    fn choose_action(&mut self, state: &GameState) -> Result<Action, SearchError> {
        let actions = state.legal_actions(PLAYER);
        if actions.is_empty() {
            return Err(SearchError::NoLegalActions { agent: PLAYER });
        }

        let mut scored = Vec::with_capacity(actions.len());
        for action in actions {
            scored.push((action, reflex_evaluation(state, action)?));
        }

        let best = scored
            .iter()
            .map(|&(_, value)| value)
            .fold(f64::NEG_INFINITY, f64::max);
        let ties: Vec<Action> = scored
            .iter()
            .filter(|&&(_, value)| value == best)
            .map(|&(action, _)| action)
            .collect();

        ties.choose(&mut thread_rng())
            .copied()
            .ok_or(SearchError::NoLegalActions { agent: PLAYER })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
