use gridhunt_core::{GameState, PLAYER};

/// A leaf evaluation: scores a state from the player's point of view.
/// Plain function references keep strategy selection a compile-time
/// affair; configuration passes one of these in explicitly.
pub type EvalFn<G> = fn(&G) -> f64;

/// Scale of both proximity terms.
const PROXIMITY_SCALE: f64 = 10.0;
/// Ghost distance weight; larger means ghosts only matter close up.
const GHOST_WEIGHT: f64 = 20.0;
/// Fraction of repulsion removed per remaining frightened move.
const FRIGHT_DISCOUNT: f64 = 0.1;
/// Penalty per pellet still on the board.
const PELLET_PRESSURE: f64 = 4.0;

/// The raw game score, with terminal outcomes promoted to infinities so
/// that no heuristic estimate can outweigh a decided game.
pub fn score_evaluation(state: &GameState) -> f64 {
    if state.is_lose() {
        return f64::NEG_INFINITY;
    }
    if state.is_win() {
        return f64::INFINITY;
    }
    state.score()
}

/// Blends the score with board geometry: the nearest ghost repels (less
/// so the longer it stays frightened), the nearest pellet attracts, and
/// every pellet still on the board costs a little. Used at depth cutoffs,
/// so terminal outcomes still dominate via infinities.
pub fn proximity_evaluation(state: &GameState) -> f64 {
    if state.is_lose() {
        return f64::NEG_INFINITY;
    }
    if state.is_win() {
        return f64::INFINITY;
    }

    let mut value = state.score();
    value -= ghost_repulsion(state);
    value += pellet_attraction(state);
    value -= PELLET_PRESSURE * state.pellets_left() as f64;
    value
}

/// Penalty for standing near the nearest ghost. Frightened ghosts count
/// as farther away than they are, so a long timer all but removes them.
pub fn ghost_repulsion(state: &GameState) -> f64 {
    let here = state.agent_position(PLAYER);
    let mut nearest = f64::INFINITY;
    for ghost in 1..state.num_agents() {
        let distance = f64::from(here.distance(state.agent_position(ghost)));
        let discounted = distance * (1.0 + FRIGHT_DISCOUNT * f64::from(state.fright_moves(ghost)));
        nearest = nearest.min(discounted);
    }
    if nearest.is_finite() {
        PROXIMITY_SCALE / (nearest * GHOST_WEIGHT).max(1.0)
    } else {
        0.0
    }
}

/// Bonus for standing near the nearest remaining pellet.
pub fn pellet_attraction(state: &GameState) -> f64 {
    let here = state.agent_position(PLAYER);
    match state.pellet_positions().map(|p| here.distance(p)).min() {
        Some(distance) => PROXIMITY_SCALE / f64::from(distance).max(1.0),
        None => 0.0,
    }
}
