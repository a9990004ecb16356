use crate::evaluation::EvalFn;
use crate::GameModel;
use gridhunt_core::InvalidMove;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::fmt;

/// Agent index of the maximizing player in every game model.
const MAXIMIZER: usize = 0;

/// Search failure modes. Both are invariant violations rather than game
/// outcomes: a healthy model never strands an agent without actions at a
/// live state, and the search never requests a move outside the legal set.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    NoLegalActions { agent: usize },
    IllegalMove(InvalidMove),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NoLegalActions { agent } => {
                write!(f, "No legal actions for agent {agent} at a non-terminal state")
            }
            SearchError::IllegalMove(inner) => {
                write!(f, "Search requested an illegal move: {inner}")
            }
        }
    }
}

impl std::error::Error for SearchError {}

impl From<InvalidMove> for SearchError {
    fn from(inner: InvalidMove) -> Self {
        SearchError::IllegalMove(inner)
    }
}

/// Outcome of one root search: the chosen action, its backed-up value and
/// the number of tree nodes visited while computing it.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    pub action: A,
    pub value: f64,
    pub nodes: u64,
}

struct SearchContext<G: GameModel> {
    eval: EvalFn<G>,
    depth: u32,
    nodes: u64,
}

impl<G: GameModel> SearchContext<G> {
    fn new(eval: EvalFn<G>, depth: u32) -> Self {
        SearchContext {
            eval,
            depth,
            nodes: 0,
        }
    }
}

/// Picks the action whose subtree value is maximal under optimal
/// adversaries, breaking ties uniformly at random.
pub fn minimax<G: GameModel>(
    state: &G,
    depth: u32,
    eval: EvalFn<G>,
) -> Result<SearchResult<G::Action>, SearchError> {
    let mut ctx = SearchContext::new(eval, depth);
    let (next, next_plies) = after(MAXIMIZER, state.num_agents(), 0);

    let mut scored = Vec::new();
    for action in candidate_actions(state, MAXIMIZER)? {
        let child = state.successor(MAXIMIZER, action)?;
        let value = minimax_value(&mut ctx, &child, next, next_plies)?;
        scored.push((action, value));
    }

    finish_uniform(scored, ctx.nodes)
}

/// Minimax with alpha-beta pruning. Root values are identical to plain
/// minimax; only the visit count shrinks. The root keeps the first action
/// that strictly improves on the running best, so tied root actions can
/// resolve differently than under [`minimax`].
pub fn alpha_beta<G: GameModel>(
    state: &G,
    depth: u32,
    eval: EvalFn<G>,
) -> Result<SearchResult<G::Action>, SearchError> {
    let mut ctx = SearchContext::new(eval, depth);
    let (next, next_plies) = after(MAXIMIZER, state.num_agents(), 0);

    let mut alpha = f64::NEG_INFINITY;
    let mut best_action = None;
    let mut best_value = f64::NEG_INFINITY;

    // Root children keep an open upper bound: pruning here could discard
    // the very action the search exists to report.
    for action in candidate_actions(state, MAXIMIZER)? {
        let child = state.successor(MAXIMIZER, action)?;
        let value = alpha_beta_value(&mut ctx, &child, next, next_plies, alpha, f64::INFINITY)?;
        if best_action.is_none() || value > best_value {
            best_action = Some(action);
            best_value = value;
        }
        alpha = alpha.max(best_value);
    }

    match best_action {
        Some(action) => Ok(SearchResult {
            action,
            value: best_value,
            nodes: ctx.nodes,
        }),
        None => Err(SearchError::NoLegalActions { agent: MAXIMIZER }),
    }
}

/// Like [`minimax`] but models every adversary as drawing uniformly from
/// its legal actions: adversary layers back up the mean instead of the
/// minimum. An adversary branch that can reach a certain loss is worth
/// negative infinity outright, even when other replies reach certain
/// wins. Root ties break uniformly at random, as in [`minimax`].
pub fn expectimax<G: GameModel>(
    state: &G,
    depth: u32,
    eval: EvalFn<G>,
) -> Result<SearchResult<G::Action>, SearchError> {
    let mut ctx = SearchContext::new(eval, depth);
    let (next, next_plies) = after(MAXIMIZER, state.num_agents(), 0);

    let mut scored = Vec::new();
    for action in candidate_actions(state, MAXIMIZER)? {
        let child = state.successor(MAXIMIZER, action)?;
        let value = expectimax_value(&mut ctx, &child, next, next_plies)?;
        scored.push((action, value));
    }

    finish_uniform(scored, ctx.nodes)
}

/// Agent order within a ply: the ply counter advances only once the last
/// agent has moved and control returns to the maximizer.
fn after(agent: usize, num_agents: usize, plies: u32) -> (usize, u32) {
    if agent + 1 == num_agents {
        (MAXIMIZER, plies + 1)
    } else {
        (agent + 1, plies)
    }
}

/// Legal actions with the no-op sentinel removed. An empty result is an
/// invariant violation surfaced as an error, never silently evaluated.
fn candidate_actions<G: GameModel>(
    state: &G,
    agent: usize,
) -> Result<Vec<G::Action>, SearchError> {
    let mut actions = state.legal_actions(agent);
    actions.retain(|action| !G::is_stop(action));
    if actions.is_empty() {
        return Err(SearchError::NoLegalActions { agent });
    }
    Ok(actions)
}

fn finish_uniform<A: Copy>(
    scored: Vec<(A, f64)>,
    nodes: u64,
) -> Result<SearchResult<A>, SearchError> {
    let best = scored
        .iter()
        .map(|&(_, value)| value)
        .fold(f64::NEG_INFINITY, f64::max);
    let ties: Vec<A> = scored
        .iter()
        .filter(|&&(_, value)| value == best)
        .map(|&(action, _)| action)
        .collect();

    match ties.choose(&mut thread_rng()) {
        Some(&action) => Ok(SearchResult {
            action,
            value: best,
            nodes,
        }),
        None => Err(SearchError::NoLegalActions { agent: MAXIMIZER }),
    }
}

fn minimax_value<G: GameModel>(
    ctx: &mut SearchContext<G>,
    state: &G,
    agent: usize,
    plies: u32,
) -> Result<f64, SearchError> {
    ctx.nodes += 1;

    if state.is_win() || state.is_lose() {
        return Ok((ctx.eval)(state));
    }
    // Depth is measured in full plies, so the cutoff is only checked when
    // control comes back around to the maximizer.
    if agent == MAXIMIZER && plies == ctx.depth {
        return Ok((ctx.eval)(state));
    }

    let (next, next_plies) = after(agent, state.num_agents(), plies);

    if agent == MAXIMIZER {
        let mut best = f64::NEG_INFINITY;
        for action in candidate_actions(state, agent)? {
            let child = state.successor(agent, action)?;
            best = best.max(minimax_value(ctx, &child, next, next_plies)?);
        }
        Ok(best)
    } else {
        let mut worst = f64::INFINITY;
        for action in candidate_actions(state, agent)? {
            let child = state.successor(agent, action)?;
            worst = worst.min(minimax_value(ctx, &child, next, next_plies)?);
        }
        Ok(worst)
    }
}

fn alpha_beta_value<G: GameModel>(
    ctx: &mut SearchContext<G>,
    state: &G,
    agent: usize,
    plies: u32,
    mut alpha: f64,
    mut beta: f64,
) -> Result<f64, SearchError> {
    ctx.nodes += 1;

    if state.is_win() || state.is_lose() {
        return Ok((ctx.eval)(state));
    }
    if agent == MAXIMIZER && plies == ctx.depth {
        return Ok((ctx.eval)(state));
    }

    let (next, next_plies) = after(agent, state.num_agents(), plies);

    if agent == MAXIMIZER {
        let mut value = f64::NEG_INFINITY;
        for action in candidate_actions(state, agent)? {
            let child = state.successor(agent, action)?;
            value = value.max(alpha_beta_value(ctx, &child, next, next_plies, alpha, beta)?);
            alpha = alpha.max(value);
            if value > beta {
                return Ok(value);
            }
        }
        Ok(value)
    } else {
        let mut value = f64::INFINITY;
        for action in candidate_actions(state, agent)? {
            let child = state.successor(agent, action)?;
            value = value.min(alpha_beta_value(ctx, &child, next, next_plies, alpha, beta)?);
            beta = beta.min(value);
            if value < alpha {
                return Ok(value);
            }
        }
        Ok(value)
    }
}

fn expectimax_value<G: GameModel>(
    ctx: &mut SearchContext<G>,
    state: &G,
    agent: usize,
    plies: u32,
) -> Result<f64, SearchError> {
    ctx.nodes += 1;

    if state.is_win() || state.is_lose() {
        return Ok((ctx.eval)(state));
    }
    if agent == MAXIMIZER && plies == ctx.depth {
        return Ok((ctx.eval)(state));
    }

    let (next, next_plies) = after(agent, state.num_agents(), plies);

    if agent == MAXIMIZER {
        let mut best = f64::NEG_INFINITY;
        for action in candidate_actions(state, agent)? {
            let child = state.successor(agent, action)?;
            best = best.max(expectimax_value(ctx, &child, next, next_plies)?);
        }
        Ok(best)
    } else {
        // Infinite children stay out of the running sum: a branch mixing
        // certain wins and certain losses would otherwise average to NaN.
        // A reachable certain loss outweighs everything else in the mean.
        let mut total = 0.0;
        let mut count = 0u32;
        let mut sure_win = false;
        let mut sure_loss = false;
        for action in candidate_actions(state, agent)? {
            let child = state.successor(agent, action)?;
            let value = expectimax_value(ctx, &child, next, next_plies)?;
            if value == f64::INFINITY {
                sure_win = true;
            } else if value == f64::NEG_INFINITY {
                sure_loss = true;
            } else {
                total += value;
            }
            count += 1;
        }
        if sure_loss {
            Ok(f64::NEG_INFINITY)
        } else if sure_win {
            Ok(f64::INFINITY)
        } else {
            Ok(total / f64::from(count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridhunt_core::Action;
    use std::cell::RefCell;
    use std::rc::Rc;

    // A regular tree with no terminals: every agent always has the same
    // number of actions and leaf values derive from the path taken.
    #[derive(Clone)]
    struct UniformGame {
        agents: usize,
        branching: u8,
        moves: u32,
        salt: u64,
        leaves: Rc<RefCell<Vec<u32>>>,
    }

    impl UniformGame {
        fn new(agents: usize, branching: u8) -> Self {
            UniformGame {
                agents,
                branching,
                moves: 0,
                salt: 0x9E37_79B9_7F4A_7C15,
                leaves: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl GameModel for UniformGame {
        type Action = u8;

        fn num_agents(&self) -> usize {
            self.agents
        }

        fn is_win(&self) -> bool {
            false
        }

        fn is_lose(&self) -> bool {
            false
        }

        fn legal_actions(&self, _agent: usize) -> Vec<u8> {
            (0..self.branching).collect()
        }

        fn successor(&self, _agent: usize, action: u8) -> Result<Self, InvalidMove> {
            let mut next = self.clone();
            next.moves += 1;
            next.salt = next
                .salt
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(u64::from(action) * 2 + 1);
            Ok(next)
        }

        fn score(&self) -> f64 {
            0.0
        }
    }

    fn varied_leaf(state: &UniformGame) -> f64 {
        state.leaves.borrow_mut().push(state.moves);
        ((state.salt >> 33) % 1000) as f64
    }

    // A tiny hand-built duel between the maximizer and one adversary.
    // Node ids name themselves; terminal ids carry a fixed score.
    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Duel {
        Root,
        Left,
        Right,
        MonoRoot,
        MonoLeft,
        MonoRight,
        TieRoot,
        TieLeft,
        TieRight,
        CalmRoot,
        Spread,
        StuckRoot,
        SplitRoot,
        Gamble,
        Safe,
        End(i32),
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum DuelAction {
        First,
        Second,
        Halt,
    }

    impl GameModel for Duel {
        type Action = DuelAction;

        fn num_agents(&self) -> usize {
            2
        }

        fn is_win(&self) -> bool {
            matches!(self, Duel::End(score) if *score >= 0)
        }

        fn is_lose(&self) -> bool {
            matches!(self, Duel::End(score) if *score < 0)
        }

        fn legal_actions(&self, _agent: usize) -> Vec<DuelAction> {
            use DuelAction::*;
            match self {
                Duel::Root | Duel::MonoRoot | Duel::TieRoot | Duel::SplitRoot => {
                    vec![First, Second]
                }
                Duel::Right | Duel::Spread | Duel::Gamble => vec![First, Second],
                Duel::Left | Duel::MonoLeft | Duel::MonoRight => vec![First],
                Duel::TieLeft | Duel::TieRight => vec![First],
                Duel::CalmRoot | Duel::Safe => vec![First],
                Duel::StuckRoot => vec![Halt, First],
                Duel::End(_) => Vec::new(),
            }
        }

        fn successor(&self, _agent: usize, action: DuelAction) -> Result<Self, InvalidMove> {
            use DuelAction::*;
            let next = match (self, action) {
                (Duel::Root, First) => Duel::Left,
                (Duel::Root, Second) => Duel::Right,
                (Duel::Left, First) => Duel::End(5),
                (Duel::Right, First) => Duel::End(-5),
                (Duel::Right, Second) => Duel::End(-3),
                (Duel::MonoRoot, First) => Duel::MonoLeft,
                (Duel::MonoRoot, Second) => Duel::MonoRight,
                (Duel::MonoLeft, First) => Duel::End(5),
                (Duel::MonoRight, First) => Duel::End(-5),
                (Duel::TieRoot, First) => Duel::TieLeft,
                (Duel::TieRoot, Second) => Duel::TieRight,
                (Duel::TieLeft, First) | (Duel::TieRight, First) => Duel::End(7),
                (Duel::CalmRoot, First) => Duel::Spread,
                (Duel::Spread, First) => Duel::End(0),
                (Duel::Spread, Second) => Duel::End(10),
                (Duel::StuckRoot, First) => Duel::End(-10),
                (Duel::SplitRoot, First) => Duel::Gamble,
                (Duel::SplitRoot, Second) => Duel::Safe,
                (Duel::Gamble, First) => Duel::End(5),
                (Duel::Gamble, Second) => Duel::End(-5),
                (Duel::Safe, First) => Duel::End(1),
                (state, action) => unreachable!("no successor for {state:?} via {action:?}"),
            };
            Ok(next)
        }

        fn score(&self) -> f64 {
            match self {
                Duel::End(score) => f64::from(*score),
                _ => 0.0,
            }
        }

        fn is_stop(action: &DuelAction) -> bool {
            matches!(action, DuelAction::Halt)
        }
    }

    fn duel_leaf(state: &Duel) -> f64 {
        state.score()
    }

    // Promotes decided games to infinities, as the real evaluations do.
    fn dominant_leaf(state: &Duel) -> f64 {
        if state.is_lose() {
            return f64::NEG_INFINITY;
        }
        if state.is_win() {
            return f64::INFINITY;
        }
        state.score()
    }

    #[test]
    fn test_terminal_states_return_evaluation_at_any_depth() {
        for depth in [0, 1, 99] {
            let mut ctx = SearchContext::new(duel_leaf as EvalFn<Duel>, depth);
            let won = Duel::End(5);
            let lost = Duel::End(-5);
            assert_eq!(minimax_value(&mut ctx, &won, 1, 0).unwrap(), 5.0);
            assert_eq!(minimax_value(&mut ctx, &lost, 0, 0).unwrap(), -5.0);
            assert_eq!(
                alpha_beta_value(&mut ctx, &won, 1, 0, f64::NEG_INFINITY, f64::INFINITY).unwrap(),
                5.0
            );
            assert_eq!(expectimax_value(&mut ctx, &lost, 1, 0).unwrap(), -5.0);
        }
    }

    #[test]
    fn test_minimax_and_alpha_beta_agree_on_values() {
        for depth in 1..=4 {
            let game = UniformGame::new(2, 2);
            let plain = minimax(&game, depth, varied_leaf).unwrap();
            let pruned = alpha_beta(&game, depth, varied_leaf).unwrap();
            assert_eq!(plain.value, pruned.value, "depth {depth}");
            assert!(pruned.nodes <= plain.nodes, "depth {depth}");
        }
    }

    #[test]
    fn test_alpha_beta_visits_strictly_fewer_nodes() {
        let game = UniformGame::new(2, 3);
        let plain = minimax(&game, 3, varied_leaf).unwrap();
        let pruned = alpha_beta(&game, 3, varied_leaf).unwrap();
        assert!(pruned.nodes < plain.nodes);
    }

    #[test]
    fn test_depth_limit_spans_full_plies() {
        for (agents, depth) in [(1, 3), (2, 2), (3, 2)] {
            let game = UniformGame::new(agents, 2);
            minimax(&game, depth, varied_leaf).unwrap();
            let leaves = game.leaves.borrow();
            assert!(!leaves.is_empty());
            // Every root-to-leaf path makes exactly depth * agents moves.
            let expected = depth * agents as u32;
            assert!(
                leaves.iter().all(|&moves| moves == expected),
                "agents {agents} depth {depth}: {leaves:?}"
            );
        }
    }

    #[test]
    fn test_duel_scenario_picks_the_winning_side() {
        let plain = minimax(&Duel::Root, 2, duel_leaf).unwrap();
        assert_eq!(plain.action, DuelAction::First);
        assert_eq!(plain.value, 5.0);

        let hopeful = expectimax(&Duel::Root, 2, duel_leaf).unwrap();
        assert_eq!(hopeful.action, DuelAction::First);
        assert_eq!(hopeful.value, 5.0);

        let pruned = alpha_beta(&Duel::Root, 2, duel_leaf).unwrap();
        assert_eq!(pruned.action, DuelAction::First);
        assert_eq!(pruned.value, 5.0);
        // Proving the left branch is worth 5 lets the right adversary cut
        // off after its first reply.
        assert_eq!(pruned.nodes, 4);
        assert_eq!(plain.nodes, 5);
    }

    #[test]
    fn test_expectimax_averages_adversary_replies() {
        let plain = minimax(&Duel::CalmRoot, 2, duel_leaf).unwrap();
        assert_eq!(plain.value, 0.0);

        let hopeful = expectimax(&Duel::CalmRoot, 2, duel_leaf).unwrap();
        assert_eq!(hopeful.value, 5.0);
    }

    #[test]
    fn test_expectimax_survives_mixed_certain_outcomes() {
        // The gamble branch averages a certain win against a certain
        // loss; the mean must stay ordered instead of going NaN, and the
        // reachable loss dominates it.
        let mut ctx = SearchContext::new(dominant_leaf as EvalFn<Duel>, 2);
        let gamble = expectimax_value(&mut ctx, &Duel::Gamble, 1, 0).unwrap();
        assert!(!gamble.is_nan());
        assert_eq!(gamble, f64::NEG_INFINITY);

        let result = expectimax(&Duel::SplitRoot, 2, dominant_leaf).unwrap();
        assert!(!result.value.is_nan());
        assert_eq!(result.action, DuelAction::Second);
        assert_eq!(result.value, f64::INFINITY);
    }

    #[test]
    fn test_expectimax_matches_minimax_for_single_reply_adversaries() {
        let plain = minimax(&Duel::MonoRoot, 2, duel_leaf).unwrap();
        let hopeful = expectimax(&Duel::MonoRoot, 2, duel_leaf).unwrap();
        assert_eq!(plain.value, hopeful.value);
        assert_eq!(plain.action, hopeful.action);
    }

    #[test]
    fn test_alpha_beta_keeps_first_of_tied_actions() {
        for _ in 0..10 {
            let pruned = alpha_beta(&Duel::TieRoot, 2, duel_leaf).unwrap();
            assert_eq!(pruned.action, DuelAction::First);
            assert_eq!(pruned.value, 7.0);
        }

        let plain = minimax(&Duel::TieRoot, 2, duel_leaf).unwrap();
        assert_eq!(plain.value, 7.0);
        assert!(matches!(
            plain.action,
            DuelAction::First | DuelAction::Second
        ));
    }

    #[test]
    fn test_no_op_is_never_selected() {
        // Halting would score 0 and moving loses 10, but the no-op is
        // filtered from the candidate set outright.
        for _ in 0..10 {
            let plain = minimax(&Duel::StuckRoot, 2, duel_leaf).unwrap();
            assert_eq!(plain.action, DuelAction::First);
            assert_eq!(plain.value, -10.0);
        }
    }

    #[test]
    fn test_empty_candidate_set_is_an_error() {
        let result = minimax(&Duel::End(5), 2, duel_leaf);
        assert_eq!(
            result.unwrap_err(),
            SearchError::NoLegalActions { agent: 0 }
        );
    }

    #[test]
    fn test_illegal_move_surfaces_as_error() {
        #[derive(Clone)]
        struct Broken;

        impl GameModel for Broken {
            type Action = u8;

            fn num_agents(&self) -> usize {
                1
            }

            fn is_win(&self) -> bool {
                false
            }

            fn is_lose(&self) -> bool {
                false
            }

            fn legal_actions(&self, _agent: usize) -> Vec<u8> {
                vec![0]
            }

            fn successor(&self, agent: usize, _action: u8) -> Result<Self, InvalidMove> {
                Err(InvalidMove {
                    agent,
                    action: Action::Stop,
                })
            }

            fn score(&self) -> f64 {
                0.0
            }
        }

        let result = minimax(&Broken, 1, |_: &Broken| 0.0);
        assert!(matches!(result, Err(SearchError::IllegalMove(_))));
    }
}
