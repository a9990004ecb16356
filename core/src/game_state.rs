use crate::layout::Layout;
use crate::types::{Action, Position};
use std::fmt;
use std::sync::Arc;

/// Points for eating one pellet.
pub const PELLET_SCORE: f64 = 10.0;
/// Bonus for clearing the board.
pub const WIN_SCORE: f64 = 500.0;
/// Penalty for being caught.
pub const LOSE_PENALTY: f64 = 500.0;
/// Points for eating a frightened ghost.
pub const GHOST_SCORE: f64 = 200.0;
/// Cost of every player move, including `Stop`.
pub const TIME_PENALTY: f64 = 1.0;
/// Number of ghost moves a capsule keeps the ghosts frightened for.
pub const FRIGHT_MOVES: u32 = 40;

/// Agent index of the player. Ghosts occupy the indices above it.
pub const PLAYER: usize = 0;

/// Raised when a successor is requested for an action that is not legal
/// for the given agent in the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidMove {
    pub agent: usize,
    pub action: Action,
}

impl fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action {} is not legal for agent {}", self.action, self.agent)
    }
}

impl std::error::Error for InvalidMove {}

/// Whether the game is still running or has been decided.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Playing,
    Won,
    Lost,
}

/// One agent on the board. `fright` counts the remaining frightened
/// moves for a ghost and stays zero for the player.
#[derive(Debug, Clone, PartialEq)]
struct AgentData {
    position: Position,
    start: Position,
    heading: Action,
    fright: u32,
}

impl AgentData {
    fn at(start: Position) -> Self {
        AgentData {
            position: start,
            start,
            heading: Action::Stop,
            fright: 0,
        }
    }
}

/// A full snapshot of one game. Successor states are fresh values; the
/// layout is shared behind an `Arc` so cloning a state stays cheap.
#[derive(Debug, Clone)]
pub struct GameState {
    layout: Arc<Layout>,
    agents: Vec<AgentData>,
    pellets: Vec<bool>,
    pellets_left: usize,
    capsules: Vec<Position>,
    score: f64,
    status: Status,
}

impl GameState {
    /// Starts a new game on the given layout.
    pub fn new(layout: Layout) -> Self {
        let mut pellets = vec![false; layout.width * layout.height];
        for pos in &layout.pellets {
            pellets[pos.y as usize * layout.width + pos.x as usize] = true;
        }
        let pellets_left = layout.pellets.len();
        let capsules = layout.capsules.clone();

        let mut agents = vec![AgentData::at(layout.player_start)];
        agents.extend(layout.ghost_starts.iter().map(|&start| AgentData::at(start)));

        GameState {
            layout: Arc::new(layout),
            agents,
            pellets,
            pellets_left,
            capsules,
            score: 0.0,
            status: Status::Playing,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn is_win(&self) -> bool {
        self.status == Status::Won
    }

    pub fn is_lose(&self) -> bool {
        self.status == Status::Lost
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn agent_position(&self, agent: usize) -> Position {
        self.agents[agent].position
    }

    /// Remaining frightened moves for the agent; always zero for the player.
    pub fn fright_moves(&self, agent: usize) -> u32 {
        self.agents[agent].fright
    }

    pub fn pellets_left(&self) -> usize {
        self.pellets_left
    }

    pub fn has_pellet(&self, pos: Position) -> bool {
        self.cell_index(pos)
            .map(|i| self.pellets[i])
            .unwrap_or(false)
    }

    /// Iterates over all cells that still hold a pellet.
    pub fn pellet_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.layout.width;
        self.pellets
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(move |(i, _)| Position::new((i % width) as i32, (i / width) as i32))
    }

    pub fn capsules(&self) -> &[Position] {
        &self.capsules
    }

    /// Legal actions for the agent. The player may always `Stop`; ghosts
    /// keep moving and only turn back at dead ends. Decided games have no
    /// legal actions.
    pub fn legal_actions(&self, agent: usize) -> Vec<Action> {
        if self.status != Status::Playing || agent >= self.agents.len() {
            return Vec::new();
        }

        let here = self.agents[agent].position;
        let mut actions: Vec<Action> = Action::MOVES
            .iter()
            .copied()
            .filter(|&action| !self.layout.is_wall(here.offset(action)))
            .collect();

        if agent == PLAYER {
            actions.push(Action::Stop);
        } else if actions.len() > 1 {
            let reverse = self.agents[agent].heading.opposite();
            actions.retain(|&action| action != reverse);
        }

        actions
    }

    /// Applies one agent's action and returns the resulting state.
    pub fn generate_successor(&self, agent: usize, action: Action) -> Result<Self, InvalidMove> {
        if !self.legal_actions(agent).contains(&action) {
            return Err(InvalidMove { agent, action });
        }

        let mut next = self.clone();
        let dest = next.agents[agent].position.offset(action);
        next.agents[agent].position = dest;
        if action != Action::Stop {
            next.agents[agent].heading = action;
        }

        if agent == PLAYER {
            next.score -= TIME_PENALTY;
            next.resolve_player_collisions(dest);
            if next.status == Status::Playing {
                next.consume(dest);
            }
        } else {
            next.agents[agent].fright = next.agents[agent].fright.saturating_sub(1);
            if dest == next.agents[PLAYER].position {
                next.collide(agent);
            }
        }

        Ok(next)
    }

    fn resolve_player_collisions(&mut self, player_pos: Position) {
        for ghost in 1..self.agents.len() {
            if self.agents[ghost].position == player_pos {
                self.collide(ghost);
                if self.status == Status::Lost {
                    return;
                }
            }
        }
    }

    fn collide(&mut self, ghost: usize) {
        if self.agents[ghost].fright > 0 {
            self.score += GHOST_SCORE;
            let start = self.agents[ghost].start;
            self.agents[ghost].position = start;
            self.agents[ghost].heading = Action::Stop;
            self.agents[ghost].fright = 0;
        } else {
            self.score -= LOSE_PENALTY;
            self.status = Status::Lost;
        }
    }

    fn consume(&mut self, pos: Position) {
        if let Some(index) = self.cell_index(pos) {
            if self.pellets[index] {
                self.pellets[index] = false;
                self.pellets_left -= 1;
                self.score += PELLET_SCORE;
                if self.pellets_left == 0 {
                    self.score += WIN_SCORE;
                    self.status = Status::Won;
                }
                return;
            }
        }
        if let Some(i) = self.capsules.iter().position(|&c| c == pos) {
            self.capsules.swap_remove(i);
            for ghost in self.agents.iter_mut().skip(1) {
                ghost.fright = FRIGHT_MOVES;
            }
        }
    }

    fn cell_index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.layout.width || y >= self.layout.height {
            return None;
        }
        Some(y * self.layout.width + x)
    }
}
