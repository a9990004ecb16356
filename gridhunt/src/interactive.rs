use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent},
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
    ExecutableCommand,
};
use gridhunt_agents::{Agent, RandomAgent};
use gridhunt_core::{Action, GameState, Layout, Position, PLAYER};
use std::io::{self, Write};

pub struct InteractiveGame {
    state: GameState,
    ghosts: Vec<RandomAgent>,
    message: String,
}

impl InteractiveGame {
    pub fn new(layout: Layout) -> Self {
        let state = GameState::new(layout);
        let ghosts = (1..state.num_agents()).map(RandomAgent::for_agent).collect();
        Self {
            state,
            ghosts,
            message: String::from("Use hjkl or arrows to move, space to wait, q to quit"),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(Hide)?;
        stdout.execute(Clear(ClearType::All))?;

        let result = self.game_loop();

        // Cleanup
        stdout.execute(Show)?;
        terminal::disable_raw_mode()?;
        stdout.execute(Clear(ClearType::All))?;
        stdout.execute(MoveTo(0, 0))?;

        result
    }

    fn game_loop(&mut self) -> io::Result<()> {
        loop {
            self.draw()?;

            if self.state.is_win() || self.state.is_lose() {
                self.message = if self.state.is_win() {
                    format!("Board cleared! Final score: {:.0}", self.state.score())
                } else {
                    format!("Caught! Final score: {:.0}", self.state.score())
                };
                self.draw()?;
                event::read()?; // Wait for any key
                break;
            }

            let action = match event::read()? {
                Event::Key(KeyEvent { code, .. }) => match code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Up | KeyCode::Char('k') => Some(Action::North),
                    KeyCode::Down | KeyCode::Char('j') => Some(Action::South),
                    KeyCode::Left | KeyCode::Char('h') => Some(Action::West),
                    KeyCode::Right | KeyCode::Char('l') => Some(Action::East),
                    KeyCode::Char(' ') => Some(Action::Stop),
                    _ => None,
                },
                _ => None,
            };

            let action = match action {
                Some(action) => action,
                None => continue,
            };

            if !self.state.legal_actions(PLAYER).contains(&action) {
                self.message = String::from("A wall is in the way");
                continue;
            }

            self.advance(action)?;
        }

        Ok(())
    }

    /// Applies the player's move, then one reply from every ghost.
    fn advance(&mut self, action: Action) -> io::Result<()> {
        self.state = apply(&self.state, PLAYER, action)?;
        self.message.clear();

        for (i, ghost) in self.ghosts.iter_mut().enumerate() {
            if self.state.is_win() || self.state.is_lose() {
                break;
            }
            let reply = ghost
                .choose_action(&self.state)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            self.state = apply(&self.state, i + 1, reply)?;
        }

        Ok(())
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.execute(MoveTo(0, 0))?;

        let layout = self.state.layout();
        for y in 0..layout.height {
            for x in 0..layout.width {
                let pos = Position::new(x as i32, y as i32);
                let (symbol, color) = self.cell(pos);
                stdout.execute(SetForegroundColor(color))?;
                stdout.execute(Print(symbol))?;
            }
            stdout.execute(Print("\r\n"))?;
        }

        stdout.execute(ResetColor)?;
        stdout.execute(Clear(ClearType::UntilNewLine))?;
        stdout.execute(Print(format!(
            "Score: {:.0}   Pellets left: {}\r\n",
            self.state.score(),
            self.state.pellets_left()
        )))?;
        stdout.execute(Clear(ClearType::UntilNewLine))?;
        stdout.execute(Print(format!("{}\r\n", self.message)))?;
        stdout.flush()?;

        Ok(())
    }

    fn cell(&self, pos: Position) -> (char, TermColor) {
        if self.state.agent_position(PLAYER) == pos {
            return ('@', TermColor::Yellow);
        }
        for ghost in 1..self.state.num_agents() {
            if self.state.agent_position(ghost) == pos {
                return if self.state.fright_moves(ghost) > 0 {
                    ('G', TermColor::Cyan)
                } else {
                    ('G', TermColor::Red)
                };
            }
        }
        if self.state.layout().is_wall(pos) {
            ('%', TermColor::DarkBlue)
        } else if self.state.has_pellet(pos) {
            ('.', TermColor::White)
        } else if self.state.capsules().contains(&pos) {
            ('o', TermColor::Magenta)
        } else {
            (' ', TermColor::Reset)
        }
    }
}

fn apply(state: &GameState, agent: usize, action: Action) -> io::Result<GameState> {
    state
        .generate_successor(agent, action)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}
