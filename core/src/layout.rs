use crate::types::Position;
use std::fmt;

/// Layout parsing error types.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    Empty,
    Ragged { row: usize, expected: usize, got: usize },
    UnknownTile { tile: char, x: usize, y: usize },
    MissingPlayer,
    DuplicatePlayer,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Empty => write!(f, "Layout text is empty"),
            LayoutError::Ragged { row, expected, got } => {
                write!(f, "Row {row} has {got} tiles, expected {expected}")
            }
            LayoutError::UnknownTile { tile, x, y } => {
                write!(f, "Unknown tile '{tile}' at ({x}, {y})")
            }
            LayoutError::MissingPlayer => write!(f, "Layout has no player start ('P')"),
            LayoutError::DuplicatePlayer => write!(f, "Layout has more than one player start"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// A static board description: walls plus the initial placement of
/// pellets, capsules and agents. Parsed from ASCII text where `%` is a
/// wall, `.` a pellet, `o` a capsule, `P` the player start, `G` a ghost
/// start and a space an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    walls: Vec<bool>,
    pub pellets: Vec<Position>,
    pub capsules: Vec<Position>,
    pub player_start: Position,
    pub ghost_starts: Vec<Position>,
}

impl Layout {
    /// Parses a layout from ASCII text. Rows must all have the same width
    /// and exactly one player start must be present. Only newlines around
    /// the text are stripped; an interior all-space row is a real row of
    /// empty cells.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = text.trim_matches('\n').lines().collect();

        if rows.is_empty() {
            return Err(LayoutError::Empty);
        }

        let width = rows[0].chars().count();
        let height = rows.len();
        let mut walls = vec![false; width * height];
        let mut pellets = Vec::new();
        let mut capsules = Vec::new();
        let mut player_start = None;
        let mut ghost_starts = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let got = row.chars().count();
            if got != width {
                return Err(LayoutError::Ragged {
                    row: y,
                    expected: width,
                    got,
                });
            }

            for (x, tile) in row.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                match tile {
                    '%' => walls[y * width + x] = true,
                    '.' => pellets.push(pos),
                    'o' => capsules.push(pos),
                    'P' => {
                        if player_start.is_some() {
                            return Err(LayoutError::DuplicatePlayer);
                        }
                        player_start = Some(pos);
                    }
                    'G' => ghost_starts.push(pos),
                    ' ' => {}
                    _ => return Err(LayoutError::UnknownTile { tile, x, y }),
                }
            }
        }

        let player_start = player_start.ok_or(LayoutError::MissingPlayer)?;

        Ok(Layout {
            width,
            height,
            walls,
            pellets,
            capsules,
            player_start,
            ghost_starts,
        })
    }

    /// Returns true if the cell is a wall. Cells outside the board count
    /// as walls so movement checks need no separate bounds test.
    pub fn is_wall(&self, pos: Position) -> bool {
        if pos.x < 0 || pos.y < 0 {
            return true;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return true;
        }
        self.walls[y * self.width + x]
    }

    /// Total number of agents this layout starts: the player plus ghosts.
    pub fn num_agents(&self) -> usize {
        1 + self.ghost_starts.len()
    }
}

/// Built-in boards, usable by name from the command line.
pub mod layouts {
    /// Tiny board for quick games and tests: one ghost, one capsule-free loop.
    pub const MINI: &str = "\
%%%%%%%
%P . G%
%.%%%.%
%.....%
%%%%%%%";

    /// Two ghosts in a central pen, capsules in the side pockets.
    pub const SMALL: &str = "\
%%%%%%%%%%%%%%%%%%%%
%......%G  G%......%
%.%%...%%  %%...%%.%
%.%o.%........%.o%.%
%.%%.%.%%%%%%.%.%%.%
%........P.........%
%%%%%%%%%%%%%%%%%%%%";

    /// Full-size board with corner capsules.
    pub const MEDIUM: &str = "\
%%%%%%%%%%%%%%%%%%%%
%o...%........%...o%
%.%%.%.%%%%%%.%.%%.%
%.%..............%.%
%.%.%%.%%  %%.%%.%.%
%......%G  G%......%
%.%.%%.%%%%%%.%%.%.%
%.%..............%.%
%.%%.%.%%%%%%.%.%%.%
%....%...P....%....%
%%%%%%%%%%%%%%%%%%%%";

    /// Looks up a built-in layout by name.
    pub fn named(name: &str) -> Option<&'static str> {
        match name {
            "mini" => Some(MINI),
            "small" => Some(SMALL),
            "medium" => Some(MEDIUM),
            _ => None,
        }
    }

    /// Names of all built-in layouts.
    pub const NAMES: [&str; 3] = ["mini", "small", "medium"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mini() {
        let layout = Layout::parse(layouts::MINI).unwrap();
        assert_eq!(layout.width, 7);
        assert_eq!(layout.height, 5);
        assert_eq!(layout.player_start, Position::new(1, 1));
        assert_eq!(layout.ghost_starts, vec![Position::new(5, 1)]);
        assert_eq!(layout.num_agents(), 2);
        assert_eq!(layout.pellets.len(), 8);
        assert!(layout.capsules.is_empty());
    }

    #[test]
    fn test_walls_and_bounds() {
        let layout = Layout::parse(layouts::MINI).unwrap();
        assert!(layout.is_wall(Position::new(0, 0)));
        assert!(!layout.is_wall(Position::new(1, 1)));
        assert!(layout.is_wall(Position::new(-1, 2)));
        assert!(layout.is_wall(Position::new(100, 2)));
    }

    #[test]
    fn test_all_builtins_parse() {
        for name in layouts::NAMES {
            let text = layouts::named(name).unwrap();
            let layout = Layout::parse(text).unwrap();
            assert!(layout.num_agents() >= 1, "layout {name} has no agents");
            assert!(!layout.pellets.is_empty(), "layout {name} has no pellets");
        }
    }

    #[test]
    fn test_open_interior_rows_are_kept() {
        let layout = Layout::parse("%%%\n%P%\n   \n%.%\n%%%").unwrap();
        assert_eq!(layout.height, 5);
        assert!(!layout.is_wall(Position::new(1, 2)));
        assert_eq!(layout.pellets, vec![Position::new(1, 3)]);
    }

    #[test]
    fn test_surrounding_newlines_are_stripped() {
        let layout = Layout::parse("\n%%%%\n%P.%\n%%%%\n").unwrap();
        assert_eq!(layout.height, 3);
        assert_eq!(layout.player_start, Position::new(1, 1));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Layout::parse("%%%\n%P%\n%%").unwrap_err();
        assert_eq!(
            err,
            LayoutError::Ragged {
                row: 2,
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_unknown_tile_rejected() {
        let err = Layout::parse("%%%\n%X%\n%%%").unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownTile {
                tile: 'X',
                x: 1,
                y: 1
            }
        );
    }

    #[test]
    fn test_player_start_required_and_unique() {
        assert_eq!(
            Layout::parse("%%%\n%.%\n%%%").unwrap_err(),
            LayoutError::MissingPlayer
        );
        assert_eq!(
            Layout::parse("%%%%\n%PP%\n%%%%").unwrap_err(),
            LayoutError::DuplicatePlayer
        );
    }
}
