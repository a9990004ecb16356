use std::fmt;

/// A move available to an agent on the grid.
/// `Stop` is the no-op: the agent keeps its current cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    North,
    South,
    East,
    West,
    Stop,
}

impl Action {
    /// The four movement actions, excluding `Stop`.
    pub const MOVES: [Action; 4] = [Action::North, Action::South, Action::East, Action::West];

    /// Returns the unit grid offset for this action as (dx, dy).
    /// The y axis grows downward, matching layout text order.
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Action::North => (0, -1),
            Action::South => (0, 1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
            Action::Stop => (0, 0),
        }
    }

    /// Returns the reverse of this action. `Stop` reverses to itself.
    pub const fn opposite(self) -> Self {
        match self {
            Action::North => Action::South,
            Action::South => Action::North,
            Action::East => Action::West,
            Action::West => Action::East,
            Action::Stop => Action::Stop,
        }
    }

    /// Returns true for the no-op action.
    pub const fn is_stop(self) -> bool {
        matches!(self, Action::Stop)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::North => "North",
            Action::South => "South",
            Action::East => "East",
            Action::West => "West",
            Action::Stop => "Stop",
        };
        write!(f, "{name}")
    }
}

/// A cell coordinate on the grid. x is the column, y the row from the top.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Returns the cell reached by taking `action` from this cell.
    pub const fn offset(self, action: Action) -> Self {
        let (dx, dy) = action.vector();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance between two cells.
    pub const fn distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_vectors_are_units() {
        for action in Action::MOVES {
            let (dx, dy) = action.vector();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
        assert_eq!(Action::Stop.vector(), (0, 0));
    }

    #[test]
    fn test_opposite_round_trip() {
        for action in Action::MOVES {
            assert_eq!(action.opposite().opposite(), action);
            assert_ne!(action.opposite(), action);
        }
        assert_eq!(Action::Stop.opposite(), Action::Stop);
    }

    #[test]
    fn test_offset_and_distance() {
        let origin = Position::new(3, 3);
        assert_eq!(origin.offset(Action::North), Position::new(3, 2));
        assert_eq!(origin.offset(Action::East), Position::new(4, 3));
        assert_eq!(origin.offset(Action::Stop), origin);

        assert_eq!(origin.distance(Position::new(6, 1)), 5);
        assert_eq!(origin.distance(origin), 0);
    }
}
