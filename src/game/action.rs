use serde::{Deserialize, Serialize};

/// Direction the snake can move
///
/// Grid coordinates grow rightwards in `x` and downwards in `y`, so `Up` is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All headings in action-index order (up, right, down, left)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// The exact reverse heading
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Heading after a quarter turn to the snake's left
    pub fn rotate_left(&self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// Heading after a quarter turn to the snake's right
    pub fn rotate_right(&self) -> Direction {
        self.rotate_left().opposite()
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Lowercase label used in published events
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }

    /// Index in action order (0 = up, 1 = right, 2 = down, 3 = left)
    pub fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }
}

/// Action that can be taken in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move in a specific direction
    Move(Direction),
    /// Continue in current direction
    Continue,
}

impl Action {
    /// Convert a raw discrete action value to an `Action`
    ///
    /// - 0 → Move Up
    /// - 1 → Move Right
    /// - 2 → Move Down
    /// - 3 → Move Left
    /// - other → Continue
    pub fn from_index(idx: i64) -> Self {
        match idx {
            0 => Action::Move(Direction::Up),
            1 => Action::Move(Direction::Right),
            2 => Action::Move(Direction::Down),
            3 => Action::Move(Direction::Left),
            _ => Action::Continue,
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Move(direction)
    }
}
