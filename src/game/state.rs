use serde::{Deserialize, Serialize};

use super::action::Direction;

/// Cell coordinate; `x` grows rightwards, `y` grows downwards
///
/// Signed so a head that has just left the grid is still representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }

    /// Neighbouring cell one step towards `direction`
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Ordered cells of the snake plus its current heading
///
/// `body[0]` is the head and the last entry is the tail. Consecutive cells are
/// orthogonally adjacent and no cell repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub body: Vec<Position>,
    /// Heading applied on the last tick
    pub direction: Direction,
}

impl Snake {
    /// Straight snake of `length` cells trailing behind `head`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|offset| head.moved_by(-dx * offset, -dy * offset))
            .collect();
        Self { body, direction }
    }

    /// Snake with explicit segments, head first; `None` for an empty body
    pub fn from_body(body: Vec<Position>, direction: Direction) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        Some(Self { body, direction })
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Everything behind the head
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Whether moving the head onto `pos` runs into the snake
    ///
    /// Unless the snake grows this tick its tail cell is vacated as the head
    /// moves, so the tail does not count.
    pub fn blocks_move_into(&self, pos: Position, growing: bool) -> bool {
        let keep = if growing {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body[..keep].contains(&pos)
    }

    /// Push `new_head` to the front; the tail is dropped unless `grow`
    pub fn advance_to(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// What ended an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionType {
    /// Head left the grid
    Wall,
    /// Head entered a cell still held by the body
    SelfCollision,
}

/// The single mutable record of one episode
///
/// Owned by whoever drives the episode; observers only ever see encoded views.
/// Once `is_alive` is false the state is frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    /// Ticks applied so far
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let columns = 0..self.grid_width as i32;
        let rows = 0..self.grid_height as i32;
        columns.contains(&pos.x) && rows.contains(&pos.y)
    }

    /// Whether any snake cell, tail included, sits on `pos`
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    /// Cells available for food
    pub fn free_cells(&self) -> usize {
        self.grid_width
            .saturating_mul(self.grid_height)
            .saturating_sub(self.snake.len())
    }
}
