use serde::{Deserialize, Serialize};

use crate::game::{GameState, Position};

pub const EMPTY: u8 = 0;
pub const BODY: u8 = 1;
pub const FOOD: u8 = 2;
pub const HEAD: u8 = 3;
/// Head of a snake that has collided; marks terminal frames
pub const DEAD_HEAD: u8 = 4;

/// Occupancy matrix indexed `[row][column]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridView(pub Vec<Vec<u8>>);

impl GridView {
    pub fn rows(&self) -> usize {
        self.0.len()
    }

    pub fn columns(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }

    /// Cell value at `pos`, `None` outside the grid
    pub fn get(&self, pos: Position) -> Option<u8> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.0
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
            .copied()
    }

    fn set(&mut self, pos: Position, value: u8) {
        if pos.x < 0 || pos.y < 0 {
            return;
        }
        if let Some(cell) = self
            .0
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
        {
            *cell = value;
        }
    }
}

/// Project the state onto a rows × columns matrix
///
/// Body segments are written first, then food, then the head, so the head tag
/// always wins.
pub fn encode_grid(state: &GameState) -> GridView {
    let mut grid = GridView(vec![vec![EMPTY; state.grid_width]; state.grid_height]);

    for &pos in state.snake.body_segments() {
        grid.set(pos, BODY);
    }
    grid.set(state.food, FOOD);

    let head = if state.is_alive { HEAD } else { DEAD_HEAD };
    grid.set(state.snake.head(), head);

    grid
}
