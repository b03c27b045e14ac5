use crate::game::{Direction, GameState, Position};

/// Length of the compact feature vector, independent of grid size
pub const FEATURE_LEN: usize = 9;

/// `[danger_ahead, danger_left, danger_right, food_dx, food_dy, dir_right, dir_down, dir_left, dir_up]`
pub type FeatureVector = [f32; FEATURE_LEN];

/// One-hot slot order for the current heading
const HEADING_SLOTS: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

/// Encode the head's neighbourhood and the relative food position
///
/// The side probes use the heading vector `(dx, dy)` rotated as `(-dy, dx)` for
/// the left slot and `(dy, -dx)` for the right slot. With `y` growing downwards
/// that puts "left" of a right-heading snake below it; trained policies depend
/// on this exact layout. Food offsets are divided by the grid dimension, so they
/// fall roughly within [-1, 1].
pub fn encode_features(state: &GameState) -> FeatureVector {
    let head = state.snake.head();
    let heading = state.snake.direction;
    let (dx, dy) = heading.delta();

    let danger = |cell: Position| -> f32 {
        if is_danger(state, cell) {
            1.0
        } else {
            0.0
        }
    };

    let mut features = [0.0; FEATURE_LEN];
    features[0] = danger(head.moved_by(dx, dy));
    features[1] = danger(head.moved_by(-dy, dx));
    features[2] = danger(head.moved_by(dy, -dx));
    features[3] = (state.food.x - head.x) as f32 / state.grid_width as f32;
    features[4] = (state.food.y - head.y) as f32 / state.grid_height as f32;

    if let Some(slot) = HEADING_SLOTS.iter().position(|&d| d == heading) {
        features[5 + slot] = 1.0;
    }

    features
}

fn is_danger(state: &GameState, cell: Position) -> bool {
    !state.is_in_bounds(cell) || state.is_occupied_by_snake(cell)
}
