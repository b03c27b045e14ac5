use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use crate::error::ConfigError;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Heading actually applied after U-turn suppression
    pub effective_direction: Direction,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// Aside from food placement, which draws from the engine's own seeded RNG, `step`
/// is a pure function of the state and action it is given.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine, rejecting configurations an episode cannot run on
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    ///
    /// A single-segment snake starts at the grid centre heading right.
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(Position::new(center_x, center_y), Direction::Right, 1);
        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
        );
        state.food = self.spawn_food(&state);
        state
    }

    /// Execute one step of the game, mutating `state` in place
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        let current = state.snake.direction;

        if !state.is_alive {
            return StepResult {
                reward: 0.0,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                    effective_direction: current,
                },
            };
        }

        let requested = match action {
            Action::Move(direction) => direction,
            Action::Continue => current,
        };

        // U-turns are ignored once the snake has a body to turn into
        let direction = if state.snake.len() > 1 && current.is_opposite(requested) {
            current
        } else {
            requested
        };
        state.snake.direction = direction;

        let new_head = state.snake.head().moved_in_direction(direction);
        let ate_food = new_head == state.food;

        if let Some(collision_type) = self.check_collision(state, new_head, ate_food) {
            state.is_alive = false;
            state.steps += 1;

            let reward = match collision_type {
                CollisionType::Wall => self.config.rewards.wall,
                CollisionType::SelfCollision => self.config.rewards.body,
            };

            return StepResult {
                reward,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                    effective_direction: direction,
                },
            };
        }

        state.snake.advance_to(new_head, ate_food);

        let reward = if ate_food {
            state.score += 1;
            state.food = self.spawn_food(state);
            self.config.rewards.food
        } else {
            self.config.rewards.step
        };

        state.steps += 1;

        StepResult {
            reward,
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
                effective_direction: direction,
            },
        }
    }

    /// Functional form of [`GameEngine::step`]: returns the successor and leaves `state` untouched
    pub fn next_state(&mut self, state: &GameState, action: Action) -> (GameState, StepResult) {
        let mut next = state.clone();
        let result = self.step(&mut next, action);
        (next, result)
    }

    /// Check if the new head position causes a collision
    fn check_collision(
        &self,
        state: &GameState,
        pos: Position,
        growing: bool,
    ) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.blocks_move_into(pos, growing) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a random cell not covered by the snake
    ///
    /// Rejection sampling; if the snake fills the whole grid there is nowhere
    /// to put food and the previous cell is kept.
    fn spawn_food(&mut self, state: &GameState) -> Position {
        if state.free_cells() == 0 {
            return state.food;
        }

        loop {
            let x = self.rng.gen_range(0..state.grid_width) as i32;
            let y = self.rng.gen_range(0..state.grid_height) as i32;
            let pos = Position::new(x, y);

            if !state.is_occupied_by_snake(pos) {
                return pos;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::new(config.with_seed(42)).unwrap()
    }

    #[test]
    fn test_reset() {
        let mut engine = engine(GameConfig::default());
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.snake.direction, Direction::Right);
        assert!(!state.is_occupied_by_snake(state.food));
        assert!(state.is_in_bounds(state.food));
    }

    #[test]
    fn test_degenerate_grid_fails_fast() {
        let result = GameEngine::new(GameConfig::new(2, 2));
        assert!(matches!(result, Err(ConfigError::DegenerateGrid { .. })));
    }

    #[test]
    fn test_oversized_grid_fails_fast() {
        let result = GameEngine::new(GameConfig::new(usize::MAX, 3));
        assert!(matches!(result, Err(ConfigError::OversizedGrid { .. })));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.reset();
        state.food = Position::new(0, 0);
        let initial_head = state.snake.head();

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(result.reward, -0.01);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.head(), initial_head.moved_by(1, 0));
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.reset();

        let head = state.snake.head();
        state.food = head.moved_in_direction(Direction::Right);
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, Action::Move(Direction::Right));

        assert!(result.info.ate_food);
        assert_eq!(result.reward, 1.0);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert_eq!(state.snake.tail(), head);
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine(GameConfig::small());
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 3),
            Position::new(5, 5),
            10,
            10,
        );
        let body_before = state.snake.body.clone();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(result.reward, -1.0);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(state.snake.body, body_before);
    }

    #[test]
    fn test_wall_collision_from_center() {
        let mut engine = engine(GameConfig::default());
        let mut state = engine.reset();
        // Keep food off the path to the right wall
        state.food = Position::new(0, 0);

        let mut last = None;
        for _ in 0..20 {
            let result = engine.step(&mut state, Action::Move(Direction::Right));
            if result.terminated {
                last = Some(result);
                break;
            }
        }

        let result = last.expect("snake should reach the right wall");
        assert_eq!(result.reward, -1.0);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.head(), Position::new(19, 10));
        assert_eq!(state.steps, 10);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::small());

        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        engine.step(&mut state, Action::Move(Direction::Down));
        engine.step(&mut state, Action::Move(Direction::Left));
        // Up from (4,6) lands on (4,5), still mid-body
        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert!(result.terminated);
        assert_eq!(result.reward, -2.0);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(state.snake.head(), Position::new(4, 6));
    }

    #[test]
    fn test_following_own_tail_is_safe() {
        let mut engine = engine(GameConfig::small());
        let snake = Snake::from_body(
            vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
            ],
            Direction::Left,
        )
        .unwrap();
        let mut state = GameState::new(snake, Position::new(0, 0), 10, 10);

        let result = engine.step(&mut state, Action::Move(Direction::Down));

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(5, 6));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_moving_into_tail_while_eating_collides() {
        let mut engine = engine(GameConfig::small());
        let snake = Snake::from_body(
            vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
            ],
            Direction::Left,
        )
        .unwrap();
        let mut state = GameState::new(snake, Position::new(5, 6), 10, 10);

        let result = engine.step(&mut state, Action::Move(Direction::Down));

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(GameConfig::small());
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 2);
        let state = GameState::new(snake, Position::new(0, 0), 10, 10);

        let (reversed, reversed_result) =
            engine.next_state(&state, Action::Move(Direction::Left));
        let (straight, _) = engine.next_state(&state, Action::Continue);

        assert_eq!(reversed_result.info.effective_direction, Direction::Right);
        assert_eq!(reversed.snake.direction, Direction::Right);
        assert_eq!(reversed, straight);
    }

    #[test]
    fn test_single_segment_may_reverse() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.reset();
        state.food = Position::new(0, 0);

        let result = engine.step(&mut state, Action::Move(Direction::Left));

        assert!(!result.terminated);
        assert_eq!(state.snake.direction, Direction::Left);
        assert_eq!(state.snake.head(), Position::new(4, 5));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.reset();
        state.is_alive = false;
        let before = state.clone();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(result.reward, 0.0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_food_fills_last_free_cell() {
        let mut engine = engine(GameConfig::new(3, 3));
        // Snake covers all but (2,2); food sits there, head moves onto it
        let snake = Snake::from_body(
            vec![
                Position::new(2, 1),
                Position::new(2, 0),
                Position::new(1, 0),
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(0, 2),
            ],
            Direction::Down,
        )
        .unwrap();
        let mut state = GameState::new(snake, Position::new(2, 2), 3, 3);

        let result = engine.step(&mut state, Action::Move(Direction::Down));

        assert!(result.info.ate_food);
        assert_eq!(state.free_cells(), 0);
        assert_eq!(state.food, Position::new(2, 2));
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let mut a = engine(GameConfig::small());
        let mut b = engine(GameConfig::small());
        let mut state = a.reset();
        let _ = b.reset();
        state.food = state.snake.head().moved_by(1, 0);

        let (next_a, result_a) = a.next_state(&state, Action::Continue);
        let (next_b, result_b) = b.next_state(&state, Action::Continue);

        assert_eq!(next_a, next_b);
        assert_eq!(result_a, result_b);
    }
}
