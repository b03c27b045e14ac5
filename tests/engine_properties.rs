use std::collections::HashSet;

use proptest::prelude::*;
use snake_stream::game::{Action, GameConfig, GameEngine, GameState, StepResult};

fn engine(width: usize, height: usize, seed: u64) -> GameEngine {
    GameEngine::new(GameConfig::new(width, height).with_seed(seed)).unwrap()
}

/// Raw action values including garbage outside 0..4
fn raw_actions() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-2i64..8, 1..300)
}

fn play(width: usize, height: usize, seed: u64, actions: &[i64]) -> Vec<(GameState, StepResult)> {
    let mut engine = engine(width, height, seed);
    let mut state = engine.reset();
    let mut trajectory = Vec::new();
    for &raw in actions {
        let result = engine.step(&mut state, Action::from_index(raw));
        let terminated = result.terminated;
        trajectory.push((state.clone(), result));
        if terminated {
            break;
        }
    }
    trajectory
}

proptest! {
    #[test]
    fn body_is_always_a_simple_path(
        seed in any::<u64>(),
        width in 3usize..12,
        height in 3usize..12,
        actions in raw_actions(),
    ) {
        for (state, result) in play(width, height, seed, &actions) {
            let body = &state.snake.body;

            let unique: HashSet<_> = body.iter().collect();
            prop_assert_eq!(unique.len(), body.len());

            for pair in body.windows(2) {
                let step = (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs();
                prop_assert_eq!(step, 1);
            }

            prop_assert!(body.iter().all(|&pos| state.is_in_bounds(pos)));
            prop_assert_eq!(state.is_alive, !result.terminated);
        }
    }

    #[test]
    fn food_never_lands_on_the_snake(
        seed in any::<u64>(),
        width in 3usize..8,
        height in 3usize..8,
        actions in raw_actions(),
    ) {
        for (state, _) in play(width, height, seed, &actions) {
            if state.free_cells() > 0 {
                prop_assert!(!state.is_occupied_by_snake(state.food));
            }
            prop_assert!(state.is_in_bounds(state.food));
        }
    }

    #[test]
    fn reversal_keeps_previous_heading(
        seed in any::<u64>(),
        actions in raw_actions(),
    ) {
        let mut engine = engine(10, 10, seed);
        let mut state = engine.reset();

        for raw in actions {
            let previous = state.snake.direction;
            let long = state.snake.len() > 1;
            let action = Action::from_index(raw);

            let result = engine.step(&mut state, action);

            match action {
                Action::Move(requested) if long && requested == previous.opposite() => {
                    prop_assert_eq!(result.info.effective_direction, previous);
                }
                Action::Move(requested) => {
                    prop_assert_eq!(result.info.effective_direction, requested);
                }
                Action::Continue => {
                    prop_assert_eq!(result.info.effective_direction, previous);
                }
            }

            if result.terminated {
                break;
            }
        }
    }

    #[test]
    fn same_seed_same_trajectory(
        seed in any::<u64>(),
        actions in raw_actions(),
    ) {
        let first = play(8, 8, seed, &actions);
        let second = play(8, 8, seed, &actions);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn rewards_match_outcome(
        seed in any::<u64>(),
        actions in raw_actions(),
    ) {
        let rewards = GameConfig::default().rewards;
        let mut previous_score = 0;

        for (state, result) in play(6, 6, seed, &actions) {
            if result.terminated {
                prop_assert!(result.reward == rewards.wall || result.reward == rewards.body);
                prop_assert_eq!(state.score, previous_score);
            } else if result.info.ate_food {
                prop_assert_eq!(result.reward, rewards.food);
                prop_assert_eq!(state.score, previous_score + 1);
            } else {
                prop_assert_eq!(result.reward, rewards.step);
                prop_assert_eq!(state.score, previous_score);
            }
            previous_score = state.score;
        }
    }
}
