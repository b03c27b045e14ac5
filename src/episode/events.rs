use serde::{Deserialize, Serialize};

use crate::game::{CollisionType, GameState};
use crate::observation::{Observation, ObservationKind};

/// Payloads published to subscribers, one per tick plus terminal notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EpisodeEvent {
    StateUpdate {
        view: Observation,
        score: u32,
        heading: String,
    },
    EpisodeEnd {
        final_score: u32,
    },
    Error {
        message: String,
    },
}

impl EpisodeEvent {
    pub fn state_update(state: &GameState, kind: ObservationKind) -> Self {
        EpisodeEvent::StateUpdate {
            view: Observation::encode(state, kind),
            score: state.score,
            heading: state.snake.direction.label().to_string(),
        }
    }
}

/// Lifecycle of one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Idle,
    Running,
    Terminated,
}

/// Why an episode stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOutcome {
    Collision(CollisionType),
    Cancelled,
}

/// Returned by the episode task once it has released its provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub episode_id: u64,
    pub final_score: u32,
    pub steps: u32,
    pub outcome: EpisodeOutcome,
}
