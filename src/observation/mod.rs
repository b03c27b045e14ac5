//! Public views of a game state
//!
//! Two side-effect-free projections of [`GameState`]:
//! - a full occupancy matrix for rendering and visualization
//! - a fixed-length feature vector for decision sources that need fixed-size input

pub mod features;
pub mod grid;

use serde::{Deserialize, Serialize};

use crate::game::GameState;

pub use features::{encode_features, FeatureVector, FEATURE_LEN};
pub use grid::{encode_grid, GridView};

/// Which projection to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    Grid,
    #[default]
    Features,
}

impl ObservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationKind::Grid => "grid",
            ObservationKind::Features => "features",
        }
    }
}

/// One encoded view of the grid state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation {
    Grid(GridView),
    Features(FeatureVector),
}

impl Observation {
    /// Encode `state` with the requested projection
    pub fn encode(state: &GameState, kind: ObservationKind) -> Self {
        match kind {
            ObservationKind::Grid => Observation::Grid(encode_grid(state)),
            ObservationKind::Features => Observation::Features(encode_features(state)),
        }
    }

    pub fn kind(&self) -> ObservationKind {
        match self {
            Observation::Grid(_) => ObservationKind::Grid,
            Observation::Features(_) => ObservationKind::Features,
        }
    }
}
