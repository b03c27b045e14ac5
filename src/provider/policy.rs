//! Trained-policy provider
//!
//! Loads a linear policy over the feature view from a JSON artifact:
//!
//! ```json
//! { "weights": [[..9 floats..], [..], [..], [..]], "bias": [0.0, 0.0, 0.0, 0.0] }
//! ```
//!
//! Rows are scored in action order (up, right, down, left) and the highest
//! score wins. The engine never sees the artifact.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ActionProvider;
use crate::error::ProviderError;
use crate::game::{Action, Direction};
use crate::observation::{FeatureVector, Observation, ObservationKind, FEATURE_LEN};

/// Linear scoring of the feature vector, one row per heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPolicy {
    pub weights: [[f32; FEATURE_LEN]; 4],
    #[serde(default)]
    pub bias: [f32; 4],
}

impl LinearPolicy {
    /// Score every heading and return the best one
    pub fn choose(&self, features: &FeatureVector) -> Direction {
        let scores: Vec<f32> = self
            .weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, bias)| {
                row.iter()
                    .zip(features.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f32>()
                    + bias
            })
            .collect();

        let idx = argmax(&scores);
        Direction::ALL[idx]
    }
}

/// Index of the largest score; ties go to the earliest
fn argmax(scores: &[f32]) -> usize {
    scores
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, best_score), (idx, &score)| {
            if score > best_score {
                (idx, score)
            } else {
                (best, best_score)
            }
        })
        .0
}

pub struct PolicyProvider {
    policy: LinearPolicy,
}

impl PolicyProvider {
    pub fn new(policy: LinearPolicy) -> Self {
        Self { policy }
    }

    /// Load a policy artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy from {:?}", path))?;
        let policy: LinearPolicy = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse policy in {:?}", path))?;

        let finite = policy.weights.iter().flatten().all(|w| w.is_finite())
            && policy.bias.iter().all(|b| b.is_finite());
        if !finite {
            bail!("Policy in {:?} contains non-finite weights", path);
        }

        Ok(Self::new(policy))
    }
}

#[async_trait]
impl ActionProvider for PolicyProvider {
    fn name(&self) -> &'static str {
        "policy"
    }

    fn observation_kind(&self) -> Option<ObservationKind> {
        Some(ObservationKind::Features)
    }

    async fn next_action(&mut self, observation: &Observation) -> Result<Action, ProviderError> {
        match observation {
            Observation::Features(features) => Ok(Action::Move(self.policy.choose(features))),
            Observation::Grid(_) => Err(ProviderError::ObservationMismatch {
                expected: ObservationKind::Features.as_str(),
            }),
        }
    }
}
