//! Decision sources that supply the next heading each tick
//!
//! The episode loop only sees [`ActionProvider`]; which backend sits behind it
//! (keyboard, random walk, trained policy) is chosen through [`ProviderSpec`].

pub mod human;
pub mod policy;
pub mod random;

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

use crate::episode::PendingDirection;
use crate::error::ProviderError;
use crate::game::Action;
use crate::observation::{Observation, ObservationKind};

pub use human::HumanProvider;
pub use policy::{LinearPolicy, PolicyProvider};
pub use random::RandomProvider;

/// Capability that turns the latest observation into an action
///
/// The loop bounds every call with a timeout; a provider that errors or runs
/// late costs only its own tick, which is played as [`Action::Continue`].
#[async_trait]
pub trait ActionProvider: Send {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// View this provider needs; `None` accepts whatever the episode publishes
    fn observation_kind(&self) -> Option<ObservationKind> {
        None
    }

    async fn next_action(&mut self, observation: &Observation) -> Result<Action, ProviderError>;
}

/// Selection key plus parameters for building a provider
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSpec {
    /// Reads directions submitted through the episode controller
    Human,
    /// Uniform random walk
    Random { seed: Option<u64> },
    /// Linear policy loaded from a JSON artifact
    Policy { path: PathBuf },
}

impl ProviderSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderSpec::Human => "human",
            ProviderSpec::Random { .. } => "random",
            ProviderSpec::Policy { .. } => "policy",
        }
    }

    /// Construct the provider; fails if its backing resources are unavailable
    pub fn build(&self, pending: PendingDirection) -> Result<Box<dyn ActionProvider>> {
        let provider: Box<dyn ActionProvider> = match self {
            ProviderSpec::Human => Box::new(HumanProvider::new(pending)),
            ProviderSpec::Random { seed } => Box::new(RandomProvider::new(*seed)),
            ProviderSpec::Policy { path } => Box::new(PolicyProvider::load(path)?),
        };
        Ok(provider)
    }
}
