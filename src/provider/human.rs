use async_trait::async_trait;

use super::ActionProvider;
use crate::episode::PendingDirection;
use crate::error::ProviderError;
use crate::game::Action;
use crate::observation::Observation;

/// Plays whatever direction was submitted most recently since the last tick
pub struct HumanProvider {
    pending: PendingDirection,
}

impl HumanProvider {
    pub fn new(pending: PendingDirection) -> Self {
        Self { pending }
    }
}

#[async_trait]
impl ActionProvider for HumanProvider {
    fn name(&self) -> &'static str {
        "human"
    }

    async fn next_action(&mut self, _observation: &Observation) -> Result<Action, ProviderError> {
        Ok(self
            .pending
            .take()
            .map(Action::Move)
            .unwrap_or(Action::Continue))
    }
}
