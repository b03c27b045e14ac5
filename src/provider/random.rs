use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ActionProvider;
use crate::error::ProviderError;
use crate::game::{Action, Direction};
use crate::observation::Observation;

/// Random walk over the four headings
pub struct RandomProvider {
    rng: StdRng,
}

impl RandomProvider {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

#[async_trait]
impl ActionProvider for RandomProvider {
    fn name(&self) -> &'static str {
        "random"
    }

    async fn next_action(&mut self, _observation: &Observation) -> Result<Action, ProviderError> {
        let idx = self.rng.gen_range(0..Direction::ALL.len());
        Ok(Action::Move(Direction::ALL[idx]))
    }
}
