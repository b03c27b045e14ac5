//! Headless streaming mode
//!
//! Runs a fixed number of episodes back to back with a non-interactive
//! provider (random walk or trained policy) and streams every frame to stdout.

use anyhow::{Context, Result};
use tracing::info;

use super::spawn_event_writer;
use crate::episode::EpisodeController;
use crate::game::GameConfig;
use crate::provider::ProviderSpec;

/// Events a slow stdout may lag behind before frames are dropped
const EVENT_CAPACITY: usize = 1024;

pub struct StreamMode {
    config: GameConfig,
    spec: ProviderSpec,
    episodes: usize,
}

impl StreamMode {
    pub fn new(config: GameConfig, spec: ProviderSpec, episodes: usize) -> Self {
        Self {
            config,
            spec,
            episodes: episodes.max(1),
        }
    }

    /// Config for the `index`-th episode
    ///
    /// A fixed seed is offset per episode so consecutive episodes differ but the
    /// whole run stays reproducible.
    fn episode_config(&self, index: usize) -> GameConfig {
        let mut config = self.config.clone();
        config.seed = config.seed.map(|seed| seed.wrapping_add(index as u64));
        config
    }

    /// Provider for the `index`-th episode; a seeded random walk gets the same offset
    fn episode_spec(&self, index: usize) -> ProviderSpec {
        match &self.spec {
            ProviderSpec::Random { seed } => ProviderSpec::Random {
                seed: seed.map(|seed| seed.wrapping_add(index as u64)),
            },
            spec => spec.clone(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut controller = EpisodeController::new(EVENT_CAPACITY);
        let writer = spawn_event_writer(controller.subscribe(), "\n");

        for index in 0..self.episodes {
            controller
                .start_episode(&self.episode_spec(index), self.episode_config(index))
                .context("Failed to start episode")?;

            tokio::select! {
                summary = controller.join() => {
                    if let Some(summary) = summary {
                        info!(
                            episode = summary.episode_id,
                            score = summary.final_score,
                            steps = summary.steps,
                            "Episode finished"
                        );
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    // Already finished episodes have nothing left to cancel
                    let _ = controller.cancel_episode();
                    controller.join().await;
                    break;
                }
            }
        }

        info!("{}", controller.metrics().format_summary());

        drop(controller);
        writer.await.context("Event writer task failed")?;
        Ok(())
    }
}
