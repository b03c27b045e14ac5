use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Notify};
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::events::{EpisodeEvent, EpisodeOutcome, EpisodeStatus, EpisodeSummary};
use crate::error::ConfigError;
use crate::game::{Action, GameConfig, GameEngine, GameState};
use crate::observation::{Observation, ObservationKind};
use crate::provider::ActionProvider;

/// One live episode: a grid state, the engine that advances it and the
/// provider that steers it
pub struct Episode {
    id: u64,
    engine: GameEngine,
    state: GameState,
    provider: Box<dyn ActionProvider>,
    observation: ObservationKind,
    tick_interval: Duration,
    action_timeout: Duration,
}

impl Episode {
    /// Build a fresh episode; degenerate configurations are rejected before any state exists
    pub fn new(
        id: u64,
        config: GameConfig,
        provider: Box<dyn ActionProvider>,
    ) -> Result<Self, ConfigError> {
        let observation = config.observation;
        let tick_interval = config.tick_interval();
        let action_timeout = config.action_timeout();

        let mut engine = GameEngine::new(config)?;
        let state = engine.reset();

        Ok(Self {
            id,
            engine,
            state,
            provider,
            observation,
            tick_interval,
            action_timeout,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Drive the episode until collision or cancellation
    ///
    /// Each tick waits for the interval, asks the provider for an action, steps
    /// the engine and publishes the new view before the next tick can begin.
    /// Both waits give way to `cancel`. Cancelling publishes nothing further.
    pub async fn run(
        mut self,
        events: broadcast::Sender<EpisodeEvent>,
        cancel: Arc<Notify>,
        status: watch::Sender<EpisodeStatus>,
    ) -> EpisodeSummary {
        status.send_replace(EpisodeStatus::Running);
        info!(
            episode = self.id,
            provider = self.provider.name(),
            width = self.state.grid_width,
            height = self.state.grid_height,
            "Episode started"
        );

        // No subscribers is fine; the frame is simply dropped
        let _ = events.send(EpisodeEvent::state_update(&self.state, self.observation));

        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.notified() => break EpisodeOutcome::Cancelled,
                _ = ticker.tick() => {}
            }

            let action = tokio::select! {
                biased;
                _ = cancel.notified() => break EpisodeOutcome::Cancelled,
                action = self.request_action() => action,
            };

            let result = self.engine.step(&mut self.state, action);
            debug!(
                episode = self.id,
                tick = self.state.steps,
                reward = result.reward,
                score = self.state.score,
                heading = result.info.effective_direction.label(),
                "Tick"
            );

            let _ = events.send(EpisodeEvent::state_update(&self.state, self.observation));

            if result.terminated {
                let _ = events.send(EpisodeEvent::EpisodeEnd {
                    final_score: self.state.score,
                });
                match result.info.collision_type {
                    Some(collision) => break EpisodeOutcome::Collision(collision),
                    // Only a dead state steps to termination without a collision
                    None => break EpisodeOutcome::Cancelled,
                }
            }
        };

        let summary = EpisodeSummary {
            episode_id: self.id,
            final_score: self.state.score,
            steps: self.state.steps,
            outcome,
        };

        match outcome {
            EpisodeOutcome::Collision(collision) => info!(
                episode = self.id,
                score = summary.final_score,
                steps = summary.steps,
                ?collision,
                "Episode ended"
            ),
            EpisodeOutcome::Cancelled => info!(
                episode = self.id,
                score = summary.final_score,
                steps = summary.steps,
                "Episode cancelled"
            ),
        }

        status.send_replace(EpisodeStatus::Terminated);
        summary
    }

    /// Ask the provider for this tick's action, degrading to `Continue` on error or timeout
    async fn request_action(&mut self) -> Action {
        let kind = self.provider.observation_kind().unwrap_or(self.observation);
        let observation = Observation::encode(&self.state, kind);

        match timeout(self.action_timeout, self.provider.next_action(&observation)).await {
            Ok(Ok(action)) => action,
            Ok(Err(err)) => {
                warn!(
                    episode = self.id,
                    provider = self.provider.name(),
                    error = %err,
                    "Provider failed, continuing straight"
                );
                Action::Continue
            }
            Err(_) => {
                warn!(
                    episode = self.id,
                    provider = self.provider.name(),
                    timeout_ms = self.action_timeout.as_millis() as u64,
                    "Provider timed out, continuing straight"
                );
                Action::Continue
            }
        }
    }
}
