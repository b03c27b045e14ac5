use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::events::{EpisodeEvent, EpisodeOutcome, EpisodeStatus, EpisodeSummary};
use super::pending::PendingDirection;
use super::runner::Episode;
use crate::error::ControlError;
use crate::game::{Direction, GameConfig};
use crate::metrics::SessionMetrics;
use crate::provider::ProviderSpec;

struct ActiveEpisode {
    id: u64,
    status: watch::Receiver<EpisodeStatus>,
    cancel: Arc<Notify>,
    handle: Option<JoinHandle<EpisodeSummary>>,
}

/// Control surface for one session: at most one running episode at a time
///
/// Every episode gets its own grid state, engine and provider; only the event
/// channel, the pending-direction slot and the session tally outlive it.
/// `start_episode` spawns onto the current tokio runtime.
pub struct EpisodeController {
    events: broadcast::Sender<EpisodeEvent>,
    pending: PendingDirection,
    metrics: Arc<Mutex<SessionMetrics>>,
    active: Option<ActiveEpisode>,
    next_id: u64,
}

impl EpisodeController {
    /// `capacity` bounds how many events a slow subscriber may lag behind
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            events,
            pending: PendingDirection::new(),
            metrics: Arc::new(Mutex::new(SessionMetrics::new())),
            active: None,
            next_id: 1,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EpisodeEvent> {
        self.events.subscribe()
    }

    pub fn status(&self) -> EpisodeStatus {
        self.active
            .as_ref()
            .map_or(EpisodeStatus::Idle, |active| *active.status.borrow())
    }

    /// Id of the current (or most recent) episode
    pub fn episode_id(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.id)
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Start a fresh episode with the given provider and configuration
    ///
    /// Rejected while another episode is running. Configuration and provider
    /// failures are also published as an `error` event; no grid state is
    /// created for them.
    pub fn start_episode(
        &mut self,
        spec: &ProviderSpec,
        config: GameConfig,
    ) -> Result<u64, ControlError> {
        if self.status() == EpisodeStatus::Running {
            warn!(provider = spec.kind(), "Rejected episode start: one is already running");
            return Err(ControlError::AlreadyRunning);
        }

        if let Err(err) = config.validate() {
            self.publish_error(err.to_string());
            return Err(err.into());
        }

        self.pending.clear();
        let provider = match spec.build(self.pending.clone()) {
            Ok(provider) => provider,
            Err(err) => {
                let message = format!("{err:#}");
                warn!(provider = spec.kind(), error = %message, "Provider initialization failed");
                self.publish_error(message.clone());
                return Err(ControlError::ProviderInit(message));
            }
        };

        let id = self.next_id;
        self.next_id += 1;
        let episode = Episode::new(id, config, provider)?;

        let (status_tx, status_rx) = watch::channel(EpisodeStatus::Running);
        let cancel = Arc::new(Notify::new());
        let events = self.events.clone();
        let metrics = Arc::clone(&self.metrics);
        let task_cancel = Arc::clone(&cancel);

        let handle = tokio::spawn(async move {
            let summary = episode.run(events, task_cancel, status_tx).await;
            if let EpisodeOutcome::Collision(_) = summary.outcome {
                metrics
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .on_episode_end(summary.final_score);
            }
            summary
        });

        info!(episode = id, provider = spec.kind(), "Episode scheduled");
        self.active = Some(ActiveEpisode {
            id,
            status: status_rx,
            cancel,
            handle: Some(handle),
        });
        Ok(id)
    }

    /// Queue a heading for the next tick; later calls before that tick replace it
    pub fn submit_direction(&self, direction: Direction) -> Result<(), ControlError> {
        if self.status() != EpisodeStatus::Running {
            return Err(ControlError::NotRunning);
        }
        self.pending.submit(direction);
        Ok(())
    }

    /// Stop the running episode at its next suspension point
    pub fn cancel_episode(&self) -> Result<(), ControlError> {
        match &self.active {
            Some(active) if *active.status.borrow() == EpisodeStatus::Running => {
                info!(episode = active.id, "Cancelling episode");
                active.cancel.notify_one();
                Ok(())
            }
            _ => Err(ControlError::NotRunning),
        }
    }

    /// Wait for the current episode's task to finish
    ///
    /// Returns `None` if there is no episode or it was already joined.
    /// Cancel-safe: if this future is dropped the episode can still be joined later.
    pub async fn join(&mut self) -> Option<EpisodeSummary> {
        let active = self.active.as_mut()?;
        let result = active.handle.as_mut()?.await;
        active.handle = None;
        match result {
            Ok(summary) => Some(summary),
            Err(err) => {
                warn!(error = %err, "Episode task did not complete");
                None
            }
        }
    }

    fn publish_error(&self, message: String) {
        let _ = self.events.send(EpisodeEvent::Error { message });
    }
}

impl Drop for EpisodeController {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            active.cancel.notify_one();
        }
    }
}
