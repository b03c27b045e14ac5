//! Keyboard-driven mode
//!
//! Arrow keys / WASD steer, R starts a new episode once the current one is over,
//! Q / Esc / Ctrl+C quit. Frames go to stdout while the terminal is in raw mode.

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures::StreamExt;
use tracing::{debug, info};

use super::spawn_event_writer;
use crate::episode::{EpisodeController, EpisodeStatus};
use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::provider::ProviderSpec;

const EVENT_CAPACITY: usize = 256;

pub struct HumanMode {
    config: GameConfig,
    controller: EpisodeController,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            controller: EpisodeController::new(EVENT_CAPACITY),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let writer = spawn_event_writer(self.controller.subscribe(), "\r\n");

        enable_raw_mode().context("Failed to enable raw mode")?;
        let result = self.run_session().await;
        disable_raw_mode().context("Failed to disable raw mode")?;

        info!("{}", self.controller.metrics().format_summary());
        writer.abort();
        result
    }

    async fn run_session(&mut self) -> Result<()> {
        self.controller
            .start_episode(&ProviderSpec::Human, self.config.clone())
            .context("Failed to start episode")?;

        let mut event_stream = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event)?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.quit(),
                    }
                }
                _ = tokio::signal::ctrl_c() => self.quit(),
            }
        }

        self.controller.join().await;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => {
                if self.controller.submit_direction(direction).is_err() {
                    debug!(?direction, "Ignoring direction, no episode running");
                }
            }
            KeyAction::Restart => {
                if self.controller.status() != EpisodeStatus::Running {
                    self.controller
                        .start_episode(&ProviderSpec::Human, self.config.clone())
                        .context("Failed to restart episode")?;
                }
            }
            KeyAction::Quit => self.quit(),
            KeyAction::None => {}
        }

        Ok(())
    }

    fn quit(&mut self) {
        // Nothing to cancel if the episode already ended
        let _ = self.controller.cancel_episode();
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_drive_the_controller() {
        let mut mode = HumanMode::new(GameConfig::default().with_seed(1));
        mode.controller
            .start_episode(&ProviderSpec::Human, mode.config.clone())
            .unwrap();

        mode.handle_event(key(KeyCode::Up)).unwrap();
        assert_eq!(mode.controller.status(), EpisodeStatus::Running);

        // Restart is ignored while running
        let id = mode.controller.episode_id();
        mode.handle_event(key(KeyCode::Char('r'))).unwrap();
        assert_eq!(mode.controller.episode_id(), id);

        mode.handle_event(key(KeyCode::Char('q'))).unwrap();
        assert!(mode.should_quit);
        mode.controller.join().await;
        assert_eq!(mode.controller.status(), EpisodeStatus::Terminated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_episode_ends() {
        let mut mode = HumanMode::new(GameConfig::default().with_seed(1));
        mode.controller
            .start_episode(&ProviderSpec::Human, mode.config.clone())
            .unwrap();
        mode.controller.cancel_episode().unwrap();
        mode.controller.join().await;

        mode.handle_event(key(KeyCode::Char('r'))).unwrap();
        assert_eq!(mode.controller.episode_id(), Some(2));
        assert_eq!(mode.controller.status(), EpisodeStatus::Running);
        mode.quit();
        mode.controller.join().await;
    }
}
