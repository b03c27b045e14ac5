//! CLI run modes
//!
//! Both modes publish the episode event stream to stdout as one JSON object per line.

pub mod human;
pub mod stream;

pub use human::HumanMode;
pub use stream::StreamMode;

use std::io::Write;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::episode::EpisodeEvent;

/// Forward every event to stdout until the channel closes
///
/// `line_ending` is `"\r\n"` while the terminal is in raw mode.
pub(crate) fn spawn_event_writer(
    mut events: broadcast::Receiver<EpisodeEvent>,
    line_ending: &'static str,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(err) = write_event(&event, line_ending) {
                        warn!(error = %err, "Failed to write event, stopping writer");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event writer fell behind, frames dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn write_event(event: &EpisodeEvent, line_ending: &str) -> anyhow::Result<()> {
    let line = serde_json::to_string(event)?;
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{line}{line_ending}")?;
    stdout.flush()?;
    Ok(())
}
