//! Real-time episode loop
//!
//! An [`Episode`] owns one grid state and advances it on a fixed tick,
//! publishing a view of the state after every step. [`EpisodeController`] is
//! the surface a transport drives: start, steer, cancel and subscribe.

pub mod controller;
pub mod events;
pub mod pending;
pub mod runner;

pub use controller::EpisodeController;
pub use events::{EpisodeEvent, EpisodeOutcome, EpisodeStatus, EpisodeSummary};
pub use pending::PendingDirection;
pub use runner::Episode;
