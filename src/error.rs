//! Error types shared across the engine, providers and the episode control surface

use thiserror::Error;

/// Rejected game configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 3x3, got {width}x{height}")]
    DegenerateGrid { width: usize, height: usize },
    #[error("grid of {width}x{height} exceeds the limit of {max_cells} cells")]
    OversizedGrid {
        width: usize,
        height: usize,
        max_cells: usize,
    },
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("action timeout must be greater than zero")]
    ZeroActionTimeout,
    #[error("invalid reward configuration: {0}")]
    Rewards(&'static str),
}

/// Failure reported by an action provider while producing an action
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider expected a {expected} observation")]
    ObservationMismatch { expected: &'static str },
    #[error("provider failed: {0}")]
    Failed(String),
}

/// Errors returned by the episode control surface
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("an episode is already running")]
    AlreadyRunning,
    #[error("no episode is running")]
    NotRunning,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialize action provider: {0}")]
    ProviderInit(String),
}
