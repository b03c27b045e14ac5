//! Snake Stream - a grid snake simulation streamed to observers in real time
//!
//! This library provides:
//! - Core game logic (game module)
//! - Grid and feature views of the game state (observation module)
//! - Interchangeable decision sources (provider module)
//! - The tick/broadcast episode loop and its control surface (episode module)
//! - Keyboard input mapping and CLI run modes (input, modes modules)

pub mod episode;
pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod observation;
pub mod provider;
