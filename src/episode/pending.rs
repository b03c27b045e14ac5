use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::game::Direction;

const EMPTY: u8 = 0;

/// Single-slot, last-write-wins mailbox for direction changes between ticks
///
/// Writers and the tick that reads it only ever exchange one byte, so a tick
/// sees either the previous value or the new one, never a mix.
#[derive(Debug, Clone, Default)]
pub struct PendingDirection {
    slot: Arc<AtomicU8>,
}

impl PendingDirection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite whatever is pending
    pub fn submit(&self, direction: Direction) {
        self.slot.store(encode(direction), Ordering::Release);
    }

    /// Take the pending direction, leaving the slot empty
    pub fn take(&self) -> Option<Direction> {
        decode(self.slot.swap(EMPTY, Ordering::AcqRel))
    }

    pub fn peek(&self) -> Option<Direction> {
        decode(self.slot.load(Ordering::Acquire))
    }

    pub fn clear(&self) {
        self.slot.store(EMPTY, Ordering::Release);
    }
}

fn encode(direction: Direction) -> u8 {
    direction.index() as u8 + 1
}

fn decode(raw: u8) -> Option<Direction> {
    match raw {
        EMPTY => None,
        n => Direction::ALL.get(usize::from(n) - 1).copied(),
    }
}
