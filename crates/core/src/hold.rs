//! Hold buffer - one stored piece kind plus a once-per-piece usage lock.
//!
//! The lock engages on every successful hold and is released only by the game state
//! when a piece locks into the board and the next one spawns from the queue. A
//! hold-triggered swap never releases it.

use crate::types::PieceKind;

/// Result of a hold request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// Already used for this piece; nothing changed
    Blocked,
    /// Slot was empty; the caller spawns a fresh piece from the queue
    Stored,
    /// Slot held this kind; the caller re-spawns it as the active piece
    Swapped(PieceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoldSlot {
    kind: Option<PieceKind>,
    locked: bool,
}

impl HoldSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<PieceKind> {
        self.kind
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Put `current` aside, returning what the caller must do next
    pub fn hold(&mut self, current: PieceKind) -> HoldOutcome {
        if self.locked {
            return HoldOutcome::Blocked;
        }
        self.locked = true;
        match self.kind.replace(current) {
            Some(previous) => HoldOutcome::Swapped(previous),
            None => HoldOutcome::Stored,
        }
    }

    /// Release the lock for a piece that spawned after a lock
    pub fn unlock(&mut self) {
        self.locked = false;
    }
}
