use arrayvec::ArrayVec;
use serde::Serialize;

use crate::game_state::Tetromino;
use crate::types::{Cell, PieceKind, Phase, Rotation, BOARD_HEIGHT, BOARD_WIDTH, MAX_PREVIEW};

/// Board rows top to bottom, as the renderer reads them
pub type BoardGrid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

/// Read-only view of a game, refreshed by `GameState::snapshot_into`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Locked cells only; the active piece is reported separately
    pub board: BoardGrid,
    pub active: Option<ActiveSnapshot>,
    /// Origin row the active piece would land on if hard-dropped now
    pub ghost_y: Option<i8>,
    pub hold: Option<PieceKind>,
    pub hold_locked: bool,
    pub next_queue: ArrayVec<PieceKind, MAX_PREVIEW>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub phase: Phase,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Board cells with the active piece drawn in, for hosts that paint one grid
    pub fn composed_board(&self) -> BoardGrid {
        let mut grid = self.board;
        if let Some(active) = self.active {
            for (dx, dy) in crate::pieces::get_shape(active.kind, active.rotation) {
                let (x, y) = (active.x + dx, active.y + dy);
                if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                    grid[y as usize][x as usize] = Some(active.kind);
                }
            }
        }
        grid
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            hold: None,
            hold_locked: false,
            next_queue: ArrayVec::new(),
            score: 0,
            level: 1,
            lines: 0,
            phase: Phase::NotStarted,
        }
    }
}
