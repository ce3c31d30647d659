//! Game state module - owns a whole game and drives it
//!
//! This module ties together the board, pieces, queue, hold slot and scoring. The host
//! feeds it discrete [`Command`]s and frame deltas through [`GameState::advance`]; it
//! never schedules anything itself.
//!
//! Every command is a silent no-op when it cannot apply (wrong phase, wall in the way,
//! hold already used). The only terminal outcome is a blocked spawn, which moves the
//! game to [`Phase::GameOver`].

use std::time::Duration;

use log::{debug, info, trace};

use crate::config::{ConfigError, GameConfig};
use crate::hold::{HoldOutcome, HoldSlot};
use crate::pieces::{get_shape, spawn_position, try_rotate, PieceShape};
use crate::scoring::{calculate_drop_score, calculate_level, calculate_line_score, get_drop_interval_ms};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;
use crate::{Board, PieceQueue};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at its spawn position
    pub fn new(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Check if every mino is inside the board and on an empty cell
    pub fn fits(&self, board: &Board) -> bool {
        board.can_place(self.kind, self.rotation, self.x, self.y)
    }

    fn shifted(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Rows the piece can still fall before it rests on something
    pub fn drop_distance(&self, board: &Board) -> i8 {
        let mut distance = 0;
        while self.shifted(0, distance + 1).fits(board) {
            distance += 1;
        }
        distance
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Option<Tetromino>,
    hold: HoldSlot,
    piece_queue: PieceQueue,
    phase: Phase,
    score: u32,
    level: u32,
    lines: u32,
    /// Elapsed gravity time not yet spent on a step
    gravity_acc: Duration,
    /// Last lock/line-clear event (consumed by observers).
    last_event: Option<LockEvent>,
}

impl GameState {
    /// Create a new game with the given RNG seed and the reference rules
    pub fn new(seed: u32) -> Self {
        Self::build(seed, GameConfig::default())
    }

    /// Create a new game with custom rules
    pub fn with_config(seed: u32, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(seed, config))
    }

    fn build(seed: u32, config: GameConfig) -> Self {
        let piece_queue = PieceQueue::new(seed, config.randomizer, config.preview_len);

        Self {
            config,
            board: Board::new(),
            active: None,
            hold: HoldSlot::new(),
            piece_queue,
            phase: Phase::NotStarted,
            score: 0,
            level: 1,
            lines: 0,
            gravity_acc: Duration::ZERO,
            last_event: None,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.phase != Phase::NotStarted {
            return;
        }
        self.phase = Phase::Running;
        info!("game started");
        self.spawn_from_queue();
    }

    /// Throw the current game away and return to a fresh, not-started game.
    ///
    /// The rules are kept; the piece sequence continues from the current RNG state so
    /// consecutive games differ.
    pub fn reset(&mut self) {
        let seed = self.piece_queue.seed();
        info!(
            "game reset (phase={}, score={}, lines={})",
            self.phase.as_str(),
            self.score,
            self.lines
        );
        *self = Self::build(seed, self.config.clone());
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold.kind()
    }

    /// True once hold has been used for the current piece
    pub fn hold_locked(&self) -> bool {
        self.hold.is_locked()
    }

    pub fn next_queue(&self) -> &[PieceKind] {
        self.piece_queue.preview()
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for hosts that set up puzzles or garbage before play.
    ///
    /// `None` once the game has started; the active piece must never overlap the stack.
    pub fn board_mut(&mut self) -> Option<&mut Board> {
        match self.phase {
            Phase::NotStarted => Some(&mut self.board),
            Phase::Running | Phase::GameOver => None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current gravity interval
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(get_drop_interval_ms(self.level, &self.config.gravity) as u64)
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.hold = self.hold.kind();
        out.hold_locked = self.hold.is_locked();
        out.next_queue.clear();
        out.next_queue
            .extend(self.piece_queue.preview().iter().copied());
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.phase = self.phase;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Draw the next kind from the queue and spawn it
    fn spawn_from_queue(&mut self) -> bool {
        let kind = self.piece_queue.draw();
        self.spawn(kind)
    }

    /// Place `kind` at its spawn position, or end the game if that is blocked
    fn spawn(&mut self, kind: PieceKind) -> bool {
        let piece = Tetromino::new(kind);
        self.gravity_acc = Duration::ZERO;

        if !piece.fits(&self.board) {
            self.active = None;
            self.phase = Phase::GameOver;
            info!(
                "game over: {} blocked at spawn (score={}, lines={}, level={})",
                kind.as_str(),
                self.score,
                self.lines,
                self.level
            );
            return false;
        }

        debug!("spawned {} at ({}, {})", kind.as_str(), piece.x, piece.y);
        self.active = Some(piece);
        true
    }

    /// Move the active piece by (dx, dy) if the target is free
    pub(crate) fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let moved = active.shifted(dx, dy);
        if !moved.fits(&self.board) {
            return false;
        }
        self.active = Some(moved);
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Move down one row. Never locks; gravity and hard drop do that.
    pub fn soft_drop(&mut self) -> bool {
        let moved = self.try_move(0, 1);
        if moved && self.config.drop_scoring {
            self.score = self.score.saturating_add(calculate_drop_score(1, false));
        }
        moved
    }

    /// Rotate with kicks; the piece is untouched if no candidate fits
    pub fn rotate(&mut self, dir: RotationDirection) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let result = try_rotate(
            self.config.rotation_system,
            active.kind,
            active.rotation,
            active.x,
            active.y,
            dir,
            |x, y| self.board.is_free(x, y),
        );

        match result {
            Some((rotation, x, y)) => {
                self.active = Some(Tetromino {
                    rotation,
                    x,
                    y,
                    ..active
                });
                true
            }
            None => false,
        }
    }

    /// Drop the active piece to the bottom and lock it.
    ///
    /// The lock, line clear and next spawn all finish before this returns.
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let distance = active.drop_distance(&self.board);
        self.active = Some(active.shifted(0, distance));
        if self.config.drop_scoring {
            self.score = self
                .score
                .saturating_add(calculate_drop_score(distance as u32, true));
        }

        self.lock_piece();
        true
    }

    /// Swap the active piece with the hold slot (once per piece)
    pub fn hold(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match self.hold.hold(active.kind) {
            HoldOutcome::Blocked => false,
            HoldOutcome::Stored => {
                debug!("held {}", active.kind.as_str());
                self.spawn_from_queue();
                true
            }
            HoldOutcome::Swapped(previous) => {
                debug!(
                    "held {}, swapped in {}",
                    active.kind.as_str(),
                    previous.as_str()
                );
                self.spawn(previous);
                true
            }
        }
    }

    /// Lock the active piece onto the board, clear rows, score, and spawn the next piece
    fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board
            .lock_piece(active.kind, active.rotation, active.x, active.y);

        let cleared_rows = self.board.clear_full_rows();
        let lines_cleared = cleared_rows.len() as u32;

        // One scoring event per lock, priced at the level before the clear.
        let points = calculate_line_score(cleared_rows.len(), self.level);
        self.score = self.score.saturating_add(points);

        if lines_cleared > 0 {
            self.lines += lines_cleared;
            let new_level = calculate_level(self.lines, self.config.gravity.lines_per_level);
            if new_level > self.level {
                self.level = new_level;
                info!(
                    "level {} reached, gravity {:?}/row",
                    self.level,
                    self.step_interval()
                );
            }
            debug!(
                "cleared rows {:?} (+{} points, {} lines total)",
                cleared_rows.as_slice(),
                points,
                self.lines
            );
        }

        debug!(
            "locked {} at ({}, {}) rotation {}",
            active.kind.as_str(),
            active.x,
            active.y,
            active.rotation.as_str()
        );

        self.last_event = Some(LockEvent {
            lines_cleared,
            points,
            level: self.level,
        });

        self.hold.unlock();
        self.spawn_from_queue();
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        Some(active.y + active.drop_distance(&self.board))
    }

    /// One gravity step: fall a row, or lock if resting
    fn gravity_step(&mut self) {
        if self.try_move(0, 1) {
            trace!("gravity step");
        } else {
            self.lock_piece();
        }
    }

    /// Advance the gravity clock by one frame's elapsed time.
    ///
    /// `dt` is clamped to `max_frame_ms` first, so a stalled host cannot trigger a burst
    /// of catch-up steps.
    pub fn advance(&mut self, dt: Duration) {
        if !self.is_running() {
            return;
        }

        let max_frame = Duration::from_millis(self.config.gravity.max_frame_ms as u64);
        self.gravity_acc += dt.min(max_frame);

        loop {
            let interval = self.step_interval();
            if !self.is_running() || self.gravity_acc < interval {
                break;
            }
            self.gravity_acc -= interval;
            self.gravity_step();
        }
    }

    /// [`GameState::advance`] for hosts that count frame time in seconds.
    /// Negative or NaN deltas count as zero.
    pub fn advance_secs(&mut self, secs: f64) {
        let dt = match Duration::try_from_secs_f64(secs) {
            Ok(dt) => dt,
            Err(_) if secs > 0.0 => Duration::MAX,
            Err(_) => Duration::ZERO,
        };
        self.advance(dt);
    }

    /// Apply a player command
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::RotateCw => self.rotate(RotationDirection::Clockwise),
            Command::RotateCcw => self.rotate(RotationDirection::CounterClockwise),
            Command::Hold => self.hold(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::RotationSystem;

    /// Running game whose active piece is `kind` at its spawn position
    fn running_with(kind: PieceKind) -> GameState {
        let mut state = GameState::new(12345);
        state.start();
        state.active = Some(Tetromino::new(kind));
        state
    }

    fn fill_row_except(board: &mut Board, y: i8, gaps: &[i8]) {
        for x in 0..BOARD_WIDTH as i8 {
            if !gaps.contains(&x) {
                board.set(x, y, Some(PieceKind::Z));
            }
        }
    }

    fn block_spawn_area(board: &mut Board) {
        for y in 0..2 {
            for x in 3..7 {
                board.set(x, y, Some(PieceKind::J));
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert_eq!(state.phase, Phase::NotStarted);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert!(state.active.is_none());
        assert!(state.hold.kind().is_none());
        assert!(!state.hold.is_locked());
        assert_eq!(state.next_queue().len(), 1);
    }

    #[test]
    fn test_game_start() {
        let mut state = GameState::new(12345);
        let next = state.next_queue()[0];

        state.start();
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.active.unwrap().kind, next);
        assert_eq!(state.active.unwrap().rotation, Rotation::North);

        // Second start is ignored.
        let before = state.snapshot();
        state.start();
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_commands_before_start_are_noops() {
        let mut state = GameState::new(12345);
        let before = state.snapshot();
        for cmd in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::HardDrop,
            Command::RotateCw,
            Command::RotateCcw,
            Command::Hold,
        ] {
            assert!(!state.apply(cmd));
        }
        state.advance(Duration::from_secs(5));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_tetromino_new_is_centered() {
        let piece = Tetromino::new(PieceKind::O);
        assert_eq!((piece.x, piece.y), (4, 0));
        assert_eq!(piece.rotation, Rotation::North);

        let piece = Tetromino::new(PieceKind::T);
        assert_eq!((piece.x, piece.y), (3, 0));
    }

    #[test]
    fn test_o_piece_hard_drop_on_empty_board() {
        let mut state = running_with(PieceKind::O);

        assert!(state.hard_drop());

        let board = state.board();
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(board.get(x, y), Some(Some(PieceKind::O)));
        }
        assert_eq!(board.filled_count(), 4);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert_eq!(
            state.take_last_event(),
            Some(LockEvent {
                lines_cleared: 0,
                points: 0,
                level: 1
            })
        );
        // A new piece took over.
        assert!(state.active.is_some());
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_move_left_at_wall_is_noop() {
        let mut state = running_with(PieceKind::O);
        state.active = Some(Tetromino {
            x: 0,
            ..Tetromino::new(PieceKind::O)
        });

        assert!(!state.move_left());
        assert_eq!(state.active.unwrap().x, 0);
        assert!(state.move_right());
        assert_eq!(state.active.unwrap().x, 1);
    }

    #[test]
    fn test_walls_stop_repeated_moves() {
        let mut state = running_with(PieceKind::T);
        let moved = (0..10).filter(|_| state.move_left()).count();
        // Spawn at x=3 with the leftmost mino in box column 0.
        assert_eq!(moved, 3);
        assert_eq!(state.active.unwrap().x, 0);
    }

    #[test]
    fn test_rotate_cw_then_ccw_restores_piece() {
        for kind in PieceKind::ALL {
            let mut state = running_with(kind);
            state.active = Some(Tetromino {
                y: 8,
                ..Tetromino::new(kind)
            });
            let before = state.active.unwrap();

            assert!(state.rotate(RotationDirection::Clockwise));
            assert_eq!(state.active.unwrap().rotation, Rotation::East);
            assert!(state.rotate(RotationDirection::CounterClockwise));
            assert_eq!(state.active.unwrap(), before);
        }
    }

    #[test]
    fn test_rotation_kicks_off_right_wall() {
        let mut state = running_with(PieceKind::I);
        // East keeps the bar in box column 2, so x=7 puts it against the right wall.
        state.active = Some(Tetromino {
            kind: PieceKind::I,
            rotation: Rotation::East,
            x: 7,
            y: 5,
        });

        assert!(state.rotate(RotationDirection::Clockwise));
        let active = state.active.unwrap();
        assert_eq!(active.rotation, Rotation::South);
        // +1 makes it worse, -1 fits.
        assert_eq!((active.x, active.y), (6, 5));
    }

    #[test]
    fn test_rotation_tries_origin_first() {
        let mut state = running_with(PieceKind::T);
        state.active = Some(Tetromino {
            x: 4,
            y: 10,
            ..Tetromino::new(PieceKind::T)
        });
        assert!(state.rotate(RotationDirection::CounterClockwise));
        let active = state.active.unwrap();
        assert_eq!((active.rotation, active.x, active.y), (Rotation::West, 4, 10));
    }

    #[test]
    fn test_blocked_rotation_leaves_piece_unchanged() {
        let mut state = running_with(PieceKind::T);
        let piece = Tetromino {
            x: 3,
            y: 10,
            ..Tetromino::new(PieceKind::T)
        };
        state.active = Some(piece);

        // Fill everything except the piece's own cells.
        let own: Vec<(i8, i8)> = piece
            .shape()
            .iter()
            .map(|&(dx, dy)| (piece.x + dx, piece.y + dy))
            .collect();
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if !own.contains(&(x, y)) {
                    state.board.set(x, y, Some(PieceKind::L));
                }
            }
        }

        assert!(!state.rotate(RotationDirection::Clockwise));
        assert!(!state.rotate(RotationDirection::CounterClockwise));
        assert_eq!(state.active.unwrap(), piece);
    }

    #[test]
    fn test_srs_rotation_system() {
        let config = GameConfig {
            rotation_system: RotationSystem::Srs,
            ..GameConfig::default()
        };
        let mut state = GameState::with_config(7, config).unwrap();
        state.start();
        state.active = Some(Tetromino {
            kind: PieceKind::I,
            rotation: Rotation::East,
            x: 7,
            y: 5,
        });

        // E->S for I tries (0,0), then (-1,0) which fits.
        assert!(state.rotate(RotationDirection::Clockwise));
        let active = state.active.unwrap();
        assert_eq!((active.rotation, active.x, active.y), (Rotation::South, 6, 5));
    }

    #[test]
    fn test_two_line_clear_is_one_event() {
        let mut state = running_with(PieceKind::O);
        fill_row_except(&mut state.board, 19, &[0, 1]);
        fill_row_except(&mut state.board, 18, &[0, 1]);
        state.board.set(5, 17, Some(PieceKind::T));
        state.board.set(9, 16, Some(PieceKind::S));
        state.active = Some(Tetromino {
            x: 0,
            ..Tetromino::new(PieceKind::O)
        });

        assert!(state.hard_drop());

        assert_eq!(
            state.take_last_event(),
            Some(LockEvent {
                lines_cleared: 2,
                points: 100,
                level: 1
            })
        );
        assert_eq!(state.lines, 2);
        assert_eq!(state.score, 100);
        // Survivors moved down by two, in order.
        assert_eq!(state.board.get(5, 19), Some(Some(PieceKind::T)));
        assert_eq!(state.board.get(9, 18), Some(Some(PieceKind::S)));
        assert_eq!(state.board.filled_count(), 2);
    }

    #[test]
    fn test_single_line_clear_keeps_upper_half_of_piece() {
        let mut state = running_with(PieceKind::O);
        fill_row_except(&mut state.board, 19, &[0, 1]);
        state.active = Some(Tetromino {
            x: 0,
            ..Tetromino::new(PieceKind::O)
        });

        state.hard_drop();

        assert_eq!(state.lines, 1);
        assert_eq!(state.level, calculate_level(1, 10));
        assert_eq!(state.score, 40);
        // Top half of the O dropped into row 19.
        assert_eq!(state.board.get(0, 19), Some(Some(PieceKind::O)));
        assert_eq!(state.board.get(1, 19), Some(Some(PieceKind::O)));
        assert_eq!(state.board.filled_count(), 2);
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        let mut state = running_with(PieceKind::O);
        state.lines = 9;
        assert_eq!(state.step_interval(), Duration::from_millis(1000));

        fill_row_except(&mut state.board, 19, &[0, 1]);
        state.active = Some(Tetromino {
            x: 0,
            ..Tetromino::new(PieceKind::O)
        });
        state.hard_drop();

        assert_eq!(state.lines, 10);
        assert_eq!(state.level, 2);
        // Priced at the level before the clear.
        assert_eq!(state.score, 40);
        assert_eq!(state.step_interval(), Duration::from_millis(900));
    }

    #[test]
    fn test_hold_stores_and_spawns_from_queue() {
        let mut state = running_with(PieceKind::T);
        let next = state.next_queue()[0];

        assert!(state.hold());
        assert_eq!(state.hold.kind(), Some(PieceKind::T));
        assert!(state.hold.is_locked());
        assert_eq!(state.active.unwrap(), Tetromino::new(next));
    }

    #[test]
    fn test_second_hold_is_noop() {
        let mut state = running_with(PieceKind::T);
        assert!(state.hold());
        let after_first = state.snapshot();

        assert!(!state.hold());
        assert_eq!(state.snapshot(), after_first);
    }

    #[test]
    fn test_hold_swap_respawns_held_kind() {
        let mut state = running_with(PieceKind::T);
        state.hold();
        state.hard_drop();
        assert!(!state.hold.is_locked());

        let current = state.active.unwrap().kind;
        // Move the current piece so the swap visibly resets position and rotation.
        state.move_left();
        state.rotate(RotationDirection::Clockwise);

        assert!(state.hold());
        assert_eq!(state.active.unwrap(), Tetromino::new(PieceKind::T));
        assert_eq!(state.hold.kind(), Some(current));
        // Swapping does not release the lock.
        assert!(state.hold.is_locked());
        assert!(!state.hold());
    }

    #[test]
    fn test_spawn_blocked_on_start() {
        let mut state = GameState::new(12345);
        block_spawn_area(&mut state.board);
        let before = state.board.clone();

        state.start();

        assert_eq!(state.phase, Phase::GameOver);
        assert!(state.active.is_none());
        assert_eq!(state.board, before);
    }

    #[test]
    fn test_spawn_blocked_after_lock() {
        let mut state = running_with(PieceKind::O);
        block_spawn_area(&mut state.board);
        state.active = Some(Tetromino {
            x: 0,
            ..Tetromino::new(PieceKind::O)
        });
        let mut expected = state.board.clone();
        expected.lock_piece(PieceKind::O, Rotation::North, 0, 18);

        state.hard_drop();

        assert_eq!(state.phase, Phase::GameOver);
        assert!(state.active.is_none());
        assert_eq!(state.board, expected);
    }

    #[test]
    fn test_hold_swap_blocked_ends_game() {
        let mut state = running_with(PieceKind::O);
        state.hold.hold(PieceKind::I);
        state.hold.unlock();
        state.active = Some(Tetromino {
            x: 0,
            ..Tetromino::new(PieceKind::O)
        });
        block_spawn_area(&mut state.board);

        assert!(state.hold());
        assert_eq!(state.phase, Phase::GameOver);
        assert!(state.active.is_none());
    }

    #[test]
    fn test_gravity_fixed_step() {
        let mut state = running_with(PieceKind::T);
        let y0 = state.active.unwrap().y;

        for _ in 0..62 {
            state.advance(Duration::from_millis(16));
        }
        assert_eq!(state.active.unwrap().y, y0);

        state.advance(Duration::from_millis(16));
        assert_eq!(state.active.unwrap().y, y0 + 1);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut state = running_with(PieceKind::T);
        let y0 = state.active.unwrap().y;

        state.advance(Duration::from_secs(10));
        assert_eq!(state.active.unwrap().y, y0);

        for _ in 0..19 {
            state.advance(Duration::from_millis(50));
        }
        assert_eq!(state.active.unwrap().y, y0 + 1);
    }

    #[test]
    fn test_advance_secs_matches_advance() {
        let mut a = running_with(PieceKind::T);
        let mut b = a.clone();
        // 1/32 s is exact in binary, so both sides see 31.25ms frames.
        for _ in 0..100 {
            a.advance(Duration::from_micros(31_250));
            b.advance_secs(0.03125);
        }
        assert_eq!(a.active.unwrap().y, 3);
        assert_eq!(a.active, b.active);

        // Garbage deltas do nothing.
        let before = b.active;
        b.advance_secs(-1.0);
        b.advance_secs(f64::NAN);
        assert_eq!(b.active, before);
    }

    #[test]
    fn test_gravity_locks_resting_piece() {
        let mut state = running_with(PieceKind::O);
        state.active = Some(Tetromino {
            y: 18,
            ..Tetromino::new(PieceKind::O)
        });

        for _ in 0..20 {
            state.advance(Duration::from_millis(50));
        }

        assert_eq!(state.board.get(4, 19), Some(Some(PieceKind::O)));
        assert!(state.take_last_event().is_some());
        assert_eq!(state.active.unwrap().y, 0);
    }

    #[test]
    fn test_soft_drop_never_locks() {
        let mut state = running_with(PieceKind::O);
        state.active = Some(Tetromino {
            y: 18,
            ..Tetromino::new(PieceKind::O)
        });

        assert!(!state.soft_drop());
        assert_eq!(state.active.unwrap().y, 18);
        assert_eq!(state.board.filled_count(), 0);
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_ghost_y() {
        let mut state = running_with(PieceKind::O);
        assert_eq!(state.ghost_y(), Some(18));
        // Pure projection.
        assert_eq!(state.active.unwrap().y, 0);

        state.board.set(4, 10, Some(PieceKind::S));
        assert_eq!(state.ghost_y(), Some(8));
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = GameState::new(12345);
        block_spawn_area(&mut state.board);
        state.start();
        assert!(state.game_over());

        let before = state.snapshot();
        state.advance(Duration::from_millis(50));
        assert!(!state.apply(Command::HardDrop));
        assert!(!state.apply(Command::Hold));
        state.start();
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_reset_returns_to_pristine() {
        let mut state = running_with(PieceKind::O);
        state.hold();
        state.hard_drop();
        state.score = 500;
        state.lines = 12;
        state.level = 2;

        state.reset();

        assert_eq!(state.phase, Phase::NotStarted);
        assert_eq!(state.board.filled_count(), 0);
        assert!(state.active.is_none());
        assert!(state.hold.kind().is_none());
        assert!(!state.hold.is_locked());
        assert_eq!((state.score, state.lines, state.level), (0, 0, 1));
        assert!(state.take_last_event().is_none());

        state.start();
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_drop_scoring_option() {
        let config = GameConfig {
            drop_scoring: true,
            ..GameConfig::default()
        };
        let mut state = GameState::with_config(3, config).unwrap();
        state.start();
        state.active = Some(Tetromino::new(PieceKind::O));

        assert!(state.soft_drop());
        assert_eq!(state.score, 1);
        state.hard_drop();
        // 17 more rows down to y=18.
        assert_eq!(state.score, 1 + 34);
    }

    #[test]
    fn test_drop_scoring_saturates() {
        let config = GameConfig {
            drop_scoring: true,
            ..GameConfig::default()
        };
        let mut state = GameState::with_config(3, config).unwrap();
        state.start();
        state.active = Some(Tetromino::new(PieceKind::O));
        state.score = u32::MAX - 1;

        assert!(state.soft_drop());
        assert_eq!(state.score, u32::MAX);
        assert!(state.soft_drop());
        assert_eq!(state.score, u32::MAX);
        state.hard_drop();
        assert_eq!(state.score, u32::MAX);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = GameConfig {
            preview_len: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            GameState::with_config(1, config).unwrap_err(),
            ConfigError::PreviewLen(0)
        );
    }

    #[test]
    fn test_snapshot_reports_state() {
        let mut state = running_with(PieceKind::O);
        state.hold();
        let snap = state.snapshot();

        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.hold, Some(PieceKind::O));
        assert!(snap.hold_locked);
        assert_eq!(snap.next_queue.as_slice(), state.next_queue());
        assert_eq!(snap.active, state.active.map(ActiveSnapshot::from));
        assert_eq!(snap.ghost_y, state.ghost_y());
        assert_eq!(snap.level, 1);
    }
}
