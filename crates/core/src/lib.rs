//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the falling-block engine and nothing else: no
//! rendering, no input devices, no clocks. A host owns a [`GameState`], forwards
//! player [`Command`](types::Command)s to it, calls [`GameState::advance`] once per
//! frame, and reads a [`GameSnapshot`] to draw.
//!
//! - **Deterministic**: the same seed and inputs replay the same game
//! - **Zero-allocation hot paths**: board, queue and snapshot are fixed-size
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with placement checks and atomic line clearing
//! - [`pieces`]: shape table, spawn rule and the kick resolver
//! - [`hold`]: single hold slot with its once-per-piece lock
//! - [`rng`]: seeded uniform / 7-bag piece queue with preview
//! - [`scoring`]: line-clear points and the level/speed curve
//! - [`config`]: tunable rules and their validation
//! - [`game_state`]: the orchestrator (gravity clock, lock pipeline, lifecycle)
//! - [`snapshot`]: read-only view for renderers
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_core::GameState;
//! use blockfall_core::types::{Command, Phase};
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply(Command::MoveRight);
//! game.apply(Command::RotateCw);
//! game.advance(Duration::from_millis(16));
//! game.apply(Command::HardDrop);
//!
//! let snapshot = game.snapshot();
//! assert_eq!(snapshot.phase, Phase::Running);
//! assert_eq!(snapshot.board.iter().flatten().filter(|c| c.is_some()).count(), 4);
//! ```

pub mod board;
pub mod config;
pub mod game_state;
pub mod hold;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{ConfigError, GameConfig, GravityConfig};
pub use game_state::{GameState, Tetromino};
pub use hold::{HoldOutcome, HoldSlot};
pub use pieces::{get_shape, try_rotate, RotationSystem};
pub use rng::{PieceQueue, Randomizer, SimpleRng};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
