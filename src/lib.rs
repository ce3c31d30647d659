//! Blockfall (workspace facade crate).
//!
//! The engine lives in dedicated crates under `crates/`; this package re-exports them as
//! `blockfall::{core, types}` and adds the headless [`replay`] runner.

pub mod replay;

pub use blockfall_core as core;
pub use blockfall_types as types;
