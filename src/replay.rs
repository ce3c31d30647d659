//! Headless replay of recorded input.
//!
//! A script is a seed, optional rule overrides, and an ordered list of steps:
//!
//! ```json
//! {
//!   "seed": 42,
//!   "config": { "randomizer": "bag" },
//!   "steps": ["start", { "command": "moveLeft" }, { "advance_ms": 16 }, { "command": "hardDrop" }]
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

use crate::core::{GameConfig, GameSnapshot, GameState};
use crate::types::Command;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Start,
    Reset,
    /// Feed one frame of this many milliseconds to the gravity clock
    AdvanceMs(u64),
    Command(Command),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default = "default_seed")]
    pub seed: u32,
    #[serde(default)]
    pub config: GameConfig,
    pub steps: Vec<Step>,
}

fn default_seed() -> u32 {
    1
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse replay script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Play a script to the end and return the final snapshot
pub fn run(script: &Script) -> Result<GameSnapshot> {
    let mut game = GameState::with_config(script.seed, script.config.clone())
        .context("invalid game config")?;

    for step in &script.steps {
        match *step {
            Step::Start => game.start(),
            Step::Reset => game.reset(),
            Step::AdvanceMs(ms) => game.advance(Duration::from_millis(ms)),
            Step::Command(command) => {
                game.apply(command);
            }
        }
    }

    info!(
        "replayed {} steps: phase={} score={} lines={} level={}",
        script.steps.len(),
        game.phase().as_str(),
        game.score(),
        game.lines(),
        game.level()
    );
    Ok(game.snapshot())
}
