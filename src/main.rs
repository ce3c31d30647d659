//! Headless replay runner (default binary).
//!
//! Usage: `blockfall <script.json>`
//!
//! Plays the script through the engine and prints the final snapshot as JSON.
//! Set `RUST_LOG=debug` to watch spawns, locks and line clears.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use blockfall::replay::{self, Script};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: blockfall <script.json>");
    };

    let script = Script::load(&path)?;
    let snapshot = replay::run(&script)?;

    let json = serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?;
    println!("{}", json);
    Ok(())
}
