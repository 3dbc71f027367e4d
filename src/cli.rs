//! Command-line arguments for the `tui-capsule` binary.

use anyhow::{anyhow, Result};

use crate::core::{EngineConfig, GameConfig, GravityPolicy};
use crate::types::{Speed, MAX_LEVEL};

pub const USAGE: &str =
    "usage: tui-capsule [--seed N] [--level N] [--speed low|med|hi] [--policy settle|stepwise]";

/// What the binary should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(GameConfig),
    Help,
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

/// Parse arguments (without the program name) into a [`Command`].
///
/// The seed defaults to `default_seed`, so callers can pass a time-based one.
pub fn parse_args(args: &[String], default_seed: u32) -> Result<Command> {
    let mut config = GameConfig::default().with_seed(default_seed);
    let mut engine = EngineConfig::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--seed" => {
                let v = value(args, i, "--seed")?;
                let seed = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
                config = config.with_seed(seed);
                i += 2;
            }
            "--level" => {
                let v = value(args, i, "--level")?;
                let level = v
                    .parse::<u32>()
                    .ok()
                    .filter(|&l| l <= MAX_LEVEL)
                    .ok_or_else(|| anyhow!("invalid --level value: {} (0-{})", v, MAX_LEVEL))?;
                config = config.with_level(level);
                i += 2;
            }
            "--speed" => {
                let v = value(args, i, "--speed")?;
                let speed =
                    Speed::from_str(v).ok_or_else(|| anyhow!("invalid --speed value: {}", v))?;
                config = config.with_speed(speed);
                i += 2;
            }
            "--policy" => {
                let v = value(args, i, "--policy")?;
                let policy = GravityPolicy::from_str(v)
                    .ok_or_else(|| anyhow!("invalid --policy value: {}", v))?;
                engine = engine.with_gravity(policy);
                i += 2;
            }
            other => return Err(anyhow!("unknown argument: {}\n{}", other, USAGE)),
        }
    }

    Ok(Command::Play(config.with_engine(engine)))
}
