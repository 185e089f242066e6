#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Waypoint Defence headlessly.
//!
//! The runner loads tuning, optionally resumes a saved run, buys and places
//! the requested towers and then ticks the arena until the requested number
//! of waves has been cleared or the run is lost.

mod save_transfer;

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use thiserror::Error;
use tracing::{info, Level};
use waypoint_defence_arena::{query, CombatArena};
use waypoint_defence_core::{CombatTuning, Event, TowerKind};

/// Headless runner for the Waypoint Defence combat simulation.
#[derive(Debug, Parser)]
#[command(name = "waypoint-defence", version, about)]
struct Args {
    /// TOML file overriding the default tuning.
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,
    /// Seed replacing the one from the tuning.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of waves to clear before stopping.
    #[arg(long, default_value_t = 3)]
    waves: u32,
    /// Tower to buy and place before the run starts, as `kind@x,y`.
    #[arg(long = "tower", value_name = "KIND@X,Y")]
    towers: Vec<TowerOrder>,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    dt_ms: u64,
    /// Upper bound on simulated ticks.
    #[arg(long, default_value_t = 500_000)]
    max_ticks: u64,
    /// Resumes the run stored in this file.
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,
    /// Writes a save code for the final state to this file.
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
    /// Raises log verbosity; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Request to buy one tower and place it at a position.
#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerOrder {
    kind: TowerKind,
    position: Vec2,
}

/// Errors produced while parsing a `kind@x,y` tower order.
#[derive(Debug, Error, PartialEq)]
enum TowerOrderError {
    /// The order did not contain the `@` separator.
    #[error("expected KIND@X,Y")]
    MissingPosition,
    /// The tower kind is not sold by the shop.
    #[error("unknown tower kind '{0}'")]
    UnknownKind(String),
    /// The coordinates could not be parsed.
    #[error("could not parse position '{0}'")]
    InvalidPosition(String),
}

impl FromStr for TowerOrder {
    type Err = TowerOrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, position) = value
            .split_once('@')
            .ok_or(TowerOrderError::MissingPosition)?;
        let kind = parse_kind(kind.trim())?;

        let invalid = || TowerOrderError::InvalidPosition(position.to_owned());
        let (x, y) = position.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse::<f32>().map_err(|_| invalid())?;
        let y = y.trim().parse::<f32>().map_err(|_| invalid())?;

        Ok(Self {
            kind,
            position: Vec2::new(x, y),
        })
    }
}

fn parse_kind(name: &str) -> Result<TowerKind, TowerOrderError> {
    TowerKind::ALL
        .into_iter()
        .find(|kind| format!("{kind:?}").eq_ignore_ascii_case(name))
        .ok_or_else(|| TowerOrderError::UnknownKind(name.to_owned()))
}

/// Why the run loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Cleared,
    Defeated,
    OutOfTicks,
}

/// Tallies gathered while the run loop drains events.
#[derive(Debug, Default)]
struct RunReport {
    ticks: u64,
    waves_cleared: u32,
    kills: u32,
    leaks: u32,
    shots: u32,
}

/// Entry point for the Waypoint Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    install_tracing(args.verbose);

    let tuning = load_tuning(args.tuning.as_deref(), args.seed)?;
    let mut arena = CombatArena::new(tuning).context("tuning describes an unusable path")?;

    if let Some(path) = &args.load {
        let code = fs::read_to_string(path)
            .with_context(|| format!("failed to read save from {}", path.display()))?;
        let state = save_transfer::decode(&code)
            .with_context(|| format!("failed to decode save from {}", path.display()))?;
        arena.restore(&state);
        let _ = arena.drain_events();
    }

    for order in &args.towers {
        arena
            .purchase_tower(order.kind)
            .with_context(|| format!("could not buy {:?}", order.kind))?;
        let tower = arena
            .place_tower(order.kind, order.position)
            .with_context(|| {
                format!(
                    "could not place {:?} at ({}, {})",
                    order.kind, order.position.x, order.position.y
                )
            })?;
        info!(?tower, kind = ?order.kind, "tower placed");
    }
    let _ = arena.drain_events();

    let (outcome, report) = run(&mut arena, &args);
    print_summary(&arena, outcome, &report);

    if let Some(path) = &args.save {
        let code = save_transfer::encode(&arena.snapshot())?;
        fs::write(path, format!("{code}\n"))
            .with_context(|| format!("failed to write save to {}", path.display()))?;
        println!("saved to {}", path.display());
    }

    Ok(())
}

fn install_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_tuning(path: Option<&Path>, seed: Option<u64>) -> Result<CombatTuning> {
    let mut tuning = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read tuning from {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse tuning from {}", path.display()))?
        }
        None => CombatTuning::default(),
    };
    if let Some(seed) = seed {
        tuning.seed = seed;
    }
    Ok(tuning)
}

fn run(arena: &mut CombatArena, args: &Args) -> (Outcome, RunReport) {
    let dt = Duration::from_millis(args.dt_ms);
    let mut report = RunReport::default();

    while report.ticks < args.max_ticks {
        arena.tick(dt);
        report.ticks += 1;

        for event in arena.drain_events() {
            match event {
                Event::EnemyDied { .. } => report.kills += 1,
                Event::EnemyReachedEnd { .. } => report.leaks += 1,
                Event::ProjectileFired { .. } => report.shots += 1,
                Event::WaveCompleted {
                    wave,
                    bonus,
                    perfect,
                } => {
                    report.waves_cleared += 1;
                    info!(wave, bonus, perfect, "wave cleared");
                }
                Event::AchievementUnlocked { achievement } => {
                    info!(
                        title = achievement.title(),
                        description = achievement.description(),
                        "achievement unlocked"
                    );
                }
                Event::GameOver { .. } => return (Outcome::Defeated, report),
                _ => {}
            }
        }

        if report.waves_cleared >= args.waves {
            return (Outcome::Cleared, report);
        }
    }

    (Outcome::OutOfTicks, report)
}

fn print_summary(arena: &CombatArena, outcome: Outcome, report: &RunReport) {
    let world = arena.world();
    let outcome = match outcome {
        Outcome::Cleared => "cleared",
        Outcome::Defeated => "defeated",
        Outcome::OutOfTicks => "out of ticks",
    };

    println!("outcome: {outcome}");
    println!("waves cleared: {}", report.waves_cleared);
    println!("wave: {}", query::wave(world));
    println!("lives: {}", query::lives(world));
    println!("money: {}", query::money(world));
    println!("score: {}", query::score(world));
    println!(
        "kills: {} leaks: {} shots: {}",
        report.kills, report.leaks, report.shots
    );
    println!(
        "simulated: {:.1}s over {} ticks",
        query::playtime(world).as_secs_f32(),
        report.ticks
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tower_orders_parse_kind_and_position() {
        assert_eq!(
            "bow@400,60".parse::<TowerOrder>(),
            Ok(TowerOrder {
                kind: TowerKind::Bow,
                position: Vec2::new(400.0, 60.0),
            })
        );
        assert_eq!(
            " Ice @ 12.5 , -3".parse::<TowerOrder>(),
            Ok(TowerOrder {
                kind: TowerKind::Ice,
                position: Vec2::new(12.5, -3.0),
            })
        );
    }

    #[test]
    fn malformed_tower_orders_are_rejected() {
        assert_eq!(
            "bow".parse::<TowerOrder>(),
            Err(TowerOrderError::MissingPosition)
        );
        assert_eq!(
            "catapult@1,2".parse::<TowerOrder>(),
            Err(TowerOrderError::UnknownKind("catapult".to_owned()))
        );
        assert_eq!(
            "laser@1".parse::<TowerOrder>(),
            Err(TowerOrderError::InvalidPosition("1".to_owned()))
        );
    }

    #[test]
    fn seed_flag_overrides_tuning() {
        let tuning = load_tuning(None, Some(42)).expect("default tuning");
        assert_eq!(tuning.seed, 42);
        assert_eq!(tuning.economy, CombatTuning::default().economy);
    }

    #[test]
    fn args_accept_repeated_towers() {
        let args = Args::try_parse_from([
            "waypoint-defence",
            "--tower",
            "bow@400,60",
            "--tower",
            "bow@500,60",
            "--waves",
            "2",
            "-vv",
        ])
        .expect("valid arguments");
        assert_eq!(args.towers.len(), 2);
        assert_eq!(args.waves, 2);
        assert_eq!(args.verbose, 2);
        assert!(Args::try_parse_from(["waypoint-defence", "--dt-ms", "0"]).is_err());
    }
}
