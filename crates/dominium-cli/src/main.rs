// SPDX-License-Identifier: Apache-2.0
//! `dominium`: the operator-facing CLI over `dominium-sim`.
//!
//! Three subcommands: `new-world` bootstraps a save file from a built-in
//! template, `run` replays a script of verb lines against an existing save,
//! and `repl` drives the same verb dispatcher interactively from stdin.
//! Exit codes mirror [`dominium_sim::VerbStatus`]: `0` ok, `1` failure, `2`
//! usage, `3` unavailable — `new-world` and I/O errors outside the verb
//! dispatcher itself use `1`.
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
#![allow(clippy::print_stdout, clippy::print_stderr, clippy::missing_errors_doc)]

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use dominium_sim::{
    bootstrap_template, dispatch, load_world, save_replay, save_world, write_compat_report,
    ReplayEntry, VerbStatus, World, WorldConfig,
};

/// Process exit code for a successful verb or CLI operation.
const EXIT_OK: u8 = 0;
/// Process exit code for a verb that ran but whose effect failed.
const EXIT_FAILURE: u8 = 1;
/// Process exit code for malformed CLI usage or a malformed verb line.
const EXIT_USAGE: u8 = 2;
/// Process exit code for a verb refused on precondition or policy grounds.
const EXIT_UNAVAILABLE: u8 = 3;

#[derive(Parser, Debug)]
#[command(author, version, about = "Operator CLI for the dominium simulation runtime", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bootstrap a save file from a built-in world template.
    NewWorld {
        /// `builtin.empty_universe` or `builtin.minimal_system`.
        #[arg(long, default_value = "builtin.empty_universe")]
        template: String,
        /// Deterministic world seed.
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Path to write the save file to.
        #[arg(long)]
        save: PathBuf,
        /// Optional TOML config file overriding [`WorldConfig`]'s defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run a script of verb lines against an existing save, writing it back.
    Run {
        /// The save file to load and, on success, overwrite.
        #[arg(long)]
        save: PathBuf,
        /// Path to a text file of one verb line per call (`#`-prefixed and
        /// blank lines are skipped).
        script: PathBuf,
        /// Optional path to record every dispatched line as a replay log.
        #[arg(long)]
        replay: Option<PathBuf>,
        /// Optional TOML config file overriding [`WorldConfig`]'s defaults,
        /// used only if `save` must be bootstrapped fresh (see `new-world`).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Drive the verb dispatcher interactively from stdin.
    Repl {
        /// The save file to load and, on exit, overwrite.
        #[arg(long)]
        save: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<WorldConfig> {
    match path {
        None => Ok(WorldConfig::default()),
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            WorldConfig::from_toml_str(&text).with_context(|| format!("parsing config file {}", path.display()))
        }
    }
}

fn exit_code_for(status: VerbStatus) -> u8 {
    match status {
        VerbStatus::Ok => EXIT_OK,
        VerbStatus::Failure => EXIT_FAILURE,
        VerbStatus::Usage => EXIT_USAGE,
        VerbStatus::Unavailable => EXIT_UNAVAILABLE,
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn run_new_world(template: &str, seed: u64, save: &PathBuf, config: Option<&PathBuf>) -> Result<u8> {
    let config = load_config(config)?;
    let world = bootstrap_template(template, seed, config)
        .with_context(|| format!("bootstrapping template {template}"))?;
    let save_path = save.to_string_lossy().to_string();
    save_world(&world, &save_path).with_context(|| format!("writing save file {}", save.display()))?;
    write_compat_report(&world, &save_path, unix_now())
        .with_context(|| format!("writing compat report for {}", save.display()))?;
    println!("wrote {} (template={template}, seed={seed})", save.display());
    Ok(EXIT_OK)
}

fn load_existing(save: &PathBuf, config: WorldConfig) -> Result<World> {
    let save_path = save.to_string_lossy().to_string();
    load_world(&save_path, config).with_context(|| format!("loading save file {}", save.display()))
}

/// Dispatches one non-empty, non-comment line, printing its result and
/// returning the exit code its status maps to.
fn dispatch_line(world: &mut World, line: &str) -> u8 {
    let result = dispatch(world, line);
    println!("{:?} {}", result.status, result.output);
    exit_code_for(result.status)
}

fn run_script(save: &PathBuf, script: &PathBuf, replay: Option<&PathBuf>, config: Option<&PathBuf>) -> Result<u8> {
    let config = load_config(config)?;
    let mut world = load_existing(save, config)?;
    let text = fs::read_to_string(script).with_context(|| format!("reading script {}", script.display()))?;

    let mut entries = Vec::new();
    let mut worst = EXIT_OK;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let tick = world.tick;
        let code = dispatch_line(&mut world, trimmed);
        entries.push(ReplayEntry {
            tick,
            line: trimmed.to_string(),
        });
        worst = worst.max(code);
    }

    if let Some(replay_path) = replay {
        save_replay(&entries, &replay_path.to_string_lossy())
            .with_context(|| format!("writing replay log {}", replay_path.display()))?;
    }

    let save_path = save.to_string_lossy().to_string();
    save_world(&world, &save_path).with_context(|| format!("writing save file {}", save.display()))?;
    write_compat_report(&world, &save_path, unix_now())
        .with_context(|| format!("writing compat report for {}", save.display()))?;

    Ok(worst)
}

fn run_repl(save: &PathBuf) -> Result<u8> {
    let mut world = load_existing(save, WorldConfig::default())?;
    let stdin = io::stdin();
    let mut worst = EXIT_OK;

    print!("dominium> ");
    io::stdout().flush().ok();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            print!("dominium> ");
            io::stdout().flush().ok();
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }
        let code = dispatch_line(&mut world, trimmed);
        worst = worst.max(code);
        print!("dominium> ");
        io::stdout().flush().ok();
    }

    let save_path = save.to_string_lossy().to_string();
    save_world(&world, &save_path).with_context(|| format!("writing save file {}", save.display()))?;
    write_compat_report(&world, &save_path, unix_now())
        .with_context(|| format!("writing compat report for {}", save.display()))?;

    Ok(worst)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let outcome = match &cli.command {
        Command::NewWorld {
            template,
            seed,
            save,
            config,
        } => run_new_world(template, *seed, save, config.as_ref()),
        Command::Run {
            save,
            script,
            replay,
            config,
        } => run_script(save, script, replay.as_ref(), config.as_ref()),
        Command::Repl { save } => run_repl(save),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_mapping_matches_verb_status() {
        assert_eq!(exit_code_for(VerbStatus::Ok), EXIT_OK);
        assert_eq!(exit_code_for(VerbStatus::Failure), EXIT_FAILURE);
        assert_eq!(exit_code_for(VerbStatus::Usage), EXIT_USAGE);
        assert_eq!(exit_code_for(VerbStatus::Unavailable), EXIT_UNAVAILABLE);
    }

    #[test]
    fn new_world_then_run_round_trips_a_save_file() {
        let dir = tempfile::tempdir().unwrap();
        let save = dir.path().join("world.save");
        run_new_world("builtin.minimal_system", 7, &save, None).unwrap();
        assert!(save.exists());

        let script = dir.path().join("script.txt");
        fs::write(&script, "agent-add caps=survey auth=basic\nsimulate ticks=1\n").unwrap();
        let code = run_script(&save, &script, None, None).unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn run_reports_worst_status_across_the_script() {
        let dir = tempfile::tempdir().unwrap();
        let save = dir.path().join("world.save");
        run_new_world("builtin.empty_universe", 1, &save, None).unwrap();

        let script = dir.path().join("script.txt");
        fs::write(&script, "not-a-real-verb\nsimulate ticks=1\n").unwrap();
        let code = run_script(&save, &script, None, None).unwrap();
        assert_eq!(code, EXIT_USAGE);
    }
}
