//! Command dispatch.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use fgpatch_discovery::{Game, GameLocator};
use fgpatch_file_ops::{Mode, ModOption, PatchEngine};

use crate::cli::{Cli, Commands};
use crate::config::Config;

/// Runs one command to completion.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Games { json } => {
            let games = discover(&config).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&games)?);
            } else if games.is_empty() {
                println!("No games with {} found.", config.marker_file);
            } else {
                for (i, game) in games.iter().enumerate() {
                    println!("#{:<3} {}", i + 1, format_game(game));
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Install { target, option } => {
            let ok = patch(&config, &target, &option, Mode::Install).await?;
            Ok(exit_code(ok))
        }
        Commands::Rollback { target, option } => {
            let ok = patch(&config, &target, &option, Mode::Rollback).await?;
            Ok(exit_code(ok))
        }
        Commands::Status { target } => {
            let target = resolve_target(&config, &target).await?;
            let state = config.patch_engine().state(&target);
            println!("{}: {state}", target.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Options => {
            let engine = config.patch_engine();
            for option in ModOption::all() {
                let dir = engine.option_dir(*option);
                let note = if dir.is_dir() { "" } else { " (folder missing)" };
                println!("{option}{note}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Runs discovery on a blocking worker and waits for its single result.
async fn discover(config: &Config) -> anyhow::Result<Vec<Game>> {
    let discovery = config.discovery_config();
    let games = tokio::task::spawn_blocking(move || GameLocator::new(discovery).locate_games())
        .await
        .context("game discovery task failed")?;
    Ok(games)
}

/// Applies a patch operation and prints its outcome. Returns whether it succeeded.
async fn patch(config: &Config, target: &str, option: &str, mode: Mode) -> anyhow::Result<bool> {
    let target = resolve_target(config, target).await?;
    let engine: PatchEngine = config.patch_engine();

    let option: ModOption = match option.parse() {
        Ok(option) => option,
        Err(e) => {
            eprintln!("{e}");
            return Ok(false);
        }
    };

    // Patch operations run to completion once started.
    let result = tokio::task::spawn_blocking(move || engine.apply(&target, option, mode))
        .await
        .context("patch task failed")?;

    match result {
        Ok(report) => {
            println!("{report}");
            Ok(true)
        }
        Err(e) => {
            tracing::error!(error = %e, %mode, "patch operation failed");
            eprintln!("{e}");
            Ok(false)
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Resolves a `#N` game reference or a path to a game folder.
async fn resolve_target(config: &Config, target: &str) -> anyhow::Result<PathBuf> {
    if let Some(index) = target.strip_prefix('#') {
        let index: usize = index
            .parse()
            .with_context(|| format!("invalid game number: {target}"))?;
        let games = discover(config).await?;
        return select_game(&games, index)
            .with_context(|| format!("no game {target}, {} game(s) found", games.len()));
    }
    Ok(target_from_path(Path::new(target)))
}

/// Returns the marker folder of the `index`-th game (1-based).
fn select_game(games: &[Game], index: usize) -> Option<PathBuf> {
    index
        .checked_sub(1)
        .and_then(|i| games.get(i))
        .and_then(|game| game.dll_location.clone())
}

/// A file inside the game folder stands for its parent folder.
fn target_from_path(path: &Path) -> PathBuf {
    if path.is_file()
        && let Some(parent) = path.parent()
    {
        return parent.to_path_buf();
    }
    path.to_path_buf()
}

fn format_game(game: &Game) -> String {
    match &game.dll_location {
        Some(dll) => format!("{}  ({})", game.name, dll.display()),
        None => game.name.clone(),
    }
}
