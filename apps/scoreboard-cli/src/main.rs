mod commands;
mod render;

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use db_infra::config::db::{DbKind, RuntimeEnv};
use db_infra::orchestrate_migration;
use migration::MigrationCommand;
use scoreboard_backend::sync::DELETE_ROUND_PROMPT;
use scoreboard_backend::{Confirm, DomainError, LiveSync, SeaStore, SyncEvent};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::commands::{parse, Command, HELP};

#[derive(Clone, ValueEnum)]
enum Env {
    Prod,
    Test,
}

#[derive(Clone, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
    /// Test environment only; nothing survives the session.
    SqliteMemory,
}

#[derive(Parser)]
#[command(name = "scoreboard")]
#[command(about = "Live mahjong scoreboard in the terminal")]
struct Args {
    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "prod")]
    env: Env,

    /// Database type
    #[arg(short, long, value_enum, default_value = "sqlite-file")]
    db: Db,
}

type InputLines = Lines<BufReader<Stdin>>;

/// Asks on stdout and reads the answer from the shared stdin reader.
struct StdinConfirm<'a> {
    lines: &'a mut InputLines,
}

#[async_trait]
impl Confirm for StdinConfirm<'_> {
    async fn confirm(&mut self, prompt: &str) -> bool {
        println!("{prompt} [y/N]");
        match self.lines.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

fn show(sync: &LiveSync<SeaStore>) {
    println!(
        "{}",
        render::scores_table(sync.scores(), sync.score_edit(), sync.totals())
    );
    if sync.player_stats().is_empty() {
        println!("(no player stats yet; run 'init-stats')");
    } else {
        println!(
            "{}",
            render::stats_table(sync.player_stats(), sync.stat_edit())
        );
    }
}

fn report(action: &str, err: &DomainError) {
    warn!(action, error = %err, "command failed");
    println!("! {action} failed: {err}");
}

/// Run one command. Returns false when the session should end.
async fn run(command: Command, sync: &mut LiveSync<SeaStore>, lines: &mut InputLines) -> bool {
    match command {
        Command::AddRound => {
            if let Err(e) = sync.create_round().await {
                report("add", &e);
            }
        }
        Command::Edit { round } => match sync.score_by_round(round).map(|s| s.id) {
            Some(id) => {
                if let Err(e) = sync.begin_score_edit(id) {
                    report("edit", &e);
                }
            }
            None => println!("! no round {round}"),
        },
        Command::Set { field, raw } => {
            if !sync.change_score_field(field, &raw) {
                println!("! nothing is being edited; use 'edit <round>' first");
            }
        }
        Command::Save => match sync.commit_score_edit().await {
            Ok(Some(_)) => {}
            Ok(None) => println!("! nothing to save"),
            Err(e) => report("save", &e),
        },
        Command::Cancel => sync.cancel_score_edit(),
        Command::Delete { round } => match sync.score_by_round(round).map(|s| s.id) {
            Some(id) => {
                let mut confirm = StdinConfirm { lines: &mut *lines };
                if let Err(e) = sync.delete_round(id, &mut confirm).await {
                    report("delete", &e);
                }
            }
            None => println!("! no round {round}"),
        },
        Command::InitStats => {
            if let Err(e) = sync.initialize_stats().await {
                report("init-stats", &e);
            }
        }
        Command::StatEdit { player } => match sync.stat_by_player(&player).map(|s| s.id) {
            Some(id) => {
                if let Err(e) = sync.begin_stat_edit(id) {
                    report("stat-edit", &e);
                }
            }
            None => println!("! no player '{player}'"),
        },
        Command::StatSet { field, raw } => {
            if !sync.change_stat_field(field, &raw) {
                println!("! no player stats are being edited; use 'stat-edit <player>' first");
            }
        }
        Command::StatSave => match sync.commit_stat_edit().await {
            Ok(Some(_)) => {}
            Ok(None) => println!("! nothing to save"),
            Err(e) => report("stat-save", &e),
        },
        Command::StatCancel => sync.cancel_stat_edit(),
        Command::Show => show(sync),
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
    }
    true
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never interleave with the tables.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let env = match args.env {
        Env::Prod => RuntimeEnv::Prod,
        Env::Test => RuntimeEnv::Test,
    };
    let db_kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
        Db::SqliteMemory => DbKind::SqliteMemory,
    };

    let conn = match orchestrate_migration(env, db_kind, MigrationCommand::Up).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("❌ Database setup failed: {e}");
            std::process::exit(1);
        }
    };
    let store = match SeaStore::open(conn).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("❌ Failed to load tables: {e}");
            std::process::exit(1);
        }
    };

    let mut sync = LiveSync::new(store);
    sync.mount();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type 'help' for commands. Delete asks: \"{DELETE_ROUND_PROMPT}\"");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "stdin read failed");
                        break;
                    }
                };
                match parse(&line) {
                    Ok(Some(command)) => {
                        let redraw = matches!(command, Command::Set { .. } | Command::StatSet { .. }
                            | Command::Edit { .. } | Command::StatEdit { .. }
                            | Command::Cancel | Command::StatCancel);
                        if !run(command, &mut sync, &mut lines).await {
                            break;
                        }
                        // Buffer-only changes produce no push, so draw them here.
                        if redraw {
                            show(&sync);
                        }
                    }
                    Ok(None) => {}
                    Err(msg) => println!("! {msg}"),
                }
            }
            event = sync.next_event() => match event {
                SyncEvent::Scores | SyncEvent::PlayerStats => show(&sync),
                SyncEvent::Closed => {
                    println!("! live updates stopped");
                    break;
                }
            },
        }
    }

    sync.unmount();
}
