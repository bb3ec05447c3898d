use clap::{Parser, ValueEnum};
use db_infra::config::db::{DbKind, RuntimeEnv};
use db_infra::infra::db::orchestrate_migration;
use migration::{
    get_latest_migration_version, scoreboard_row_counts, DatabaseConnection, MigrationCommand,
};
use tracing::warn;

#[derive(Clone, ValueEnum)]
enum Env {
    Prod,
    Test,
}

/// No in-memory SQLite here; it would be empty again on the next run.
#[derive(Clone, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration")]
#[command(about = "Scoreboard database migration tool")]
struct Args {
    /// Migration command: up | down | fresh | reset | refresh | status
    command: String,

    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,

    /// Database type
    #[arg(short, long, value_enum, default_value = "sqlite-file")]
    db: Db,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,db_infra=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let command: MigrationCommand = match args.command.parse() {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let env = match args.env {
        Env::Prod => RuntimeEnv::Prod,
        Env::Test => RuntimeEnv::Test,
    };

    let db_kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
    };

    let conn = match orchestrate_migration(env, db_kind, command).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    };
    report_schema(&conn).await;
}

/// Print where the schema ended up and what the scoreboard tables hold,
/// so a `down` or `fresh` shows which rounds were dropped.
async fn report_schema(conn: &DatabaseConnection) {
    match get_latest_migration_version(conn).await {
        Ok(Some(version)) => println!("schema: {version}"),
        Ok(None) => println!("schema: none applied"),
        Err(e) => warn!(error = %e, "could not read migration version"),
    }
    match scoreboard_row_counts(conn).await {
        Ok(counts) => {
            for (table, count) in counts {
                match count {
                    Some(n) => println!("  {table}: {n} rows"),
                    None => println!("  {table}: absent"),
                }
            }
        }
        Err(e) => warn!(error = %e, "could not count scoreboard rows"),
    }
}
