//! Command-line entry point for the food equivalence engine.
//!
//! # Responsibility
//! - Run suggestion, equivalence and listing requests against a local database.
//! - Seed a database from a JSON catalog file and probe its partitions.
//!
//! Every command prints a JSON document on stdout. Failures exit non-zero.

mod import;

use clap::{Parser, Subcommand};
use equivale_api::{ApiResponse, EquivaleApi, EquivalenceParams};
use equivale_core::config::clamp_suggestion_limit;
use equivale_core::db::open_db;
use equivale_core::{
    core_version, init_logging_with, Catalog, EngineConfig, LogOptions, SqliteFoodStore,
};
use log::error;
use rusqlite::Connection;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "equivale")]
#[command(about = "Food suggestions and caloric equivalence")]
struct Cli {
    /// SQLite database path (default: EQUIVALE_DB_PATH or the temp dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute log directory (default: EQUIVALE_LOG_DIR; logging off when unset)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (default: EQUIVALE_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest food names containing the query
    Suggest {
        query: String,

        /// Names taken from each group (default: EQUIVALE_SUGGESTION_LIMIT or 10)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Grams of the substitute matching the base food's calories
    Equivalence {
        base_food: String,
        base_quantity: String,
        substitute_food: String,
    },
    /// List every record of one group
    List {
        /// Table id (e.g. `frutas`) or label (e.g. `fruits`)
        group: String,
    },
    /// Load records from a JSON file keyed by group
    Import { file: PathBuf },
    /// Report whether each group can be read
    Check,
    /// Print the engine version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging_with(&config.log_level, log_dir, LogOptions { stderr: true })
        {
            eprintln!("equivale: logging disabled: {err}");
        }
    }

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            print_json(&json!({ "error": err, "code": "cli_failure" }));
            ExitCode::FAILURE
        }
    }
}

/// Environment first, then command-line flags on top.
fn resolve_config(cli: &Cli) -> EngineConfig {
    let mut config = EngineConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Commands::Suggest {
        limit: Some(limit), ..
    } = &cli.command
    {
        config.suggestion_limit = clamp_suggestion_limit(*limit);
    }
    config
}

fn run(command: Commands, config: &EngineConfig) -> Result<ExitCode, String> {
    match command {
        Commands::Version => {
            print_json(&json!({ "version": core_version() }));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Suggest { query, .. } => {
            let conn = connect(config)?;
            Ok(emit(&api(&conn, config).suggestions(Some(&query))))
        }
        Commands::Equivalence {
            base_food,
            base_quantity,
            substitute_food,
        } => {
            let conn = connect(config)?;
            let params = EquivalenceParams::new(base_food, base_quantity, substitute_food);
            Ok(emit(&api(&conn, config).equivalence(&params)))
        }
        Commands::List { group } => {
            let conn = connect(config)?;
            Ok(emit(&api(&conn, config).list_group(Some(&group))))
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .map_err(|err| format!("cannot read {}: {err}", file.display()))?;
            let batch = import::parse_import(&raw)?;
            let conn = connect(config)?;
            let imported = import::apply_import(&SqliteFoodStore::new(&conn), &batch)
                .map_err(|err| err.to_string())?;
            print_json(&json!({ "imported": imported }));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let conn = connect(config)?;
            let report = api(&conn, config).catalog_health();
            let healthy = report.iter().all(|entry| entry.is_ok());
            print_json(&json!({ "healthy": healthy, "partitions": report }));
            Ok(exit_code(healthy))
        }
    }
}

fn connect(config: &EngineConfig) -> Result<Connection, String> {
    open_db(&config.db_path).map_err(|err| err.to_string())
}

fn api<'conn>(conn: &'conn Connection, config: &EngineConfig) -> EquivaleApi<'conn> {
    EquivaleApi::new(conn, Catalog::standard()).with_suggestion_limit(config.suggestion_limit)
}

fn emit(response: &ApiResponse) -> ExitCode {
    print_json(&response.body);
    exit_code(response.is_success())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("equivale: cannot encode output: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_config, Cli, Commands};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_environment_config() {
        let cli = Cli::parse_from([
            "equivale",
            "--db",
            "/tmp/foods.sqlite3",
            "--log-level",
            "warn",
            "suggest",
            "banana",
            "--limit",
            "500",
        ]);
        let config = resolve_config(&cli);

        assert_eq!(config.db_path, PathBuf::from("/tmp/foods.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.suggestion_limit, 50);
    }

    #[test]
    fn equivalence_takes_quantity_as_text() {
        let cli = Cli::parse_from(["equivale", "equivalence", "banana", "200", "chicken"]);
        match cli.command {
            Commands::Equivalence {
                base_food,
                base_quantity,
                substitute_food,
            } => {
                assert_eq!(base_food, "banana");
                assert_eq!(base_quantity, "200");
                assert_eq!(substitute_food, "chicken");
            }
            _ => panic!("expected equivalence command"),
        }
    }
}
