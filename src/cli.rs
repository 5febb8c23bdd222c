//! Command-line front end: parses arguments, runs one statement through
//! the facade and renders the outcome as JSON.
use crate::config::{default_config_path, load_config};
use crate::core::{Database, FacadeError, Result, Value};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

/// Run one statement against the configured database and print JSON
///
/// `--config` and `--debug` go before the operation; everything after the
/// SQL is bound to its placeholders verbatim.
#[derive(Parser, Debug)]
#[command(name = "dbfacade", version, about, long_about = None)]
pub struct Cli {
    /// TOML config file (defaults to <config dir>/dbfacade/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Record executed statements and print them next to the result
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Execute a statement and print the last insert id
    Exec(Statement),
    /// Print the first row of the result, or null
    Select(Statement),
    /// Print every row of the result
    All(Statement),
    /// Print the first column of the first row
    Count(Statement),
}

impl Command {
    pub fn statement(&self) -> &Statement {
        match self {
            Command::Exec(s) | Command::Select(s) | Command::All(s) | Command::Count(s) => s,
        }
    }
}

#[derive(Args, Debug, PartialEq)]
pub struct Statement {
    /// SQL with positional `?` placeholders
    pub sql: String,

    /// Placeholder values in order: NULL, integers and decimals are typed, anything else is text
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub params: Vec<String>,
}

impl Statement {
    pub fn values(&self) -> Vec<Value> {
        self.params.iter().map(|p| Value::from_arg(p)).collect()
    }
}

/// Runs the parsed command and returns the JSON document to print
pub fn run(cli: &Cli) -> Result<serde_json::Value> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()
            .ok_or_else(|| FacadeError::Config("no config directory on this platform".to_string()))?,
    };
    let mut config = load_config(&path)?;
    config.database.debug |= cli.debug;

    let db = Database::from_config(&config.database)?;
    let result = execute(&db, &cli.command)?;

    if config.database.debug {
        let queries = db.queries()?;
        Ok(json!({ "result": result, "queries": queries }))
    } else {
        Ok(result)
    }
}

fn execute(db: &Database, command: &Command) -> Result<serde_json::Value> {
    let statement = command.statement();
    let sql = statement.sql.as_str();
    let params = statement.values();
    Ok(match command {
        Command::Exec(_) => {
            let id = db.query(sql, &params)?;
            json!({ "last_insert_id": id })
        }
        Command::Select(_) => serde_json::to_value(db.select(sql, &params)?)?,
        Command::All(_) => serde_json::to_value(db.multiple_select(sql, &params)?)?,
        Command::Count(_) => serde_json::to_value(db.count(sql, &params)?)?,
    })
}
