use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "sqlgate", version, about = "Authorize SQL statements against an operator policy")]
struct Cli {
    /// Policy file (YAML with a `policy:` section). Environment variables
    /// ALLOW_ALL_OPERATIONS, ALLOW_DDL_OPERATIONS and BLOCK_DANGEROUS_KEYWORDS
    /// override its values.
    #[arg(long, short = 'c', global = true, env = "SQLGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a statement is permitted. Exits non-zero when denied.
    Check {
        /// The SQL statement.
        #[arg(required_unless_present = "sql_file", conflicts_with = "sql_file")]
        sql: Option<String>,

        /// Read the statement from a file instead.
        #[arg(long)]
        sql_file: Option<PathBuf>,

        /// Operation tag (e.g. SELECT, CREATE). Derived from the statement's
        /// leading verb when omitted.
        #[arg(long, short = 'o')]
        operation: Option<String>,

        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the effective policy and the dangerous keyword set.
    Policy {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Check {
            sql,
            sql_file,
            operation,
            json,
        } => {
            let sql = commands::check::read_statement(sql, sql_file.as_deref())?;
            let allowed =
                commands::check::run(cli.config.as_deref(), &sql, operation.as_deref(), json)?;
            Ok(if allowed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Policy { json } => {
            commands::policy::run(cli.config.as_deref(), json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
