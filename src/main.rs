use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mediapred::compiler::{Backend, CompileOptions, CompiledQuery};
use mediapred::config::Config;
use mediapred::fields;
use mediapred::predicates::{wire, OperationKind};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser as SqlParser;
use tracing::Level;

/// Compile media predicates for relational and photo-library backends
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (defaults to <config dir>/mediapred/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a JSON predicate set and print the result
    Compile {
        /// Predicate set in wire JSON
        file: PathBuf,
        #[arg(long, value_enum)]
        backend: Option<Backend>,
        /// Table for the relational backend
        #[arg(long)]
        table: Option<String>,
        /// Compile in album context
        #[arg(long)]
        album: bool,
        /// Comma-separated projection columns
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// List operation kinds with their ordinals and operand counts
    Kinds,
    /// Print the column mapping tables
    Fields,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(2);
        }
    };

    // Logs go to stderr so stdout stays machine-readable
    let level = config.log_filter.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn run(command: Command, config: &Config) -> Result<ExitCode> {
    match command {
        Command::Compile {
            file,
            backend,
            table,
            album,
            columns,
        } => {
            let options = CompileOptions {
                table: table.unwrap_or_else(|| config.default_table.clone()),
                album: album || config.album_query,
                columns,
            };
            compile(&file, backend.unwrap_or(config.backend), &options)
        }
        Command::Kinds => {
            for kind in OperationKind::ALL {
                let (scalars, lists) = kind.arity();
                println!(
                    "{:>3}  {:<26} scalars={} lists={}",
                    kind.ordinal(),
                    kind.name(),
                    scalars,
                    lists
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Fields => {
            for map in fields::all_maps() {
                println!("[{}]", map.name());
                for (logical, native) in map.entries() {
                    println!("  {logical:<18} {native}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn compile(file: &Path, backend: Backend, options: &CompileOptions) -> Result<ExitCode> {
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let set = wire::from_json(&input)?;

    let compiled = match backend.compile(&set, options) {
        Ok(compiled) => compiled,
        Err(err) => {
            eprintln!("Predicate cannot run on this backend: {err}");
            return Ok(ExitCode::from(1));
        }
    };

    println!("{}", serde_json::to_string_pretty(&compiled)?);

    if let CompiledQuery::Relational(ref predicates) = compiled {
        let sql = predicates.to_sql(&options.columns);
        // sqlparser has no INDEXED BY support
        if predicates.index.is_none() {
            SqlParser::parse_sql(&SQLiteDialect {}, &sql)
                .with_context(|| format!("Rendered statement does not parse: {sql}"))?;
        }
        println!("{sql}");
    }

    Ok(ExitCode::SUCCESS)
}
