use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use logscope_logs::{LogLoader, LogStore};
use logscope_query::{QueryEngine, QueryOutput};

mod config;
mod render;

use config::{Config, OutputFormat};
use render::{Summary, read_queries, write_output, write_summary};

/// Logscope - Load tab-separated activity logs and answer queries over them
#[derive(Parser, Debug)]
#[command(name = "logscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the log files (defaults to `log_dir` from the config file)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Query to run, may be repeated; queries are read from stdin when absent
    #[arg(short, long = "query", value_name = "QUERY")]
    queries: Vec<String>,

    /// Log file extension
    #[arg(long)]
    extension: Option<String>,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,

    /// Print totals for the whole collection
    #[arg(long)]
    summary: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when at least one query failed
fn run(args: Args) -> Result<bool> {
    let config = Config::load(args.config.as_deref())?;

    let Some(dir) = args.dir.or(config.log_dir) else {
        anyhow::bail!("No log directory given: pass DIR or set log_dir in the config file");
    };
    let extension = args.extension.unwrap_or(config.extension);
    let format = if args.json {
        OutputFormat::Json
    } else {
        config.output
    };

    let loader = LogLoader::new(dir).with_extension(extension);
    let store = LogStore::open_with(&loader).with_context(|| {
        format!(
            "Failed to load {} files from {}",
            loader.extension(),
            loader.dir().display()
        )
    })?;
    let engine = QueryEngine::new(store);

    let mut out = io::stdout().lock();

    if args.summary {
        write_summary(&mut out, &Summary::collect(engine.store()), format)?;
    }

    let queries = if !args.queries.is_empty() {
        args.queries
    } else if args.summary {
        Vec::new()
    } else {
        read_queries(io::stdin().lock()).context("Failed to read queries from stdin")?
    };

    let mut all_ok = true;
    for query in &queries {
        match engine.execute(query) {
            Ok(output) => {
                if output == QueryOutput::NoMatch {
                    warn!(query = query.as_str(), "not a recognised query");
                }
                write_output(&mut out, query, &output, format)?;
            }
            Err(e) => {
                eprintln!("Error: {query}: {e:#}");
                all_ok = false;
            }
        }
    }
    out.flush()?;

    Ok(all_ok)
}
