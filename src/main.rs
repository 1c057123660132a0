use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use toleo::config::{
    Collection, DEFAULT_COLLECTION, DEFAULT_FETCH_TIMEOUT_MS, collection_path, config_dir,
};
use toleo::pipeline::process::{Pipeline, default_concurrency};
use toleo::report::{Format, render_json, render_table};
use toleo::version::fetch::HttpFetcher;

#[derive(Parser)]
#[command(name = "toleo")]
#[command(version, about = "Compare upstream releases against packaged versions")]
struct Cli {
    /// Collection to check (file name without .toml)
    #[arg(short, long, default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Directory holding collection files [default: $XDG_CONFIG_HOME/toleo]
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Only check items whose name contains this text
    #[arg(short, long)]
    limit: Option<String>,

    /// Items resolved at once [default: available parallelism]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_MS)]
    timeout: u64,

    /// Cancel unfinished items after this many seconds
    #[arg(long)]
    deadline: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Write JSON logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = toleo::logging::init(cli.verbose, cli.log_file.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let dir = cli.config_dir.clone().unwrap_or_else(config_dir);
    let path = collection_path(&dir, &cli.collection);
    let collection = Collection::load(&path)?;
    let items = collection.items(cli.limit.as_deref());

    let fetcher = HttpFetcher::new(Duration::from_millis(cli.timeout))
        .context("failed to create HTTP client")?;
    let pipeline = Pipeline::new(Arc::new(fetcher), collection.endpoints.clone())
        .with_concurrency(cli.jobs.unwrap_or_else(default_concurrency));

    let deadline = cli.deadline.map(Duration::from_secs);
    let shutdown = async move {
        let interrupted = async {
            // Without a signal handler only the deadline can stop the run
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        match deadline {
            Some(deadline) => tokio::select! {
                _ = tokio::time::sleep(deadline) => warn!("Deadline of {:?} reached", deadline),
                _ = interrupted => warn!("Interrupted"),
            },
            None => interrupted.await,
        }
    };
    let results = pipeline.process_until(items, shutdown).await;

    let output = match cli.format {
        Format::Table => render_table(&results),
        Format::Json => render_json(&results).context("failed to render results")?,
    };
    println!("{}", output);

    if results.iter().all(|r| r.is_resolved()) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
