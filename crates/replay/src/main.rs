use std::{
    fs::File,
    io::{self, BufReader, IsTerminal},
    path::PathBuf,
};

use clap::Parser;
use code_view::{CodeView, Config, MemoryHost};
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

/// Replay debug session events against a headless code window
#[derive(Debug, Parser)]
struct Args {
    /// Configuration file (defaults to the user configuration directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Identifier of the simulated code window
    #[arg(long, default_value_t = 1000)]
    viewport: u64,

    /// JSON lines file of events; stdin if omitted
    events: Option<PathBuf>,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // stdout carries the status lines, so logs always go to stderr
    if io::stderr().is_terminal() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .json()
            .init();
    }

    let args = Args::parse();
    tracing::debug!(?args, "parsed command line arguments");

    let config =
        Config::load_or_default(args.config.as_deref()).wrap_err("loading configuration")?;
    let mut view = CodeView::new(MemoryHost::new(args.viewport), config);

    let stdout = io::stdout().lock();
    let applied = match &args.events {
        Some(path) => {
            let f = File::open(path)
                .wrap_err_with(|| format!("opening events file {}", path.display()))?;
            replay::run(&mut view, BufReader::new(f), stdout)?
        }
        None => replay::run(&mut view, io::stdin().lock(), stdout)?,
    };

    tracing::info!(applied, "replay finished");
    Ok(())
}
