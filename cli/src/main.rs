#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

use args::CliArgs;
use clap::Parser;
use todo_core::{ClientConfig, TodoStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod commands;
mod render;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    setup_tracing();
    let args = CliArgs::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.config.api_url.as_deref() {
        config = config.with_base_url(url)?;
    }

    let store = TodoStore::connect(&config)?;
    let mut stdout = std::io::stdout().lock();
    commands::run(&store, args.command, args.config.output, &mut stdout).await
}

/// Logs go to stderr so stdout stays parseable with `--output json`.
fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
