use clap::Parser;
use color_eyre::eyre;
use std::path::PathBuf;
use weka::config::Configuration;

/// Weka federated inbox server
#[derive(Parser)]
#[command(about, author, version)]
struct Args {
    /// Path to the configuration file
    #[clap(long, short)]
    config: PathBuf,
}

async fn boot() -> eyre::Result<()> {
    let args = Args::parse();
    let config = Configuration::load(args.config).await?;
    weka::observability::initialise()?;

    let state = weka::state::initialise(&config)?;
    weka::http::run(state, config.server.clone()).await
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(boot())
}
