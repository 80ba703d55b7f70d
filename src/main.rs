// src/main.rs — callboard entry point

use clap::Parser;

use callboard::cli::{self, Cli, Commands};
use callboard::infra::config::Config;
use callboard::infra::logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let command = cli.command.unwrap_or(Commands::Dashboard);

    // The dashboard owns the terminal, so its logs go to a file.
    if let Commands::Dashboard = command {
        logger::init_file_logging(&config.log.level, &config.log_path())?;
    } else {
        logger::init_logging(&config.log.level);
    }

    match command {
        Commands::Dashboard => cli::dashboard::run_dashboard(&config).await,
        Commands::Serve { port } => cli::serve::run_serve(&config, port).await,
        Commands::Snapshot { json } => cli::snapshot::run_snapshot(&config, json).await,
        Commands::Seed { path, reset } => cli::seed::run_seed(&config, path.as_deref(), reset),
        Commands::Config => cli::config::show_config(&config),
    }
}
