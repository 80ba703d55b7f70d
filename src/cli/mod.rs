// src/cli/mod.rs — CLI definition (clap derive)

pub mod config;
pub mod dashboard;
pub mod seed;
pub mod serve;
pub mod snapshot;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::access::DataAccess;
use crate::infra::config::Config;
use crate::refresh::Refresher;
use crate::store::{spawn_store_server, StoreTarget};

#[derive(Parser)]
#[command(
    name = "callboard",
    about = "Call-center traffic dashboard",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the terminal dashboard (default)
    Dashboard,
    /// Run the refresh loop headless and serve the HTTP API
    Serve {
        /// Override `api.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one refresh cycle and print the result
    Snapshot {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a call record database filled with demo data
    Seed {
        /// Database file to create (defaults to the configured store)
        path: Option<String>,
        /// Drop and recreate the schema before seeding
        #[arg(long)]
        reset: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Wire the store task, data access and refresher for the configured database.
///
/// The store task exits once the returned refresher (the last handle owner)
/// is dropped.
pub fn build_refresher(config: &Config) -> Arc<Refresher> {
    let target = StoreTarget {
        path: config.db_path(),
        busy_timeout: Duration::from_millis(config.store.busy_timeout_ms),
    };
    tracing::debug!(path = %target.path.display(), "Using call record store");
    let (handle, _task) = spawn_store_server(target);
    let access = DataAccess::new(Arc::new(handle), config);
    Arc::new(Refresher::new(access))
}
