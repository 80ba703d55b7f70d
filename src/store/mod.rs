// src/store/mod.rs — Call record store access

pub mod query;
pub mod schema;
pub mod seed;
#[allow(clippy::module_inception)]
pub mod store;
pub mod store_server;

use rusqlite::Connection;
use std::path::Path;

pub use store_server::{spawn_store_server, spawn_with_store, StoreHandle, StoreTarget};

/// Open (or create) a writable store at the given path with the schema applied.
pub fn open_writable(path: &Path) -> anyhow::Result<store::Store> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    schema::run_migrations(&conn)?;
    Ok(store::Store::new(conn))
}

/// Create an in-memory store (for testing).
pub fn in_memory() -> anyhow::Result<store::Store> {
    let conn = Connection::open_in_memory()?;
    schema::run_migrations(&conn)?;
    Ok(store::Store::new(conn))
}
