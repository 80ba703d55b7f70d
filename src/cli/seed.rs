// src/cli/seed.rs — Create a demo call record database

use std::path::PathBuf;

use crate::infra::config::Config;
use crate::store::{self, schema, seed};

pub fn run_seed(config: &Config, path: Option<&str>, reset: bool) -> anyhow::Result<()> {
    let path = path.map(PathBuf::from).unwrap_or_else(|| config.db_path());
    let store = store::open_writable(&path)?;

    if reset {
        while let Some(version) = schema::rollback_last(store.conn())? {
            tracing::info!(version, "Rolled back migration");
        }
        schema::run_migrations(store.conn())?;
    }

    let existing = store.count_calls()?;
    if existing > 0 && !reset {
        println!(
            "{} already holds {existing} calls; use --reset to start over.",
            path.display()
        );
        return Ok(());
    }

    let inserted = seed::seed_demo(&store, config)?;
    println!(
        "Seeded {inserted} calls into {} ({} to {}).",
        path.display(),
        config.report.date_from,
        config.report.date_to
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_then_reseed_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.db");
        let path_str = path.to_str().unwrap();
        let config = Config::default();

        run_seed(&config, Some(path_str), false).unwrap();
        let first = store::open_writable(&path).unwrap().count_calls().unwrap();
        assert!(first > 0);

        // Without --reset the existing data is left alone.
        run_seed(&config, Some(path_str), false).unwrap();
        assert_eq!(store::open_writable(&path).unwrap().count_calls().unwrap(), first);

        // With --reset the table is rebuilt from scratch, same deterministic rows.
        run_seed(&config, Some(path_str), true).unwrap();
        assert_eq!(store::open_writable(&path).unwrap().count_calls().unwrap(), first);
    }
}
