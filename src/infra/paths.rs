// src/infra/paths.rs — XDG-compliant path management
//
// All paths respect the CALLBOARD_HOME environment variable for isolation.
// When CALLBOARD_HOME is set, config and data live under that directory.
// When unset, config uses ~/.callboard/ and data uses XDG_DATA_HOME/callboard.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the CALLBOARD_HOME override, if set.
fn callboard_home() -> Option<PathBuf> {
    std::env::var_os("CALLBOARD_HOME").map(PathBuf::from)
}

/// Configuration directory: $CALLBOARD_HOME/ or ~/.callboard/
pub fn config_dir() -> PathBuf {
    if let Some(home) = callboard_home() {
        return home;
    }
    dirs_home().join(".callboard")
}

/// Data directory: $CALLBOARD_HOME/data/ or ~/.local/share/callboard/
pub fn data_dir() -> PathBuf {
    if let Some(home) = callboard_home() {
        return home.join("data");
    }
    ProjectDirs::from("", "", "callboard")
        .map(|d| d.data_local_dir().to_path_buf())
        .unwrap_or_else(|| config_dir().join("data"))
}

/// Home directory, or the current directory when none can be determined.
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default call record database when neither CALLBOARD_DB nor `store.path` is set.
pub fn default_db_path() -> PathBuf {
    data_dir().join("calls.db")
}

pub fn log_file_path() -> PathBuf {
    data_dir().join("callboard.log")
}
