// src/cli/config.rs — Print the effective configuration

use crate::infra::config::Config;
use crate::infra::paths;

pub fn show_config(config: &Config) -> anyhow::Result<()> {
    let config_path = paths::config_file_path();
    if config_path.exists() {
        println!("# Config:   {}", config_path.display());
    } else {
        println!("# Config:   (using defaults)");
    }
    println!("# Database: {}", config.db_path().display());
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
