//! `loanrisk config`: Show the effective configuration.

use loanrisk_config::AppConfig;
use std::path::Path;

pub fn show(config: &AppConfig, explicit: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => AppConfig::config_dir().join("config.toml"),
    };
    println!("# {}", path.display());
    println!("{}", config.to_toml());
    Ok(())
}
