use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn bankrec_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".bankrec"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(bankrec_home()?.join("config.toml"))
}
