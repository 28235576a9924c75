//! Storage location and config path resolution from environment variables.

use std::path::PathBuf;

/// Default directory for the JSON tables.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default location of the league configuration.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Gets the data directory from `LINEUP_DATA_DIR`, falling back to `./data`.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    std::env::var("LINEUP_DATA_DIR")
        .map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from)
}

/// Gets the config file path from `LINEUP_CONFIG`, falling back to `./config.toml`.
#[must_use]
pub fn get_config_path() -> PathBuf {
    std::env::var("LINEUP_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Guild to register commands in during development, if `DEV_GUILD_ID` is set and valid.
#[must_use]
pub fn get_dev_guild_id() -> Option<u64> {
    std::env::var("DEV_GUILD_ID")
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .filter(|id| *id != 0)
}
