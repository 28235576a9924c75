/// League, team and role configuration from config.toml
pub mod leagues;

/// Data directory and config path from environment variables
pub mod storage;

pub use leagues::{AppConfig, LeagueConfig, LeaguesConfig, RoleConfig, TeamConfig, load_config};
