//! League configuration loading from config.toml
//!
//! Each league carries its own team list, role list (with per-team capacity),
//! admin roles and the two channels the bot posts into. Names are validated for
//! uniqueness once at load time so the stores can rely on plain lookups.

use crate::{
    core::league::{League, PerLeague},
    errors::{Error, Result},
};
use serde::Deserialize;
use std::{collections::BTreeMap, collections::HashSet, path::Path};

/// A team members can be signed to, and the Discord role that marks it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TeamConfig {
    /// Display name, also the key used by commands
    pub name: String,
    /// Discord role granted to every member of the team
    pub role_id: u64,
}

/// A function within a team (principal, driver, ...) with its capacity.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RoleConfig {
    /// Display name, also the key used by commands
    pub name: String,
    /// Discord role granted to holders of this role
    pub role_id: u64,
    /// How many members of one team may hold this role at once
    pub max: usize,
}

/// Discord embeds hold 25 fields; one is kept for assignments to removed teams.
pub const MAX_TEAMS: usize = 24;

/// Everything the bot needs to know about one league.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LeagueConfig {
    /// Channel receiving one audit embed per mutation
    pub update_channel_id: u64,
    /// Channel holding the auto-updating lineup embed
    pub live_lineup_channel_id: u64,
    /// Members holding any of these roles may sign, move and release
    #[serde(default)]
    pub admin_role_ids: Vec<u64>,
    /// Teams in display order
    pub teams: Vec<TeamConfig>,
    /// Roles in display order
    pub roles: Vec<RoleConfig>,
}

impl LeagueConfig {
    /// Looks up a team by exact name.
    #[must_use]
    pub fn team(&self, name: &str) -> Option<&TeamConfig> {
        self.teams.iter().find(|team| team.name == name)
    }

    /// Looks up a role by exact name.
    #[must_use]
    pub fn role(&self, name: &str) -> Option<&RoleConfig> {
        self.roles.iter().find(|role| role.name == name)
    }

    /// Position of a role in the configured order, used for sorting lineups.
    #[must_use]
    pub fn role_rank(&self, name: &str) -> usize {
        self.roles
            .iter()
            .position(|role| role.name == name)
            .unwrap_or(self.roles.len())
    }

    /// Whether a member holding `member_roles` counts as a league admin.
    #[must_use]
    pub fn is_admin(&self, member_roles: &[u64]) -> bool {
        member_roles
            .iter()
            .any(|role| self.admin_role_ids.contains(role))
    }

    fn validate(&self, league: League) -> Result<()> {
        let invalid = |message: String| Error::Config {
            message: format!("{league}: {message}"),
        };

        if self.teams.is_empty() {
            return Err(invalid("at least one team is required".to_string()));
        }
        if self.roles.is_empty() {
            return Err(invalid("at least one role is required".to_string()));
        }
        if self.teams.len() > MAX_TEAMS {
            return Err(invalid(format!(
                "at most {MAX_TEAMS} teams fit in the lineup embed, found {}",
                self.teams.len()
            )));
        }

        let mut names = HashSet::new();
        for team in &self.teams {
            if team.name.trim().is_empty() {
                return Err(invalid("team names cannot be empty".to_string()));
            }
            if !names.insert(team.name.as_str()) {
                return Err(invalid(format!("duplicate team '{}'", team.name)));
            }
        }

        names.clear();
        for role in &self.roles {
            if role.name.trim().is_empty() {
                return Err(invalid("role names cannot be empty".to_string()));
            }
            if !names.insert(role.name.as_str()) {
                return Err(invalid(format!("duplicate role '{}'", role.name)));
            }
            if role.max == 0 {
                return Err(invalid(format!("role '{}' must allow at least one member", role.name)));
            }
        }

        if self.update_channel_id == 0 || self.live_lineup_channel_id == 0 {
            return Err(invalid("channel ids must be set".to_string()));
        }

        let mut ids = HashSet::new();
        for id in self
            .teams
            .iter()
            .map(|team| team.role_id)
            .chain(self.roles.iter().map(|role| role.role_id))
        {
            if id == 0 {
                return Err(invalid("Discord role ids must be set".to_string()));
            }
            if !ids.insert(id) {
                return Err(invalid(format!("Discord role {id} is used more than once")));
            }
        }

        Ok(())
    }
}

/// Configuration for both leagues; a league may be left out to disable it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaguesConfig {
    leagues: PerLeague<Option<LeagueConfig>>,
}

impl LeaguesConfig {
    /// Builds and validates the configuration from parsed league tables.
    pub fn new(raw: BTreeMap<String, LeagueConfig>) -> Result<Self> {
        let mut leagues = PerLeague::default();
        for (key, config) in raw {
            let league: League = key.parse().map_err(|_| Error::Config {
                message: format!("unknown league table [leagues.{key}]"),
            })?;
            config.validate(league)?;
            if leagues.replace(league, Some(config)).is_some() {
                return Err(Error::Config {
                    message: format!("league {league} is configured more than once"),
                });
            }
        }
        Ok(Self { leagues })
    }

    /// The configuration for `league`, or `UnknownLeague` when it is not set up.
    pub fn league(&self, league: League) -> Result<&LeagueConfig> {
        self.leagues
            .get(league)
            .as_ref()
            .ok_or_else(|| Error::UnknownLeague {
                league: league.to_string(),
            })
    }

    /// Configured leagues in display order.
    pub fn configured(&self) -> impl Iterator<Item = (League, &LeagueConfig)> + '_ {
        League::ALL
            .into_iter()
            .filter_map(|league| self.leagues.get(league).as_ref().map(|c| (league, c)))
    }
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
struct RawAppConfig {
    #[serde(default)]
    reset_user_ids: Vec<u64>,
    #[serde(default)]
    leagues: BTreeMap<String, LeagueConfig>,
}

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Members allowed to wipe all bot data
    pub reset_user_ids: Vec<u64>,
    /// Per-league teams, roles and channels
    pub leagues: LeaguesConfig,
}

impl AppConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let raw: RawAppConfig = toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config.toml: {e}"),
        })?;
        let leagues = LeaguesConfig::new(raw.leagues)?;
        if leagues.configured().next().is_none() {
            return Err(Error::Config {
                message: "no leagues configured".to_string(),
            });
        }
        Ok(Self {
            reset_user_ids: raw.reset_user_ids,
            leagues,
        })
    }

    /// Whether `user_id` may run the full data reset.
    #[must_use]
    pub fn can_reset(&self, user_id: u64) -> bool {
        self.reset_user_ids.contains(&user_id)
    }
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A league table fails validation
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    AppConfig::from_toml(&contents)
}
