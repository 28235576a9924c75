//! Unified error types for the lineup bot.
//!
//! Domain failures (unknown league, full slot, taken car number, ...) carry enough
//! context to be shown to the member who ran the command. Infrastructure failures
//! are logged in full and surfaced as a generic message.

use crate::core::league::{League, MemberId};
use thiserror::Error;

/// Every failure the bot can report.
#[derive(Debug, Error)]
pub enum Error {
    /// The league string did not name a configured league.
    #[error("Unknown league '{league}'.")]
    UnknownLeague {
        /// The rejected input
        league: String,
    },

    /// The team is not part of the league's configured team list.
    #[error("Invalid team '{team}' for {league}.")]
    UnknownTeam {
        /// League the lookup ran against
        league: League,
        /// The rejected team name
        team: String,
    },

    /// The role is not part of the league's configured role list.
    #[error("Invalid role '{role}' for {league}.")]
    UnknownRole {
        /// League the lookup ran against
        league: League,
        /// The rejected role name
        role: String,
    },

    /// The (league, team, role) slot is already at its configured maximum.
    #[error("{role} limit reached for {team} ({max} max).")]
    CapacityExceeded {
        /// Destination team
        team: String,
        /// Destination role
        role: String,
        /// Configured maximum for the role
        max: usize,
    },

    /// The member is already signed in the league; use `move` instead.
    #[error("{member} is already signed in {league} ({team}, {role}).")]
    AlreadyAssigned {
        /// League of the existing assignment
        league: League,
        /// Member who is already signed
        member: MemberId,
        /// Team currently held
        team: String,
        /// Role currently held
        role: String,
    },

    /// The member holds no assignment in the league.
    #[error("{member} is not signed in {league}.")]
    NotAssigned {
        /// League that was checked
        league: League,
        /// Member without an assignment
        member: MemberId,
    },

    /// The car number is registered or claimed by someone else in the league.
    #[error("Car number {number} already taken in {league}!")]
    DuplicateCarNumber {
        /// League the number is scoped to
        league: League,
        /// The contested number
        number: u16,
    },

    /// Car numbers must fit the range shown on the cars.
    #[error("Car number {number} is out of range (0-999).")]
    InvalidCarNumber {
        /// The rejected number
        number: i64,
    },

    /// Display names may not be blank.
    #[error("Display name cannot be empty.")]
    InvalidDisplayName,

    /// The member has no standalone car-number claim in the league.
    #[error("{member} has no car number claim in {league}.")]
    NotClaimed {
        /// League that was checked
        league: League,
        /// Member without a claim
        member: MemberId,
    },

    /// The invoking member lacks the permission the command requires.
    #[error("Not authorized.")]
    Unauthorized,

    /// The command must be run inside a guild.
    #[error("This command can only be used in a server.")]
    GuildOnly,

    /// Configuration could not be read or failed validation.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A table could not be written to (or read from) durable storage.
    #[error("Persistence failure on {table}: {message}")]
    Persistence {
        /// File or table name involved
        table: String,
        /// Underlying cause
        message: String,
    },

    /// Raw I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialisation error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Error while building a message with `write!`.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error.
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Whether the error describes something the invoking member can act on.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::UnknownLeague { .. }
                | Self::UnknownTeam { .. }
                | Self::UnknownRole { .. }
                | Self::CapacityExceeded { .. }
                | Self::AlreadyAssigned { .. }
                | Self::NotAssigned { .. }
                | Self::DuplicateCarNumber { .. }
                | Self::InvalidCarNumber { .. }
                | Self::InvalidDisplayName
                | Self::NotClaimed { .. }
                | Self::Unauthorized
                | Self::GuildOnly
        )
    }

    /// The short message sent back to the invoking member.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_user_facing() {
            format!("❌ {self}")
        } else {
            "❌ Something went wrong while handling that command. The error has been logged."
                .to_string()
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_shown_verbatim() {
        let err = Error::CapacityExceeded {
            team: "McLaren F1 team".to_string(),
            role: "Team Principal F1".to_string(),
            max: 1,
        };
        assert!(err.is_user_facing());
        assert_eq!(
            err.user_message(),
            "❌ Team Principal F1 limit reached for McLaren F1 team (1 max)."
        );
    }

    #[test]
    fn test_persistence_errors_are_hidden() {
        let err = Error::Persistence {
            table: "assignments_f1.json".to_string(),
            message: "disk full".to_string(),
        };
        assert!(!err.is_user_facing());
        assert!(!err.user_message().contains("disk full"));
    }

    #[test]
    fn test_not_assigned_mentions_member() {
        let err = Error::NotAssigned {
            league: League::F2,
            member: MemberId(42),
        };
        assert_eq!(err.to_string(), "<@42> is not signed in F2.");
    }
}
