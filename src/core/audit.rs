//! Audit notifications - one human-readable record per roster or registration change.

use crate::core::{
    league::{League, MemberId},
    registration::Registration,
    roster::{Assignment, RosterChange},
};
use chrono::{DateTime, Utc};
use std::fmt;

/// What kind of change an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// Member signed to a team
    Sign,
    /// Member moved between slots
    Move,
    /// Member released from the league
    Release,
    /// Member registered a car number
    Register,
    /// Member claimed a car number
    Claim,
    /// Member gave up a claimed car number
    Unclaim,
    /// All bot data wiped
    Reset,
}

impl AuditAction {
    /// Embed colour for the action.
    #[must_use]
    pub const fn colour(self) -> u32 {
        match self {
            Self::Sign => 0x0057_F287,     // green
            Self::Move => 0x00E6_7E22,     // orange
            Self::Release => 0x00ED_4245,  // red
            Self::Register => 0x0034_98DB, // blue
            Self::Claim => 0x009B_59B6,    // purple
            Self::Unclaim => 0x0099_2D22,  // dark red
            Self::Reset => 0x0095_A5A6,    // grey
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sign => "Sign",
            Self::Move => "Move",
            Self::Release => "Release",
            Self::Register => "Register",
            Self::Claim => "Claim",
            Self::Unclaim => "Unclaim",
            Self::Reset => "Reset",
        })
    }
}

/// A single mutation, described for the league's update channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// League affected; `None` for a global reset
    pub league: Option<League>,
    /// Kind of change
    pub action: AuditAction,
    /// Member who ran the command
    pub actor: MemberId,
    /// Member the change applies to
    pub target: Option<MemberId>,
    /// Placement before the change
    pub before: Option<String>,
    /// Placement after the change
    pub after: Option<String>,
    /// When the change was made
    pub at: DateTime<Utc>,
}

fn placement(assignment: &Assignment) -> String {
    format!("{} in {}", assignment.role, assignment.team)
}

impl AuditEvent {
    /// Builds the event for a sign, move or release.
    #[must_use]
    pub fn roster(action: AuditAction, actor: MemberId, change: &RosterChange) -> Self {
        Self {
            league: Some(change.league),
            action,
            actor,
            target: Some(change.member),
            before: change.before.as_ref().map(placement),
            after: change.after.as_ref().map(placement),
            at: Utc::now(),
        }
    }

    /// Builds the event for a registration.
    #[must_use]
    pub fn registration(
        actor: MemberId,
        target: MemberId,
        before: Option<&Registration>,
        after: &Registration,
    ) -> Self {
        Self {
            league: Some(after.league),
            action: AuditAction::Register,
            actor,
            target: Some(target),
            before: before.map(Registration::nickname),
            after: Some(after.nickname()),
            at: Utc::now(),
        }
    }

    /// Builds the event for a standalone car-number claim.
    #[must_use]
    pub fn claim(league: League, actor: MemberId, previous: Option<u16>, number: u16) -> Self {
        Self {
            league: Some(league),
            action: AuditAction::Claim,
            actor,
            target: Some(actor),
            before: previous.map(|n| format!("#{n}")),
            after: Some(format!("#{number}")),
            at: Utc::now(),
        }
    }

    /// Builds the event for a dropped car-number claim.
    #[must_use]
    pub fn unclaim(league: League, actor: MemberId, number: u16) -> Self {
        Self {
            league: Some(league),
            action: AuditAction::Unclaim,
            actor,
            target: Some(actor),
            before: Some(format!("#{number}")),
            after: None,
            at: Utc::now(),
        }
    }

    /// Builds the event for a full data reset.
    #[must_use]
    pub fn reset(actor: MemberId) -> Self {
        Self {
            league: None,
            action: AuditAction::Reset,
            actor,
            target: None,
            before: None,
            after: None,
            at: Utc::now(),
        }
    }

    /// Embed title, e.g. `Team Update: Sign`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("Team Update: {}", self.action)
    }

    /// One-line summary of what happened.
    #[must_use]
    pub fn describe(&self) -> String {
        let league = self.league.map(|l| format!(" ({l})")).unwrap_or_default();
        let target = self
            .target
            .map_or_else(|| "everyone".to_string(), |t| t.to_string());
        match (self.action, &self.before, &self.after) {
            (AuditAction::Sign, _, Some(after)) => format!("{target} signed as {after}{league}"),
            (AuditAction::Move, Some(before), Some(after)) => {
                format!("{target} moved from {before} to {after}{league}")
            }
            (AuditAction::Release, Some(before), _) => {
                format!("{target} released from {before}{league}")
            }
            (AuditAction::Register, None, Some(after)) => {
                format!("{target} registered as {after}{league}")
            }
            (AuditAction::Register, Some(before), Some(after)) => {
                format!("{target} re-registered from {before} to {after}{league}")
            }
            (AuditAction::Claim, before, Some(after)) => match before {
                Some(before) => format!("{target} claimed {after} (was {before}){league}"),
                None => format!("{target} claimed {after}{league}"),
            },
            (AuditAction::Unclaim, Some(before), _) => {
                format!("{target} released car number {before}{league}")
            }
            (AuditAction::Reset, _, _) => "All bot data was reset".to_string(),
            (action, _, _) => format!("{action} for {target}{league}"),
        }
    }
}
