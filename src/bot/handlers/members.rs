//! Discord role grants/revokes and nickname updates for roster changes.

use crate::{
    config::LeagueConfig,
    core::roster::{Assignment, RosterChange},
};
use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

/// Discord roles to add to and remove from a member after a roster change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDelta {
    /// Roles to grant
    pub add: Vec<u64>,
    /// Roles to revoke
    pub remove: Vec<u64>,
}

fn role_ids(config: &LeagueConfig, assignment: Option<&Assignment>) -> Vec<u64> {
    let Some(assignment) = assignment else {
        return Vec::new();
    };
    config
        .team(&assignment.team)
        .map(|team| team.role_id)
        .into_iter()
        .chain(config.role(&assignment.role).map(|role| role.role_id))
        .collect()
}

/// Computes which configured roles change hands. Roles held both before and
/// after (e.g. the team role on a same-team move) are left alone.
#[must_use]
pub fn role_delta(config: &LeagueConfig, change: &RosterChange) -> RoleDelta {
    let before = role_ids(config, change.before.as_ref());
    let after = role_ids(config, change.after.as_ref());
    RoleDelta {
        add: after.iter().copied().filter(|id| !before.contains(id)).collect(),
        remove: before.iter().copied().filter(|id| !after.contains(id)).collect(),
    }
}

/// Applies the role delta for `change`. Failures are logged per role.
pub async fn sync_roles(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    config: &LeagueConfig,
    change: &RosterChange,
) {
    let delta = role_delta(config, change);
    let user_id = serenity::UserId::new(change.member.get());
    debug!(member = change.member.get(), ?delta, "Syncing member roles");

    for role_id in delta.remove {
        if let Err(e) = http
            .remove_member_role(guild_id, user_id, serenity::RoleId::new(role_id), Some("Roster update"))
            .await
        {
            warn!(member = change.member.get(), role_id, "Failed to remove role: {}", e);
        }
    }
    for role_id in delta.add {
        if let Err(e) = http
            .add_member_role(guild_id, user_id, serenity::RoleId::new(role_id), Some("Roster update"))
            .await
        {
            warn!(member = change.member.get(), role_id, "Failed to add role: {}", e);
        }
    }
}

/// Sets a member's server nickname, logging on failure.
pub async fn set_nickname(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    nickname: &str,
) {
    if let Err(e) = guild_id
        .edit_member(ctx, user_id, serenity::EditMember::new().nickname(nickname))
        .await
    {
        warn!(user_id = user_id.get(), "Failed to set nickname: {}", e);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{League, MemberId},
        test_utils::test_config,
    };

    fn assignment(team: &str, role: &str) -> Assignment {
        Assignment {
            league: League::F1,
            team: team.to_string(),
            role: role.to_string(),
        }
    }

    fn change(before: Option<Assignment>, after: Option<Assignment>) -> RosterChange {
        RosterChange {
            league: League::F1,
            member: MemberId(1),
            before,
            after,
        }
    }

    #[test]
    fn test_sign_grants_team_and_role() {
        let config = test_config();
        let f1 = config.leagues.league(League::F1).unwrap();
        let delta = role_delta(f1, &change(None, Some(assignment("McLaren F1 team", "Engineer F1"))));
        assert_eq!(delta.add, vec![101, 113]);
        assert!(delta.remove.is_empty());
    }

    #[test]
    fn test_same_team_move_keeps_team_role() {
        let config = test_config();
        let f1 = config.leagues.league(League::F1).unwrap();
        let delta = role_delta(
            f1,
            &change(
                Some(assignment("McLaren F1 team", "Engineer F1")),
                Some(assignment("McLaren F1 team", "Main Driver F1")),
            ),
        );
        assert_eq!(delta.add, vec![112]);
        assert_eq!(delta.remove, vec![113]);
    }

    #[test]
    fn test_release_revokes_everything() {
        let config = test_config();
        let f1 = config.leagues.league(League::F1).unwrap();
        let delta = role_delta(
            f1,
            &change(Some(assignment("Scuderia Ferrari F1 team", "Team Principal F1")), None),
        );
        assert!(delta.add.is_empty());
        assert_eq!(delta.remove, vec![102, 111]);
    }

    #[test]
    fn test_stale_names_are_skipped() {
        let config = test_config();
        let f1 = config.leagues.league(League::F1).unwrap();
        let delta = role_delta(f1, &change(Some(assignment("Brawn GP", "Engineer F1")), None));
        assert_eq!(delta.remove, vec![113]);
    }
}
