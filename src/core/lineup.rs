//! Lineup views - the derived team-by-team roster and the live embed board.
//!
//! Snapshots are never stored; they are rebuilt from the assignment table each
//! time a lineup is rendered. The board only remembers which message currently
//! shows each league's lineup so it can be edited in place.

use crate::{
    config::LeagueConfig,
    core::{
        league::{League, MemberId, PerLeague},
        roster::Assignment,
    },
    errors::Result,
    storage::{self, Persistence, Table},
};
use std::{fmt::Write, sync::Arc};
use tracing::debug;

/// Placeholder shown for a team with nobody signed.
pub const EMPTY_TEAM_TEXT: &str = "No members yet.";

/// One member line within a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupEntry {
    /// Signed member
    pub member: MemberId,
    /// Role held in the team
    pub role: String,
}

/// All members of one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLineup {
    /// Team name
    pub team: String,
    /// Members sorted by configured role order, then member id
    pub entries: Vec<LineupEntry>,
}

/// Grouping of a league's assignments by team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSnapshot {
    /// League the snapshot describes
    pub league: League,
    /// Configured teams, in configured order
    pub teams: Vec<TeamLineup>,
    /// Assignments naming a team that is no longer configured
    pub unlisted: Vec<(String, LineupEntry)>,
}

impl RosterSnapshot {
    /// Groups `assignments` by the league's configured teams.
    pub fn build<'a>(
        league: League,
        config: &LeagueConfig,
        assignments: impl IntoIterator<Item = (MemberId, &'a Assignment)>,
    ) -> Self {
        let mut teams: Vec<TeamLineup> = config
            .teams
            .iter()
            .map(|team| TeamLineup {
                team: team.name.clone(),
                entries: Vec::new(),
            })
            .collect();
        let mut unlisted = Vec::new();

        for (member, assignment) in assignments {
            let entry = LineupEntry {
                member,
                role: assignment.role.clone(),
            };
            match teams.iter_mut().find(|t| t.team == assignment.team) {
                Some(team) => team.entries.push(entry),
                None => unlisted.push((assignment.team.clone(), entry)),
            }
        }

        for team in &mut teams {
            team.entries
                .sort_by_key(|entry| (config.role_rank(&entry.role), entry.member));
        }

        Self {
            league,
            teams,
            unlisted,
        }
    }

    /// Total number of signed members in the snapshot.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.teams.iter().map(|t| t.entries.len()).sum::<usize>() + self.unlisted.len()
    }

    /// Renders the snapshot as embed-ready text.
    pub fn render(&self) -> Result<LineupView> {
        let mut fields = Vec::with_capacity(self.teams.len() + 1);
        for team in &self.teams {
            let mut value = String::new();
            for entry in &team.entries {
                writeln!(&mut value, "{} - {}", entry.member, entry.role)?;
            }
            if value.is_empty() {
                value.push_str(EMPTY_TEAM_TEXT);
            }
            fields.push((team.team.clone(), value.trim_end().to_string()));
        }

        if !self.unlisted.is_empty() {
            let mut value = String::new();
            for (team, entry) in &self.unlisted {
                writeln!(&mut value, "{} - {} ({team})", entry.member, entry.role)?;
            }
            fields.push(("Unlisted teams".to_string(), value.trim_end().to_string()));
        }

        Ok(LineupView {
            title: format!("{} Live Team Lineup", self.league),
            fields,
            footer: format!(
                "{} member{} signed",
                self.member_count(),
                if self.member_count() == 1 { "" } else { "s" }
            ),
        })
    }
}

/// Framework-agnostic content of a lineup embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupView {
    /// Embed title
    pub title: String,
    /// (team name, member lines) per field
    pub fields: Vec<(String, String)>,
    /// Footer text
    pub footer: String,
}

/// Remembers which message shows each league's live lineup.
#[derive(Debug)]
pub struct LiveLineupBoard {
    messages: PerLeague<Option<u64>>,
    persistence: Arc<dyn Persistence>,
}

impl LiveLineupBoard {
    /// Loads the stored message ids.
    pub fn open(persistence: Arc<dyn Persistence>) -> Result<Self> {
        let messages = storage::load_json(&*persistence, Table::LiveLineups)?;
        Ok(Self {
            messages,
            persistence,
        })
    }

    /// Message currently showing `league`'s lineup.
    #[must_use]
    pub fn get(&self, league: League) -> Option<u64> {
        *self.messages.get(league)
    }

    /// Records the message now showing `league`'s lineup.
    pub fn set(&mut self, league: League, message_id: u64) -> Result<()> {
        let mut next = self.messages.clone();
        next.replace(league, Some(message_id));
        storage::save_json(&*self.persistence, Table::LiveLineups, &next)?;
        self.messages = next;
        debug!(%league, message_id, "Live lineup message updated");
        Ok(())
    }

    /// Forgets every lineup message.
    pub fn reset(&mut self) -> Result<()> {
        let cleared = PerLeague::default();
        storage::save_json(&*self.persistence, Table::LiveLineups, &cleared)?;
        self.messages = cleared;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{storage::MemoryStore, test_utils::*};

    #[test]
    fn test_snapshot_groups_by_configured_team_order() {
        let (_, mut roster) = setup_roster();
        roster
            .assign(League::F1, MemberId(30), "Scuderia Ferrari F1 team", "Engineer F1")
            .unwrap();
        roster
            .assign(League::F1, MemberId(20), "Scuderia Ferrari F1 team", "Team Principal F1")
            .unwrap();
        roster
            .assign(League::F1, MemberId(10), "Scuderia Ferrari F1 team", "Engineer F1")
            .unwrap();

        let snapshot = roster.snapshot(League::F1).unwrap();
        assert_eq!(snapshot.teams[0].team, "McLaren F1 team");
        assert!(snapshot.teams[0].entries.is_empty());

        let ferrari: Vec<_> = snapshot.teams[1]
            .entries
            .iter()
            .map(|e| e.member)
            .collect();
        assert_eq!(ferrari, vec![MemberId(20), MemberId(10), MemberId(30)]);
        assert_eq!(snapshot.member_count(), 3);
    }

    #[test]
    fn test_render_lineup() {
        let (_, mut roster) = setup_roster();
        roster
            .assign(League::F2, MemberId(5), "McLaren F2 team", "Main Driver F2")
            .unwrap();

        let view = roster.snapshot(League::F2).unwrap().render().unwrap();
        assert_eq!(view.title, "F2 Live Team Lineup");
        assert_eq!(
            view.fields[0],
            ("McLaren F2 team".to_string(), "<@5> - Main Driver F2".to_string())
        );
        assert_eq!(view.fields[1].1, EMPTY_TEAM_TEXT);
        assert_eq!(view.footer, "1 member signed");
    }

    #[test]
    fn test_unconfigured_team_is_unlisted() {
        let config = test_config();
        let f1 = config.leagues.league(League::F1).unwrap();
        let stale = Assignment {
            league: League::F1,
            team: "Brawn GP".to_string(),
            role: "Main Driver F1".to_string(),
        };
        let snapshot = RosterSnapshot::build(League::F1, f1, [(MemberId(9), &stale)]);
        assert_eq!(snapshot.unlisted.len(), 1);

        let view = snapshot.render().unwrap();
        let (name, value) = view.fields.last().unwrap();
        assert_eq!(name, "Unlisted teams");
        assert!(value.contains("Brawn GP"));
    }

    #[test]
    fn test_board_persists_message_ids() {
        let store = Arc::new(MemoryStore::new());
        let persistence: Arc<dyn Persistence> = store.clone();
        let mut board = LiveLineupBoard::open(Arc::clone(&persistence)).unwrap();
        assert_eq!(board.get(League::F1), None);

        board.set(League::F1, 1234).unwrap();
        board.set(League::F1, 4321).unwrap();

        let reloaded = LiveLineupBoard::open(persistence).unwrap();
        assert_eq!(reloaded.get(League::F1), Some(4321));
        assert_eq!(reloaded.get(League::F2), None);

        board.reset().unwrap();
        assert_eq!(
            store.raw(Table::LiveLineups).as_deref(),
            Some("{\n  \"F1\": null,\n  \"F2\": null\n}")
        );
    }
}
