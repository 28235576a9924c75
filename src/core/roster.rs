//! Roster business logic - who is signed to which team and role in each league.
//!
//! The store owns the assignment tables for both leagues and is the only place
//! the per-slot capacity rule is enforced. Every mutation builds the next table,
//! persists it, and only then swaps it in, so a failed write leaves memory and
//! disk agreeing with each other.

use crate::{
    config::{LeagueConfig, LeaguesConfig, RoleConfig, TeamConfig},
    core::{
        league::{League, MemberId, PerLeague},
        lineup::RosterSnapshot,
    },
    errors::{Error, Result},
    storage::{self, Persistence, Table},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, info, warn};

/// One member's placement in one league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// League the placement belongs to
    pub league: League,
    /// Team name, a key into the league's team list
    pub team: String,
    /// Role name, a key into the league's role list
    pub role: String,
}

impl Assignment {
    /// Whether this assignment occupies the given slot.
    #[must_use]
    pub fn occupies(&self, team: &str, role: &str) -> bool {
        self.team == team && self.role == role
    }
}

/// Assignments of a single league keyed by member.
pub type AssignmentTable = BTreeMap<MemberId, Assignment>;

/// Before/after view of a mutation, used for audit notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterChange {
    /// League that changed
    pub league: League,
    /// Member whose placement changed
    pub member: MemberId,
    /// Placement before the operation
    pub before: Option<Assignment>,
    /// Placement after the operation
    pub after: Option<Assignment>,
}

impl RosterChange {
    /// Whether the operation actually altered the table.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

/// A slot holding more members than its role allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverCapacity {
    /// League of the slot
    pub league: League,
    /// Team of the slot
    pub team: String,
    /// Role of the slot
    pub role: String,
    /// Members currently in the slot
    pub count: usize,
    /// Configured maximum
    pub max: usize,
}

const fn table_for(league: League) -> Table {
    match league {
        League::F1 => Table::AssignmentsF1,
        League::F2 => Table::AssignmentsF2,
    }
}

/// Owner of both leagues' assignment tables.
#[derive(Debug)]
pub struct RosterStore {
    leagues: Arc<LeaguesConfig>,
    assignments: PerLeague<AssignmentTable>,
    persistence: Arc<dyn Persistence>,
}

impl RosterStore {
    /// Loads both assignment tables from `persistence`.
    ///
    /// Persisted state is taken as-is; slots found above capacity are logged but
    /// left alone until the next mutation touches them.
    pub fn open(leagues: Arc<LeaguesConfig>, persistence: Arc<dyn Persistence>) -> Result<Self> {
        let mut assignments = PerLeague::default();
        for league in League::ALL {
            let mut table: AssignmentTable = storage::load_json(&*persistence, table_for(league))?;
            for (member, assignment) in &mut table {
                if assignment.league != league {
                    warn!(%league, member = member.get(), stored = %assignment.league, "Assignment filed under the wrong league, correcting");
                    assignment.league = league;
                }
            }
            debug!(%league, count = table.len(), "Loaded assignments");
            assignments.replace(league, table);
        }

        let store = Self {
            leagues,
            assignments,
            persistence,
        };
        for slot in store.over_capacity_slots() {
            warn!(
                league = %slot.league,
                team = %slot.team,
                role = %slot.role,
                count = slot.count,
                max = slot.max,
                "Loaded roster exceeds role capacity"
            );
        }
        Ok(store)
    }

    /// The member's current assignment in `league`.
    #[must_use]
    pub fn get(&self, league: League, member: MemberId) -> Option<&Assignment> {
        self.assignments.get(league).get(&member)
    }

    /// Every assignment in `league`, ordered by member id.
    pub fn assignments(&self, league: League) -> impl Iterator<Item = (MemberId, &Assignment)> {
        self.assignments
            .get(league)
            .iter()
            .map(|(member, assignment)| (*member, assignment))
    }

    /// Number of assignments in `league`.
    #[must_use]
    pub fn len(&self, league: League) -> usize {
        self.assignments.get(league).len()
    }

    /// Whether `league` has no assignments.
    #[must_use]
    pub fn is_empty(&self, league: League) -> bool {
        self.assignments.get(league).is_empty()
    }

    /// Members currently holding `role` in `team`, counted from the live table.
    #[must_use]
    pub fn count_in_slot(&self, league: League, team: &str, role: &str) -> usize {
        self.assignments
            .get(league)
            .values()
            .filter(|assignment| assignment.occupies(team, role))
            .count()
    }

    /// Signs `member` to `team` as `role`.
    ///
    /// # Errors
    /// `UnknownLeague`, `UnknownTeam`, `UnknownRole`, `AlreadyAssigned`,
    /// `CapacityExceeded`, or `Persistence` when the table cannot be written.
    pub fn assign(
        &mut self,
        league: League,
        member: MemberId,
        team: &str,
        role: &str,
    ) -> Result<RosterChange> {
        let leagues = Arc::clone(&self.leagues);
        let config = leagues.league(league)?;
        let (team, role) = resolve_slot(config, league, team, role)?;

        if let Some(existing) = self.get(league, member) {
            return Err(Error::AlreadyAssigned {
                league,
                member,
                team: existing.team.clone(),
                role: existing.role.clone(),
            });
        }
        self.ensure_capacity(league, team, role)?;

        let assignment = Assignment {
            league,
            team: team.name.clone(),
            role: role.name.clone(),
        };
        let mut table = self.assignments.get(league).clone();
        table.insert(member, assignment.clone());
        self.commit(league, table)?;

        info!(%league, member = member.get(), team = %assignment.team, role = %assignment.role, "Member signed");
        Ok(RosterChange {
            league,
            member,
            before: None,
            after: Some(assignment),
        })
    }

    /// Moves an already signed `member` to a new team and role.
    ///
    /// Moving a member onto the slot they already hold succeeds without writing.
    ///
    /// # Errors
    /// `UnknownLeague`, `NotAssigned`, `UnknownTeam`, `UnknownRole`,
    /// `CapacityExceeded`, or `Persistence`.
    pub fn move_member(
        &mut self,
        league: League,
        member: MemberId,
        team: &str,
        role: &str,
    ) -> Result<RosterChange> {
        let leagues = Arc::clone(&self.leagues);
        let config = leagues.league(league)?;
        let before = self
            .get(league, member)
            .cloned()
            .ok_or(Error::NotAssigned { league, member })?;
        let (team, role) = resolve_slot(config, league, team, role)?;

        if before.occupies(&team.name, &role.name) {
            debug!(%league, member = member.get(), "Move onto the current slot, nothing to do");
            return Ok(RosterChange {
                league,
                member,
                before: Some(before.clone()),
                after: Some(before),
            });
        }
        self.ensure_capacity(league, team, role)?;

        let after = Assignment {
            league,
            team: team.name.clone(),
            role: role.name.clone(),
        };
        let mut table = self.assignments.get(league).clone();
        table.insert(member, after.clone());
        self.commit(league, table)?;

        info!(
            %league,
            member = member.get(),
            from_team = %before.team,
            from_role = %before.role,
            to_team = %after.team,
            to_role = %after.role,
            "Member moved"
        );
        Ok(RosterChange {
            league,
            member,
            before: Some(before),
            after: Some(after),
        })
    }

    /// Removes `member`'s assignment in `league`.
    ///
    /// # Errors
    /// `NotAssigned` or `Persistence`.
    pub fn release(&mut self, league: League, member: MemberId) -> Result<RosterChange> {
        let mut table = self.assignments.get(league).clone();
        let before = table
            .remove(&member)
            .ok_or(Error::NotAssigned { league, member })?;
        self.commit(league, table)?;

        info!(%league, member = member.get(), team = %before.team, "Member released");
        Ok(RosterChange {
            league,
            member,
            before: Some(before),
            after: None,
        })
    }

    /// Clears both leagues.
    pub fn reset(&mut self) -> Result<()> {
        for league in League::ALL {
            self.commit(league, AssignmentTable::new())?;
        }
        info!("Roster reset");
        Ok(())
    }

    /// Derived team-by-team view of `league`.
    pub fn snapshot(&self, league: League) -> Result<RosterSnapshot> {
        let config = self.leagues.league(league)?;
        Ok(RosterSnapshot::build(league, config, self.assignments(league)))
    }

    /// Slots currently holding more members than allowed. Only hand-edited or
    /// stale-config data can produce these.
    #[must_use]
    pub fn over_capacity_slots(&self) -> Vec<OverCapacity> {
        let mut found = Vec::new();
        for (league, config) in self.leagues.configured() {
            for team in &config.teams {
                for role in &config.roles {
                    let count = self.count_in_slot(league, &team.name, &role.name);
                    if count > role.max {
                        found.push(OverCapacity {
                            league,
                            team: team.name.clone(),
                            role: role.name.clone(),
                            count,
                            max: role.max,
                        });
                    }
                }
            }
        }
        found
    }

    /// Callers only ask for a slot the member does not already hold.
    fn ensure_capacity(&self, league: League, team: &TeamConfig, role: &RoleConfig) -> Result<()> {
        if self.count_in_slot(league, &team.name, &role.name) >= role.max {
            return Err(Error::CapacityExceeded {
                team: team.name.clone(),
                role: role.name.clone(),
                max: role.max,
            });
        }
        Ok(())
    }

    fn commit(&mut self, league: League, table: AssignmentTable) -> Result<()> {
        storage::save_json(&*self.persistence, table_for(league), &table)?;
        self.assignments.replace(league, table);
        Ok(())
    }
}

fn resolve_slot<'c>(
    config: &'c LeagueConfig,
    league: League,
    team: &str,
    role: &str,
) -> Result<(&'c TeamConfig, &'c RoleConfig)> {
    let team = config.team(team).ok_or_else(|| Error::UnknownTeam {
        league,
        team: team.to_string(),
    })?;
    let role = config.role(role).ok_or_else(|| Error::UnknownRole {
        league,
        role: role.to_string(),
    })?;
    Ok((team, role))
}
