//! Registration business logic - car numbers and display identities.
//!
//! A member registers once per league with a car number, a display name and an
//! optional flag. Numbers can also be claimed on their own, without a full
//! registration; both lists are consulted so a number held through either path
//! blocks the other.

use crate::{
    core::league::{League, MemberId, PerLeague},
    errors::{Error, Result},
    storage::{self, Persistence, Table},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, info};

/// Highest car number a member can pick.
pub const MAX_CAR_NUMBER: u16 = 999;

/// Discord refuses nicknames longer than this many characters.
const NICKNAME_LIMIT: usize = 32;

/// One member's car number and display identity in a league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// League the registration belongs to
    pub league: League,
    /// Car number, unique within the league
    pub car_number: u16,
    /// Name shown next to the number
    pub display_name: String,
    /// Decorative flag, usually an emoji
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

impl Registration {
    /// Server nickname for the member, e.g. `44 | A. Driver 🇬🇧`.
    #[must_use]
    pub fn nickname(&self) -> String {
        let full = match &self.flag {
            Some(flag) => format!("{} | {} {flag}", self.car_number, self.display_name),
            None => format!("{} | {}", self.car_number, self.display_name),
        };
        full.chars().take(NICKNAME_LIMIT).collect()
    }
}

/// Registrations of a single league keyed by member.
pub type RegistrationTable = BTreeMap<MemberId, Registration>;

/// Standalone claims of a single league, car number to holder.
pub type ClaimTable = BTreeMap<u16, MemberId>;

/// Validates a raw car number from a command option.
pub fn parse_car_number(raw: i64) -> Result<u16> {
    u16::try_from(raw)
        .ok()
        .filter(|number| *number <= MAX_CAR_NUMBER)
        .ok_or(Error::InvalidCarNumber { number: raw })
}

/// Owner of registrations and car-number claims for both leagues.
#[derive(Debug)]
pub struct RegistrationBook {
    registrations: PerLeague<RegistrationTable>,
    claims: PerLeague<ClaimTable>,
    persistence: Arc<dyn Persistence>,
}

impl RegistrationBook {
    /// Loads registrations and claims from `persistence`.
    pub fn open(persistence: Arc<dyn Persistence>) -> Result<Self> {
        let registrations: PerLeague<RegistrationTable> =
            storage::load_json(&*persistence, Table::Registrations)?;
        let claims: PerLeague<ClaimTable> =
            storage::load_json(&*persistence, Table::CarNumberClaims)?;
        debug!(
            registrations = League::ALL.iter().map(|l| registrations.get(*l).len()).sum::<usize>(),
            claims = League::ALL.iter().map(|l| claims.get(*l).len()).sum::<usize>(),
            "Loaded registration data"
        );
        Ok(Self {
            registrations,
            claims,
            persistence,
        })
    }

    /// The member's registration in `league`.
    #[must_use]
    pub fn get(&self, league: League, member: MemberId) -> Option<&Registration> {
        self.registrations.get(league).get(&member)
    }

    /// The number the member holds through a standalone claim in `league`.
    #[must_use]
    pub fn claim_of(&self, league: League, member: MemberId) -> Option<u16> {
        self.claims
            .get(league)
            .iter()
            .find_map(|(number, holder)| (*holder == member).then_some(*number))
    }

    /// Every registration in `league`, ordered by member id.
    pub fn registrations(&self, league: League) -> impl Iterator<Item = (MemberId, &Registration)> {
        self.registrations
            .get(league)
            .iter()
            .map(|(member, registration)| (*member, registration))
    }

    /// Whether `number` is held in `league` by anyone other than `excluding`,
    /// through either a registration or a standalone claim.
    #[must_use]
    pub fn is_car_number_taken(&self, league: League, number: u16, excluding: MemberId) -> bool {
        let registered = self
            .registrations
            .get(league)
            .iter()
            .any(|(member, reg)| *member != excluding && reg.car_number == number);
        let claimed = self
            .claims
            .get(league)
            .get(&number)
            .is_some_and(|holder| *holder != excluding);
        registered || claimed
    }

    /// Registers (or re-registers) `member` in `league`, replacing any previous record.
    ///
    /// # Errors
    /// `InvalidDisplayName`, `DuplicateCarNumber` or `Persistence`.
    pub fn register(
        &mut self,
        league: League,
        member: MemberId,
        car_number: u16,
        display_name: &str,
        flag: Option<&str>,
    ) -> Result<Registration> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(Error::InvalidDisplayName);
        }
        if car_number > MAX_CAR_NUMBER {
            return Err(Error::InvalidCarNumber {
                number: i64::from(car_number),
            });
        }
        if self.is_car_number_taken(league, car_number, member) {
            return Err(Error::DuplicateCarNumber {
                league,
                number: car_number,
            });
        }

        let registration = Registration {
            league,
            car_number,
            display_name: display_name.to_string(),
            flag: flag.map(str::trim).filter(|f| !f.is_empty()).map(str::to_string),
        };

        let mut next = self.registrations.clone();
        next.get_mut(league).insert(member, registration.clone());
        storage::save_json(&*self.persistence, Table::Registrations, &next)?;
        self.registrations = next;

        info!(%league, member = member.get(), car_number, "Member registered");
        Ok(registration)
    }

    /// Claims `number` for `member` without a full registration. A member holds
    /// at most one claim per league; the previous claim is returned and dropped.
    ///
    /// # Errors
    /// `InvalidCarNumber`, `DuplicateCarNumber` or `Persistence`.
    pub fn claim(&mut self, league: League, member: MemberId, number: u16) -> Result<Option<u16>> {
        if number > MAX_CAR_NUMBER {
            return Err(Error::InvalidCarNumber {
                number: i64::from(number),
            });
        }
        if self.is_car_number_taken(league, number, member) {
            return Err(Error::DuplicateCarNumber { league, number });
        }

        let previous = self.claim_of(league, member);
        let mut next = self.claims.clone();
        let table = next.get_mut(league);
        if let Some(old) = previous {
            table.remove(&old);
        }
        table.insert(number, member);
        storage::save_json(&*self.persistence, Table::CarNumberClaims, &next)?;
        self.claims = next;

        info!(%league, member = member.get(), number, ?previous, "Car number claimed");
        Ok(previous)
    }

    /// Drops `member`'s standalone claim in `league`, returning the freed number.
    ///
    /// # Errors
    /// `NotClaimed` or `Persistence`.
    pub fn unclaim(&mut self, league: League, member: MemberId) -> Result<u16> {
        let number = self
            .claim_of(league, member)
            .ok_or(Error::NotClaimed { league, member })?;
        let mut next = self.claims.clone();
        next.get_mut(league).remove(&number);
        storage::save_json(&*self.persistence, Table::CarNumberClaims, &next)?;
        self.claims = next;

        info!(%league, member = member.get(), number, "Car number claim dropped");
        Ok(number)
    }

    /// Clears registrations and claims for both leagues.
    pub fn reset(&mut self) -> Result<()> {
        let registrations = PerLeague::default();
        let claims = PerLeague::default();
        storage::save_json(&*self.persistence, Table::Registrations, &registrations)?;
        storage::save_json(&*self.persistence, Table::CarNumberClaims, &claims)?;
        self.registrations = registrations;
        self.claims = claims;
        info!("Registrations reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{storage::MemoryStore, test_utils::*};

    #[test]
    fn test_duplicate_number_in_same_league() {
        let (_, mut book) = setup_registrations();
        book.register(League::F1, MemberId(1), 44, "A. Driver", None)
            .unwrap();
        let err = book
            .register(League::F1, MemberId(2), 44, "B. Driver", None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateCarNumber { league: League::F1, number: 44 }
        ));
    }

    #[test]
    fn test_numbers_are_scoped_per_league() {
        let (_, mut book) = setup_registrations();
        book.register(League::F1, MemberId(1), 44, "A. Driver", None)
            .unwrap();
        let reg = book
            .register(League::F2, MemberId(2), 44, "B. Driver", None)
            .unwrap();
        assert_eq!(reg.car_number, 44);
        assert!(book.is_car_number_taken(League::F2, 44, MemberId(1)));
        assert!(!book.is_car_number_taken(League::F2, 44, MemberId(2)));
    }

    #[test]
    fn test_reregister_replaces_record() {
        let (_, mut book) = setup_registrations();
        book.register(League::F1, MemberId(1), 44, "A. Driver", Some("🇬🇧"))
            .unwrap();
        book.register(League::F1, MemberId(1), 63, "  A. Driver  ", None)
            .unwrap();

        let reg = book.get(League::F1, MemberId(1)).unwrap();
        assert_eq!(reg.car_number, 63);
        assert_eq!(reg.display_name, "A. Driver");
        assert_eq!(reg.flag, None);
        // 44 is free again
        book.register(League::F1, MemberId(2), 44, "C. Driver", None)
            .unwrap();
        assert_eq!(book.registrations(League::F1).count(), 2);
    }

    #[test]
    fn test_claim_blocks_registration_and_back() {
        let (_, mut book) = setup_registrations();
        book.claim(League::F1, MemberId(1), 7).unwrap();
        assert!(matches!(
            book.register(League::F1, MemberId(2), 7, "B. Driver", None),
            Err(Error::DuplicateCarNumber { .. })
        ));

        book.register(League::F1, MemberId(2), 8, "B. Driver", None)
            .unwrap();
        assert!(matches!(
            book.claim(League::F1, MemberId(1), 8),
            Err(Error::DuplicateCarNumber { .. })
        ));

        // The claimant may register their own number
        book.register(League::F1, MemberId(1), 7, "A. Driver", None)
            .unwrap();
    }

    #[test]
    fn test_new_claim_replaces_old() {
        let (_, mut book) = setup_registrations();
        assert_eq!(book.claim(League::F2, MemberId(1), 5).unwrap(), None);
        assert_eq!(book.claim(League::F2, MemberId(1), 6).unwrap(), Some(5));
        assert_eq!(book.claim_of(League::F2, MemberId(1)), Some(6));
        assert!(!book.is_car_number_taken(League::F2, 5, MemberId(2)));

        assert_eq!(book.unclaim(League::F2, MemberId(1)).unwrap(), 6);
        assert!(matches!(
            book.unclaim(League::F2, MemberId(1)),
            Err(Error::NotClaimed { .. })
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let (_, mut book) = setup_registrations();
        assert!(matches!(
            book.register(League::F1, MemberId(1), 12, "   ", None),
            Err(Error::InvalidDisplayName)
        ));
        assert!(matches!(
            book.register(League::F1, MemberId(1), 1000, "A", None),
            Err(Error::InvalidCarNumber { number: 1000 })
        ));
        assert!(matches!(parse_car_number(-1), Err(Error::InvalidCarNumber { number: -1 })));
        assert!(matches!(parse_car_number(70_000), Err(Error::InvalidCarNumber { .. })));
        assert_eq!(parse_car_number(0).unwrap(), 0);
        assert_eq!(parse_car_number(999).unwrap(), 999);
    }

    #[test]
    fn test_nickname_format() {
        let reg = Registration {
            league: League::F1,
            car_number: 44,
            display_name: "A. Driver".to_string(),
            flag: Some("🇬🇧".to_string()),
        };
        assert_eq!(reg.nickname(), "44 | A. Driver 🇬🇧");

        let long = Registration {
            flag: None,
            display_name: "x".repeat(40),
            ..reg
        };
        assert_eq!(long.nickname().chars().count(), 32);
    }

    #[test]
    fn test_reload_reproduces_registrations_and_claims() {
        let store = Arc::new(MemoryStore::new());
        let persistence: Arc<dyn Persistence> = store.clone();
        let mut book = RegistrationBook::open(Arc::clone(&persistence)).unwrap();
        book.register(League::F1, MemberId(1), 44, "A. Driver", Some("🇳🇱"))
            .unwrap();
        book.register(League::F2, MemberId(2), 1, "B. Driver", None)
            .unwrap();
        book.claim(League::F2, MemberId(3), 99).unwrap();

        let reloaded = RegistrationBook::open(persistence).unwrap();
        for league in League::ALL {
            let expected: Vec<_> = book.registrations(league).collect();
            let actual: Vec<_> = reloaded.registrations(league).collect();
            assert_eq!(expected, actual);
        }
        assert_eq!(reloaded.claim_of(League::F2, MemberId(3)), Some(99));
        assert!(store.raw(Table::CarNumberClaims).unwrap().contains("\"99\": 3"));
    }

    #[test]
    fn test_failed_write_keeps_previous_registration() {
        let (store, mut book) = setup_registrations();
        book.register(League::F1, MemberId(1), 44, "A. Driver", None)
            .unwrap();
        store.set_fail_saves(true);
        assert!(matches!(
            book.register(League::F1, MemberId(1), 12, "A. Driver", None),
            Err(Error::Persistence { .. })
        ));
        assert_eq!(book.get(League::F1, MemberId(1)).unwrap().car_number, 44);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (_, mut book) = setup_registrations();
        book.register(League::F1, MemberId(1), 44, "A. Driver", None)
            .unwrap();
        book.claim(League::F1, MemberId(2), 3).unwrap();
        book.reset().unwrap();
        assert!(book.get(League::F1, MemberId(1)).is_none());
        assert_eq!(book.claim_of(League::F1, MemberId(2)), None);
    }
}
