//! League and member identifiers shared by every store.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the two parallel competitions run by the community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum League {
    /// The F1 league
    F1,
    /// The F2 league
    F2,
}

impl League {
    /// Every league, in display order.
    pub const ALL: [Self; 2] = [Self::F1, Self::F2];

    /// Short name as used in commands and file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::F1 => "F1",
            Self::F2 => "F2",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for League {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "F1" => Ok(Self::F1),
            "F2" => Ok(Self::F2),
            _ => Err(Error::UnknownLeague {
                league: s.to_string(),
            }),
        }
    }
}

/// Discord user id of a community member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl MemberId {
    /// Raw snowflake value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Renders as a Discord mention.
impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<@{}>", self.0)
    }
}

/// One value per league, serialised as `{"F1": .., "F2": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerLeague<T> {
    #[serde(rename = "F1", default)]
    f1: T,
    #[serde(rename = "F2", default)]
    f2: T,
}

impl<T> PerLeague<T> {
    /// Value for `league`.
    pub const fn get(&self, league: League) -> &T {
        match league {
            League::F1 => &self.f1,
            League::F2 => &self.f2,
        }
    }

    /// Mutable value for `league`.
    pub const fn get_mut(&mut self, league: League) -> &mut T {
        match league {
            League::F1 => &mut self.f1,
            League::F2 => &mut self.f2,
        }
    }

    /// Replaces the value for `league`, returning the old one.
    pub const fn replace(&mut self, league: League, value: T) -> T {
        std::mem::replace(self.get_mut(league), value)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_league_case_insensitive() {
        assert_eq!("f1".parse::<League>().unwrap(), League::F1);
        assert_eq!(" F2 ".parse::<League>().unwrap(), League::F2);
    }

    #[test]
    fn test_parse_unknown_league() {
        let err = "F3".parse::<League>().unwrap_err();
        assert!(matches!(err, Error::UnknownLeague { league } if league == "F3"));
    }

    #[test]
    fn test_member_id_serializes_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(MemberId(902_878_740_659_441_674), "x");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"902878740659441674":"x"}"#);

        let back: std::collections::BTreeMap<MemberId, String> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(back[&MemberId(902_878_740_659_441_674)], "x");
    }

    #[test]
    fn test_per_league_json_shape() {
        let mut pair: PerLeague<Option<u64>> = PerLeague::default();
        pair.replace(League::F2, Some(7));
        assert_eq!(serde_json::to_string(&pair).unwrap(), r#"{"F1":null,"F2":7}"#);

        let partial: PerLeague<Option<u64>> = serde_json::from_str(r#"{"F1":3}"#).unwrap();
        assert_eq!(*partial.get(League::F1), Some(3));
        assert_eq!(*partial.get(League::F2), None);
    }
}
