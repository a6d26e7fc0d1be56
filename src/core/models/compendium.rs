use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fraction::Fraction;
use super::spell::Spell;
use super::stat_block::StatBlock;

/// Names the collection an imported record belongs to, e.g. "core" or "homebrew".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealmId(pub String);

impl RealmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RealmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RealmId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub realm: RealmId,
    pub stats: StatBlock,
    pub challenge_rating: Fraction,
}

/// A player character imported from a character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: Uuid,
    pub realm: RealmId,
    pub level: Option<i32>,
    pub stats: StatBlock,
}

/// Any record a reader can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompendiumItem {
    Monster(Monster),
    Spell(Spell),
    Character(Character),
}

impl CompendiumItem {
    pub fn title(&self) -> &str {
        match self {
            Self::Monster(m) => &m.stats.name,
            Self::Spell(s) => &s.name,
            Self::Character(c) => &c.stats.name,
        }
    }

    pub fn realm(&self) -> &RealmId {
        match self {
            Self::Monster(m) => &m.realm,
            Self::Spell(s) => &s.realm,
            Self::Character(c) => &c.realm,
        }
    }
}
