use serde::{Deserialize, Serialize};

use super::compendium::RealmId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellComponent {
    Verbal,
    Somatic,
    Material,
}

impl SpellComponent {
    /// "V", "S" or "M".
    pub fn from_abbreviation(s: &str) -> Option<Self> {
        match s {
            "V" => Some(Self::Verbal),
            "S" => Some(Self::Somatic),
            "M" => Some(Self::Material),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub realm: RealmId,
    pub name: String,
    /// `None` for cantrips.
    pub level: Option<i32>,
    pub casting_time: String,
    pub range: String,
    pub components: Vec<SpellComponent>,
    pub material: Option<String>,
    pub ritual: bool,
    pub concentration: bool,
    pub duration: String,
    pub school: String,
    pub description: String,
    pub higher_level_description: Option<String>,
    pub source: Option<String>,
    pub classes: Vec<String>,
}

impl Spell {
    pub fn is_cantrip(&self) -> bool {
        self.level.is_none()
    }
}
