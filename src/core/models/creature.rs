//! Creature vocabulary
//!
//! Sizes, alignments, movement modes, abilities, skills, armor and the other
//! small value types shared by monsters and player characters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Size
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureSize {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl CreatureSize {
    /// Parse a full size name or its single-letter abbreviation, case-insensitively.
    pub fn from_english(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tiny" | "t" => Some(Self::Tiny),
            "small" | "s" => Some(Self::Small),
            "medium" | "m" => Some(Self::Medium),
            "large" | "l" => Some(Self::Large),
            "huge" | "h" => Some(Self::Huge),
            "gargantuan" | "g" => Some(Self::Gargantuan),
            _ => None,
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Self::Tiny => "Tiny",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Huge => "Huge",
            Self::Gargantuan => "Gargantuan",
        }
    }
}

// ============================================================================
// Alignment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    LawfulGood,
    NeutralGood,
    ChaoticGood,
    LawfulNeutral,
    Neutral,
    ChaoticNeutral,
    LawfulEvil,
    NeutralEvil,
    ChaoticEvil,
    Unaligned,
    Any,
}

impl Alignment {
    /// Parse phrases like "chaotic evil", "neutral", "unaligned" and "any alignment".
    pub fn from_english(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "any alignment" => return Some(Self::Any),
            "unaligned" => return Some(Self::Unaligned),
            "neutral" => return Some(Self::Neutral),
            _ => {}
        }

        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            ["lawful", "good"] => Some(Self::LawfulGood),
            ["neutral", "good"] => Some(Self::NeutralGood),
            ["chaotic", "good"] => Some(Self::ChaoticGood),
            ["lawful", "neutral"] => Some(Self::LawfulNeutral),
            ["neutral", "neutral"] => Some(Self::Neutral),
            ["chaotic", "neutral"] => Some(Self::ChaoticNeutral),
            ["lawful", "evil"] => Some(Self::LawfulEvil),
            ["neutral", "evil"] => Some(Self::NeutralEvil),
            ["chaotic", "evil"] => Some(Self::ChaoticEvil),
            _ => None,
        }
    }

    /// Character sheet alignment ids, 1 (lawful good) through 9 (chaotic evil).
    pub fn from_sheet_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::LawfulGood),
            2 => Some(Self::NeutralGood),
            3 => Some(Self::ChaoticGood),
            4 => Some(Self::LawfulNeutral),
            5 => Some(Self::Neutral),
            6 => Some(Self::ChaoticNeutral),
            7 => Some(Self::LawfulEvil),
            8 => Some(Self::NeutralEvil),
            9 => Some(Self::ChaoticEvil),
            _ => None,
        }
    }
}

// ============================================================================
// Movement
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    Walk,
    Fly,
    Swim,
    Climb,
    Burrow,
}

impl MovementMode {
    pub fn from_english(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "walk" => Some(Self::Walk),
            "fly" => Some(Self::Fly),
            "swim" => Some(Self::Swim),
            "climb" => Some(Self::Climb),
            "burrow" => Some(Self::Burrow),
            _ => None,
        }
    }
}

// ============================================================================
// Abilities & Skills
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Strength => "str",
            Self::Dexterity => "dex",
            Self::Constitution => "con",
            Self::Intelligence => "int",
            Self::Wisdom => "wis",
            Self::Charisma => "cha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Dexterity => "Dexterity",
            Self::Constitution => "Constitution",
            Self::Intelligence => "Intelligence",
            Self::Wisdom => "Wisdom",
            Self::Charisma => "Charisma",
        }
    }

    /// Accepts abbreviations ("Dex") and full names ("Dexterity").
    pub fn from_english(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.abbreviation() == s || a.display_name().to_lowercase() == s)
    }

    /// Character sheet stat ids, 1 (strength) through 6 (charisma).
    pub fn from_sheet_id(id: i64) -> Option<Self> {
        match id {
            1..=6 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    pub const ALL: [Skill; 18] = [
        Skill::Acrobatics,
        Skill::AnimalHandling,
        Skill::Arcana,
        Skill::Athletics,
        Skill::Deception,
        Skill::History,
        Skill::Insight,
        Skill::Intimidation,
        Skill::Investigation,
        Skill::Medicine,
        Skill::Nature,
        Skill::Perception,
        Skill::Performance,
        Skill::Persuasion,
        Skill::Religion,
        Skill::SleightOfHand,
        Skill::Stealth,
        Skill::Survival,
    ];

    pub fn ability(&self) -> Ability {
        match self {
            Self::Athletics => Ability::Strength,
            Self::Acrobatics | Self::SleightOfHand | Self::Stealth => Ability::Dexterity,
            Self::Arcana | Self::History | Self::Investigation | Self::Nature | Self::Religion => {
                Ability::Intelligence
            }
            Self::AnimalHandling | Self::Insight | Self::Medicine | Self::Perception | Self::Survival => {
                Ability::Wisdom
            }
            Self::Deception | Self::Intimidation | Self::Performance | Self::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Acrobatics => "Acrobatics",
            Self::AnimalHandling => "Animal Handling",
            Self::Arcana => "Arcana",
            Self::Athletics => "Athletics",
            Self::Deception => "Deception",
            Self::History => "History",
            Self::Insight => "Insight",
            Self::Intimidation => "Intimidation",
            Self::Investigation => "Investigation",
            Self::Medicine => "Medicine",
            Self::Nature => "Nature",
            Self::Perception => "Perception",
            Self::Performance => "Performance",
            Self::Persuasion => "Persuasion",
            Self::Religion => "Religion",
            Self::SleightOfHand => "Sleight of Hand",
            Self::Stealth => "Stealth",
            Self::Survival => "Survival",
        }
    }

    /// Case-insensitive, whitespace-insensitive name lookup ("sleight of hand", "SleightOfHand").
    pub fn from_english(s: &str) -> Option<Self> {
        let normalize = |s: &str| -> String {
            s.chars()
                .filter(|c| !c.is_whitespace() && *c != '_')
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|skill| normalize(skill.display_name()) == wanted)
    }
}

/// An ability or save/skill modifier, e.g. `+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifier(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityScore(pub i32);

impl AbilityScore {
    pub fn modifier(&self) -> Modifier {
        // floor((score - 10) / 2) without overflowing at the i32 extremes
        Modifier(self.0.div_euclid(2) - 5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: AbilityScore,
    pub dexterity: AbilityScore,
    pub constitution: AbilityScore,
    pub intelligence: AbilityScore,
    pub wisdom: AbilityScore,
    pub charisma: AbilityScore,
}

impl AbilityScores {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: AbilityScore(str),
            dexterity: AbilityScore(dex),
            constitution: AbilityScore(con),
            intelligence: AbilityScore(int),
            wisdom: AbilityScore(wis),
            charisma: AbilityScore(cha),
        }
    }

    pub fn score(&self, ability: Ability) -> AbilityScore {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn score_mut(&mut self, ability: Ability) -> &mut AbilityScore {
        match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        }
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Armor
// ============================================================================

/// How a piece of armor contributes to armor class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArmorClass {
    pub base: Option<i32>,
    pub add_dex: bool,
    pub max_dex: Option<i32>,
    pub bonus: i32,
}

impl ArmorClass {
    pub fn base(base: i32, add_dex: bool, max_dex: Option<i32>) -> Self {
        Self {
            base: Some(base),
            add_dex,
            max_dex,
            bonus: 0,
        }
    }

    pub fn bonus(bonus: i32) -> Self {
        Self {
            base: None,
            add_dex: false,
            max_dex: None,
            bonus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub armor_class: ArmorClass,
    pub required_strength: Option<i32>,
    pub imposes_stealth_disadvantage: bool,
}

impl Armor {
    /// Armor known only by name and a flat class, e.g. "natural armor" at 15.
    pub fn named(name: impl Into<String>, armor_class: i32) -> Self {
        Self {
            name: name.into(),
            armor_class: ArmorClass::base(armor_class, false, None),
            required_strength: None,
            imposes_stealth_disadvantage: false,
        }
    }

    fn standard(
        name: &str,
        armor_class: ArmorClass,
        required_strength: Option<i32>,
        stealth_disadvantage: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            armor_class,
            required_strength,
            imposes_stealth_disadvantage: stealth_disadvantage,
        }
    }

    /// The standard armor table used for character sheets.
    pub fn all_standard() -> Vec<Armor> {
        vec![
            Self::standard("Padded", ArmorClass::base(11, true, None), None, true),
            Self::standard("Leather", ArmorClass::base(11, true, None), None, false),
            Self::standard("Studded Leather", ArmorClass::base(12, true, None), None, false),
            Self::standard("Hide", ArmorClass::base(12, true, Some(2)), None, false),
            Self::standard("Chain Mail", ArmorClass::base(16, false, None), Some(13), true),
            Self::standard("Shield", ArmorClass::bonus(2), None, false),
        ]
    }

    pub fn standard_named(name: &str) -> Option<Armor> {
        Self::all_standard().into_iter().find(|a| a.name == name)
    }

    /// Armor class granted by this armor for a wearer with `dexterity`.
    /// `None` for pure bonus items such as shields.
    pub fn effective_armor_class(&self, dexterity: AbilityScore) -> Option<i32> {
        let base = self.armor_class.base?;
        if !self.armor_class.add_dex {
            return Some(base);
        }
        let dex = dexterity.modifier().0;
        Some(match self.armor_class.max_dex {
            Some(max) => base + dex.min(max),
            None => base + dex,
        })
    }
}

// ============================================================================
// Features, actions & initiative
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Initiative {
    pub modifier: Modifier,
    pub advantage: bool,
}

/// A passive trait, e.g. "Pack Tactics".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureFeature {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

/// An action, reaction or legendary action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureAction {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Legendary {
    pub description: Option<String>,
    pub actions: Vec<CreatureAction>,
}
