use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::creature::{
    Ability, AbilityScores, Alignment, Armor, CreatureAction, CreatureFeature, CreatureSize,
    Initiative, Legendary, Modifier, MovementMode, Skill,
};
use super::dice::DiceExpression;
use super::fraction::Fraction;

/// Creature statistics shared by monsters and characters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBlock {
    pub name: String,
    pub size: Option<CreatureSize>,
    #[serde(rename = "type")]
    pub creature_type: Option<String>,
    pub subtype: Option<String>,
    pub alignment: Option<Alignment>,

    pub armor_class: Option<i32>,
    pub armor: Vec<Armor>,
    pub hit_point_dice: Option<DiceExpression>,
    pub hit_points: Option<i32>,
    pub movement: Option<BTreeMap<MovementMode, i32>>,

    pub ability_scores: Option<AbilityScores>,
    pub saving_throws: BTreeMap<Ability, Modifier>,
    pub skills: BTreeMap<Skill, Modifier>,
    pub initiative: Option<Initiative>,

    pub damage_vulnerabilities: Option<String>,
    pub damage_resistances: Option<String>,
    pub damage_immunities: Option<String>,
    pub condition_immunities: Option<String>,

    pub senses: Option<String>,
    pub languages: Option<String>,

    pub challenge_rating: Option<Fraction>,

    pub features: Vec<CreatureFeature>,
    pub actions: Vec<CreatureAction>,
    pub reactions: Vec<CreatureAction>,
    pub legendary: Option<Legendary>,
}

impl StatBlock {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Explicit saving throw modifier, falling back to the raw ability modifier.
    pub fn saving_throw_modifier(&self, ability: Ability) -> Option<Modifier> {
        self.saving_throws
            .get(&ability)
            .copied()
            .or_else(|| self.ability_scores.map(|s| s.score(ability).modifier()))
    }

    /// Explicit skill modifier, falling back to the governing ability modifier.
    pub fn skill_modifier(&self, skill: Skill) -> Option<Modifier> {
        self.skills
            .get(&skill)
            .copied()
            .or_else(|| self.ability_scores.map(|s| s.score(skill.ability()).modifier()))
    }
}
