//! D&D Beyond Character Reader
//!
//! A character sheet export is one JSON object describing one character.
//! Most derived numbers (ability scores, armor class, hit points) are not
//! stored on the sheet and are recomputed from base values and modifiers.

use std::collections::BTreeMap;

use bytes::Bytes;
use futures::stream::StreamExt;
use serde::Deserialize;

use crate::core::models::{
    Ability, AbilityScores, Alignment, Armor, Character, CompendiumItem, CreatureSize,
    DiceExpression, MovementMode, RealmId, StatBlock,
};

use super::{CompendiumReader, IdGenerator, ReaderOutput, ReaderStream};

// ============================================================================
// Sheet schema
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterSheet {
    name: String,
    race: Race,
    alignment_id: Option<i64>,

    #[serde(default)]
    stats: Vec<Stat>,
    #[serde(default)]
    bonus_stats: Vec<Stat>,
    #[serde(default)]
    override_stats: Vec<Stat>,

    #[serde(default)]
    inventory: Vec<InventoryItem>,
    #[serde(default)]
    classes: Vec<ClassLevel>,
    #[serde(default)]
    modifiers: Modifiers,

    #[serde(default)]
    base_hit_points: i32,
    bonus_hit_points: Option<i32>,
    override_hit_points: Option<i32>,
    #[serde(default)]
    removed_hit_points: i32,
    #[serde(default)]
    temporary_hit_points: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Race {
    size: String,
    base_name: String,
    sub_race_short_name: Option<String>,
    #[serde(default)]
    weight_speeds: WeightSpeeds,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WeightSpeeds {
    #[serde(default)]
    normal: Speeds,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Speeds {
    walk: i32,
    fly: i32,
    burrow: i32,
    swim: i32,
    climb: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct Stat {
    id: i64,
    value: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
struct InventoryItem {
    #[serde(default)]
    equipped: bool,
    definition: ItemDefinition,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDefinition {
    armor_class: Option<i32>,
    base_armor_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClassLevel {
    level: i32,
    definition: ClassDefinition,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassDefinition {
    hit_dice: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Modifiers {
    race: Vec<SheetModifier>,
    class: Vec<SheetModifier>,
    background: Vec<SheetModifier>,
    item: Vec<SheetModifier>,
    feat: Vec<SheetModifier>,
}

impl Modifiers {
    fn all(&self) -> impl Iterator<Item = &SheetModifier> {
        self.race
            .iter()
            .chain(&self.class)
            .chain(&self.background)
            .chain(&self.item)
            .chain(&self.feat)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetModifier {
    #[serde(rename = "type")]
    kind: String,
    sub_type: String,
    value: Option<i32>,
    #[serde(default)]
    is_granted: bool,
}

impl SheetModifier {
    /// The modifier's value if it is of the given kind and sub-type.
    fn value_for(&self, kind: &str, sub_type: &str) -> Option<i32> {
        (self.kind == kind && self.sub_type == sub_type)
            .then_some(self.value)
            .flatten()
    }
}

// ============================================================================
// Derived values
// ============================================================================

/// A derived value, or the invalid-item description when its arithmetic overflows.
type Derived<T> = Result<T, String>;

impl CharacterSheet {
    fn out_of_range(&self, what: &str) -> String {
        format!("character {}: {what} out of range", self.name)
    }

    fn level(&self) -> Derived<i32> {
        self.classes
            .iter()
            .try_fold(0i32, |total, class| total.checked_add(class.level))
            .ok_or_else(|| self.out_of_range("level"))
    }

    fn ability_scores(&self) -> Derived<AbilityScores> {
        let mut scores = AbilityScores::default();

        for stat in &self.stats {
            if let (Some(ability), Some(value)) = (Ability::from_sheet_id(stat.id), stat.value) {
                scores.score_mut(ability).0 = value;
            }
        }

        let add = |scores: &mut AbilityScores, ability: Ability, value: i32| -> Derived<()> {
            let score = scores.score_mut(ability);
            score.0 = score.0.checked_add(value).ok_or_else(|| {
                self.out_of_range(&format!("{} score", ability.display_name().to_lowercase()))
            })?;
            Ok(())
        };

        for stat in &self.bonus_stats {
            if let (Some(ability), Some(value)) = (Ability::from_sheet_id(stat.id), stat.value) {
                add(&mut scores, ability, value)?;
            }
        }

        for modifier in self.modifiers.all() {
            for ability in Ability::ALL {
                let sub_type = format!("{}-score", ability.display_name().to_lowercase());
                if let Some(value) = modifier.value_for("bonus", &sub_type) {
                    add(&mut scores, ability, value)?;
                }
            }
        }

        for stat in &self.override_stats {
            if let (Some(ability), Some(value)) = (Ability::from_sheet_id(stat.id), stat.value) {
                scores.score_mut(ability).0 = value;
            }
        }

        Ok(scores)
    }

    /// Equipped items that are known armor.
    fn armor(&self) -> Vec<Armor> {
        self.inventory
            .iter()
            .filter(|item| item.equipped && item.definition.armor_class.is_some())
            .filter_map(|item| {
                item.definition
                    .base_armor_name
                    .as_deref()
                    .and_then(Armor::standard_named)
            })
            .collect()
    }

    fn armor_class(&self, armor: &[Armor], scores: &AbilityScores) -> Derived<i32> {
        let overflow = || self.out_of_range("armor class");

        let base = armor
            .iter()
            .filter_map(|a| a.effective_armor_class(scores.dexterity))
            .max()
            .unwrap_or(10 + scores.dexterity.modifier().0);
        let armor_bonus = armor
            .iter()
            .try_fold(0i32, |total, a| total.checked_add(a.armor_class.bonus))
            .ok_or_else(overflow)?;

        let mut armor_class = base.checked_add(armor_bonus).ok_or_else(overflow)?;
        for modifier in self.modifiers.all() {
            if let Some(value) = modifier.value_for("bonus", "armor-class") {
                if modifier.is_granted {
                    armor_class = armor_class.checked_add(value).ok_or_else(overflow)?;
                }
            } else if let Some(value) = modifier.value_for("set", "unarmored-armor-class") {
                if armor.is_empty() {
                    armor_class = base
                        .checked_add(value)
                        .and_then(|ac| ac.checked_add(armor_bonus))
                        .ok_or_else(overflow)?;
                }
            }
        }
        Ok(armor_class)
    }

    /// Hit points gained from constitution across all levels.
    fn constitution_hit_points(&self, level: i32, scores: &AbilityScores) -> Derived<i32> {
        level
            .checked_mul(scores.constitution.modifier().0)
            .ok_or_else(|| self.out_of_range("hit points"))
    }

    fn hit_point_dice(&self, level: i32, scores: &AbilityScores) -> Derived<DiceExpression> {
        let constitution = self.constitution_hit_points(level, scores)?;
        Ok(self
            .classes
            .iter()
            .map(|c| DiceExpression::dice(c.level, c.definition.hit_dice))
            .fold(DiceExpression::Number(0), DiceExpression::plus)
            .plus(DiceExpression::Number(constitution)))
    }

    fn maximum_hit_points(&self, level: i32, scores: &AbilityScores) -> Derived<i32> {
        if let Some(hit_points) = self.override_hit_points {
            return Ok(hit_points);
        }
        self.constitution_hit_points(level, scores)?
            .checked_add(self.base_hit_points)
            .and_then(|hp| hp.checked_add(self.bonus_hit_points.unwrap_or(0)))
            .ok_or_else(|| self.out_of_range("hit points"))
    }

    fn current_hit_points(&self, level: i32, scores: &AbilityScores) -> Derived<i32> {
        self.maximum_hit_points(level, scores)?
            .checked_add(self.temporary_hit_points)
            .and_then(|hp| hp.checked_sub(self.removed_hit_points))
            .ok_or_else(|| self.out_of_range("hit points"))
    }

    fn speeds(&self) -> BTreeMap<MovementMode, i32> {
        let normal = &self.race.weight_speeds.normal;
        let mut speeds: BTreeMap<MovementMode, i32> = [
            (MovementMode::Walk, normal.walk),
            (MovementMode::Fly, normal.fly),
            (MovementMode::Swim, normal.swim),
            (MovementMode::Climb, normal.climb),
            (MovementMode::Burrow, normal.burrow),
        ]
        .into_iter()
        .filter(|(_, speed)| *speed > 0)
        .collect();

        for modifier in &self.modifiers.race {
            if let Some(value) = modifier.value_for("set", "innate-speed-swimming") {
                speeds.insert(MovementMode::Swim, value);
            }
        }
        speeds
    }

    fn into_character(self, realm: RealmId, ids: &IdGenerator) -> Derived<Character> {
        let size = CreatureSize::from_english(&self.race.size)
            .ok_or_else(|| format!("character {}: unknown size {:?}", self.name, self.race.size))?;

        let level = self.level()?;
        let scores = self.ability_scores()?;
        let armor = self.armor();
        let armor_class = self.armor_class(&armor, &scores)?;
        let hit_point_dice = self.hit_point_dice(level, &scores)?;
        let hit_points = self.current_hit_points(level, &scores)?;
        let speeds = self.speeds();

        let stats = StatBlock {
            size: Some(size),
            creature_type: Some(self.race.base_name.clone()),
            subtype: self.race.sub_race_short_name.clone(),
            alignment: self.alignment_id.and_then(Alignment::from_sheet_id),
            armor_class: Some(armor_class),
            armor,
            hit_point_dice: Some(hit_point_dice),
            hit_points: Some(hit_points),
            movement: Some(speeds),
            ability_scores: Some(scores),
            ..StatBlock::named(self.name.clone())
        };

        Ok(Character {
            id: ids.next_id(),
            realm,
            level: Some(level),
            stats,
        })
    }
}

// ============================================================================
// Reader
// ============================================================================

pub struct DdbCharacterReader {
    payload: Bytes,
    ids: IdGenerator,
}

impl DdbCharacterReader {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            ids: IdGenerator::default(),
        }
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }
}

impl CompendiumReader for DdbCharacterReader {
    fn name(&self) -> &'static str {
        "ddb-character"
    }

    fn items(&self, realm: RealmId) -> ReaderStream {
        let payload = self.payload.clone();
        let ids = self.ids.clone();

        async_stream::try_stream! {
            let sheet: CharacterSheet = serde_json::from_slice(&payload)?;
            yield match sheet.into_character(realm, &ids) {
                Ok(character) => ReaderOutput::Item(CompendiumItem::Character(character)),
                Err(description) => ReaderOutput::InvalidItem(description),
            };
        }
        .boxed()
    }
}
