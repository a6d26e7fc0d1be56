//! Open5e JSON Reader
//!
//! Reads the Open5e API's monster and spell arrays. The top level must be a
//! JSON array; each element is decoded on its own so one malformed entry
//! doesn't sink the rest.
//!
//! Both endpoints share that array shape, so the first entry is checked for
//! the other endpoint's marker field. A spell list handed to the monster
//! reader (or the reverse) is rejected as a whole instead of producing one
//! invalid item per entry.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use futures::stream::StreamExt;
use serde::Deserialize;

use crate::core::models::{
    Ability, AbilityScores, Alignment, Armor, CompendiumItem, CreatureAction, CreatureFeature,
    CreatureSize, Fraction, Legendary, Modifier, Monster, MovementMode, RealmId, Skill, Spell,
    StatBlock,
};
use crate::ingestion::extractors::{parse_components, parse_dice, parse_movement};

use super::{required, CompendiumReader, IdGenerator, ReaderError, ReaderOutput, ReaderStream};

// ============================================================================
// Schema
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct O5eMonster {
    name: String,
    size: String,
    #[serde(rename = "type")]
    creature_type: String,
    #[serde(default)]
    subtype: String,
    #[serde(default)]
    alignment: String,

    armor_class: i32,
    #[serde(default)]
    armor_desc: Option<String>,
    hit_points: i32,
    hit_dice: String,

    #[serde(default)]
    speed: Option<O5eSpeed>,
    #[serde(default)]
    speed_json: Option<SpeedJson>,

    strength: i32,
    dexterity: i32,
    constitution: i32,
    intelligence: i32,
    wisdom: i32,
    charisma: i32,

    strength_save: Option<i32>,
    dexterity_save: Option<i32>,
    constitution_save: Option<i32>,
    intelligence_save: Option<i32>,
    wisdom_save: Option<i32>,
    charisma_save: Option<i32>,

    /// Skill bonuses keyed by skill name; older payloads use one field per skill.
    #[serde(default)]
    skills: HashMap<String, i32>,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,

    #[serde(default)]
    damage_vulnerabilities: String,
    #[serde(default)]
    damage_resistances: String,
    #[serde(default)]
    damage_immunities: String,
    #[serde(default)]
    condition_immunities: String,
    #[serde(default)]
    senses: String,
    #[serde(default)]
    languages: String,

    challenge_rating: String,

    #[serde(default)]
    special_abilities: Option<ActionList>,
    #[serde(default)]
    actions: Option<ActionList>,
    #[serde(default)]
    reactions: Option<ActionList>,
    #[serde(default)]
    legendary_desc: Option<String>,
    #[serde(default)]
    legendary_actions: Option<ActionList>,
}

/// Speed is either structured or free text, depending on the endpoint version.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum O5eSpeed {
    Structured(SpeedJson),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SpeedJson {
    walk: Option<i32>,
    fly: Option<i32>,
    swim: Option<i32>,
    climb: Option<i32>,
    burrow: Option<i32>,
}

/// Action lists occasionally come through as a plain string; those are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ActionList {
    Actions(Vec<O5eAction>),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
struct O5eAction {
    name: String,
    #[serde(default)]
    desc: String,
}

#[derive(Debug, Clone, Deserialize)]
struct O5eSpell {
    name: String,
    desc: String,
    #[serde(default)]
    higher_level: Option<String>,
    range: String,
    components: String,
    #[serde(default)]
    material: Option<String>,
    #[serde(default)]
    ritual: String,
    duration: String,
    #[serde(default)]
    concentration: String,
    casting_time: String,
    level_int: i32,
    school: String,
    #[serde(rename = "class", alias = "dnd_class", default)]
    spell_class: String,
}

// ============================================================================
// Reader
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Open5eKind {
    Monsters,
    Spells,
}

impl Open5eKind {
    /// A field every entry of this endpoint carries and the other never does.
    fn marker_field(self) -> &'static str {
        match self {
            Open5eKind::Monsters => "challenge_rating",
            Open5eKind::Spells => "casting_time",
        }
    }

    fn other(self) -> Self {
        match self {
            Open5eKind::Monsters => Open5eKind::Spells,
            Open5eKind::Spells => Open5eKind::Monsters,
        }
    }

    /// Rejects entries that carry the other endpoint's marker but not this one's.
    fn check_entry(self, entry: &serde_json::Value) -> Result<(), ReaderError> {
        let has = |kind: Open5eKind| entry.get(kind.marker_field()).is_some();
        if has(self.other()) && !has(self) {
            return Err(ReaderError::IncompatibleDataSource(format!(
                "entry has {:?} but no {:?}; expected {self:?}",
                self.other().marker_field(),
                self.marker_field()
            )));
        }
        Ok(())
    }
}

pub struct Open5eReader {
    kind: Open5eKind,
    payload: Bytes,
    ids: IdGenerator,
}

impl Open5eReader {
    pub fn new(kind: Open5eKind, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            ids: IdGenerator::default(),
        }
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }
}

impl CompendiumReader for Open5eReader {
    fn name(&self) -> &'static str {
        match self.kind {
            Open5eKind::Monsters => "open5e-monsters",
            Open5eKind::Spells => "open5e-spells",
        }
    }

    fn items(&self, realm: RealmId) -> ReaderStream {
        let kind = self.kind;
        let payload = self.payload.clone();
        let ids = self.ids.clone();

        async_stream::try_stream! {
            let entries: Vec<serde_json::Value> = serde_json::from_slice(&payload)?;
            if let Some(first) = entries.first() {
                kind.check_entry(first)?;
            }
            for entry in entries {
                yield convert_entry(kind, entry, &realm, &ids);
            }
        }
        .boxed()
    }
}

fn convert_entry(
    kind: Open5eKind,
    entry: serde_json::Value,
    realm: &RealmId,
    ids: &IdGenerator,
) -> ReaderOutput {
    let name = entry
        .get("name")
        .and_then(|n| n.as_str())
        .unwrap_or("(unnamed)")
        .to_string();

    let converted = match kind {
        Open5eKind::Monsters => serde_json::from_value::<O5eMonster>(entry)
            .map_err(|e| e.to_string())
            .and_then(|m| monster(m, realm, ids))
            .map(CompendiumItem::Monster)
            .map_err(|reason| format!("monster {name}: {reason}")),
        Open5eKind::Spells => serde_json::from_value::<O5eSpell>(entry)
            .map_err(|e| e.to_string())
            .and_then(|s| spell(s, realm))
            .map(CompendiumItem::Spell)
            .map_err(|reason| format!("spell {name}: {reason}")),
    };

    match converted {
        Ok(item) => ReaderOutput::Item(item),
        Err(description) => ReaderOutput::InvalidItem(description),
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ============================================================================
// Monsters
// ============================================================================

fn monster(m: O5eMonster, realm: &RealmId, ids: &IdGenerator) -> Result<Monster, String> {
    let hit_point_dice = required(parse_dice(&m.hit_dice), "hit_dice")?;
    let size = required(CreatureSize::from_english(&m.size), "size")?;
    let challenge_rating: Fraction =
        required(m.challenge_rating.parse().ok(), "challenge_rating")?;

    let movement = match (&m.speed_json, &m.speed) {
        (Some(speed), _) | (None, Some(O5eSpeed::Structured(speed))) => Some(speed_map(speed)),
        (None, Some(O5eSpeed::Text(text))) => parse_movement(text),
        (None, None) => None,
    };

    let saving_throws: BTreeMap<Ability, Modifier> = [
        (Ability::Strength, m.strength_save),
        (Ability::Dexterity, m.dexterity_save),
        (Ability::Constitution, m.constitution_save),
        (Ability::Intelligence, m.intelligence_save),
        (Ability::Wisdom, m.wisdom_save),
        (Ability::Charisma, m.charisma_save),
    ]
    .into_iter()
    .filter_map(|(ability, save)| save.map(|s| (ability, Modifier(s))))
    .collect();

    let skills = skills(&m);
    let features = actions(m.special_abilities, ids)
        .into_iter()
        .map(|a| CreatureFeature {
            id: a.id,
            name: a.name,
            description: a.description,
        })
        .collect();
    let legendary = match m.legendary_actions {
        Some(list @ ActionList::Actions(_)) => Some(Legendary {
            description: m.legendary_desc.and_then(non_empty),
            actions: actions(Some(list), ids),
        }),
        _ => None,
    };

    let stats = StatBlock {
        name: m.name,
        size: Some(size),
        creature_type: non_empty(m.creature_type),
        subtype: non_empty(m.subtype),
        alignment: Alignment::from_english(&m.alignment),

        armor_class: Some(m.armor_class),
        armor: m
            .armor_desc
            .and_then(non_empty)
            .map(|desc| vec![Armor::named(desc, m.armor_class)])
            .unwrap_or_default(),
        hit_point_dice: Some(hit_point_dice),
        hit_points: Some(m.hit_points),
        movement,

        ability_scores: Some(AbilityScores::new(
            m.strength,
            m.dexterity,
            m.constitution,
            m.intelligence,
            m.wisdom,
            m.charisma,
        )),
        saving_throws,
        skills,
        initiative: None,

        damage_vulnerabilities: non_empty(m.damage_vulnerabilities),
        damage_resistances: non_empty(m.damage_resistances),
        damage_immunities: non_empty(m.damage_immunities),
        condition_immunities: non_empty(m.condition_immunities),
        senses: non_empty(m.senses),
        languages: non_empty(m.languages),

        challenge_rating: Some(challenge_rating),

        features,
        actions: actions(m.actions, ids),
        reactions: actions(m.reactions, ids),
        legendary,
    };

    Ok(Monster {
        realm: realm.clone(),
        stats,
        challenge_rating,
    })
}

fn speed_map(speed: &SpeedJson) -> BTreeMap<MovementMode, i32> {
    [
        (MovementMode::Walk, speed.walk),
        (MovementMode::Fly, speed.fly),
        (MovementMode::Swim, speed.swim),
        (MovementMode::Climb, speed.climb),
        (MovementMode::Burrow, speed.burrow),
    ]
    .into_iter()
    .filter_map(|(mode, value)| value.map(|v| (mode, v)))
    .collect()
}

/// Skills from the `skills` object, falling back to top-level per-skill fields.
/// Per-skill fields that are not whole numbers within `i32` are skipped.
fn skills(m: &O5eMonster) -> BTreeMap<Skill, Modifier> {
    let mut skills = BTreeMap::new();
    for skill in Skill::ALL {
        let field = skill.display_name().to_lowercase().replace(' ', "_");
        let value = m
            .extra
            .get(&field)
            .and_then(serde_json::Value::as_i64)
            .and_then(|v| i32::try_from(v).ok());
        if let Some(value) = value {
            skills.insert(skill, Modifier(value));
        }
    }
    for (name, value) in &m.skills {
        if let Some(skill) = Skill::from_english(&name.replace('_', " ")) {
            skills.insert(skill, Modifier(*value));
        }
    }
    skills
}

fn actions(list: Option<ActionList>, ids: &IdGenerator) -> Vec<CreatureAction> {
    match list {
        Some(ActionList::Actions(actions)) => actions
            .into_iter()
            .map(|a| CreatureAction {
                id: ids.next_id(),
                name: a.name,
                description: a.desc,
            })
            .collect(),
        Some(ActionList::Text(_)) | None => Vec::new(),
    }
}

// ============================================================================
// Spells
// ============================================================================

fn spell(s: O5eSpell, realm: &RealmId) -> Result<Spell, String> {
    let (components, listed_material) =
        required(parse_components(&s.components), "components")?;

    Ok(Spell {
        realm: realm.clone(),
        name: s.name,
        level: (s.level_int != 0).then_some(s.level_int),
        casting_time: s.casting_time,
        range: s.range,
        components,
        material: s.material.and_then(non_empty).or(listed_material),
        ritual: s.ritual.eq_ignore_ascii_case("yes"),
        concentration: s.concentration.eq_ignore_ascii_case("yes"),
        duration: s.duration,
        school: s.school,
        description: s.desc,
        higher_level_description: s.higher_level.and_then(non_empty),
        source: None,
        classes: s
            .spell_class
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{DiceExpression, SpellComponent};
    use futures::TryStreamExt;
    use serde_json::json;

    fn goblin() -> serde_json::Value {
        json!({
            "name": "Goblin",
            "size": "Small",
            "type": "humanoid",
            "subtype": "goblinoid",
            "alignment": "neutral evil",
            "armor_class": 15,
            "armor_desc": "leather armor, shield",
            "hit_points": 7,
            "hit_dice": "2d6",
            "speed": {"walk": 30},
            "strength": 8, "dexterity": 14, "constitution": 10,
            "intelligence": 10, "wisdom": 8, "charisma": 8,
            "stealth": 6,
            "damage_vulnerabilities": "",
            "senses": "darkvision 60 ft., passive Perception 9",
            "languages": "Common, Goblin",
            "challenge_rating": "1/4",
            "actions": [{"name": "Scimitar", "desc": "Melee Weapon Attack: +4 to hit."}],
            "special_abilities": [{"name": "Nimble Escape", "desc": "Disengage or Hide."}],
            "legendary_actions": ""
        })
    }

    async fn read(kind: Open5eKind, payload: serde_json::Value) -> Result<Vec<ReaderOutput>, ReaderError> {
        Open5eReader::new(kind, payload.to_string())
            .with_id_generator(IdGenerator::sequential())
            .items(RealmId::new("open5e"))
            .try_collect()
            .await
    }

    fn only_monster(outputs: &[ReaderOutput]) -> &Monster {
        match outputs {
            [ReaderOutput::Item(CompendiumItem::Monster(m))] => m,
            other => panic!("expected one monster, got {other:?}"),
        }
    }

    // ========================================================================
    // Monsters
    // ========================================================================

    #[tokio::test]
    async fn test_reads_monster() {
        let outputs = read(Open5eKind::Monsters, json!([goblin()])).await.unwrap();
        let monster = only_monster(&outputs);
        let stats = &monster.stats;

        assert_eq!(monster.realm, RealmId::new("open5e"));
        assert_eq!(monster.challenge_rating, Fraction::ONE_QUARTER);
        assert_eq!(stats.size, Some(CreatureSize::Small));
        assert_eq!(stats.subtype.as_deref(), Some("goblinoid"));
        assert_eq!(stats.alignment, Some(Alignment::NeutralEvil));
        assert_eq!(stats.armor[0].name, "leather armor, shield");
        assert_eq!(stats.hit_point_dice, Some(DiceExpression::dice(2, 6)));
        assert_eq!(stats.movement.as_ref().and_then(|m| m.get(&MovementMode::Walk)), Some(&30));
        assert_eq!(stats.skill_modifier(Skill::Stealth), Some(Modifier(6)));
        assert_eq!(stats.damage_vulnerabilities, None);
        assert_eq!(stats.features[0].name, "Nimble Escape");
        assert_eq!(stats.actions[0].name, "Scimitar");
        assert!(stats.legendary.is_none());
    }

    #[tokio::test]
    async fn test_speed_as_text_and_speed_json() {
        let mut text_speed = goblin();
        text_speed["speed"] = json!("30 ft., climb 30 ft.");
        let outputs = read(Open5eKind::Monsters, json!([text_speed])).await.unwrap();
        let movement = only_monster(&outputs).stats.movement.clone().unwrap();
        assert_eq!(movement.get(&MovementMode::Climb), Some(&30));

        let mut both = goblin();
        both["speed_json"] = json!({"walk": 40, "fly": 80});
        let outputs = read(Open5eKind::Monsters, json!([both])).await.unwrap();
        let movement = only_monster(&outputs).stats.movement.clone().unwrap();
        assert_eq!(movement.get(&MovementMode::Walk), Some(&40));
        assert_eq!(movement.get(&MovementMode::Fly), Some(&80));
    }

    #[tokio::test]
    async fn test_out_of_range_skill_fields_are_skipped() {
        let mut odd = goblin();
        odd["perception"] = json!(2.5);
        odd["athletics"] = json!(10_000_000_000_i64);
        odd["insight"] = json!(-3);
        let outputs = read(Open5eKind::Monsters, json!([odd])).await.unwrap();
        let stats = &only_monster(&outputs).stats;

        assert_eq!(stats.skills.get(&Skill::Perception), None);
        assert_eq!(stats.skills.get(&Skill::Athletics), None);
        assert_eq!(stats.skills.get(&Skill::Insight), Some(&Modifier(-3)));
        assert_eq!(stats.skills.get(&Skill::Stealth), Some(&Modifier(6)));
    }

    #[tokio::test]
    async fn test_legendary_actions() {
        let mut dragon = goblin();
        dragon["legendary_desc"] = json!("The dragon can take 3 legendary actions.");
        dragon["legendary_actions"] = json!([{"name": "Tail Attack", "desc": "The dragon makes a tail attack."}]);
        let outputs = read(Open5eKind::Monsters, json!([dragon])).await.unwrap();
        let legendary = only_monster(&outputs).stats.legendary.clone().unwrap();
        assert_eq!(legendary.actions[0].name, "Tail Attack");
        assert!(legendary.description.is_some());
    }

    #[tokio::test]
    async fn test_bad_entries_are_invalid_items() {
        let mut bad_dice = goblin();
        bad_dice["name"] = json!("Broken");
        bad_dice["hit_dice"] = json!("lots");
        let mut bad_shape = goblin();
        bad_shape["armor_class"] = json!("fifteen");

        let outputs = read(Open5eKind::Monsters, json!([bad_dice, goblin(), bad_shape])).await.unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!(
            outputs[0],
            ReaderOutput::InvalidItem("monster Broken: missing or invalid hit_dice".into())
        );
        assert!(matches!(outputs[1], ReaderOutput::Item(_)));
        assert!(matches!(&outputs[2], ReaderOutput::InvalidItem(d) if d.starts_with("monster Goblin:")));
    }

    #[tokio::test]
    async fn test_wrong_endpoint_is_incompatible() {
        let spell = json!({"name": "Light", "casting_time": "1 action", "level_int": 0});
        let result = read(Open5eKind::Monsters, json!([spell.clone(), spell])).await;
        assert!(matches!(result, Err(ReaderError::IncompatibleDataSource(_))));

        let result = read(Open5eKind::Spells, json!([goblin()])).await;
        assert!(matches!(result, Err(ReaderError::IncompatibleDataSource(_))));
    }

    #[tokio::test]
    async fn test_empty_array_reads_nothing() {
        let outputs = read(Open5eKind::Spells, json!([])).await.unwrap();
        assert!(outputs.is_empty());
    }

    #[tokio::test]
    async fn test_non_array_is_incompatible() {
        let result = read(Open5eKind::Monsters, json!({"results": []})).await;
        assert!(matches!(result, Err(ReaderError::IncompatibleDataSource(_))));
    }

    // ========================================================================
    // Spells
    // ========================================================================

    #[tokio::test]
    async fn test_reads_spell() {
        let spell = json!({
            "name": "Light",
            "desc": "You touch one object.",
            "higher_level": "",
            "range": "Touch",
            "components": "V, M",
            "material": "A firefly or phosphorescent moss.",
            "ritual": "no",
            "duration": "1 hour",
            "concentration": "no",
            "casting_time": "1 action",
            "level_int": 0,
            "school": "Evocation",
            "dnd_class": "Bard, Cleric, Sorcerer, Wizard"
        });
        let outputs = read(Open5eKind::Spells, json!([spell])).await.unwrap();
        let ReaderOutput::Item(CompendiumItem::Spell(spell)) = &outputs[0] else {
            panic!("expected spell, got {:?}", outputs[0]);
        };

        assert!(spell.is_cantrip());
        assert_eq!(spell.components, vec![SpellComponent::Verbal, SpellComponent::Material]);
        assert_eq!(spell.material.as_deref(), Some("A firefly or phosphorescent moss."));
        assert_eq!(spell.higher_level_description, None);
        assert_eq!(spell.classes.len(), 4);
        assert!(!spell.ritual);
    }

    #[tokio::test]
    async fn test_spell_missing_fields_is_invalid() {
        let outputs = read(Open5eKind::Spells, json!([{"name": "Nothing"}])).await.unwrap();
        assert!(matches!(&outputs[0], ReaderOutput::InvalidItem(d) if d.starts_with("spell Nothing:")));
    }
}
