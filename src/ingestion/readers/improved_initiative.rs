//! Improved Initiative Reader
//!
//! Improved Initiative exports are a flat JSON object of string values. The
//! `ImprovedInitiative.Creatures` key holds a JSON-encoded list of creature
//! ids; each creature lives, JSON-encoded again, under
//! `ImprovedInitiative.Creatures.<id>`.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use futures::stream::StreamExt;
use serde::Deserialize;

use crate::core::models::{
    Ability, AbilityScores, Armor, CompendiumItem, CreatureAction, CreatureFeature, Fraction,
    Initiative, Legendary, Modifier, Monster, RealmId, Skill, StatBlock,
};
use crate::ingestion::extractors::{
    parse_creature_type, parse_dice, parse_movement, parse_parenthesized,
};

use super::{required, CompendiumReader, IdGenerator, ReaderError, ReaderOutput, ReaderStream};

const CREATURE_LIST_KEY: &str = "ImprovedInitiative.Creatures";

// ============================================================================
// Schema
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Creature {
    name: String,
    #[serde(rename = "Type")]
    creature_type: String,
    #[serde(rename = "HP")]
    hp: Annotated,
    #[serde(rename = "AC")]
    ac: Annotated,
    #[serde(default)]
    initiative_modifier: i32,
    #[serde(default)]
    initiative_advantage: bool,
    #[serde(default)]
    speed: Vec<String>,
    abilities: Abilities,

    #[serde(default)]
    damage_vulnerabilities: Vec<String>,
    #[serde(default)]
    damage_resistances: Vec<String>,
    #[serde(default)]
    damage_immunities: Vec<String>,
    #[serde(default)]
    condition_immunities: Vec<String>,
    #[serde(default)]
    saves: Vec<NamedModifier>,
    #[serde(default)]
    skills: Vec<NamedModifier>,
    #[serde(default)]
    senses: Vec<String>,
    #[serde(default)]
    languages: Vec<String>,
    challenge: String,

    #[serde(default)]
    traits: Vec<TraitOrAction>,
    #[serde(default)]
    actions: Vec<TraitOrAction>,
    #[serde(default)]
    reactions: Vec<TraitOrAction>,
    #[serde(default)]
    legendary_actions: Vec<TraitOrAction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Annotated {
    value: i32,
    #[serde(default)]
    notes: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Abilities {
    str: i32,
    dex: i32,
    con: i32,
    int: i32,
    wis: i32,
    cha: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NamedModifier {
    name: String,
    modifier: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TraitOrAction {
    name: String,
    #[serde(default)]
    content: String,
}

impl TraitOrAction {
    /// Entries without a real name carry the legendary section's description.
    fn is_legendary_description(&self) -> bool {
        self.name.is_empty() || self.name == "Legendary Actions"
    }
}

// ============================================================================
// Reader
// ============================================================================

pub struct ImprovedInitiativeReader {
    payload: Bytes,
    ids: IdGenerator,
}

impl ImprovedInitiativeReader {
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

impl CompendiumReader for ImprovedInitiativeReader {
    fn name(&self) -> &'static str {
        "improved-initiative"
    }

    fn items(&self, realm: RealmId) -> ReaderStream {
        let payload = self.payload.clone();
        let ids = self.ids.clone();

        async_stream::try_stream! {
            let file: HashMap<String, String> = serde_json::from_slice(&payload)?;
            let list = file.get(CREATURE_LIST_KEY).ok_or_else(|| {
                ReaderError::IncompatibleDataSource(format!("no {CREATURE_LIST_KEY} entry"))
            })?;
            let creature_ids: Vec<String> = serde_json::from_str(list)?;

            for id in creature_ids {
                let key = format!("{CREATURE_LIST_KEY}.{id}");
                yield match file.get(&key) {
                    Some(entry) => convert_entry(&id, entry, &realm, &ids),
                    None => ReaderOutput::InvalidItem(format!("creature {id}: missing entry")),
                };
            }
        }
        .boxed()
    }
}

fn convert_entry(id: &str, entry: &str, realm: &RealmId, ids: &IdGenerator) -> ReaderOutput {
    let converted = serde_json::from_str::<Creature>(entry)
        .map_err(|e| format!("creature {id}: {e}"))
        .and_then(|c| {
            let name = c.name.clone();
            monster(c, realm, ids).map_err(|reason| format!("creature {name}: {reason}"))
        });

    match converted {
        Ok(monster) => ReaderOutput::Item(CompendiumItem::Monster(monster)),
        Err(description) => ReaderOutput::InvalidItem(description),
    }
}

fn joined(values: &[String]) -> Option<String> {
    let joined = values.join(", ");
    (!joined.trim().is_empty()).then_some(joined)
}

fn monster(c: Creature, realm: &RealmId, ids: &IdGenerator) -> Result<Monster, String> {
    let challenge_rating: Fraction = required(c.challenge.parse().ok(), "challenge")?;

    let parsed_type = parse_creature_type(&c.creature_type);

    let mut movement = BTreeMap::new();
    for speed in &c.speed {
        if let Some(entries) = parse_movement(speed) {
            movement.extend(entries);
        }
    }

    let saving_throws = c
        .saves
        .iter()
        .filter_map(|save| Some((Ability::from_english(&save.name)?, Modifier(save.modifier?))))
        .collect();
    let skills = c
        .skills
        .iter()
        .filter_map(|skill| Some((Skill::from_english(&skill.name)?, Modifier(skill.modifier?))))
        .collect();

    let to_actions = |entries: Vec<TraitOrAction>| -> Vec<CreatureAction> {
        entries
            .into_iter()
            .map(|e| CreatureAction {
                id: ids.next_id(),
                name: e.name,
                description: e.content,
            })
            .collect()
    };

    let features = c
        .traits
        .into_iter()
        .map(|t| CreatureFeature {
            id: ids.next_id(),
            name: t.name,
            description: t.content,
        })
        .collect();
    let actions = to_actions(c.actions);
    let reactions = to_actions(c.reactions);

    let legendary = if c.legendary_actions.is_empty() {
        None
    } else {
        let (descriptions, entries): (Vec<_>, Vec<_>) = c
            .legendary_actions
            .into_iter()
            .partition(TraitOrAction::is_legendary_description);
        Some(Legendary {
            description: descriptions.into_iter().next().map(|d| d.content),
            actions: to_actions(entries),
        })
    };

    let stats = StatBlock {
        name: c.name,
        size: parsed_type.as_ref().map(|t| t.size),
        creature_type: parsed_type.as_ref().map(|t| t.creature_type.clone()),
        subtype: parsed_type.as_ref().and_then(|t| t.subtype.clone()),
        alignment: parsed_type.as_ref().and_then(|t| t.alignment),

        armor_class: Some(c.ac.value),
        armor: parse_parenthesized(&c.ac.notes)
            .map(|name| vec![Armor::named(name, c.ac.value)])
            .unwrap_or_default(),
        hit_point_dice: parse_parenthesized(&c.hp.notes).and_then(|notes| parse_dice(&notes)),
        hit_points: Some(c.hp.value),
        movement: (!movement.is_empty()).then_some(movement),

        ability_scores: Some(AbilityScores::new(
            c.abilities.str,
            c.abilities.dex,
            c.abilities.con,
            c.abilities.int,
            c.abilities.wis,
            c.abilities.cha,
        )),
        saving_throws,
        skills,
        initiative: Some(Initiative {
            modifier: Modifier(c.initiative_modifier),
            advantage: c.initiative_advantage,
        }),

        damage_vulnerabilities: joined(&c.damage_vulnerabilities),
        damage_resistances: joined(&c.damage_resistances),
        damage_immunities: joined(&c.damage_immunities),
        condition_immunities: joined(&c.condition_immunities),
        senses: joined(&c.senses),
        languages: joined(&c.languages),

        challenge_rating: Some(challenge_rating),

        features,
        actions,
        reactions,
        legendary,
    };

    Ok(Monster {
        realm: realm.clone(),
        stats,
        challenge_rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Alignment, CreatureSize, DiceExpression, MovementMode};
    use futures::TryStreamExt;
    use serde_json::json;

    fn creature(name: &str, challenge: &str) -> serde_json::Value {
        json!({
            "Id": name.to_lowercase(),
            "Name": name,
            "Type": "Large giant, chaotic evil",
            "HP": {"Value": 84, "Notes": "(8d10+40)"},
            "AC": {"Value": 15, "Notes": "(natural armor)"},
            "InitiativeModifier": -1,
            "InitiativeAdvantage": false,
            "Speed": ["30 ft.", "climb 20 ft."],
            "Abilities": {"Str": 18, "Dex": 8, "Con": 20, "Int": 7, "Wis": 9, "Cha": 7},
            "DamageVulnerabilities": [],
            "DamageResistances": [],
            "DamageImmunities": [],
            "ConditionImmunities": [],
            "Saves": [{"Name": "Con", "Modifier": 7}],
            "Skills": [{"Name": "Perception", "Modifier": 2}, {"Name": "Juggling", "Modifier": 9}],
            "Senses": ["darkvision 60 ft."],
            "Languages": ["Giant"],
            "Challenge": challenge,
            "Traits": [],
            "Actions": [{"Name": "Greatclub", "Content": "Melee Weapon Attack.", "Usage": ""}],
            "Reactions": [],
            "LegendaryActions": [
                {"Name": "Legendary Actions", "Content": "The ogre can take 3 actions.", "Usage": ""},
                {"Name": "Stomp", "Content": "The ogre stomps.", "Usage": ""}
            ],
            "Description": ""
        })
    }

    fn export(creatures: &[(&str, serde_json::Value)], listed: &[&str]) -> String {
        let mut file = serde_json::Map::new();
        file.insert(CREATURE_LIST_KEY.into(), json!(json!(listed).to_string()));
        for (id, creature) in creatures {
            file.insert(format!("{CREATURE_LIST_KEY}.{id}"), json!(creature.to_string()));
        }
        serde_json::Value::Object(file).to_string()
    }

    async fn read(payload: String) -> Result<Vec<ReaderOutput>, ReaderError> {
        ImprovedInitiativeReader::new(payload)
            .with_id_generator(IdGenerator::sequential())
            .items(RealmId::new("ii"))
            .try_collect()
            .await
    }

    #[tokio::test]
    async fn test_reads_creature() {
        let payload = export(&[("ogre", creature("Ogre", "2"))], &["ogre"]);
        let outputs = read(payload).await.unwrap();

        let [ReaderOutput::Item(CompendiumItem::Monster(monster))] = outputs.as_slice() else {
            panic!("expected one monster, got {outputs:?}");
        };
        let stats = &monster.stats;
        assert_eq!(monster.challenge_rating, Fraction::integer(2));
        assert_eq!(stats.size, Some(CreatureSize::Large));
        assert_eq!(stats.creature_type.as_deref(), Some("giant"));
        assert_eq!(stats.alignment, Some(Alignment::ChaoticEvil));
        assert_eq!(stats.armor[0].name, "natural armor");
        assert_eq!(
            stats.hit_point_dice,
            Some(DiceExpression::dice(8, 10).plus(DiceExpression::Number(40)))
        );
        let movement = stats.movement.as_ref().unwrap();
        assert_eq!(movement.get(&MovementMode::Walk), Some(&30));
        assert_eq!(movement.get(&MovementMode::Climb), Some(&20));
        assert_eq!(stats.saving_throw_modifier(Ability::Constitution), Some(Modifier(7)));
        assert_eq!(stats.skills.len(), 1);
        assert_eq!(stats.initiative.map(|i| i.modifier), Some(Modifier(-1)));
        assert_eq!(stats.damage_resistances, None);
        assert_eq!(stats.languages.as_deref(), Some("Giant"));

        let legendary = stats.legendary.as_ref().unwrap();
        assert_eq!(legendary.description.as_deref(), Some("The ogre can take 3 actions."));
        assert_eq!(legendary.actions.len(), 1);
        assert_eq!(legendary.actions[0].name, "Stomp");
    }

    #[tokio::test]
    async fn test_missing_and_broken_creatures_are_invalid() {
        let payload = export(
            &[
                ("ogre", creature("Ogre", "2")),
                ("bad-cr", creature("Odd", "lots")),
                ("broken", json!({"Name": "Half"})),
            ],
            &["ogre", "ghost", "bad-cr", "broken"],
        );
        let outputs = read(payload).await.unwrap();

        assert_eq!(outputs.len(), 4);
        assert!(matches!(outputs[0], ReaderOutput::Item(_)));
        assert_eq!(
            outputs[1],
            ReaderOutput::InvalidItem("creature ghost: missing entry".into())
        );
        assert_eq!(
            outputs[2],
            ReaderOutput::InvalidItem("creature Odd: missing or invalid challenge".into())
        );
        assert!(matches!(&outputs[3], ReaderOutput::InvalidItem(d) if d.starts_with("creature broken:")));
    }

    #[tokio::test]
    async fn test_missing_creature_list_is_incompatible() {
        let result = read(json!({"Other": "[]"}).to_string()).await;
        assert!(matches!(result, Err(ReaderError::IncompatibleDataSource(_))));

        let result = read("[1, 2, 3]".to_string()).await;
        assert!(matches!(result, Err(ReaderError::IncompatibleDataSource(_))));
    }
}
