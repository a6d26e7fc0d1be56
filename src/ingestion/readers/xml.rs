//! XML Compendium Reader
//!
//! Reads `<compendium>` documents holding `<monster>` and `<spell>` records.
//! The builder is driven as the stream is polled, so records that complete
//! before a structural error are still delivered.

use bytes::Bytes;
use futures::stream::StreamExt;

use crate::config::IngestConfig;
use crate::core::models::{
    Ability, AbilityScores, Alignment, CompendiumItem, CreatureAction, CreatureFeature,
    CreatureSize, Fraction, Legendary, Monster, RealmId, Spell, StatBlock,
};
use crate::ingestion::extractors::{
    parse_armor_class, parse_components, parse_creature_type, parse_duration, parse_hit_points,
    parse_movement, parse_saving_throws, parse_skill_modifiers, parse_spell_text,
    school_from_abbreviation,
};
use crate::ingestion::xml::{
    ContentTreeBuilder, DocumentElement, ElementContent, EntryKind, MonsterElement, MonsterField,
    SpellElement, TraitElement, XmlEventReader,
};

use super::{required, CompendiumReader, IdGenerator, ReaderOutput, ReaderStream};

pub struct XmlCompendiumReader {
    payload: Bytes,
    config: IngestConfig,
    ids: IdGenerator,
}

impl XmlCompendiumReader {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            config: IngestConfig::default(),
            ids: IdGenerator::default(),
        }
    }

    pub fn with_config(mut self, config: IngestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }
}

impl CompendiumReader for XmlCompendiumReader {
    fn name(&self) -> &'static str {
        "xml-compendium"
    }

    fn items(&self, realm: RealmId) -> ReaderStream {
        let payload = self.payload.clone();
        let config = self.config.clone();
        let ids = self.ids.clone();

        async_stream::try_stream! {
            let mut events = XmlEventReader::new(&payload);
            let mut builder = ContentTreeBuilder::with_config(
                [DocumentElement::MONSTER, DocumentElement::SPELL],
                &config,
            );

            while let Some(event) = events.next_event()? {
                builder.handle(event)?;
                while let Some((path, content)) = builder.pop_completed() {
                    yield convert_record(path, &content, &realm, &ids);
                }
            }
            builder.finish()?;
        }
        .boxed()
    }
}

fn convert_record(
    path: DocumentElement,
    content: &ElementContent,
    realm: &RealmId,
    ids: &IdGenerator,
) -> ReaderOutput {
    let converted = if path == DocumentElement::MONSTER {
        monster_from_content(content, realm, ids)
            .map(CompendiumItem::Monster)
            .map_err(|reason| {
                let name = content.text(&MonsterField::Name).unwrap_or("(unnamed)");
                format!("monster {name}: {reason}")
            })
    } else if path == DocumentElement::SPELL {
        spell_from_content(content, realm)
            .map(CompendiumItem::Spell)
            .map_err(|reason| {
                let name = content.text(&SpellElement::Name).unwrap_or("(unnamed)");
                format!("spell {name}: {reason}")
            })
    } else {
        Err(format!("unexpected record {path:?}"))
    };

    match converted {
        Ok(item) => ReaderOutput::Item(item),
        Err(description) => ReaderOutput::InvalidItem(description),
    }
}

// ============================================================================
// Monsters
// ============================================================================

fn monster_from_content(
    c: &ElementContent,
    realm: &RealmId,
    ids: &IdGenerator,
) -> Result<Monster, String> {
    let name = required(c.text(&MonsterField::Name), "name")?;
    let type_text = required(c.text(&MonsterField::Type), "type")?;
    let ac_text = required(c.text(&MonsterField::Ac), "ac")?;
    let hp_text = required(c.text(&MonsterField::Hp), "hp")?;
    let speed_text = required(c.text(&MonsterField::Speed), "speed")?;

    let score = |field: MonsterField, ability: Ability| {
        required(
            c.first(&field).and_then(ElementContent::int_value),
            ability.abbreviation(),
        )
    };
    let ability_scores = AbilityScores::new(
        score(MonsterField::Str, Ability::Strength)?,
        score(MonsterField::Dex, Ability::Dexterity)?,
        score(MonsterField::Con, Ability::Constitution)?,
        score(MonsterField::Int, Ability::Intelligence)?,
        score(MonsterField::Wis, Ability::Wisdom)?,
        score(MonsterField::Cha, Ability::Charisma)?,
    );

    let challenge_rating: Fraction = required(
        c.text(&MonsterField::Cr).and_then(|cr| cr.parse().ok()),
        "cr",
    )?;

    let size = c.text(&MonsterField::Size).and_then(CreatureSize::from_english);
    // Type lines here usually omit the size, which has its own element
    let parsed_type = parse_creature_type(type_text).or_else(|| {
        size.and_then(|size| parse_creature_type(&format!("{} {}", size.english_name(), type_text)))
    });
    let armor_class = parse_armor_class(ac_text);
    let hit_points = parse_hit_points(hp_text);

    let text = |field: MonsterField| c.text(&field).map(str::to_string);
    let entry_actions = |kind: EntryKind| -> Vec<CreatureAction> {
        named_entries(c, kind)
            .into_iter()
            .map(|(name, description)| CreatureAction {
                id: ids.next_id(),
                name,
                description,
            })
            .collect()
    };

    let stats = StatBlock {
        name: name.to_string(),
        size: size.or(parsed_type.as_ref().map(|t| t.size)),
        creature_type: parsed_type.as_ref().map(|t| t.creature_type.clone()),
        subtype: parsed_type.as_ref().and_then(|t| t.subtype.clone()),
        alignment: c
            .text(&MonsterField::Alignment)
            .and_then(Alignment::from_english)
            .or(parsed_type.as_ref().and_then(|t| t.alignment)),

        armor_class: armor_class.as_ref().map(|ac| ac.value),
        armor: armor_class.as_ref().and_then(|ac| ac.armor()).into_iter().collect(),
        hit_point_dice: hit_points.as_ref().and_then(|(_, dice)| dice.clone()),
        hit_points: hit_points.as_ref().map(|(hp, _)| *hp),
        movement: parse_movement(speed_text),

        ability_scores: Some(ability_scores),
        saving_throws: c.text(&MonsterField::Save).map(parse_saving_throws).unwrap_or_default(),
        skills: c.text(&MonsterField::Skill).map(parse_skill_modifiers).unwrap_or_default(),
        initiative: None,

        damage_vulnerabilities: text(MonsterField::Vulnerable),
        damage_resistances: text(MonsterField::Resist),
        damage_immunities: text(MonsterField::Immune),
        condition_immunities: text(MonsterField::ConditionImmune),
        senses: text(MonsterField::Senses),
        languages: text(MonsterField::Languages),

        challenge_rating: Some(challenge_rating),

        features: named_entries(c, EntryKind::Trait)
            .into_iter()
            .map(|(name, description)| CreatureFeature {
                id: ids.next_id(),
                name,
                description,
            })
            .collect(),
        actions: entry_actions(EntryKind::Action),
        reactions: entry_actions(EntryKind::Reaction),
        legendary: legendary(c, entry_actions(EntryKind::Legendary)),
    };

    Ok(Monster {
        realm: realm.clone(),
        stats,
        challenge_rating,
    })
}

/// All `<text>` children of an entry joined by newlines.
fn entry_text(entry: &ElementContent) -> Option<String> {
    let lines: Vec<&str> = entry
        .all(&TraitElement::Text)
        .into_iter()
        .filter_map(ElementContent::string_value)
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// `(name, description)` of every entry of `kind` that has both.
fn named_entries(c: &ElementContent, kind: EntryKind) -> Vec<(String, String)> {
    c.all(&MonsterElement::Entry(kind, None))
        .into_iter()
        .filter_map(|entry| {
            let name = entry.text(&TraitElement::Name)?;
            Some((name.to_string(), entry_text(entry)?))
        })
        .collect()
}

/// A leading nameless `<legendary>` entry holds the section's description.
fn legendary(c: &ElementContent, actions: Vec<CreatureAction>) -> Option<Legendary> {
    let description = c
        .first(&MonsterElement::Entry(EntryKind::Legendary, None))
        .filter(|first| first.text(&TraitElement::Name).is_none())
        .and_then(entry_text);

    if description.is_none() && actions.is_empty() {
        return None;
    }
    Some(Legendary {
        description,
        actions,
    })
}

// ============================================================================
// Spells
// ============================================================================

fn spell_from_content(c: &ElementContent, realm: &RealmId) -> Result<Spell, String> {
    let name = required(c.text(&SpellElement::Name), "name")?;
    let level = required(c.first(&SpellElement::Level).and_then(ElementContent::int_value), "level")?;
    let casting_time = required(c.text(&SpellElement::Time), "time")?;
    let range = required(c.text(&SpellElement::Range), "range")?;
    let (components, material) = required(
        c.text(&SpellElement::Components).and_then(parse_components),
        "components",
    )?;
    let ritual = required(c.text(&SpellElement::Ritual), "ritual")?;
    let duration = required(c.text(&SpellElement::Duration), "duration")?;
    let school = required(
        c.text(&SpellElement::School).and_then(school_from_abbreviation),
        "school",
    )?;
    let text = required(
        {
            let lines: Vec<&str> = c
                .all(&SpellElement::Text)
                .into_iter()
                .filter_map(ElementContent::string_value)
                .collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        },
        "text",
    )?;
    let classes = required(c.text(&SpellElement::Classes), "classes")?;

    let (concentration, duration) = parse_duration(duration);
    let body = parse_spell_text(&text);

    Ok(Spell {
        realm: realm.clone(),
        name: name.to_string(),
        level: (level != 0).then_some(level),
        casting_time: casting_time.to_string(),
        range: range.to_string(),
        components,
        material,
        ritual: ritual == "YES",
        concentration,
        duration,
        school: school.to_string(),
        description: body.description,
        higher_level_description: body.higher_levels,
        source: body.source,
        classes: classes
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
    })
}
