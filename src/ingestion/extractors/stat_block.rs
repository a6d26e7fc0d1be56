//! Stat Block Field Extractors
//!
//! Grammars for the free-text fields of creature stat blocks:
//! - type lines: `Medium humanoid (goblinoid), neutral evil`
//! - armor class: `15 (natural armor)`
//! - hit points: `225 (18d12+108)`
//! - movement: `30 ft., fly 60 ft. (hover), swim 30 ft.`
//! - modifier lists: `Perception +3, Sleight of Hand +6`
//!
//! Every extractor returns `None` when the text doesn't fit; callers decide
//! whether that invalidates the record or just leaves a field unset.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::core::models::{
    Ability, Alignment, Armor, CreatureSize, DiceExpression, Modifier, MovementMode, Skill,
};
use crate::ingestion::parsing::{
    any, character, choice, end, horizontal_whitespace, int, many, nothing, one_of, satisfy,
    skip_until, spaces, string, word, zip, zip3, zip4, Parser,
};

use super::dice::dice_expression;

// ============================================================================
// Types
// ============================================================================

/// A parsed creature type line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureTypeField {
    pub size: CreatureSize,
    pub creature_type: String,
    pub subtype: Option<String>,
    pub alignment: Option<Alignment>,
}

/// A parsed armor class field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmorClassField {
    pub value: i32,
    pub note: Option<String>,
}

impl ArmorClassField {
    /// The note as a named armor record, e.g. "natural armor" at the field's class.
    pub fn armor(&self) -> Option<Armor> {
        self.note.as_ref().map(|note| Armor::named(note.clone(), self.value))
    }
}

#[derive(Debug, Clone)]
enum TypeComponent {
    Size(CreatureSize),
    Type(String),
    Subtype(String),
    Alignment(Alignment),
}

// ============================================================================
// Public entry points
// ============================================================================

static TYPE_PARSER: Lazy<Parser<CreatureTypeField>> = Lazy::new(type_parser);
static ARMOR_CLASS_PARSER: Lazy<Parser<ArmorClassField>> = Lazy::new(armor_class_parser);
static HIT_POINTS_PARSER: Lazy<Parser<(i32, Option<DiceExpression>)>> = Lazy::new(hit_points_parser);
static MOVEMENT_PARSER: Lazy<Parser<BTreeMap<MovementMode, i32>>> = Lazy::new(movement_parser);
static MODIFIER_LIST_PARSER: Lazy<Parser<Vec<(String, i32)>>> = Lazy::new(modifier_list_parser);
static PARENTHESIZED_PARSER: Lazy<Parser<String>> = Lazy::new(parenthesized);

/// `Medium humanoid (goblinoid), neutral evil`. Size and type are required.
pub fn parse_creature_type(text: &str) -> Option<CreatureTypeField> {
    let parsed = TYPE_PARSER.run(text.trim());
    if parsed.is_none() {
        tracing::debug!(text, "could not parse creature type");
    }
    parsed
}

/// `15 (natural armor)` or `10`.
pub fn parse_armor_class(text: &str) -> Option<ArmorClassField> {
    ARMOR_CLASS_PARSER.run(text)
}

/// `225 (18d12+108)` or `3`. A broken parenthetical leaves the dice unset.
pub fn parse_hit_points(text: &str) -> Option<(i32, Option<DiceExpression>)> {
    HIT_POINTS_PARSER.run(text)
}

/// `30 ft., fly 60 ft.` into a speed per movement mode. Later entries for the
/// same mode replace earlier ones. The whole text must be understood.
pub fn parse_movement(text: &str) -> Option<BTreeMap<MovementMode, i32>> {
    MOVEMENT_PARSER.run(text.trim())
}

/// `Perception +3, Stealth +6` into raw `(name, value)` pairs.
pub fn parse_modifier_list(text: &str) -> Option<Vec<(String, i32)>> {
    MODIFIER_LIST_PARSER.run(text.trim())
}

/// Skill modifiers. Names that aren't skills are dropped.
pub fn parse_skill_modifiers(text: &str) -> BTreeMap<Skill, Modifier> {
    parse_modifier_list(text)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| match Skill::from_english(&name) {
            Some(skill) => Some((skill, Modifier(value))),
            None => {
                tracing::debug!(name = %name, "dropping unknown skill");
                None
            }
        })
        .collect()
}

/// Saving throw modifiers keyed by ability. Names that aren't abilities are dropped.
pub fn parse_saving_throws(text: &str) -> BTreeMap<Ability, Modifier> {
    parse_modifier_list(text)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| match Ability::from_english(&name) {
            Some(ability) => Some((ability, Modifier(value))),
            None => {
                tracing::debug!(name = %name, "dropping unknown ability");
                None
            }
        })
        .collect()
}

/// `(natural armor)` into `natural armor`.
pub fn parse_parenthesized(text: &str) -> Option<String> {
    PARENTHESIZED_PARSER.run(text.trim())
}

// ============================================================================
// Grammars
// ============================================================================

/// `(` anything but `)` `)`.
pub fn parenthesized() -> Parser<String> {
    zip3(character('('), any(satisfy(|c| c != ')')).joined(), character(')')).map(|(_, s, _)| s)
}

/// Words separated by single runs of horizontal whitespace, joined by one space.
fn words() -> Parser<String> {
    word()
        .followed_by(any(zip(horizontal_whitespace(), word()).map(|(_, w)| w)))
        .map(|(first, rest)| {
            std::iter::once(first)
                .chain(rest)
                .collect::<Vec<_>>()
                .join(" ")
        })
}

fn end_of_component() -> Parser<()> {
    zip(character(','), any(character(' ')))
        .ignored()
        .or(zip(spaces(), end()).ignored())
}

fn alignment_component() -> Parser<Vec<TypeComponent>> {
    skip_until(end_of_component()).flat_map(|(component, _)| {
        Alignment::from_english(&component).map(|a| vec![TypeComponent::Alignment(a)])
    })
}

fn size_type_component() -> Parser<Vec<TypeComponent>> {
    let size = zip(word(), horizontal_whitespace()).flat_map(|(w, _)| CreatureSize::from_english(&w));
    let subtype = parenthesized().trimming(horizontal_whitespace()).optional();

    zip4(size, words(), subtype, end_of_component()).map(|(size, creature_type, subtype, _)| {
        let mut components = vec![TypeComponent::Size(size), TypeComponent::Type(creature_type)];
        components.extend(subtype.map(TypeComponent::Subtype));
        components
    })
}

fn skip_component() -> Parser<Vec<TypeComponent>> {
    skip_until(end_of_component()).flat_map(|(skipped, _)| {
        // must have skipped something, otherwise this loops at end of input
        (!skipped.is_empty()).then(Vec::new)
    })
}

fn type_parser() -> Parser<CreatureTypeField> {
    let component = choice(vec![
        alignment_component(),
        size_type_component(),
        skip_component(),
    ]);

    any(component).flat_map(|groups| {
        let mut size = None;
        let mut creature_type = None;
        let mut subtype = None;
        let mut alignment = None;

        // first occurrence of each slot wins
        for c in groups.into_iter().flatten() {
            match c {
                TypeComponent::Size(s) => {
                    size.get_or_insert(s);
                }
                TypeComponent::Type(t) => {
                    creature_type.get_or_insert(t);
                }
                TypeComponent::Subtype(s) => {
                    subtype.get_or_insert(s);
                }
                TypeComponent::Alignment(a) => {
                    alignment.get_or_insert(a);
                }
            }
        }

        Some(CreatureTypeField {
            size: size?,
            creature_type: creature_type?,
            subtype,
            alignment,
        })
    })
}

fn armor_class_parser() -> Parser<ArmorClassField> {
    let note = zip3(spaces(), character('('), skip_until(character(')')))
        .map(|(_, _, (note, _))| note.trim().to_string());

    int()
        .followed_by(note.optional())
        .map(|(value, note)| ArmorClassField {
            value,
            note: note.filter(|n| !n.is_empty()),
        })
}

fn hit_points_parser() -> Parser<(i32, Option<DiceExpression>)> {
    let dice = zip4(spaces(), character('('), dice_expression(), character(')'))
        .map(|(_, _, expr, _)| expr);
    int().followed_by(dice.optional())
}

fn movement_parser() -> Parser<BTreeMap<MovementMode, i32>> {
    let ws = || horizontal_whitespace();
    let feet = || zip(any(character(' ')), string("ft.")).ignored();

    // fly 60 ft.
    let mode_first = zip3(word(), ws(), int())
        .followed_by(feet())
        .map(|((mode, _, speed), _)| (speed, Some(mode)));

    // 30 ft. / 30 ft. swim
    let speed_first = zip3(int(), feet(), zip(ws(), word()).optional())
        .map(|(speed, _, mode)| (speed, mode.map(|(_, m)| m)));

    let trailing_note = zip(ws(), parenthesized()).optional();

    let entry = zip(mode_first.or(speed_first), trailing_note).flat_map(|((speed, mode), _)| {
        match mode {
            Some(m) => MovementMode::from_english(&m).map(|mode| (mode, speed)),
            None => Some((MovementMode::Walk, speed)),
        }
    });

    let separator = character(',').trimming(horizontal_whitespace());
    let terminator = zip(spaces(), end());

    many(entry, separator, terminator).flat_map(|entries| {
        if entries.is_empty() {
            return None;
        }
        Some(entries.into_iter().collect::<BTreeMap<_, _>>())
    })
}

fn modifier_list_parser() -> Parser<Vec<(String, i32)>> {
    let sign = one_of("+-").map(|c| if c == '-' { -1 } else { 1 });
    let entry = zip4(words(), horizontal_whitespace(), sign, int())
        .map(|(name, _, sign, value)| (name, sign * value));
    let separator = character(',').trimming(horizontal_whitespace());

    many(entry, separator, nothing())
}
