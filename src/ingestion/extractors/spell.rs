//! Spell Field Extractors
//!
//! Duration (`Concentration, up to 1 minute`), body text with optional
//! "At Higher Levels:" and "Source:" sections, and component lists
//! (`V, S, M (a pinch of sulfur)`).

use once_cell::sync::Lazy;

use crate::core::models::SpellComponent;
use crate::ingestion::parsing::{
    character, choice, end, horizontal_whitespace, one_of, one_or_more, remainder, skip_until,
    string, vertical_whitespace, zip, zip3, Parser,
};

/// A spell's body split into its sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellText {
    pub description: String,
    pub higher_levels: Option<String>,
    pub source: Option<String>,
}

const HIGHER_LEVELS_HEADER: &str = "At Higher Levels:";
const SOURCE_HEADER: &str = "Source:";

static DURATION_PARSER: Lazy<Parser<(bool, String)>> = Lazy::new(duration_parser);
static TEXT_PARSER: Lazy<Parser<SpellText>> = Lazy::new(text_parser);
static COMPONENTS_PARSER: Lazy<Parser<(Vec<SpellComponent>, Option<String>)>> =
    Lazy::new(components_parser);

/// `Concentration, up to 1 minute` into `(true, "up to 1 minute")`.
/// Anything else is returned as-is with `false`.
pub fn parse_duration(text: &str) -> (bool, String) {
    DURATION_PARSER
        .run(text.trim())
        .unwrap_or_else(|| (false, text.trim().to_string()))
}

/// Split spell text on its section headers. Text without headers is all description.
///
/// "At Higher Levels:" is only recognized before "Source:". Once a source
/// line is found, anything after it is dropped.
pub fn parse_spell_text(text: &str) -> SpellText {
    TEXT_PARSER.run(text).unwrap_or_else(|| SpellText {
        description: text.trim().to_string(),
        higher_levels: None,
        source: None,
    })
}

/// `V, S, M (a pinch of sulfur)` into the component list and material text.
///
/// The material note ends at the first `)`, so nested parentheses are cut short.
pub fn parse_components(text: &str) -> Option<(Vec<SpellComponent>, Option<String>)> {
    COMPONENTS_PARSER.run(text.trim())
}

/// Full school name for the single/double letter codes of the XML dialect.
pub fn school_from_abbreviation(abbreviation: &str) -> Option<&'static str> {
    match abbreviation.trim() {
        "A" => Some("Abjuration"),
        "C" => Some("Conjuration"),
        "D" => Some("Divination"),
        "EN" => Some("Enchantment"),
        "EV" => Some("Evocation"),
        "I" => Some("Illusion"),
        "N" => Some("Necromancy"),
        "T" => Some("Transmutation"),
        _ => None,
    }
}

fn duration_parser() -> Parser<(bool, String)> {
    zip(string("Concentration,").trimming(horizontal_whitespace()), remainder())
        .map(|(_, rest)| (true, rest))
        .or(remainder().map(|rest| (false, rest)))
}

fn text_parser() -> Parser<SpellText> {
    // Source: <attribution> up to the end of the line
    let source = || {
        zip(
            string(SOURCE_HEADER),
            skip_until(vertical_whitespace().ignored().or(end())),
        )
        .map(|(_, (attribution, _))| attribution.trim().to_string())
    };

    let higher_levels = zip(
        string(HIGHER_LEVELS_HEADER),
        skip_until(source().map(Some).or(end().map(|_| None))),
    )
    .map(|(_, (text, source))| (Some(text.trim().to_string()), source));

    let section = choice(vec![
        higher_levels,
        source().map(|s| (None, Some(s))),
        end().map(|_| (None, None)),
    ]);

    skip_until(section).map(|(description, (higher_levels, source))| SpellText {
        description: description.trim().to_string(),
        higher_levels: higher_levels.filter(|s| !s.is_empty()),
        source: source.filter(|s| !s.is_empty()),
    })
}

fn components_parser() -> Parser<(Vec<SpellComponent>, Option<String>)> {
    let material_note = zip(
        character('(').trimming(horizontal_whitespace()),
        skip_until(character(')')),
    )
    .map(|(_, (note, _))| note.trim().to_string());

    let abbreviation =
        one_of("VSM").flat_map(|c| SpellComponent::from_abbreviation(c.encode_utf8(&mut [0; 4])));

    // only a material component carries a note
    let component = zip(abbreviation, material_note.optional()).flat_map(|(component, note)| {
        match (component, note) {
            (SpellComponent::Material, note) => Some((component, note)),
            (_, None) => Some((component, None)),
            (_, Some(_)) => None,
        }
    });

    let separator = character(',').trimming(horizontal_whitespace()).optional();

    one_or_more(zip3(component, separator, horizontal_whitespace().optional()).map(|(c, _, _)| c))
        .map(|entries| {
            let mut components = Vec::new();
            let mut material = None;
            for (component, note) in entries {
                components.push(component);
                if material.is_none() {
                    material = note;
                }
            }
            (components, material)
        })
}
