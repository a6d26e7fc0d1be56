//! Field extractors
//!
//! Small grammars applied to single, already isolated text fields.

pub mod dice;
pub mod spell;
pub mod stat_block;

pub use dice::{dice_expression, find_dice, parse_dice};
pub use spell::{parse_components, parse_duration, parse_spell_text, school_from_abbreviation, SpellText};
pub use stat_block::{
    parse_armor_class, parse_creature_type, parse_hit_points, parse_modifier_list, parse_movement,
    parse_parenthesized, parse_saving_throws, parse_skill_modifiers, ArmorClassField,
    CreatureTypeField,
};
