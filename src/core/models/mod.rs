//! Compendium domain records
//!
//! The records readers produce. They carry no persistence logic; ownership
//! passes to whoever consumes the reader stream.

pub mod compendium;
pub mod creature;
pub mod dice;
pub mod fraction;
pub mod spell;
pub mod stat_block;

pub use compendium::{Character, CompendiumItem, Monster, RealmId};
pub use creature::{
    Ability, AbilityScore, AbilityScores, Alignment, Armor, ArmorClass, CreatureAction,
    CreatureFeature, CreatureSize, Initiative, Legendary, Modifier, MovementMode, Skill,
};
pub use dice::{DiceExpression, DiceOperator};
pub use fraction::Fraction;
pub use spell::{Spell, SpellComponent};
pub use stat_block::StatBlock;
