/// TTRPG Compendium - third-party game data ingestion
///
/// Normalizes creature stat blocks, spells and character sheets from
/// several incompatible export formats into one domain model.

pub mod config;
pub mod core;
pub mod ingestion;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
