//! Test Fixtures
//!
//! Sample export files for every supported format, plus helpers that run a
//! reader with deterministic ids and collect what it yields.

use futures::executor::block_on;
use futures::TryStreamExt;

use crate::core::models::RealmId;
use crate::ingestion::readers::{
    CompendiumReader, IdGenerator, ReaderError, ReaderOutput, XmlCompendiumReader,
};

// =============================================================================
// Sample payloads
// =============================================================================

pub const BESTIARY_XML: &str = include_str!("../../../tests/fixtures/bestiary.xml");
pub const OPEN5E_MONSTERS_JSON: &str = include_str!("../../../tests/fixtures/open5e_monsters.json");
pub const OPEN5E_SPELLS_JSON: &str = include_str!("../../../tests/fixtures/open5e_spells.json");
pub const IMPROVED_INITIATIVE_JSON: &str =
    include_str!("../../../tests/fixtures/improved_initiative.json");
pub const DDB_CHARACTER_JSON: &str = include_str!("../../../tests/fixtures/ddb_character.json");

/// Minimal XML monster record. Valid only when `cr` is `Some`.
pub fn xml_monster(name: &str, cr: Option<&str>) -> String {
    let cr = cr.map(|cr| format!("<cr>{cr}</cr>")).unwrap_or_default();
    format!(
        "<monster><name>{name}</name><size>M</size><type>beast</type><ac>12</ac>\
         <hp>9 (2d8)</hp><speed>30 ft.</speed>\
         <str>10</str><dex>10</dex><con>10</con><int>2</int><wis>10</wis><cha>4</cha>\
         {cr}</monster>"
    )
}

/// Wrap records in the compendium container.
pub fn xml_document(records: &[String]) -> String {
    format!("<compendium>{}</compendium>", records.concat())
}

// =============================================================================
// Reader helpers
// =============================================================================

/// Run `reader` to completion on the current thread.
pub fn read_all(reader: &dyn CompendiumReader) -> Result<Vec<ReaderOutput>, ReaderError> {
    block_on(reader.items(RealmId::new("test")).try_collect())
}

/// XML reader with sequential ids.
pub fn xml_reader(xml: impl Into<String>) -> XmlCompendiumReader {
    XmlCompendiumReader::new(xml.into()).with_id_generator(IdGenerator::sequential())
}

/// `(items, invalid)` counts for a fully read stream.
pub fn tally(outputs: &[ReaderOutput]) -> (usize, usize) {
    outputs.iter().fold((0, 0), |(items, invalid), output| match output {
        ReaderOutput::Item(_) => (items + 1, invalid),
        ReaderOutput::InvalidItem(_) => (items, invalid + 1),
    })
}
