//! Property-based tests for the format readers
//!
//! Tests invariants:
//! - k valid and m invalid records yield exactly k items and m invalid items
//! - Outcomes come out in document order
//! - Unrecognized wrapper elements never change the outcome

use proptest::prelude::*;
use serde_json::json;

use crate::core::models::CompendiumItem;
use crate::ingestion::readers::{IdGenerator, Open5eKind, Open5eReader, ReaderOutput};
use crate::tests::common::{read_all, tally, xml_document, xml_monster, xml_reader};

// ============================================================================
// Helpers
// ============================================================================

/// One record per flag: `true` is valid, `false` lacks its challenge rating.
fn xml_records(pattern: &[bool]) -> Vec<String> {
    pattern
        .iter()
        .enumerate()
        .map(|(i, &valid)| {
            if valid {
                xml_monster(&format!("Creature {i}"), Some("1/2"))
            } else {
                xml_monster(&format!("Creature {i}"), None)
            }
        })
        .collect()
}

fn open5e_records(pattern: &[bool]) -> serde_json::Value {
    let records: Vec<_> = pattern
        .iter()
        .enumerate()
        .map(|(i, &valid)| {
            json!({
                "name": format!("Creature {i}"),
                "size": "Medium",
                "type": "beast",
                "armor_class": 12,
                "hit_points": 9,
                "hit_dice": if valid { "2d8" } else { "unknown" },
                "strength": 10, "dexterity": 10, "constitution": 10,
                "intelligence": 2, "wisdom": 10, "charisma": 4,
                "challenge_rating": "1/2"
            })
        })
        .collect();
    json!(records)
}

/// Record index each output refers to, read back from its name.
fn indices(outputs: &[ReaderOutput]) -> Vec<usize> {
    outputs
        .iter()
        .filter_map(|output| {
            let name = match output {
                ReaderOutput::Item(CompendiumItem::Monster(m)) => m.stats.name.clone(),
                ReaderOutput::Item(other) => other.title().to_string(),
                ReaderOutput::InvalidItem(description) => description.clone(),
            };
            name.split("Creature ")
                .nth(1)
                .and_then(|rest| rest.split(':').next())
                .and_then(|n| n.trim().parse().ok())
        })
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_xml_counts_and_order(pattern in prop::collection::vec(any::<bool>(), 0..12)) {
        let outputs = read_all(&xml_reader(xml_document(&xml_records(&pattern)))).unwrap();

        let valid = pattern.iter().filter(|v| **v).count();
        prop_assert_eq!(tally(&outputs), (valid, pattern.len() - valid));
        prop_assert_eq!(indices(&outputs), (0..pattern.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_xml_unrecognized_wrappers_are_transparent(
        pattern in prop::collection::vec(any::<bool>(), 1..8),
        depth in 1usize..5,
    ) {
        let open: String = (0..depth).map(|d| format!("<extra{d}><note>ignored</note>")).collect();
        let close: String = (0..depth).rev().map(|d| format!("</extra{d}>")).collect();
        let plain = xml_document(&xml_records(&pattern));
        let wrapped = format!("<compendium>{open}{close}{}</compendium>", xml_records(&pattern).concat());

        let plain = read_all(&xml_reader(plain)).unwrap();
        let wrapped = read_all(&xml_reader(wrapped)).unwrap();
        prop_assert_eq!(plain, wrapped);
    }

    #[test]
    fn prop_open5e_counts_and_order(pattern in prop::collection::vec(any::<bool>(), 0..12)) {
        let reader = Open5eReader::new(Open5eKind::Monsters, open5e_records(&pattern).to_string())
            .with_id_generator(IdGenerator::sequential());
        let outputs = read_all(&reader).unwrap();

        let valid = pattern.iter().filter(|v| **v).count();
        prop_assert_eq!(tally(&outputs), (valid, pattern.len() - valid));
        prop_assert_eq!(indices(&outputs), (0..pattern.len()).collect::<Vec<_>>());
    }
}
