//! Ingestion Pipeline
//!
//! raw bytes -> format decode / content tree -> field extraction -> domain record
//!
//! - `parsing`: backtracking parser combinators over a character cursor
//! - `extractors`: grammars for single stat block and spell fields
//! - `xml`: event-driven content tree builder for the compendium XML dialect
//! - `readers`: one stream-producing reader per supported format

pub mod extractors;
pub mod parsing;
pub mod readers;
pub mod xml;

pub use readers::{
    CompendiumReader, DdbCharacterReader, IdGenerator, ImportSummary, ImprovedInitiativeReader,
    Open5eKind, Open5eReader, ReaderError, ReaderOutput, ReaderStream, XmlCompendiumReader,
};
