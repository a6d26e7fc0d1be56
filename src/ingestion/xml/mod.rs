//! XML compendium ingestion
//!
//! quick-xml events feed a schema-aware builder that emits one content tree
//! per completed monster or spell record.

pub mod builder;
pub mod content;
pub mod document;
pub mod events;

pub use builder::{CompletedElement, ContentTreeBuilder, TreeBuildError};
pub use content::{ElementContent, ElementPath};
pub use document::{
    CompendiumElement, DocumentElement, EntryKind, MonsterElement, MonsterField, SpellElement,
    TraitElement,
};
pub use events::{XmlEvent, XmlEventReader};
