//! Format Readers
//!
//! Each reader turns one raw payload into a lazy stream of per-record
//! outcomes. Failures come in two tiers:
//! - the whole payload is unreadable: the stream fails with
//!   [`ReaderError::IncompatibleDataSource`] and yields nothing further
//! - a single record can't be converted: it is yielded as
//!   [`ReaderOutput::InvalidItem`] and the stream carries on

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::models::{CompendiumItem, RealmId};
use crate::ingestion::xml::TreeBuildError;

pub mod ddb;
pub mod improved_initiative;
pub mod open5e;
pub mod xml;

pub use ddb::DdbCharacterReader;
pub use improved_initiative::ImprovedInitiativeReader;
pub use open5e::{Open5eKind, Open5eReader};
pub use xml::XmlCompendiumReader;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Incompatible data source: {0}")]
    IncompatibleDataSource(String),
}

impl From<TreeBuildError> for ReaderError {
    fn from(err: TreeBuildError) -> Self {
        ReaderError::IncompatibleDataSource(err.to_string())
    }
}

impl From<serde_json::Error> for ReaderError {
    fn from(err: serde_json::Error) -> Self {
        ReaderError::IncompatibleDataSource(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;

// ============================================================================
// Reader contract
// ============================================================================

/// Outcome for one record of a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ReaderOutput {
    Item(CompendiumItem),
    /// The record was read but could not be converted; carries a description.
    InvalidItem(String),
}

pub type ReaderStream = BoxStream<'static, Result<ReaderOutput>>;

pub trait CompendiumReader: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Stream the payload's records into `realm`. Nothing is decoded until
    /// the stream is first polled.
    fn items(&self, realm: RealmId) -> ReaderStream;
}

// ============================================================================
// Id generation
// ============================================================================

/// Source of ids for features and actions created while converting records.
#[derive(Clone)]
pub struct IdGenerator(Arc<dyn Fn() -> Uuid + Send + Sync>);

impl IdGenerator {
    pub fn new(generate: impl Fn() -> Uuid + Send + Sync + 'static) -> Self {
        Self(Arc::new(generate))
    }

    /// Random v4 ids.
    pub fn random() -> Self {
        Self::new(Uuid::new_v4)
    }

    /// Ids `00000000-0000-0000-0000-000000000000`, `…0001`, `…0002` and so on.
    pub fn sequential() -> Self {
        let counter = Arc::new(AtomicU64::new(0));
        Self::new(move || Uuid::from_u128(counter.fetch_add(1, Ordering::Relaxed) as u128))
    }

    pub fn next_id(&self) -> Uuid {
        (self.0)()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdGenerator")
    }
}

// ============================================================================
// Import summary
// ============================================================================

/// Result of driving a reader stream to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: Vec<String>,
}

impl ImportSummary {
    /// Hand every item to `sink` and tally the invalid ones. A fatal reader
    /// error is returned as-is; items already handed to `sink` stay there.
    pub async fn collect<F>(mut stream: ReaderStream, mut sink: F) -> Result<ImportSummary>
    where
        F: FnMut(CompendiumItem),
    {
        let mut summary = ImportSummary::default();

        while let Some(output) = stream.next().await {
            match output? {
                ReaderOutput::Item(item) => {
                    summary.imported += 1;
                    sink(item);
                }
                ReaderOutput::InvalidItem(description) => {
                    warn!(record = %description, "Skipping invalid record");
                    summary.skipped.push(description);
                }
            }
        }

        info!(
            imported = summary.imported,
            skipped = summary.skipped.len(),
            "Import complete"
        );
        Ok(summary)
    }

    pub fn total(&self) -> usize {
        self.imported + self.skipped.len()
    }
}

/// Required text field, or a description of what is missing.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> std::result::Result<T, String> {
    value.ok_or_else(|| format!("missing or invalid {field}"))
}
