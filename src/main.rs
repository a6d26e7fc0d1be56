use std::path::PathBuf;
use std::str::FromStr;

use miette::IntoDiagnostic;

use ttrpg_compendium::config::AppConfig;
use ttrpg_compendium::core::logging::{self, ImportError, UnknownFormatError};
use ttrpg_compendium::core::models::{CompendiumItem, RealmId};
use ttrpg_compendium::ingestion::{
    CompendiumReader, DdbCharacterReader, ImportSummary, ImprovedInitiativeReader, Open5eKind,
    Open5eReader, XmlCompendiumReader,
};

const USAGE: &str = "usage: compendium-import <format> <path> [realm]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Xml,
    Open5eMonsters,
    Open5eSpells,
    ImprovedInitiative,
    DdbCharacter,
}

impl FromStr for Format {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xml" => Ok(Self::Xml),
            "open5e-monsters" => Ok(Self::Open5eMonsters),
            "open5e-spells" => Ok(Self::Open5eSpells),
            "improved-initiative" => Ok(Self::ImprovedInitiative),
            "ddb-character" => Ok(Self::DdbCharacter),
            other => Err(UnknownFormatError {
                format: other.to_string(),
            }),
        }
    }
}

impl Format {
    fn reader(self, payload: Vec<u8>, config: &AppConfig) -> Box<dyn CompendiumReader> {
        match self {
            Self::Xml => Box::new(XmlCompendiumReader::new(payload).with_config(config.ingest.clone())),
            Self::Open5eMonsters => Box::new(Open5eReader::new(Open5eKind::Monsters, payload)),
            Self::Open5eSpells => Box::new(Open5eReader::new(Open5eKind::Spells, payload)),
            Self::ImprovedInitiative => Box::new(ImprovedInitiativeReader::new(payload)),
            Self::DdbCharacter => Box::new(DdbCharacterReader::new(payload)),
        }
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = AppConfig::load();
    let _log_guard = logging::init(&config.logging);

    let mut args = std::env::args().skip(1);
    let (Some(format_arg), Some(path)) = (args.next(), args.next().map(PathBuf::from)) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let realm = RealmId::new(args.next().unwrap_or_else(|| config.ingest.default_realm.clone()));

    let format: Format = format_arg.parse()?;
    tracing::info!(
        version = ttrpg_compendium::VERSION,
        format = %format_arg,
        path = %path.display(),
        realm = realm.as_str(),
        "Starting import"
    );

    let payload = tokio::fs::read(&path).await.into_diagnostic()?;
    let reader = format.reader(payload, &config);

    // Imported records go to stdout as JSON lines for the storage layer.
    let summary = ImportSummary::collect(reader.items(realm), |item: CompendiumItem| {
        match serde_json::to_string(&item) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(title = item.title(), "Failed to serialize record: {e}"),
        }
    })
    .await
    .map_err(|e| {
        ImportError::new(path.display().to_string(), reader.name(), e.to_string())
            .with_help("Check that the file matches the chosen format")
    })?;

    eprintln!(
        "{}: imported {} of {} records ({} skipped)",
        reader.name(),
        summary.imported,
        summary.total(),
        summary.skipped.len()
    );
    Ok(())
}
