use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use super::{DocumentFormat, ItineraryDocument};

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::from_str::<toml::Table>(contents)
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse and schema-check an itinerary document.
pub fn parse_itinerary(contents: &str, format: DocumentFormat) -> Result<ItineraryDocument> {
    let value = parse_document_str(contents, format)?;
    let document = ItineraryDocument::from_value(value)?;
    debug!(points = document.points.len(), %format, "itinerary parsed");
    Ok(document)
}

/// Reads an itinerary file; the format follows the extension and defaults to JSON.
pub fn load_document(path: &Path) -> Result<ItineraryDocument> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read file {}", path.display()))?;
    let format = DocumentFormat::from_path(path).unwrap_or_default();
    parse_itinerary(&contents, format)
        .with_context(|| format!("failed to load itinerary from {}", path.display()))
}
