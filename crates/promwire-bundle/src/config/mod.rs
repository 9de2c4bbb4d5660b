//! Bundle config loader (strict section parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use promwire_core::error::{PromwireError, Result};

pub use schema::{ExporterConfig, ExporterSection};

/// Top-level key the bundle reads from the host config document.
pub const CONFIG_SECTION: &str = "prometheus";

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ExporterSection> {
    let s = fs::read_to_string(path)
        .map_err(|e| PromwireError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Parse a whole host config document and extract the bundle's section.
///
/// Keys outside the `prometheus` section belong to the host and are ignored;
/// the section itself is parsed strictly. A missing section yields defaults.
pub fn load_from_str(s: &str) -> Result<ExporterSection> {
    let doc: serde_yaml::Value =
        serde_yaml::from_str(s).map_err(|e| PromwireError::Config(format!("invalid yaml: {e}")))?;
    section_from_value(&doc)
}

pub fn section_from_value(doc: &serde_yaml::Value) -> Result<ExporterSection> {
    match doc.get(CONFIG_SECTION) {
        None => Ok(ExporterSection::default()),
        Some(section) => serde_yaml::from_value(section.clone())
            .map_err(|e| PromwireError::Config(format!("invalid {CONFIG_SECTION} section: {e}"))),
    }
}
