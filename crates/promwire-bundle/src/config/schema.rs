use serde::Deserialize;

use promwire_core::error::{PromwireError, Result};

/// Raw `prometheus` section as written in the host config document.
///
/// All fields are strings on purpose: an empty `port` means "any available
/// port" and an empty `host` means "all interfaces", mirroring what the
/// listener itself accepts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: String,

    #[serde(default)]
    pub path: String,
}

impl ExporterSection {
    /// Merge with the port flag and apply defaults.
    ///
    /// A non-empty flag value always wins over the configured port. The
    /// scrape path defaults to `/` when left empty. Resolution happens once,
    /// at bundle build time.
    pub fn resolve(self, flag_port: Option<&str>) -> Result<ExporterConfig> {
        let mut conf = ExporterConfig {
            host: self.host,
            port: self.port,
            path: self.path,
        };

        if let Some(port) = flag_port {
            if !port.is_empty() {
                conf.port = port.to_owned();
            }
        }

        if conf.path.is_empty() {
            conf.path = "/".to_owned();
        }

        conf.validate()?;

        Ok(conf)
    }
}

/// Effective exporter configuration, immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    pub host: String,
    pub port: String,
    pub path: String,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(PromwireError::Config(format!(
                "path must start with '/', got {:?}",
                self.path
            )));
        }
        Ok(())
    }

    /// Bind address for the listener. An empty host binds all interfaces;
    /// an empty port picks any available one.
    pub fn bind_addr(&self) -> String {
        let host = if self.host.is_empty() { "0.0.0.0" } else { &self.host };
        let port = if self.port.is_empty() { "0" } else { &self.port };
        format!("{host}:{port}")
    }
}
