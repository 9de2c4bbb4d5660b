//! Bundle assembly: options, aggregation, and lifecycle wiring.

use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::Path;

use async_trait::async_trait;
use prometheus::Registry;

use promwire_core::{CollectorProvider, Lifecycle, Result};

use crate::config::{self, ExporterSection};
use crate::exporter::Exporter;
use crate::flags;
use crate::registry::{build_registry, RegistrySource};

/// The composable unit wiring the registry, the resolved configuration, and
/// the exporter into a host application.
///
/// Hosts build one via [`Bundle::builder`], register their own metrics
/// through [`Bundle::registry`], and drive [`Lifecycle::start`] /
/// [`Lifecycle::stop`] from their startup and teardown phases.
#[derive(Debug)]
pub struct Bundle {
    registry: Registry,
    exporter: Exporter,
}

/// Options collected before the bundle is built.
///
/// The parsed port flag lives here, scoped to the builder, so the bundle can
/// be instantiated several times in one process without shared mutable
/// state.
pub struct BundleBuilder {
    source: RegistrySource,
    providers: Vec<Box<dyn CollectorProvider>>,
    flag_port: Option<String>,
}

impl Bundle {
    pub fn builder() -> BundleBuilder {
        BundleBuilder {
            source: RegistrySource::Owned,
            providers: Vec::new(),
            flag_port: None,
        }
    }

    /// Registry handle for host-side metric registration. Clones of a
    /// registry share the same underlying collector set.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Bound scrape address while the exporter is listening.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.exporter.local_addr()
    }
}

#[async_trait]
impl Lifecycle for Bundle {
    async fn start(&mut self) -> Result<()> {
        self.exporter.start().await
    }

    async fn stop(&mut self) -> Result<()> {
        self.exporter.stop().await
    }
}

impl BundleBuilder {
    /// Use a host-populated registry instead of creating one. Baseline
    /// collectors are skipped: the host is assumed to have already
    /// registered what it wants.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.source = RegistrySource::External(registry);
        self
    }

    /// Append a collector provider. Its collectors are registered when the
    /// bundle is built.
    pub fn provider(mut self, provider: Box<dyn CollectorProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Parse `--prometheus-port` out of the given argument vector; unknown
    /// flags are tolerated. The first element is treated as the program
    /// name, so `std::env::args()` can be passed as-is.
    pub fn flag_args<I, T>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.flag_port = flags::parse_port_flag(args)?;
        Ok(self)
    }

    /// Directly set the port override, for hosts that run their own flag
    /// parser. An empty value leaves the configured port in effect.
    pub fn port_flag(mut self, port: impl Into<String>) -> Self {
        self.flag_port = Some(port.into());
        self
    }

    /// Build the bundle from an already-extracted config section.
    ///
    /// Resolves the effective configuration, aggregates the registry, and
    /// constructs the exporter. Must run inside a tokio runtime when the
    /// bundle owns its registry, because the baseline runtime collector
    /// samples the ambient runtime.
    pub fn build(self, section: ExporterSection) -> Result<Bundle> {
        let conf = section.resolve(self.flag_port.as_deref())?;
        let registry = build_registry(self.source, &self.providers)?;
        let exporter = Exporter::new(conf, registry.clone())?;
        Ok(Bundle { registry, exporter })
    }

    /// Build from a full host config document in YAML form.
    pub fn build_from_yaml(self, doc: &str) -> Result<Bundle> {
        let section = config::load_from_str(doc)?;
        self.build(section)
    }

    /// Build from a host config file on disk.
    pub fn build_from_file(self, path: impl AsRef<Path>) -> Result<Bundle> {
        let section = config::load_from_file(path)?;
        self.build(section)
    }
}
