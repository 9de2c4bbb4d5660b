//! Registry aggregation: baseline collectors plus provider-contributed ones.

use prometheus::Registry;

use promwire_core::{CollectorProvider, Result};

use crate::collectors::RuntimeCollector;

/// Where the bundle's registry comes from, and with it the responsibility
/// for baseline collectors.
#[derive(Clone, Default)]
pub enum RegistrySource {
    /// The bundle creates and owns the registry and adds the baseline
    /// runtime and process collectors.
    #[default]
    Owned,
    /// The host supplied an already-populated registry; it is used as-is
    /// and no baselines are added.
    External(Registry),
}

/// Build the aggregated registry.
///
/// Every collector yielded by every provider is registered after the
/// baselines. The first registration failure (typically a duplicate metric
/// name) aborts the build; no partially-populated registry escapes because
/// the error propagates to bundle construction.
pub fn build_registry(
    source: RegistrySource,
    providers: &[Box<dyn CollectorProvider>],
) -> Result<Registry> {
    let registry = match source {
        RegistrySource::External(registry) => registry,
        RegistrySource::Owned => {
            let registry = Registry::new();
            registry.register(Box::new(RuntimeCollector::current()?))?;
            register_process_collector(&registry)?;
            registry
        }
    };

    for provider in providers {
        let collectors = provider.collectors();
        tracing::debug!(
            provider = provider.name(),
            count = collectors.len(),
            "registering provided collectors"
        );
        for collector in collectors {
            registry.register(collector)?;
        }
    }

    Ok(registry)
}

#[cfg(target_os = "linux")]
fn register_process_collector(registry: &Registry) -> Result<()> {
    use prometheus::process_collector::ProcessCollector;

    registry.register(Box::new(ProcessCollector::for_self()))?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn register_process_collector(_registry: &Registry) -> Result<()> {
    tracing::debug!("process collector is not available on this platform");
    Ok(())
}
