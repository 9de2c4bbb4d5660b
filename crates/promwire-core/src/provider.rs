//! Extension point for contributing collectors to the bundle registry.

use prometheus::core::Collector;

/// An external component contributing collectors to the aggregated registry.
///
/// Providers are handed to the bundle builder at composition time and
/// resolved once, when the registry is built. Collector names must be unique
/// across the whole registry; a collision aborts bundle construction.
///
/// There is no ordering guarantee across providers.
pub trait CollectorProvider: Send + Sync {
    /// Provider name, used in logs and registration diagnostics.
    fn name(&self) -> &str;

    /// The collectors this provider contributes. Called once per registry
    /// build; implementations should hand out freshly boxed collectors.
    fn collectors(&self) -> Vec<Box<dyn Collector>>;
}
