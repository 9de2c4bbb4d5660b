//! Host lifecycle contract.

use async_trait::async_trait;

use crate::error::Result;

/// A unit the host drives through its startup and teardown phases.
///
/// `start` is invoked once before the host's main run phase and must return
/// quickly; long-running work belongs on background tasks. `stop` is invoked
/// once during teardown and is expected to bound its own wait time so the
/// host's shutdown cannot hang on a slow component.
#[async_trait]
pub trait Lifecycle: Send {
    /// Invoked by the host before its run phase.
    async fn start(&mut self) -> Result<()>;

    /// Invoked by the host during teardown. Calling `stop` on a unit that
    /// was never started is a no-op.
    async fn stop(&mut self) -> Result<()>;
}
