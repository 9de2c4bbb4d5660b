//! promwire core: error surface and host-facing seams.
//!
//! This crate defines the error type, the collector-provider extension point,
//! and the lifecycle contract shared by the bundle and by host applications.
//! It intentionally carries no transport or runtime dependencies so it can be
//! depended on by provider implementations without pulling in the server
//! stack.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `PromwireError`/`Result` so host
//! processes do not crash on bad configuration or colliding metrics.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod lifecycle;
pub mod provider;

/// Shared result type.
pub use error::{PromwireError, Result};
pub use lifecycle::Lifecycle;
pub use provider::CollectorProvider;
