//! Shared error type across promwire crates.

use std::time::Duration;

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, PromwireError>;

/// Unified error type used by core and bundle.
#[derive(Debug, Error)]
pub enum PromwireError {
    /// Config section failed to parse or validate.
    #[error("invalid config: {0}")]
    Config(String),
    /// Argument vector could not be parsed.
    #[error("flag parsing failed: {0}")]
    Flags(String),
    /// A collector could not be added to the registry, typically because a
    /// metric name is already taken.
    #[error("collector registration failed: {0}")]
    Registration(#[from] prometheus::Error),
    /// Listener could not be bound to the resolved address.
    #[error("bind failed on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// `start` called while the exporter is already listening or stopped.
    #[error("exporter already started")]
    AlreadyStarted,
    /// In-flight requests did not drain before the shutdown deadline;
    /// remaining connections were closed forcibly.
    #[error("graceful shutdown exceeded {0:?}")]
    ShutdownTimeout(Duration),
    /// No async runtime was available to sample for baseline collectors.
    #[error("no runtime available: {0}")]
    Runtime(String),
    #[error("internal: {0}")]
    Internal(String),
}
