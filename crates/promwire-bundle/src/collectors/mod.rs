//! Baseline collectors registered into bundle-owned registries.

mod runtime;

pub use runtime::RuntimeCollector;
