//! Top-level facade crate for promwire.
//!
//! Re-exports the core seams and the bundle so hosts can depend on a single crate.

pub mod core {
    pub use promwire_core::*;
}

pub mod bundle {
    pub use promwire_bundle::*;
}
