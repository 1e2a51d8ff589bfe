//! Top-level facade crate for metricboard.
//!
//! Re-exports the core model and the HTTP server library so users can depend on a single crate.

pub mod core {
    pub use metricboard_core::*;
}

pub mod server {
    pub use metricboard_server::*;
}
