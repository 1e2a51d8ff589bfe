//! metricboard core: in-memory telemetry model, aggregation, and error types.
//!
//! This crate holds the registered participants and their metric samples and
//! computes cross-participant averages on demand. It carries no transport or
//! runtime dependencies so the HTTP server (and tests) can drive it directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `MetricboardError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod aggregate;
pub mod error;
pub mod store;
pub mod unit;

/// Shared result type.
pub use error::{MetricboardError, Result};

pub use aggregate::{aggregate, AggregateStat, Averages};
pub use store::{NamePolicy, Store, User, UserId};
pub use unit::{Unit, UnitRegistry};
