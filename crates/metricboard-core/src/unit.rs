//! Display unit for a metric key.
//!
//! Producers encode the unit in the key name: anything starting with `exp` and
//! containing `time` is a duration in milliseconds, everything else counts
//! occurrences. `UnitRegistry` lets deployments pin units per key instead.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(alias = "milliseconds")]
    Milliseconds,
    #[serde(alias = "count")]
    Count,
}

impl Unit {
    /// Naming convention shared with the producing client.
    pub fn from_metric_key(key: &str) -> Self {
        if key.starts_with("exp") && key.contains("time") {
            Unit::Milliseconds
        } else {
            Unit::Count
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Milliseconds => "Milliseconds",
            Unit::Count => "Count",
        }
    }
}

/// Explicit `metric key -> unit` table, falling back to the naming convention.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    overrides: HashMap<String, Unit>,
}

impl UnitRegistry {
    pub fn new(overrides: HashMap<String, Unit>) -> Self {
        Self { overrides }
    }

    pub fn resolve(&self, key: &str) -> Unit {
        self.overrides
            .get(key)
            .copied()
            .unwrap_or_else(|| Unit::from_metric_key(key))
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
