use std::collections::HashMap;
use std::net::SocketAddr;

use metricboard_core::error::{MetricboardError, Result};
use metricboard_core::{NamePolicy, Unit, UnitRegistry};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub registration: RegistrationSection,

    /// Explicit units per metric key; other keys use the naming convention.
    #[serde(default)]
    pub units: HashMap<String, Unit>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            registration: RegistrationSection::default(),
            units: HashMap::new(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricboardError::UnsupportedVersion);
        }
        self.server.validate()?;
        if self.units.keys().any(|k| k.is_empty()) {
            return Err(MetricboardError::BadConfig(
                "units keys must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn unit_registry(&self) -> UnitRegistry {
        UnitRegistry::new(self.units.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MetricboardError::BadConfig(format!(
                "server.listen must be a valid socket address ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RegistrationSection {
    #[serde(default)]
    pub name_policy: NamePolicy,
}
