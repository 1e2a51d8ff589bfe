//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use metricboard_core::error::{MetricboardError, Result};

pub use schema::{RegistrationSection, ServerConfig, ServerSection};

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "metricboard.yaml";

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricboardError::BadConfig(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricboardError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// An explicit path must exist; the default path may be absent, in which case
/// built-in defaults apply.
pub fn load(path: Option<&str>) -> Result<ServerConfig> {
    match path {
        Some(p) => load_from_file(p),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH),
        None => {
            tracing::info!(path = DEFAULT_CONFIG_PATH, "no config file, using defaults");
            Ok(ServerConfig::default())
        }
    }
}
