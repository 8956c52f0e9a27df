//! Engine configuration loaded from TOML
//!
//! ```toml
//! [hash]
//! iterations = 3
//! digest_size = 16
//! node_labels = true
//! edge_labels = true
//!
//! [similarity]
//! edit_distance_threshold = 10
//! upper_bound = 500
//! timeout_secs = 5
//!
//! [summary]
//! node_attributes = ["label", "CODE"]
//! edge_attributes = ["label", "CODE"]
//! ```

use crate::aggregation::SummaryConfig;
use crate::error::{GraphError, Result};
use crate::hash::{WlConfig, DEFAULT_DIGEST_SIZE, DEFAULT_ITERATIONS};
use crate::label;
use crate::similarity::SimilarityConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest digest width accepted, in bytes.
pub const MAX_DIGEST_SIZE: usize = 64;

/// Serializable form of [`WlConfig`]; label functions are switched on by flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashSettings {
    pub iterations: usize,
    pub digest_size: usize,
    pub node_labels: bool,
    pub edge_labels: bool,
}

impl Default for HashSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            digest_size: DEFAULT_DIGEST_SIZE,
            node_labels: true,
            edge_labels: true,
        }
    }
}

impl From<&HashSettings> for WlConfig {
    fn from(settings: &HashSettings) -> Self {
        WlConfig {
            iterations: settings.iterations,
            digest_size: settings.digest_size,
            node_label: settings.node_labels.then_some(label::label as label::LabelFn),
            edge_label: settings.edge_labels.then_some(label::label as label::LabelFn),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hash: HashSettings,
    pub similarity: SimilarityConfig,
    pub summary: SummaryConfig,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| GraphError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GraphError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hash.digest_size == 0 || self.hash.digest_size > MAX_DIGEST_SIZE {
            return Err(GraphError::InvalidConfig(format!(
                "digest_size must be between 1 and {}, got {}",
                MAX_DIGEST_SIZE, self.hash.digest_size
            )));
        }
        Ok(())
    }

    pub fn wl_config(&self) -> WlConfig {
        WlConfig::from(&self.hash)
    }
}
