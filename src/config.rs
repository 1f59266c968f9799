//! Per-graph configuration
//!
//! Settings are read once (from YAML or built in code) and handed to the
//! components at construction; nothing is reconfigured afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No store endpoint was configured for the graph
    #[error("The store endpoint of the graph {0} should be set before the graph can be used")]
    MissingEndpoint(String),

    /// A value is out of range
    #[error("Invalid setting: {0}")]
    Invalid(String),

    /// Reading the configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML for these settings
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Path search and partial graph settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PathFinderSettings {
    /// Maximal number of edges in a path
    pub max_distance: usize,
    /// Serve results through the query cache
    pub use_cache: bool,
}

impl Default for PathFinderSettings {
    fn default() -> Self {
        Self {
            max_distance: 3,
            use_cache: true,
        }
    }
}

impl PathFinderSettings {
    pub fn new(max_distance: usize, use_cache: bool) -> Self {
        Self {
            max_distance,
            use_cache,
        }
    }

    pub fn uncached(max_distance: usize) -> Self {
        Self::new(max_distance, false)
    }
}

fn default_cache_capacity() -> usize {
    1024
}

/// Settings of one named graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSettings {
    /// Graph name, unique per process
    pub graph_name: String,
    /// Root URI of the graph store, e.g. `http://localhost:7474/db/data/`
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Defaults for path searches on this graph
    #[serde(default)]
    pub path_finder: PathFinderSettings,
    /// Maximal number of cached query results
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl GraphSettings {
    pub fn new(graph_name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            graph_name: graph_name.into(),
            endpoint: Some(endpoint.into()),
            path_finder: PathFinderSettings::default(),
            cache_capacity: default_cache_capacity(),
        }
    }

    /// Settings without an endpoint; store operations will fail until one is given
    pub fn unbound(graph_name: impl Into<String>) -> Self {
        Self {
            graph_name: graph_name.into(),
            endpoint: None,
            path_finder: PathFinderSettings::default(),
            cache_capacity: default_cache_capacity(),
        }
    }

    pub fn with_path_finder(mut self, path_finder: PathFinderSettings) -> Self {
        self.path_finder = path_finder;
        self
    }

    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let settings: GraphSettings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml_str(&yaml)?;
        info!("Loaded settings of graph {} from {:?}", settings.graph_name, path);
        Ok(settings)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.graph_name.trim().is_empty() {
            return Err(ConfigError::Invalid("graph_name must not be empty".to_string()));
        }
        if self.path_finder.max_distance == 0 {
            return Err(ConfigError::Invalid(format!(
                "max_distance of graph {} must be at least 1",
                self.graph_name
            )));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(format!(
                "cache_capacity of graph {} must be at least 1",
                self.graph_name
            )));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> ConfigResult<&str> {
        self.endpoint
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEndpoint(self.graph_name.clone()))
    }
}
