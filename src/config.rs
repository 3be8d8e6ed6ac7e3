//! Settings with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/nodetree/nodetree.toml`
//! 3. Local config: a file passed by the caller
//! 4. Environment variables: `NODETREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use serde_json::Value;

use crate::domain::{
    NodeEquality, NodeId, TreeArena, TreeError, TreeOptions, TreeResult, DEFAULT_CHILDREN_KEY,
};

/// Tree construction and search defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeSettings {
    /// Data key holding nested children (default: "children")
    pub children_key_name: String,
    /// Data key used by id lookups (default: "id")
    pub id_property_name: String,
    /// Default traversal direction for searches
    pub right_to_left: bool,
    /// Compare nodes by this data key instead of identity
    pub equality_property: Option<String>,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            children_key_name: DEFAULT_CHILDREN_KEY.to_string(),
            id_property_name: "id".to_string(),
            right_to_left: false,
            equality_property: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    children_key_name: Option<String>,
    id_property_name: Option<String>,
    right_to_left: Option<bool>,
    equality_property: Option<String>,
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nodetree").map(|dirs| dirs.config_dir().join("nodetree.toml"))
}

fn config_err(e: ConfigError) -> TreeError {
    TreeError::Config {
        message: e.to_string(),
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> TreeResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| TreeError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| TreeError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl TreeSettings {
    /// Load settings with layered precedence.
    ///
    /// A missing `local` file is an error; a missing global file is not.
    pub fn load(local: Option<&Path>) -> TreeResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global settings");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(local_path) = local {
            debug!(path = %local_path.display(), "loading local settings");
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        Self::apply_env_overrides(current)
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            children_key_name: overlay
                .children_key_name
                .clone()
                .unwrap_or_else(|| self.children_key_name.clone()),
            id_property_name: overlay
                .id_property_name
                .clone()
                .unwrap_or_else(|| self.id_property_name.clone()),
            right_to_left: overlay.right_to_left.unwrap_or(self.right_to_left),
            equality_property: overlay
                .equality_property
                .clone()
                .or_else(|| self.equality_property.clone()),
        }
    }

    /// Apply NODETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> TreeResult<Self> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("NODETREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("children_key_name") {
            settings.children_key_name = val;
        }
        if let Ok(val) = config.get_string("id_property_name") {
            settings.id_property_name = val;
        }
        if let Ok(val) = config.get_bool("right_to_left") {
            settings.right_to_left = val;
        }
        if let Ok(val) = config.get_string("equality_property") {
            settings.equality_property = Some(val);
        }

        Ok(settings)
    }

    /// Construction options described by these settings.
    pub fn tree_options(&self) -> TreeOptions {
        let equality = match &self.equality_property {
            Some(key) => NodeEquality::by_property(key.clone()),
            None => NodeEquality::identity(),
        };
        TreeOptions::default()
            .with_children_key(self.children_key_name.clone())
            .with_equality(equality)
    }

    /// [`TreeArena::find_by_id`] with the configured id key and direction.
    pub fn find_by_id(&self, tree: &TreeArena, id: NodeId, value: &Value) -> Option<NodeId> {
        tree.find_by_id(id, value, &self.id_property_name, self.right_to_left)
    }
}
