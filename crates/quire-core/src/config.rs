//! Site configuration management.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::{
    error::{CoreError, Result},
    presets,
    schema::{FieldDescriptor, Schema},
};

/// Main configuration structure for Quire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Content collections, in registration order.
    #[serde(default = "default_collections")]
    pub collections: Vec<CollectionConfig>,

    /// Directory containing the configuration file. Relative collection
    /// bases resolve against it.
    #[serde(skip)]
    pub root: PathBuf,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Canonical site URL (e.g., "https://www.example.com/").
    pub url: String,

    /// Site title.
    #[serde(default)]
    pub title: Option<String>,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Whether draft entries are listed by default.
    #[serde(default)]
    pub drafts: bool,

    /// Parse and validate documents on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

/// One `[[collections]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Unique collection name.
    pub name: String,

    /// Base directory scanned for documents.
    pub base: PathBuf,

    /// Glob patterns relative to `base`. A leading `!` excludes.
    #[serde(
        default = "default_patterns",
        deserialize_with = "deserialize_patterns"
    )]
    pub pattern: Vec<String>,

    /// Built-in schema name.
    #[serde(default)]
    pub preset: Option<String>,

    /// Inline schema fields.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl CollectionConfig {
    /// Collection bound to a built-in preset with the default pattern.
    pub fn with_preset(name: impl Into<String>, base: impl Into<PathBuf>, preset: &str) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            pattern: default_patterns(),
            preset: Some(preset.to_string()),
            fields: Vec::new(),
        }
    }

    /// Build the schema from either the preset or the inline fields.
    pub fn schema(&self) -> Result<Schema> {
        match (&self.preset, self.fields.is_empty()) {
            (Some(name), true) => presets::preset(name),
            (None, false) => Schema::new(self.fields.clone()),
            (Some(_), false) => Err(CoreError::config(format!(
                "collection `{}` sets both `preset` and `fields`",
                self.name
            ))),
            (None, true) => Err(CoreError::config(format!(
                "collection `{}` needs either `preset` or `fields`",
                self.name
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn deserialize_patterns<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(pattern) => vec![pattern],
        OneOrMany::Many(patterns) => patterns,
    })
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_patterns() -> Vec<String> {
    vec!["**/*.{md,mdx}".to_string()]
}

fn default_collections() -> Vec<CollectionConfig> {
    presets::PRESET_NAMES
        .iter()
        .map(|name| CollectionConfig::with_preset(*name, format!("src/content/{name}"), name))
        .collect()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            drafts: false,
            parallel: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.root = config_root(path);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `QUIRE__*`
    /// environment variables over the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("QUIRE").separator("__"))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.root = config_root(path);
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.url.is_empty() {
            return Err(CoreError::config("site.url cannot be empty"));
        }
        Url::parse(&self.site.url).map_err(|e| {
            CoreError::config_with_source(format!("site.url is not a valid URL: {}", self.site.url), e)
        })?;

        let mut names = HashSet::new();
        for collection in &self.collections {
            if collection.name.trim().is_empty() {
                return Err(CoreError::config("collection name cannot be empty"));
            }
            if collection.pattern.is_empty() {
                return Err(CoreError::config(format!(
                    "collection `{}` has no patterns",
                    collection.name
                )));
            }
            if !names.insert(collection.name.as_str()) {
                tracing::warn!(
                    collection = %collection.name,
                    "collection declared more than once; registration will reject it"
                );
            }
        }

        Ok(())
    }

    /// Absolute or root-relative base directory of a collection.
    pub fn base_dir(&self, collection: &CollectionConfig) -> PathBuf {
        if collection.base.is_absolute() {
            collection.base.clone()
        } else {
            self.root.join(&collection.base)
        }
    }

    /// Find a collection declaration by name.
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }
}

fn config_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
