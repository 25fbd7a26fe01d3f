//! Error types for the Quire core library.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for Quire.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Schema declaration error (duplicate field, bad default, unknown preset).
    #[error("Schema error: {0}")]
    Schema(String),

    /// Frontmatter parsing error.
    #[error("Frontmatter error in {path}: {message}")]
    Frontmatter { path: PathBuf, message: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a new frontmatter error.
    pub fn frontmatter(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Frontmatter {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A single failure found while validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Offending front-matter key. `None` for document-level problems
    /// such as malformed front matter or a duplicate entry id.
    pub field: Option<String>,

    /// Human readable description, usually "expected X, found Y".
    pub message: String,
}

impl FieldIssue {
    /// Issue attached to a named field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(name.into()),
            message: message.into(),
        }
    }

    /// Issue attached to the document as a whole.
    pub fn document(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A document rejected by its collection schema.
///
/// Carries every issue found so a build log can point at each offending
/// field at once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid entry {}: {}", path.display(), join_issues(issues))]
pub struct ValidationError {
    /// Source file of the rejected document.
    pub path: PathBuf,

    /// Issues in schema declaration order.
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Create a validation error for a document.
    pub fn new(path: impl Into<PathBuf>, issues: Vec<FieldIssue>) -> Self {
        Self {
            path: path.into(),
            issues,
        }
    }

    /// Whether any issue concerns the given field.
    #[must_use]
    pub fn mentions_field(&self, name: &str) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.field.as_deref() == Some(name))
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
