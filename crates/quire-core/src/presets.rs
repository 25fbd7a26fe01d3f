//! Built-in collection schemas and their typed records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    content::AssetRef,
    error::{CoreError, Result},
    schema::{FieldDescriptor, FieldKind, Schema},
};

/// Names of the built-in presets.
pub const PRESET_NAMES: &[&str] = &["blog", "project", "articles"];

/// Look up a built-in schema by name.
pub fn preset(name: &str) -> Result<Schema> {
    match name {
        "blog" => blog(),
        "project" => project(),
        "articles" => articles(),
        other => Err(CoreError::schema(format!(
            "unknown schema preset `{other}` (expected one of: {})",
            PRESET_NAMES.join(", ")
        ))),
    }
}

/// Blog posts.
pub fn blog() -> Result<Schema> {
    Schema::new(vec![
        FieldDescriptor::required("title", FieldKind::String).non_empty(),
        FieldDescriptor::required("description", FieldKind::String),
        FieldDescriptor::required("pubDate", FieldKind::Date),
        FieldDescriptor::optional("updatedDate", FieldKind::Date),
        FieldDescriptor::optional("heroImage", FieldKind::Image),
    ])
}

/// Portfolio projects.
pub fn project() -> Result<Schema> {
    Schema::new(vec![
        FieldDescriptor::required("title", FieldKind::String).non_empty(),
        FieldDescriptor::required("description", FieldKind::String),
        FieldDescriptor::optional("tags", FieldKind::StringList),
        FieldDescriptor::optional("heroImage", FieldKind::Image),
        FieldDescriptor::optional("link", FieldKind::Url),
        FieldDescriptor::required("pubDate", FieldKind::Date),
    ])
}

/// Long-form articles. `relatedArticles` holds loose entry ids.
pub fn articles() -> Result<Schema> {
    Schema::new(vec![
        FieldDescriptor::required("title", FieldKind::String).non_empty(),
        FieldDescriptor::required("slug", FieldKind::String),
        FieldDescriptor::required("snippet", FieldKind::String),
        FieldDescriptor::required("category", FieldKind::String),
        FieldDescriptor::required("pubDate", FieldKind::Date),
        FieldDescriptor::optional("isDraft", FieldKind::Boolean).with_default(false),
        FieldDescriptor::optional("updatedDate", FieldKind::Date),
        FieldDescriptor::optional("relatedArticles", FieldKind::StringList),
    ])
}

/// Typed view of a `blog` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hero_image: Option<AssetRef>,
}

/// Typed view of a `project` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub hero_image: Option<AssetRef>,
    #[serde(default)]
    pub link: Option<String>,
    pub pub_date: DateTime<Utc>,
}

/// Typed view of an `articles` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub slug: String,
    pub snippet: String,
    pub category: String,
    pub pub_date: DateTime<Utc>,
    pub is_draft: bool,
    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub related_articles: Option<Vec<String>>,
}
