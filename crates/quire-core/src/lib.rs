//! Quire Core Library
//!
//! Core types, schemas, configuration, and error handling for Quire content
//! collections.

pub mod asset;
pub mod coerce;
pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod presets;
pub mod schema;

pub use asset::AssetResolver;
pub use config::{CollectionConfig, Config};
pub use content::{AssetRef, ContentType, Entry, EntryData, EntryPath, FieldValue};
pub use error::{CoreError, FieldIssue, Result, ValidationError};
pub use frontmatter::{FrontmatterMap, parse_frontmatter};
pub use schema::{FieldDescriptor, FieldKind, Schema};
