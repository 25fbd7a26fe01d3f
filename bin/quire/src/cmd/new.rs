//! New command - scaffold a document for a collection

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, Utc};
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use quire_core::{ContentType, FieldDescriptor, FieldKind, content::slugify};
use quire_loader::CollectionDef;
use serde_yaml::{Mapping, Value};

use super::open_registry;

/// Run the new command.
///
/// Creates `<base>/<name>.md` with every required field stubbed.
pub fn run(config_path: &Path, collection: &str, name: &str) -> Result<()> {
    tracing::info!(?config_path, collection, name, "Creating new content");

    let (_config, registry) = open_registry(config_path)?;
    let def = registry
        .collection(collection)
        .ok_or_else(|| eyre!("Unknown collection `{collection}`"))?;

    let today = Utc::now().date_naive();
    let (file_path, content) = scaffold(def, name, today)?;

    if file_path.exists() {
        bail!("{} already exists", file_path.display());
    }
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }
    fs::write(&file_path, content).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new content file");
    println!("Created: {}", file_path.display());

    if let Err(err) = registry.parse_and_validate(collection, &file_path)? {
        println!("  ⚠ Fill in before building: {err}");
    }

    Ok(())
}

/// Target path and content of a new document.
fn scaffold(def: &CollectionDef, name: &str, today: NaiveDate) -> Result<(PathBuf, String)> {
    let slug = slugify(name.trim());
    if slug.is_empty() {
        bail!("Cannot derive a file name from {name:?}");
    }

    let title = name.trim().replace(['-', '_'], " ");
    let mut frontmatter = Mapping::new();
    for field in def.schema.fields() {
        if let Some(value) = stub_value(field, &title, &slug, today) {
            frontmatter.insert(Value::from(field.name.as_str()), value);
        }
    }

    let yaml = serde_yaml::to_string(&frontmatter).wrap_err("Failed to render front matter")?;
    let content = format!("---\n{yaml}---\n\nWrite your content here.\n");

    let file_name = format!("{slug}.{}", ContentType::Markdown.extension());
    Ok((def.base.join(file_name), content))
}

/// Placeholder for a field, or `None` when it is left out.
fn stub_value(field: &FieldDescriptor, title: &str, slug: &str, today: NaiveDate) -> Option<Value> {
    if let Some(default) = &field.default {
        return Some(default.clone());
    }
    if !field.required {
        return None;
    }

    match field.kind {
        FieldKind::String => Some(match field.name.as_str() {
            "title" => Value::from(title),
            "slug" => Value::from(slug),
            _ if field.non_empty => Value::from(title),
            _ => Value::from(""),
        }),
        FieldKind::Date => Some(Value::from(today.format("%Y-%m-%d").to_string())),
        FieldKind::Boolean => Some(Value::Bool(false)),
        FieldKind::StringList => Some(Value::Sequence(Vec::new())),
        FieldKind::Url => Some(Value::from("https://example.com/")),
        // No file to point at yet; validation reports it after creation.
        FieldKind::Image => None,
    }
}
