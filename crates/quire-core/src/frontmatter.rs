//! Frontmatter parsing for content files.
//!
//! Front matter is returned as a raw key/value map. Nothing is typed here;
//! coercion into field kinds happens in [`crate::schema`].

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{CoreError, Result};

/// Raw front-matter map, keys in document order.
pub type FrontmatterMap = Mapping;

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }

    fn detect(content: &str) -> Option<Self> {
        let first_line = content.lines().next()?.trim_end();
        match first_line {
            "---" => Some(Self::Yaml),
            "+++" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Split content into frontmatter and body.
///
/// The opening and closing delimiters must each sit on their own line.
/// Returns `None` when the content has no complete front-matter block.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    let format = FrontmatterFormat::detect(content)?;
    let delimiter = format.delimiter();

    let block_start = content.find('\n')? + 1;
    let block = &content[block_start..];

    let mut offset = 0;
    for line in block.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = block[..offset].trim();
            let body = block[offset + line.len()..].trim_start();
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter from a string.
///
/// Documents without a front-matter block yield an empty map and the whole
/// content as body. An opened but never closed block is an error.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(FrontmatterMap, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        let trimmed = content.trim_start_matches('\u{feff}').trim_start();
        if FrontmatterFormat::detect(trimmed).is_some() {
            return Err(CoreError::frontmatter(
                path,
                "front matter block is never closed",
            ));
        }
        return Ok((FrontmatterMap::new(), content.to_string()));
    };

    let map = match format {
        FrontmatterFormat::Yaml => parse_yaml(fm_str, path)?,
        FrontmatterFormat::Toml => parse_toml(fm_str, path)?,
    };

    Ok((map, body.to_string()))
}

fn parse_yaml(fm_str: &str, path: &Path) -> Result<FrontmatterMap> {
    let value: Value =
        serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    match value {
        Value::Null => Ok(FrontmatterMap::new()),
        Value::Mapping(map) => Ok(map),
        other => Err(CoreError::frontmatter(
            path,
            format!("front matter must be a mapping, found {}", describe(&other)),
        )),
    }
}

fn parse_toml(fm_str: &str, path: &Path) -> Result<FrontmatterMap> {
    let table: toml::Table = fm_str
        .parse()
        .map_err(|e: toml::de::Error| CoreError::frontmatter(path, e.to_string()))?;

    Ok(table
        .into_iter()
        .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
        .collect())
}

/// Convert a TOML value into the YAML value model used for raw front matter.
///
/// TOML date and datetime literals become strings so the date coercion
/// sees the same input it would get from YAML.
fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
                .collect(),
        ),
    }
}

/// Short type name of a raw value, used in "expected X, found Y" messages.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
