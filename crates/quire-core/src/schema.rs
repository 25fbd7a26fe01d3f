//! Collection schemas as ordered field-descriptor lists.
//!
//! A [`Schema`] is plain data. [`Schema::validate`] is the single routine
//! that turns a raw front-matter map into [`EntryData`], collecting every
//! field issue of the document before rejecting it.

use std::{collections::HashSet, fmt, path::Path};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::{
    asset::AssetResolver,
    coerce,
    content::{EntryData, FieldValue},
    error::{CoreError, FieldIssue, Result, ValidationError},
    frontmatter::FrontmatterMap,
};

/// Declared type of a front-matter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// String value.
    String,
    /// Date coerced from a string or epoch-millisecond number.
    Date,
    /// Boolean value.
    Boolean,
    /// Ordered list of strings.
    StringList,
    /// String that must parse as an absolute URL.
    Url,
    /// Local image path resolved relative to the document.
    Image,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::StringList => "string-list",
            Self::Url => "url",
            Self::Image => "image",
        })
    }
}

/// One field of a collection schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
    /// Front-matter key.
    pub name: String,

    /// Declared type.
    pub kind: FieldKind,

    /// Whether the key must be present (unless a default applies).
    #[serde(default)]
    pub required: bool,

    /// Reject empty strings for `string` fields.
    #[serde(default)]
    pub non_empty: bool,

    /// Value substituted when the key is absent.
    #[serde(default)]
    pub default: Option<Value>,
}

impl FieldDescriptor {
    /// A required field.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            non_empty: false,
            default: None,
        }
    }

    /// An optional field, left absent when missing.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    /// Reject empty strings.
    #[must_use]
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    /// Substitute `value` when the key is absent.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Ordered field descriptors plus their pre-coerced defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    defaults: Vec<Option<FieldValue>>,
}

impl Schema {
    /// Build a schema, checking field names and default values.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut defaults = Vec::with_capacity(fields.len());

        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(CoreError::schema("field name cannot be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(CoreError::schema(format!(
                    "field `{}` is declared more than once",
                    field.name
                )));
            }

            let default = match &field.default {
                None => None,
                Some(_) if field.kind == FieldKind::Image => {
                    return Err(CoreError::schema(format!(
                        "image field `{}` cannot declare a default",
                        field.name
                    )));
                }
                Some(raw) => Some(coerce_plain(field, raw).map_err(|message| {
                    CoreError::schema(format!(
                        "default for `{}` is not a valid {}: {message}",
                        field.name, field.kind
                    ))
                })?),
            };
            defaults.push(default);
        }

        Ok(Self { fields, defaults })
    }

    /// Field descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a raw front-matter map for the document at `path`.
    ///
    /// Fields are checked in declaration order. All issues are collected; any
    /// issue rejects the whole document. Keys with a `null` value count as
    /// absent. Image fields are resolved through `assets`.
    pub fn validate(
        &self,
        path: &Path,
        raw: &FrontmatterMap,
        assets: &dyn AssetResolver,
    ) -> std::result::Result<EntryData, ValidationError> {
        let mut data = EntryData::new();
        let mut issues = Vec::new();

        for (field, default) in self.fields.iter().zip(&self.defaults) {
            let value = raw.get(field.name.as_str()).filter(|v| !v.is_null());

            match (value, default) {
                (Some(value), _) => match coerce_field(field, value, path, assets) {
                    Ok(coerced) => data.insert(field.name.clone(), coerced),
                    Err(message) => issues.push(FieldIssue::field(&field.name, message)),
                },
                (None, Some(default)) => data.insert(field.name.clone(), default.clone()),
                (None, None) if field.required => {
                    issues.push(FieldIssue::field(&field.name, "required field is missing"));
                }
                (None, None) => {}
            }
        }

        for key in raw.keys() {
            if let Some(key) = key.as_str()
                && self.field(key).is_none()
            {
                tracing::debug!(path = %path.display(), key, "dropping undeclared front matter key");
            }
        }

        if issues.is_empty() {
            Ok(data)
        } else {
            Err(ValidationError::new(path, issues))
        }
    }
}

fn coerce_field(
    field: &FieldDescriptor,
    value: &Value,
    path: &Path,
    assets: &dyn AssetResolver,
) -> std::result::Result<FieldValue, String> {
    if field.kind == FieldKind::Image {
        let token = coerce::coerce_image_token(value)?;
        return assets.resolve(path, &token).map(FieldValue::Image);
    }
    coerce_plain(field, value)
}

/// Coerce every kind except `image`, which needs a resolver.
fn coerce_plain(field: &FieldDescriptor, value: &Value) -> std::result::Result<FieldValue, String> {
    match field.kind {
        FieldKind::String => {
            let s = coerce::coerce_string(value)?;
            if field.non_empty && s.is_empty() {
                return Err("expected non-empty string, found empty string".to_string());
            }
            Ok(FieldValue::String(s))
        }
        FieldKind::Date => coerce::coerce_date(value).map(FieldValue::Date),
        FieldKind::Boolean => coerce::coerce_bool(value).map(FieldValue::Bool),
        FieldKind::StringList => coerce::coerce_string_list(value).map(FieldValue::List),
        FieldKind::Url => coerce::coerce_url(value).map(FieldValue::Url),
        FieldKind::Image => Err("image references need a document context".to_string()),
    }
}
