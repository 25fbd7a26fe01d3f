//! Content types and structures.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer, de::DeserializeOwned, ser::SerializeMap};

use crate::error::Result;

/// Type of content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Markdown content (.md files).
    Markdown,
    /// MDX content (.mdx files).
    Mdx,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "mdx" => Some(Self::Mdx),
            _ => None,
        }
    }

    /// Get the file extension for this content type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mdx => "mdx",
        }
    }
}

/// Entry identity derived from a document's path inside its collection base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPath {
    /// Path relative to the collection base.
    pub path: PathBuf,

    /// Slugified id, e.g. `guides/getting-started`.
    pub id: String,

    /// Content type based on extension.
    pub content_type: ContentType,
}

impl EntryPath {
    /// Derive the entry id from a base-relative path.
    ///
    /// - `hello-world.md` → `hello-world`
    /// - `guides/Getting Started.mdx` → `guides/getting-started`
    /// - `guides/setup/index.md` → `guides/setup`
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        let content_type = ContentType::from_extension(extension)?;
        let stem = path.file_stem()?.to_str()?;

        let parent = path.parent().unwrap_or(Path::new(""));
        let mut segments: Vec<String> = parent
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .map(slugify)
            .filter(|s| !s.is_empty())
            .collect();

        if stem != "index" || segments.is_empty() {
            segments.push(slugify(stem));
        }

        Some(Self {
            path: path.to_path_buf(),
            id: segments.join("/"),
            content_type,
        })
    }
}

/// Slugify one path segment: lowercase, whitespace to `-`, punctuation dropped.
pub fn slugify(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else {
                None
            }
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Reference to a local asset resolved against the referencing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Normalized project-relative reference with `/` separators.
    pub src: String,

    /// Resolved file system path.
    pub path: PathBuf,
}

/// A coerced front-matter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain string.
    String(String),
    /// Calendar date/time in UTC.
    Date(DateTime<Utc>),
    /// Boolean flag.
    Bool(bool),
    /// Ordered list of strings.
    List(Vec<String>),
    /// Valid absolute URL, kept verbatim.
    Url(String),
    /// Resolved image reference.
    Image(AssetRef),
}

impl FieldValue {
    /// Borrow the value as a string (`String` and `Url` variants).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Url(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a date.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the value as a list of strings.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the value as an asset reference.
    pub fn as_image(&self) -> Option<&AssetRef> {
        match self {
            Self::Image(asset) => Some(asset),
            _ => None,
        }
    }
}

/// Validated entry fields in schema declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryData {
    fields: Vec<(String, FieldValue)>,
}

impl EntryData {
    /// Create an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Later inserts of the same name replace the earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Whether the field is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for EntryData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// One validated document of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Unique id within the collection.
    pub id: String,

    /// Owning collection name.
    pub collection: String,

    /// Source file path.
    pub path: PathBuf,

    /// Source format.
    pub content_type: ContentType,

    /// Validated front-matter fields.
    pub data: EntryData,

    /// Raw body after the front-matter block.
    pub body: String,
}

impl Entry {
    /// Look up a validated field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.data.get(name)
    }

    /// String field value.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Date field value.
    #[must_use]
    pub fn date_field(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(FieldValue::as_date)
    }

    /// Whether the entry is flagged as a draft via `isDraft`.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.get("isDraft")
            .and_then(FieldValue::as_bool)
            .unwrap_or(false)
    }

    /// Deserialize the validated data into a typed record.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_yaml::to_value(&self.data)?;
        Ok(serde_yaml::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(
            ContentType::from_extension("md"),
            Some(ContentType::Markdown)
        );
        assert_eq!(
            ContentType::from_extension("MD"),
            Some(ContentType::Markdown)
        );
        assert_eq!(ContentType::from_extension("mdx"), Some(ContentType::Mdx));
        assert_eq!(ContentType::from_extension("txt"), None);
    }

    #[test]
    fn test_entry_path_simple() {
        let ep = EntryPath::from_path(Path::new("hello-world.md")).expect("parse path");
        assert_eq!(ep.id, "hello-world");
        assert_eq!(ep.content_type, ContentType::Markdown);
    }

    #[test]
    fn test_entry_path_nested_and_slugified() {
        let ep = EntryPath::from_path(Path::new("Guides/Getting Started!.mdx")).expect("parse path");
        assert_eq!(ep.id, "guides/getting-started");
        assert_eq!(ep.content_type, ContentType::Mdx);
    }

    #[test]
    fn test_entry_path_index_file() {
        let ep = EntryPath::from_path(Path::new("guides/setup/index.md")).expect("parse path");
        assert_eq!(ep.id, "guides/setup");

        let root = EntryPath::from_path(Path::new("index.md")).expect("parse path");
        assert_eq!(root.id, "index");
    }

    #[test]
    fn test_entry_path_rejects_other_extensions() {
        assert!(EntryPath::from_path(Path::new("notes.txt")).is_none());
        assert!(EntryPath::from_path(Path::new("README")).is_none());
    }

    #[test]
    fn test_entry_data_keeps_order_and_replaces() {
        let mut data = EntryData::new();
        data.insert("title", FieldValue::String("A".into()));
        data.insert("isDraft", FieldValue::Bool(false));
        data.insert("title", FieldValue::String("B".into()));

        let names: Vec<_> = data.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["title", "isDraft"]);
        assert_eq!(data.get("title").and_then(FieldValue::as_str), Some("B"));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_entry_data_as_typed_record() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Post {
            title: String,
            pub_date: DateTime<Utc>,
            #[serde(default)]
            tags: Option<Vec<String>>,
        }

        let date = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let mut data = EntryData::new();
        data.insert("title", FieldValue::String("Hello".into()));
        data.insert("pubDate", FieldValue::Date(date));

        let entry = Entry {
            id: "hello".into(),
            collection: "blog".into(),
            path: PathBuf::from("blog/hello.md"),
            content_type: ContentType::Markdown,
            data,
            body: String::new(),
        };

        let post: Post = entry.data_as().expect("typed view");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.pub_date, date);
        assert!(post.tags.is_none());
        assert!(!entry.is_draft());
    }
}
