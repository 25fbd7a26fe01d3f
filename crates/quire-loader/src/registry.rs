//! Content schema registry.
//!
//! Collections are registered once during initialization; the registry is
//! then shared by reference and every scan reads it without mutation.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use quire_core::{
    AssetResolver, Config, Entry, EntryPath, FieldIssue, Schema, ValidationError,
    config::CollectionConfig, parse_frontmatter,
};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    assets::FsAssetResolver,
    collection::LoadedCollection,
    discovery::{PatternSet, list_matching_files},
};

/// Structural errors that halt registration or a whole scan.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Invalid collection declaration. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Base directory missing at scan time.
    #[error("collection `{collection}`: base directory not found: {}", base.display())]
    NotFound { collection: String, base: PathBuf },

    /// No collection registered under that name.
    #[error("unknown collection `{0}`")]
    UnknownCollection(String),

    /// A matched file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Outcome of validating a single document.
pub type DocumentResult = std::result::Result<Entry, ValidationError>;

/// Declaration of one collection: name, base directory, patterns, schema.
#[derive(Debug, Clone)]
pub struct CollectionDef {
    /// Unique collection name.
    pub name: String,

    /// Base directory scanned for documents.
    pub base: PathBuf,

    /// Glob patterns relative to `base`.
    pub patterns: Vec<String>,

    /// Field schema.
    pub schema: Schema,
}

impl CollectionDef {
    /// Declare a collection.
    pub fn new<I, S>(name: impl Into<String>, base: impl Into<PathBuf>, patterns: I, schema: Schema) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            base: base.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
            schema,
        }
    }

    /// Build a declaration from a `[[collections]]` table.
    pub fn from_config(config: &Config, collection: &CollectionConfig) -> Result<Self> {
        let schema = collection.schema().map_err(|e| {
            LoadError::configuration(format!("collection `{}`: {e}", collection.name))
        })?;

        Ok(Self::new(
            collection.name.clone(),
            config.base_dir(collection),
            collection.pattern.clone(),
            schema,
        ))
    }
}

#[derive(Debug)]
struct Registered {
    def: CollectionDef,
    patterns: PatternSet,
}

/// Registry of content collections.
pub struct ContentRegistry {
    collections: Vec<Registered>,
    assets: Box<dyn AssetResolver>,
    parallel: bool,
}

impl std::fmt::Debug for ContentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRegistry")
            .field("collections", &self.collections)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl ContentRegistry {
    /// Create an empty registry resolving images under `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            collections: Vec::new(),
            assets: Box::new(FsAssetResolver::new(root)),
            parallel: true,
        }
    }

    /// Replace the asset resolver.
    #[must_use]
    pub fn with_asset_resolver(mut self, resolver: impl AssetResolver + 'static) -> Self {
        self.assets = Box::new(resolver);
        self
    }

    /// Toggle parallel parsing. Output order is the same either way.
    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Create a registry and register every configured collection in order.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new(&config.root).parallel(config.build.parallel);
        for collection in &config.collections {
            registry.register(CollectionDef::from_config(config, collection)?)?;
        }
        Ok(registry)
    }

    /// Register a collection.
    ///
    /// Rejects duplicate names (the existing definition is kept), missing base
    /// directories and invalid patterns.
    pub fn register(&mut self, def: CollectionDef) -> Result<()> {
        if def.name.trim().is_empty() {
            return Err(LoadError::configuration("collection name cannot be empty"));
        }

        if self.find(&def.name).is_some() {
            return Err(LoadError::configuration(format!(
                "collection `{}` is already registered",
                def.name
            )));
        }

        if !def.base.is_dir() {
            return Err(LoadError::configuration(format!(
                "collection `{}`: base directory {} does not exist",
                def.name,
                def.base.display()
            )));
        }

        let patterns = PatternSet::new(&def.patterns)
            .map_err(|e| LoadError::configuration(format!("collection `{}`: {e}", def.name)))?;

        info!(
            collection = %def.name,
            base = %def.base.display(),
            patterns = ?patterns.patterns(),
            fields = def.schema.fields().len(),
            "registered collection"
        );

        self.collections.push(Registered { def, patterns });
        Ok(())
    }

    /// Registered collection names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.def.name.as_str())
    }

    /// Look up a collection declaration.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&CollectionDef> {
        self.find(name).map(|c| &c.def)
    }

    /// First phase of a scan: the files selected by the collection's patterns.
    pub fn list_matching_files(&self, name: &str) -> Result<Vec<PathBuf>> {
        let registered = self.get(name)?;
        self.list_files(registered)
    }

    /// Second phase of a scan: read, parse and validate one file.
    ///
    /// The outer error is structural (unreadable file); the inner one rejects
    /// only this document.
    pub fn parse_and_validate(&self, name: &str, path: &Path) -> Result<DocumentResult> {
        let registered = self.get(name)?;
        self.parse_document(registered, path)
    }

    /// Scan a collection and validate every matching document.
    ///
    /// Rejected documents are collected in [`LoadedCollection::errors`] and do
    /// not stop the scan.
    pub fn load_all(&self, name: &str) -> Result<LoadedCollection> {
        let registered = self.get(name)?;
        let def = &registered.def;

        let files = self.list_files(registered)?;
        info!(collection = %def.name, count = files.len(), "found content files");

        let results: Vec<Result<DocumentResult>> = if self.parallel {
            files
                .par_iter()
                .map(|path| self.parse_document(registered, path))
                .collect()
        } else {
            files
                .iter()
                .map(|path| self.parse_document(registered, path))
                .collect()
        };

        let mut loaded = LoadedCollection {
            name: def.name.clone(),
            ..LoadedCollection::default()
        };
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for result in results {
            match result? {
                Ok(entry) => {
                    if let Some(first) = seen.get(&entry.id) {
                        let err = ValidationError::new(
                            &entry.path,
                            vec![FieldIssue::document(format!(
                                "duplicate entry id `{}` (already used by {})",
                                entry.id,
                                first.display()
                            ))],
                        );
                        warn!(collection = %def.name, error = %err, "rejected document");
                        loaded.errors.push(err);
                        continue;
                    }
                    seen.insert(entry.id.clone(), entry.path.clone());
                    loaded.entries.push(entry);
                }
                Err(err) => {
                    warn!(collection = %def.name, error = %err, "rejected document");
                    loaded.errors.push(err);
                }
            }
        }

        info!(
            collection = %def.name,
            entries = loaded.entries.len(),
            rejected = loaded.errors.len(),
            "collection loaded"
        );

        Ok(loaded)
    }

    /// Load every registered collection in registration order.
    pub fn load_every(&self) -> Result<Vec<LoadedCollection>> {
        self.names().map(|name| self.load_all(name)).collect()
    }

    fn find(&self, name: &str) -> Option<&Registered> {
        self.collections.iter().find(|c| c.def.name == name)
    }

    fn get(&self, name: &str) -> Result<&Registered> {
        self.find(name)
            .ok_or_else(|| LoadError::UnknownCollection(name.to_string()))
    }

    fn list_files(&self, registered: &Registered) -> Result<Vec<PathBuf>> {
        let def = &registered.def;
        if !def.base.is_dir() {
            return Err(LoadError::NotFound {
                collection: def.name.clone(),
                base: def.base.clone(),
            });
        }

        list_matching_files(&def.base, &registered.patterns)
            .map_err(|e| LoadError::io(&def.base, e))
    }

    fn parse_document(&self, registered: &Registered, path: &Path) -> Result<DocumentResult> {
        let def = &registered.def;
        debug!(collection = %def.name, path = %path.display(), "parsing file");

        let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
        let Ok(content) = String::from_utf8(bytes) else {
            return Ok(Err(ValidationError::new(
                path,
                vec![FieldIssue::document("file is not valid UTF-8")],
            )));
        };

        let (raw, body) = match parse_frontmatter(&content, path) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Ok(Err(ValidationError::new(
                    path,
                    vec![FieldIssue::document(e.to_string())],
                )));
            }
        };

        let relative = path.strip_prefix(&def.base).unwrap_or(path);
        let Some(entry_path) = EntryPath::from_path(relative) else {
            return Ok(Err(ValidationError::new(
                path,
                vec![FieldIssue::document("unsupported content file extension")],
            )));
        };

        let data = match def.schema.validate(path, &raw, self.assets.as_ref()) {
            Ok(data) => data,
            Err(err) => return Ok(Err(err)),
        };

        // A string `slug` in the front matter overrides the path-derived id.
        let id = match raw.get("slug").and_then(|v| v.as_str()) {
            Some(slug) if !slug.trim().is_empty() => slug.trim().to_string(),
            _ => entry_path.id,
        };

        Ok(Ok(Entry {
            id,
            collection: def.name.clone(),
            path: path.to_path_buf(),
            content_type: entry_path.content_type,
            data,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use quire_core::{FieldDescriptor, FieldKind};

    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![FieldDescriptor::required("title", FieldKind::String)])
            .expect("schema")
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::create_dir_all(&first).expect("mkdir");
        fs::create_dir_all(&second).expect("mkdir");

        let mut registry = ContentRegistry::new(dir.path());
        registry
            .register(CollectionDef::new("blog", &first, ["**/*.md"], schema()))
            .expect("first registration");

        let err = registry
            .register(CollectionDef::new("blog", &second, ["**/*.md"], schema()))
            .expect_err("duplicate");

        assert!(matches!(err, LoadError::Configuration(_)));
        assert!(err.to_string().contains("already registered"));
        assert_eq!(
            registry.collection("blog").map(|c| c.base.clone()),
            Some(first)
        );
        assert_eq!(registry.names().count(), 1);
    }

    #[test]
    fn test_register_rejects_missing_base() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = ContentRegistry::new(dir.path());
        let err = registry
            .register(CollectionDef::new(
                "blog",
                dir.path().join("nope"),
                ["**/*.md"],
                schema(),
            ))
            .expect_err("missing base");
        assert!(matches!(err, LoadError::Configuration(_)));
    }

    #[test]
    fn test_register_rejects_bad_pattern() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut registry = ContentRegistry::new(dir.path());
        let err = registry
            .register(CollectionDef::new("blog", dir.path(), ["**/*.{md"], schema()))
            .expect_err("bad pattern");
        assert!(err.to_string().contains("invalid glob pattern"));
    }

    #[test]
    fn test_unknown_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = ContentRegistry::new(dir.path());
        assert!(matches!(
            registry.load_all("blog"),
            Err(LoadError::UnknownCollection(name)) if name == "blog"
        ));
    }

    #[test]
    fn test_base_removed_after_registration_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().join("blog");
        fs::create_dir_all(&base).expect("mkdir");

        let mut registry = ContentRegistry::new(dir.path());
        registry
            .register(CollectionDef::new("blog", &base, ["**/*.md"], schema()))
            .expect("register");
        fs::remove_dir_all(&base).expect("remove");

        assert!(matches!(
            registry.load_all("blog"),
            Err(LoadError::NotFound { collection, .. }) if collection == "blog"
        ));
    }

    #[test]
    fn test_parse_and_validate_single_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("ok.md"), "---\ntitle: Hi\n---\nBody").expect("write");
        fs::write(dir.path().join("bad.md"), "---\ntitle: [1]\n---\n").expect("write");

        let mut registry = ContentRegistry::new(dir.path());
        registry
            .register(CollectionDef::new("notes", dir.path(), ["*.md"], schema()))
            .expect("register");

        let ok = registry
            .parse_and_validate("notes", &dir.path().join("ok.md"))
            .expect("readable")
            .expect("valid");
        assert_eq!(ok.id, "ok");
        assert_eq!(ok.body, "Body");

        let bad = registry
            .parse_and_validate("notes", &dir.path().join("bad.md"))
            .expect("readable")
            .expect_err("invalid");
        assert!(bad.mentions_field("title"));

        let missing = registry.parse_and_validate("notes", &dir.path().join("gone.md"));
        assert!(matches!(missing, Err(LoadError::Io { .. })));
    }
}
