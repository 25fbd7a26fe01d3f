//! File discovery: walk a collection base and keep pattern matches.
//!
//! Patterns are relative to the base directory. `*` does not cross `/`,
//! `**` does, `{a,b}` alternates. A pattern starting with `!` excludes.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use quire_core::ContentType;
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Pattern compilation errors.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Invalid glob syntax.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Only exclusions were given.
    #[error("at least one include pattern is required")]
    NoInclude,
}

/// Compiled include/exclude pattern list.
#[derive(Debug, Clone)]
pub struct PatternSet {
    include: GlobSet,
    exclude: GlobSet,
    patterns: Vec<String>,
}

impl PatternSet {
    /// Compile patterns. Leading `!` marks an exclusion.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut sources = Vec::new();
        let mut includes = 0;

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            let (builder, glob) = match pattern.strip_prefix('!') {
                Some(negated) => (&mut exclude, negated),
                None => {
                    includes += 1;
                    (&mut include, pattern)
                }
            };

            let compiled = GlobBuilder::new(glob.trim_start_matches("./"))
                .literal_separator(true)
                .build()
                .map_err(|source| PatternError::Invalid {
                    pattern: pattern.to_string(),
                    source,
                })?;
            builder.add(compiled);
            sources.push(pattern.to_string());
        }

        if includes == 0 {
            return Err(PatternError::NoInclude);
        }

        let build = |builder: GlobSetBuilder, pattern: &str| {
            builder.build().map_err(|source| PatternError::Invalid {
                pattern: pattern.to_string(),
                source,
            })
        };
        let joined = sources.join(", ");

        Ok(Self {
            include: build(include, &joined)?,
            exclude: build(exclude, &joined)?,
            patterns: sources,
        })
    }

    /// Whether a base-relative path is selected.
    pub fn is_match(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }

    /// Source patterns as declared.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// List content files under `base` selected by `patterns`.
///
/// Hidden files and directories and `_`-prefixed files are skipped, as are
/// files that are not Markdown/MDX. Paths come back sorted, so the order is
/// stable for a fixed file set.
pub fn list_matching_files(base: &Path, patterns: &PatternSet) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(base)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('_') {
            trace!(path = %path.display(), "skipping underscore file");
            continue;
        }

        let relative = path.strip_prefix(base).unwrap_or(path);
        if !patterns.is_match(relative) {
            continue;
        }

        let is_content = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ContentType::from_extension)
            .is_some();
        if !is_content {
            debug!(path = %path.display(), "pattern matched a non-content file, skipping");
            continue;
        }

        files.push(path.to_path_buf());
    }

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, "---\ntitle: x\n---\n").expect("write");
    }

    fn names(base: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| {
                p.strip_prefix(base)
                    .expect("under base")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_brace_pattern_matches_nested_and_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "b.md");
        touch(dir.path(), "a.mdx");
        touch(dir.path(), "guides/c.md");
        touch(dir.path(), "notes.txt");

        let patterns = PatternSet::new(["**/*.{md,mdx}"]).expect("patterns");
        let files = list_matching_files(dir.path(), &patterns).expect("list");

        assert_eq!(names(dir.path(), &files), vec!["a.mdx", "b.md", "guides/c.md"]);
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "top.md");
        touch(dir.path(), "nested/deep.md");

        let patterns = PatternSet::new(["*.md"]).expect("patterns");
        let files = list_matching_files(dir.path(), &patterns).expect("list");

        assert_eq!(names(dir.path(), &files), vec!["top.md"]);
    }

    #[test]
    fn test_exclude_pattern() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "keep.md");
        touch(dir.path(), "drafts/skip.md");

        let patterns = PatternSet::new(["**/*.md", "!drafts/**"]).expect("patterns");
        let files = list_matching_files(dir.path(), &patterns).expect("list");

        assert_eq!(names(dir.path(), &files), vec!["keep.md"]);
    }

    #[test]
    fn test_hidden_and_underscore_files_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "visible.md");
        touch(dir.path(), "_partial.md");
        touch(dir.path(), ".hidden.md");
        touch(dir.path(), ".obsidian/cache.md");

        let patterns = PatternSet::new(["**/*.md"]).expect("patterns");
        let files = list_matching_files(dir.path(), &patterns).expect("list");

        assert_eq!(names(dir.path(), &files), vec!["visible.md"]);
    }

    #[test]
    fn test_only_exclusions_rejected() {
        assert!(matches!(
            PatternSet::new(["!drafts/**"]),
            Err(PatternError::NoInclude)
        ));
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let err = PatternSet::new(["**/*.{md"]).expect_err("unclosed brace");
        assert!(err.to_string().contains("**/*.{md"));
    }
}
