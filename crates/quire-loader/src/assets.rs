//! File-system asset resolution for `image` fields.

use std::path::{Path, PathBuf};

use quire_core::{
    AssetRef, AssetResolver,
    asset::{normalize_path, to_slash},
};

/// Image extensions accepted by [`FsAssetResolver`].
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "svg", "avif", "tiff"];

/// Resolves image tokens against the referencing document on disk.
///
/// Relative tokens resolve against the document's directory; tokens starting
/// with `/` resolve against the project root. The target must exist.
#[derive(Debug, Clone)]
pub struct FsAssetResolver {
    root: PathBuf,
}

impl FsAssetResolver {
    /// Create a resolver rooted at the project directory.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: normalize_path(root.as_ref()),
        }
    }
}

impl AssetResolver for FsAssetResolver {
    fn resolve(&self, document: &Path, reference: &str) -> Result<AssetRef, String> {
        let joined = match reference.strip_prefix('/') {
            Some(rooted) => self.root.join(rooted),
            None => document.parent().unwrap_or(Path::new("")).join(reference),
        };
        let path = normalize_path(&joined);

        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if !supported {
            return Err(format!("expected an image file, found {reference:?}"));
        }

        if !path.is_file() {
            return Err(format!(
                "image {reference:?} does not exist (looked for {})",
                path.display()
            ));
        }

        let src = match path.strip_prefix(&self.root) {
            Ok(relative) => to_slash(relative),
            Err(_) => to_slash(&path),
        };

        Ok(AssetRef { src, path })
    }
}
