//! Asset reference resolution seam.

use std::path::{Component, Path, PathBuf};

use crate::content::AssetRef;

/// Resolves an `image` field token into an asset reference.
///
/// Resolution must be deterministic and relative to the referencing document.
pub trait AssetResolver: Send + Sync {
    /// Resolve `reference` as written in the front matter of `document`.
    fn resolve(&self, document: &Path, reference: &str) -> Result<AssetRef, String>;
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
///
/// Leading `..` components that cannot be folded are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a path with `/` separators for use as a portable reference.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::RootDir => Some(String::new()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_dots() {
        assert_eq!(
            normalize_path(Path::new("content/blog/./img/../hero.png")),
            PathBuf::from("content/blog/hero.png")
        );
    }

    #[test]
    fn test_normalize_keeps_unfoldable_parent() {
        assert_eq!(
            normalize_path(Path::new("../shared/a.png")),
            PathBuf::from("../shared/a.png")
        );
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(
            to_slash(Path::new("src/content/blog/hero.png")),
            "src/content/blog/hero.png"
        );
        assert_eq!(to_slash(Path::new("/srv/site/a.png")), "/srv/site/a.png");
    }
}
