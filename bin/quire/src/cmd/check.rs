//! Check command - validate configuration and every collection

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use quire_core::Config;
use quire_loader::{ContentRegistry, LoadedCollection};

use super::open_registry;

/// Fields holding loose references to other entries of the same collection.
const REFERENCE_FIELDS: &[&str] = &["relatedArticles"];

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    entries: usize,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Loads every registered collection and reports rejected documents.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    println!("Checking configuration...");
    let (config, registry) = open_registry(config_path)?;
    println!("  ✓ Configuration valid ({})", site_label(&config));

    println!("\nChecking collections...");
    let result = check_registry(&registry)?;

    println!();
    println!("Summary:");
    println!("  Entries:  {}", result.entries);
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Site title when configured, otherwise its URL.
fn site_label(config: &Config) -> &str {
    config.site.title.as_deref().unwrap_or(&config.site.url)
}

/// Scan every collection and gather errors and warnings.
fn check_registry(registry: &ContentRegistry) -> Result<ValidationResult> {
    let mut result = ValidationResult::default();

    for name in registry.names() {
        let loaded = registry
            .load_all(name)
            .wrap_err_with(|| format!("Failed to scan collection `{name}`"))?;
        check_collection(&loaded, &mut result);

        if loaded.is_clean() {
            println!("  ✓ {name}: {} entries", loaded.entries.len());
        } else {
            println!(
                "  ✗ {name}: {} entries, {} invalid",
                loaded.entries.len(),
                loaded.errors.len()
            );
        }
    }

    Ok(result)
}

fn check_collection(loaded: &LoadedCollection, result: &mut ValidationResult) {
    result.entries += loaded.entries.len();

    for err in &loaded.errors {
        result.add_error(err.to_string());
    }

    if loaded.entries.is_empty() && loaded.errors.is_empty() {
        result.add_warning(format!("collection `{}` has no documents", loaded.name));
    }

    for field in REFERENCE_FIELDS {
        for dangling in loaded.dangling_references(field) {
            result.add_warning(format!(
                "{}/{}: {} references unknown entry `{}`",
                loaded.name, dangling.from, dangling.field, dangling.target
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use quire_core::presets;
    use quire_loader::CollectionDef;

    use super::*;

    fn registry(root: &Path) -> ContentRegistry {
        let base = root.join("articles");
        fs::create_dir_all(&base).expect("mkdir");
        let mut registry = ContentRegistry::new(root);
        registry
            .register(CollectionDef::new(
                "articles",
                base,
                ["**/*.md"],
                presets::articles().expect("schema"),
            ))
            .expect("register");
        registry
    }

    fn article(root: &Path, slug: &str, extra: &str) {
        fs::write(
            root.join("articles").join(format!("{slug}.md")),
            format!(
                "---\ntitle: T\nslug: {slug}\nsnippet: s\ncategory: c\npubDate: 2024-01-01\n{extra}---\n"
            ),
        )
        .expect("write");
    }

    #[test]
    fn test_check_reports_invalid_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = registry(dir.path());
        article(dir.path(), "good", "");
        fs::write(dir.path().join("articles/bad.md"), "---\ntitle: Bad\n---\n").expect("write");

        let result = check_registry(&registry).expect("scan");

        assert_eq!(result.entries, 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("bad.md"));
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_check_warns_on_dangling_references() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = registry(dir.path());
        article(dir.path(), "one", "relatedArticles: [two, ghost]\n");
        article(dir.path(), "two", "");

        let result = check_registry(&registry).expect("scan");

        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("`ghost`"));
    }

    #[test]
    fn test_site_label_prefers_title() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("quire.toml");
        fs::write(&config_path, "[site]\nurl = \"https://example.com/\"\n").expect("write");

        let mut config = Config::load(&config_path).expect("config");
        assert_eq!(site_label(&config), "https://example.com/");

        config.site.title = Some("Field Notes".to_string());
        assert_eq!(site_label(&config), "Field Notes");
    }

    #[test]
    fn test_check_warns_on_empty_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = registry(dir.path());

        let result = check_registry(&registry).expect("scan");

        assert!(result.has_warnings());
        assert!(result.warnings[0].contains("no documents"));
    }
}
