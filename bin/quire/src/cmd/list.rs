//! List command - print the entries of one collection

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use quire_core::Entry;
use quire_loader::LoadedCollection;

use super::open_registry;

/// Date field used to order listings.
const ORDER_FIELD: &str = "pubDate";

/// Run the list command.
///
/// Entries are printed newest first. Drafts are hidden unless `drafts` is set
/// or the configuration enables them.
pub fn run(config_path: &Path, collection: &str, drafts: bool, json: bool) -> Result<()> {
    tracing::info!(?config_path, collection, drafts, json, "Listing collection");

    let (config, registry) = open_registry(config_path)?;
    let loaded = registry
        .load_all(collection)
        .wrap_err_with(|| format!("Failed to scan collection `{collection}`"))?;

    for err in &loaded.errors {
        tracing::warn!(error = %err, "skipped invalid document");
    }

    let entries = visible_entries(&loaded, drafts || config.build.drafts);

    if json {
        let out = serde_json::to_string_pretty(&entries).wrap_err("Failed to serialize entries")?;
        println!("{out}");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", format_line(entry));
    }

    if !loaded.is_clean() {
        eprintln!(
            "{} invalid document(s) skipped; run `quire check` for details",
            loaded.errors.len()
        );
    }

    Ok(())
}

fn visible_entries(loaded: &LoadedCollection, drafts: bool) -> Vec<&Entry> {
    loaded
        .sorted_by_date(ORDER_FIELD)
        .into_iter()
        .filter(|entry| drafts || !entry.is_draft())
        .collect()
}

fn format_line(entry: &Entry) -> String {
    let date = entry
        .date_field(ORDER_FIELD)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let title = entry.str_field("title").unwrap_or_default();
    let draft = if entry.is_draft() { " [draft]" } else { "" };

    format!("{date}  {:<24} {title}{draft}", entry.id)
}
