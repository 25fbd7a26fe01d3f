//! Watch command - rescan collections on file changes

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use color_eyre::eyre::{Result, WrapErr};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use quire_loader::ContentRegistry;
use tokio::sync::mpsc;

use super::open_registry;

/// Debounce interval for file changes.
const DEBOUNCE_MS: u64 = 200;

/// Run the watch command.
///
/// Scans every collection once, then again after each burst of changes under
/// the collection base directories. Stops on Ctrl+C.
pub async fn run(config_path: &Path) -> Result<()> {
    tracing::info!(?config_path, "Starting watch mode");

    let (_config, registry) = open_registry(config_path)?;
    let registry = Arc::new(registry);

    tracing::info!("Running initial scan...");
    scan_blocking(Arc::clone(&registry)).await;

    let (tx, mut rx) = mpsc::channel::<PathBuf>(64);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) if is_relevant(&event.kind) => {
                for path in event.paths {
                    let _ = tx.blocking_send(path);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Watch error: {e}"),
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    for name in registry.names() {
        if let Some(def) = registry.collection(name) {
            watcher
                .watch(&def.base, RecursiveMode::Recursive)
                .wrap_err_with(|| format!("Failed to watch {}", def.base.display()))?;
            tracing::debug!(collection = name, base = %def.base.display(), "Watching collection");
        }
    }

    println!();
    println!("  Watching {} collection(s)", registry.names().count());
    println!("  Press Ctrl+C to stop");
    println!();

    let rescan_registry = Arc::clone(&registry);
    let rescans = tokio::spawn(async move {
        while let Some(path) = rx.recv().await {
            tracing::debug!(path = %path.display(), "File changed");

            // Let the burst settle, then drain it.
            tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS)).await;
            while rx.try_recv().is_ok() {}

            println!();
            println!("  File change detected, rescanning...");
            scan_blocking(Arc::clone(&rescan_registry)).await;
        }
    });

    tokio::signal::ctrl_c()
        .await
        .wrap_err("Failed to listen for Ctrl+C")?;

    println!();
    println!("  Stopping watch mode");
    rescans.abort();
    drop(watcher);

    Ok(())
}

/// Run [`scan`] on the blocking pool so the runtime keeps serving signals.
async fn scan_blocking(registry: Arc<ContentRegistry>) {
    if let Err(e) = tokio::task::spawn_blocking(move || scan(&registry)).await {
        tracing::error!("Scan task failed: {e}");
    }
}

/// Create, remove and data-modification events trigger a rescan.
fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_))
            | EventKind::Create(_)
            | EventKind::Remove(_)
    )
}

/// Load every collection and print a one-line status per collection.
fn scan(registry: &ContentRegistry) {
    let started = Instant::now();

    for name in registry.names() {
        match registry.load_all(name) {
            Ok(loaded) if loaded.is_clean() => {
                println!("  ✓ {name}: {} entries", loaded.entries.len());
            }
            Ok(loaded) => {
                println!(
                    "  ✗ {name}: {} entries, {} invalid",
                    loaded.entries.len(),
                    loaded.errors.len()
                );
                for err in &loaded.errors {
                    println!("      {err}");
                }
            }
            Err(e) => {
                tracing::error!("Scan failed: {e}");
                eprintln!("  ✗ {name}: {e}");
            }
        }
    }

    tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Scan completed");
}
