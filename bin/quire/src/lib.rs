//! Quire CLI Library
//!
//! Command implementations for the `quire` binary: validating content
//! collections, listing entries, scaffolding new documents and watching the
//! collection directories for changes.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (check, list, new, watch)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use quire::cmd;
//!
//! // Validate every collection declared in quire.toml
//! cmd::check::run(Path::new("quire.toml"), false).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use quire_core::{Config, Entry};
pub use quire_loader::{ContentRegistry, LoadedCollection};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// quire::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
