//! Quire Loader Library
//!
//! Content collection registry for Quire.
//!
//! # Modules
//!
//! - [`discovery`] - Glob pattern compilation and file discovery
//! - [`assets`] - File-system resolution of `image` fields
//! - [`registry`] - Collection registration and `load_all` scans
//! - [`collection`] - Loaded entries, rejected documents and query helpers

pub mod assets;
pub mod collection;
pub mod discovery;
pub mod registry;

pub use assets::FsAssetResolver;
pub use collection::{DanglingReference, LoadedCollection};
pub use discovery::{PatternError, PatternSet, list_matching_files};
pub use registry::{CollectionDef, ContentRegistry, DocumentResult, LoadError};
