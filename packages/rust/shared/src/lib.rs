//! Shared types, error model, and configuration for docsite.
//!
//! This crate is the foundation depended on by all other docsite crates.
//! It provides:
//! - [`DocsiteError`]: the unified error type
//! - [`RunState`]: the per-invocation build record
//! - Configuration ([`AppConfig`], [`SiteConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BuildConfig, CONFIG_FILE_NAME, PathsConfig, RepoPaths, SiteConfig, VersionsConfig,
    load_config, load_config_from,
};
pub use error::{DocsiteError, Result};
pub use types::{RunState, VERSION_LATEST, VERSION_MAIN};
