//! Shared types, error model, and configuration for sitefeed.
//!
//! This crate is the foundation depended on by all other sitefeed crates.
//! It provides:
//! - [`SitefeedError`] — the unified error type
//! - Domain types ([`RawRow`], [`Event`], [`Course`], [`ContentSnapshot`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ImagesConfig, OutputConfig, SourceConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{Result, SitefeedError};
pub use types::{ContentSnapshot, Course, Event, FALLBACK_LINK, LoadId, RawRow};
