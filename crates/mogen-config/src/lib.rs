// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! # mogen-config
//!
//! Type-safe configuration loader for the mogen client:
//! - TOML file parsing with per-section defaults
//! - `MOGEN_CONFIG_PATH` environment override
//! - Upward file search so the tool runs from anywhere in a checkout
//! - Validation of port and parameter sanity before anything binds a socket
//!
//! Every value has a usable default; a missing config file is only an error
//! when the operator passed an explicit path.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{find_config_file, load_config};
pub use types::*;
pub use validation::validate_config;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
