// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading
//!
//! Search order:
//! 1. Explicit path (CLI `--config`) - missing file is an error
//! 2. `MOGEN_CONFIG_PATH` environment variable - missing file is an error
//! 3. `./mogen.toml`, then up to 5 ancestor directories
//! 4. No file found: built-in defaults

use crate::{ConfigError, ConfigResult, MogenConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the config file searched for in the working directory and its
/// ancestors.
pub const CONFIG_FILE_NAME: &str = "mogen.toml";

/// Find the mogen configuration file, if any.
///
/// Returns `Ok(None)` when no file exists in any searched location; the
/// caller then runs on defaults.
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if `MOGEN_CONFIG_PATH` points at a
/// path that does not exist.
pub fn find_config_file() -> ConfigResult<Option<PathBuf>> {
    if let Ok(env_path) = env::var("MOGEN_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by MOGEN_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    if let Ok(cwd) = env::current_dir() {
        let mut current = cwd.as_path();
        for _ in 0..=5 {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Ok(Some(candidate));
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    Ok(None)
}

/// Load configuration.
///
/// # Arguments
///
/// * `config_path` - Optional explicit path. If `None`, the file is searched
///   for; if none is found anywhere, built-in defaults are returned.
///
/// # Errors
///
/// Returns an error if an explicitly named file is missing, the TOML is
/// malformed, or validation fails.
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<MogenConfig> {
    let config_file = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            Some(path.to_path_buf())
        }
        None => find_config_file()?,
    };

    let config = match config_file {
        Some(file) => {
            let content = fs::read_to_string(&file)?;
            toml::from_str(&content)?
        }
        None => MogenConfig::default(),
    };

    crate::validation::validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_explicit_missing_path_errors() {
        let err = load_config(Some(Path::new("/nonexistent/mogen.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mogen.toml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "[service]\nport = 9001").unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.service.port, 9001);
    }

    #[test]
    fn test_load_invalid_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mogen.toml");
        fs::write(&path, "[service\nport=").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
