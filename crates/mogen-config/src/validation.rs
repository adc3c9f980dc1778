// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Runs once at load time, before any socket is bound. Catches the
//! misconfigurations that would otherwise surface as confusing runtime
//! failures (command traffic looping back into our own status port, zero
//! retention wiping every artifact on `clear`).

use crate::{ConfigError, ConfigResult, MogenConfig};

/// Validate a loaded configuration.
pub fn validate_config(config: &MogenConfig) -> ConfigResult<()> {
    if config.control.command_port == config.control.status_port {
        return Err(ConfigError::ValidationError(format!(
            "control.command_port and control.status_port must differ (both are {})",
            config.control.command_port
        )));
    }

    if config.archive.retention == 0 {
        return Err(ConfigError::ValidationError(
            "archive.retention must be at least 1".to_string(),
        ));
    }

    if !(config.generation.motion_length > 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "generation.motion_length must be positive (got {})",
            config.generation.motion_length
        )));
    }

    if config.generation.num_inference_steps == 0 {
        return Err(ConfigError::ValidationError(
            "generation.num_inference_steps must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MogenConfig;

    #[test]
    fn test_defaults_validate() {
        assert!(validate_config(&MogenConfig::default()).is_ok());
    }

    #[test]
    fn test_port_conflict_rejected() {
        let mut cfg = MogenConfig::default();
        cfg.control.status_port = cfg.control.command_port;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_zero_retention_rejected() {
        let mut cfg = MogenConfig::default();
        cfg.archive.retention = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_nonpositive_motion_length_rejected() {
        let mut cfg = MogenConfig::default();
        cfg.generation.motion_length = 0.0;
        assert!(validate_config(&cfg).is_err());
    }
}
