// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Structs map one-to-one to sections in `mogen.toml`. Every section has a
//! complete `Default` so a missing file or section still yields a runnable
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MogenConfig {
    pub service: ServiceConfig,
    pub generation: GenerationConfig,
    pub control: ControlConfig,
    pub archive: ArchiveConfig,
    pub session: SessionConfig,
    pub remote: RemoteServerConfig,
    pub logging: LoggingConfig,
}

/// Motion-generation service endpoint (WebSocket)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Bounded TCP connect timeout; the generation reply itself is uncapped.
    pub connect_timeout_secs: u64,
}

impl ServiceConfig {
    /// WebSocket URL of the generation endpoint.
    pub fn ws_url(&self) -> String {
        format!("ws://{}:{}/ws", self.host, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            connect_timeout_secs: 10,
        }
    }
}

/// Default generation request parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub motion_length: f64,
    pub num_inference_steps: u32,
    pub adaptive_smooth: bool,
    pub static_start: bool,
    pub static_frames: u32,
    pub blend_frames: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            motion_length: 4.0,
            num_inference_steps: 10,
            adaptive_smooth: true,
            static_start: true,
            static_frames: 2,
            blend_frames: 8,
        }
    }
}

/// UDP ports of the local robot control process
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlConfig {
    pub host: String,
    /// Port the control process listens on for text commands.
    pub command_port: u16,
    /// Port this client listens on for status notifications.
    pub status_port: u16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            command_port: 28562,
            status_port: 28563,
        }
    }
}

/// Generated-artifact storage
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub dir: PathBuf,
    /// Number of newest artifacts `clear` keeps.
    pub retention: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets/data/generated"),
            retention: 10,
        }
    }
}

/// Session behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Send the pose-reset command automatically when a motion finishes.
    pub auto_default_on_complete: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_default_on_complete: true,
        }
    }
}

/// Remote GPU server info, used only to print SSH tunnel guidance
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteServerConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub ssh_alias: String,
}

impl Default for RemoteServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 22,
            user: "root".to_string(),
            ssh_alias: String::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter, overridable with RUST_LOG.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_runnable() {
        let cfg = MogenConfig::default();
        assert_eq!(cfg.service.ws_url(), "ws://127.0.0.1:8000/ws");
        assert_eq!(cfg.control.command_port, 28562);
        assert_eq!(cfg.control.status_port, 28563);
        assert_eq!(cfg.archive.retention, 10);
        assert!(cfg.session.auto_default_on_complete);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: MogenConfig = toml::from_str(
            r#"
            [service]
            host = "10.0.0.5"

            [generation]
            motion_length = 6.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.service.host, "10.0.0.5");
        assert_eq!(cfg.service.port, 8000);
        assert_eq!(cfg.generation.motion_length, 6.5);
        assert_eq!(cfg.generation.blend_frames, 8);
    }
}
