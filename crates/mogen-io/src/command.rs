// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Fire-and-forget UDP command channel to the control process.
//!
//! Commands are short UTF-8 strings, opaque to this client and interpreted
//! by the external control process. `send` never blocks beyond OS send
//! buffering, never retries, and never waits for acknowledgment; loss is
//! acceptable because the operator can re-issue any command.

use crate::IoChannelError;
use chrono::Local;
use std::net::UdpSocket;
use tracing::{error, info};

/// Command vocabulary understood by the control process.
pub mod commands {
    /// Return to the default standing pose.
    pub const DEFAULT_POSE: &str = "default";

    /// Name of the canned recovery (get-up) motion.
    pub const RECOVERY_MOTION: &str = "fallAndGetUp2_subject2";

    /// Ask the control process to watch for an upright posture and notify.
    pub const START_UPRIGHT_MONITORING: &str = "START_UPRIGHT_MONITORING";

    /// Load a named artifact from the shared archive directory.
    pub fn load(artifact: &str) -> String {
        format!("LOAD:{artifact}")
    }
}

/// Seam for anything that emits control commands.
///
/// The session state machine talks to this trait so its transitions can be
/// exercised against a recording sink in tests.
pub trait CommandSink: Send + Sync {
    /// Transmit one command, best-effort. Returns whether the local send
    /// succeeded; delivery is never confirmed.
    fn send(&self, command: &str) -> bool;
}

/// UDP implementation of [`CommandSink`] aimed at the control process.
pub struct UdpCommandChannel {
    socket: UdpSocket,
    target: String,
}

impl UdpCommandChannel {
    /// Create a channel aimed at `host:port`. Binds one ephemeral local
    /// socket that is reused for every send.
    pub fn new(host: &str, port: u16) -> Result<Self, IoChannelError> {
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(|source| IoChannelError::Bind {
            addr: "0.0.0.0:0".to_string(),
            source,
        })?;
        Ok(Self {
            socket,
            target: format!("{host}:{port}"),
        })
    }

    /// The control-process address commands are sent to.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl CommandSink for UdpCommandChannel {
    fn send(&self, command: &str) -> bool {
        match self.socket.send_to(command.as_bytes(), self.target.as_str()) {
            Ok(_) => {
                // Timestamped for operator visibility of what went out when
                let ts = Local::now().format("%H:%M:%S");
                info!("[{ts}] sent command '{command}' to udp://{}", self.target);
                true
            }
            Err(e) => {
                error!("UDP send of '{command}' to {} failed: {e}", self.target);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_command_format() {
        assert_eq!(commands::load("gen_20250101_120000"), "LOAD:gen_20250101_120000");
    }

    #[test]
    fn test_send_reaches_local_receiver() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(std::time::Duration::from_secs(2)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let channel = UdpCommandChannel::new("127.0.0.1", port).unwrap();
        assert!(channel.send(commands::DEFAULT_POSE));

        let mut buf = [0u8; 64];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], commands::DEFAULT_POSE.as_bytes());
    }

    #[test]
    fn test_send_is_best_effort_without_receiver() {
        // Nothing listens on the port; a datagram send still succeeds
        // locally (no connection, no retry, no ack).
        let channel = UdpCommandChannel::new("127.0.0.1", 1).unwrap();
        let _ = channel.send(commands::DEFAULT_POSE);
    }
}
