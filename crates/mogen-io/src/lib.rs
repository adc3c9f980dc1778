// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! # mogen-io
//!
//! One-way datagram plumbing between the mogen client and the robot's
//! control process:
//! - [`command`]: fire-and-forget UDP text commands (client -> control)
//! - [`events`]: background listener for status notifications
//!   (control -> client)
//!
//! Both directions are best-effort by design: commands are never
//! acknowledged or retried (the control process applies them idempotently
//! and the operator can re-issue), and unrecognized inbound datagrams are
//! ignored.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod command;
pub mod events;

pub use command::{commands, CommandSink, UdpCommandChannel};
pub use events::{HandlerRegistry, StatusEvent, StatusHandler, StatusListener};

/// Errors from the datagram endpoints.
#[derive(Debug, thiserror::Error)]
pub enum IoChannelError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("failed to send datagram to {addr}: {source}")]
    Send {
        addr: String,
        source: std::io::Error,
    },
}
