// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! # mogen-client
//!
//! The orchestration layer of mogen: owns the session state machine, drives
//! one request/reply exchange per generation against the remote service,
//! persists converted artifacts, and exposes the interactive operator CLI.
//!
//! Concurrency model: the interactive loop blocks on operator input (and,
//! while generating, on the single service reply); the status listener
//! thread from `mogen-io` delivers completion events through handlers that
//! mutate the shared [`session::SessionState`] behind a mutex. Events that
//! do not match the current state are ignored as stale.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod controller;
pub mod service;
pub mod session;
pub mod store;

pub use controller::InteractiveController;
pub use service::{GenerationClient, GenerationRequest, ServiceReply};
pub use session::{
    MotionCompleteHandler, SessionState, SessionStatus, SharedSession, UprightSuccessHandler,
};
pub use store::MotionArchiveStore;

use mogen_motion::MotionError;

/// Client-side error taxonomy.
///
/// Connection problems carry remediation guidance for the operator (retry,
/// tunnel setup); format problems are reported once and never retried.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connection to generation service failed: {0}")]
    Connection(String),

    #[error("generation service returned an error: {0}")]
    Service(String),

    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error("failed to serialize generation request: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("archive store failure: {0}")]
    Archive(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
