// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! # mogen-motion
//!
//! Deterministic motion-data transformations for the mogen client:
//! - the fixed G1 joint orderings ([`g1`])
//! - the service-order to deployment-order permutation ([`joints`])
//! - quaternion component-convention conversion ([`quat`])
//! - the in-memory [`MotionArtifact`] and its NPZ archive codec ([`codec`])
//!
//! Everything in this crate is a pure, single-pass data transformation; all
//! state and concurrency live in `mogen-io` and `mogen-client`.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod artifact;
pub mod codec;
pub mod g1;
pub mod joints;
pub mod npy_str;
pub mod quat;

pub use artifact::MotionArtifact;
pub use codec::{decode, encode};
pub use joints::{JointOrderTable, RemapIndex};

/// Errors produced while building joint tables or converting archives.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    /// A deployment-order joint has no counterpart in the service order.
    /// This is a fatal configuration error: the tables are fixed contracts.
    #[error("joint '{name}' not found in source joint order")]
    JointNotFound { name: String },

    #[error("joint tables have different lengths: source {expected}, target {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("duplicate joint name '{name}' in joint order table")]
    DuplicateJoint { name: String },

    /// Required archive member missing.
    #[error("archive is missing required field '{0}'")]
    MissingField(&'static str),

    /// Root orientation could not be validated as a unit quaternion under
    /// either plausible component ordering.
    #[error("root_rot could not be validated as a unit quaternion (norm {norm})")]
    InvalidQuaternion { norm: f32 },

    #[error("malformed archive: {0}")]
    Format(String),

    #[error("archive I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
