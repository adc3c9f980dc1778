// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! # mogen - text-to-motion orchestration client
//!
//! mogen lets an operator drive a humanoid robot's motion by typing
//! natural-language descriptions: a request goes to a remote motion
//! generation service over WebSocket, the returned trajectory archive is
//! converted into the robot's deployment joint layout, persisted, and the
//! robot's control process is told to load and play it over a one-way UDP
//! command channel. Completion and recovery events flow back on a second
//! UDP port.
//!
//! ## Workspace members
//! - [`mogen_config`]: TOML configuration (service endpoint, generation
//!   defaults, control ports, archive retention)
//! - [`mogen_motion`]: joint-order remapping, quaternion convention
//!   conversion, NPZ archive codec
//! - [`mogen_io`]: UDP command channel and status-event listener
//! - [`mogen_client`]: session state machine, archive store, interactive
//!   CLI (the `mogen` binary)
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mogen::motion::{g1, JointOrderTable, RemapIndex};
//!
//! let service = JointOrderTable::new(g1::SERVICE_JOINT_ORDER.iter().copied()).unwrap();
//! let deploy = JointOrderTable::new(g1::DEPLOY_JOINT_ORDER.iter().copied()).unwrap();
//! let remap = RemapIndex::build(&service, &deploy).unwrap();
//! assert_eq!(remap.len(), g1::JOINT_COUNT);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use mogen_client as client;
pub use mogen_config as config;
pub use mogen_io as io;
pub use mogen_motion as motion;
