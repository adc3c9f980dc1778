// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Session state machine and the event handlers that advance it.
//!
//! The state and last-artifact fields are written from two contexts (the
//! interactive loop and the listener thread), so the whole record lives
//! behind one mutex and the listener only reaches it through registered
//! handlers. A status event that does not match the current state is a
//! stale notification from a prior episode and is deliberately ignored.

use mogen_io::command::commands;
use mogen_io::{CommandSink, StatusHandler};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client-visible status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Generating,
    Loading,
    Executing,
    StandingUp,
    Error,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Generating => "generating",
            SessionStatus::Loading => "loading",
            SessionStatus::Executing => "executing",
            SessionStatus::StandingUp => "standing up",
            SessionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Mutable session record shared between the interactive loop and the
/// listener thread.
#[derive(Debug)]
pub struct SessionState {
    pub status: SessionStatus,
    pub last_generated: Option<String>,
}

pub type SharedSession = Arc<Mutex<SessionState>>;

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            last_generated: None,
        }
    }

    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    /// MOTION_COMPLETE arrived from the control process.
    ///
    /// - StandingUp: the recovery motion finished but the robot was never
    ///   detected upright; warn and go Idle without sending anything (the
    ///   operator must intervene).
    /// - Executing with auto-default: send the pose reset and go Idle.
    /// - Anything else: stale notification from a previous episode; no-op.
    pub fn on_motion_complete(&mut self, sink: &dyn CommandSink, auto_default: bool) {
        match self.status {
            SessionStatus::StandingUp => {
                warn!(
                    "stand-up motion completed but the robot was not detected upright; \
                     check the robot and issue a command manually"
                );
                self.status = SessionStatus::Idle;
            }
            SessionStatus::Executing => {
                info!("motion complete");
                if auto_default {
                    info!("auto-switching to default pose");
                    sink.send(commands::DEFAULT_POSE);
                    self.status = SessionStatus::Idle;
                }
            }
            other => {
                debug!("ignoring MOTION_COMPLETE while {other}");
            }
        }
    }

    /// UPRIGHT_SUCCESS arrived: the robot stood up. Only meaningful while
    /// StandingUp; sends exactly one pose reset.
    pub fn on_upright_success(&mut self, sink: &dyn CommandSink) {
        if self.status == SessionStatus::StandingUp {
            info!("robot detected upright; switching to default pose");
            sink.send(commands::DEFAULT_POSE);
            self.status = SessionStatus::Idle;
        } else {
            debug!("ignoring UPRIGHT_SUCCESS while {}", self.status);
        }
    }
}

/// Handler for `MOTION_COMPLETE`, registered for the whole session.
pub struct MotionCompleteHandler {
    session: SharedSession,
    sink: Arc<dyn CommandSink>,
    auto_default: bool,
}

impl MotionCompleteHandler {
    pub fn new(session: SharedSession, sink: Arc<dyn CommandSink>, auto_default: bool) -> Self {
        Self {
            session,
            sink,
            auto_default,
        }
    }
}

impl StatusHandler for MotionCompleteHandler {
    fn on_event(&self) {
        self.session
            .lock()
            .on_motion_complete(self.sink.as_ref(), self.auto_default);
    }
}

/// Handler for `UPRIGHT_SUCCESS`, registered when the operator starts a
/// stand-up sequence.
pub struct UprightSuccessHandler {
    session: SharedSession,
    sink: Arc<dyn CommandSink>,
}

impl UprightSuccessHandler {
    pub fn new(session: SharedSession, sink: Arc<dyn CommandSink>) -> Self {
        Self { session, sink }
    }
}

impl StatusHandler for UprightSuccessHandler {
    fn on_event(&self) {
        self.session.lock().on_upright_success(self.sink.as_ref());
    }
}
