// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Interactive operator loop.
//!
//! Reads lines from stdin, routes recognized commands, and treats any other
//! non-empty line as a generation request. All operator-facing output goes
//! to stdout; diagnostics go through `tracing`.

use crate::service::{GenerationClient, GenerationRequest, ServiceReply};
use crate::session::{SessionStatus, SharedSession, UprightSuccessHandler};
use crate::store::MotionArchiveStore;
use crate::ClientError;
use mogen_config::MogenConfig;
use mogen_io::command::commands;
use mogen_io::{CommandSink, HandlerRegistry, StatusEvent};
use mogen_motion::{codec, JointOrderTable, RemapIndex};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::error;

const BANNER: &str = "\
=== text to motion ===
  Type a description -> generate and load a motion
  - A new description may be entered at any time to switch motions
  - On completion the robot returns to the default pose automatically

Commands:
  <description>  - generate a new motion
  up             - stand up and auto-recover (after a fall)
  default        - return to the default pose manually
  last           - reload the most recently generated motion
  list           - show generated motions
  clear          - prune old generated motions
  status         - show the current session status
  tunnel         - show SSH tunnel setup help
  q/quit         - exit
======================";

/// One parsed operator input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Quit,
    Default,
    Up,
    Last,
    List,
    Clear,
    Status,
    Tunnel,
    Help,
    Generate(String),
    Empty,
}

impl ControlCommand {
    /// Case-insensitive command match; anything unrecognized and non-empty
    /// is a generation request (with original casing preserved).
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.to_lowercase().as_str() {
            "q" | "quit" | "exit" => Self::Quit,
            "default" => Self::Default,
            "up" => Self::Up,
            "last" => Self::Last,
            "list" => Self::List,
            "clear" => Self::Clear,
            "status" => Self::Status,
            "tunnel" => Self::Tunnel,
            "help" => Self::Help,
            other if other.starts_with('?') => Self::Help,
            _ => Self::Generate(trimmed.to_string()),
        }
    }
}

/// Owns the overall session lifecycle and routes operator input.
pub struct InteractiveController {
    config: MogenConfig,
    session: SharedSession,
    sink: Arc<dyn CommandSink>,
    registry: Arc<HandlerRegistry>,
    client: GenerationClient,
    store: MotionArchiveStore,
    remap: RemapIndex,
    deploy: JointOrderTable,
}

impl InteractiveController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: MogenConfig,
        session: SharedSession,
        sink: Arc<dyn CommandSink>,
        registry: Arc<HandlerRegistry>,
        client: GenerationClient,
        store: MotionArchiveStore,
        remap: RemapIndex,
        deploy: JointOrderTable,
    ) -> Self {
        Self {
            config,
            session,
            sink,
            registry,
            client,
            store,
            remap,
            deploy,
        }
    }

    /// Main loop: blocks on stdin until `q`/EOF.
    pub fn run(&self) {
        println!("{BANNER}");

        println!("[startup] probing generation service at {} ...", self.client.url());
        match self.client.probe() {
            Ok(()) => println!("[startup] generation service reachable"),
            Err(e) => {
                println!("[warning] {e}");
                self.print_tunnel_help();
            }
        }
        println!("\nReady. Type a description or a command.\n");

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            let status = self.session.lock().status;
            print!("[{status}] > ");
            let _ = io::stdout().flush();

            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => {
                    println!("\nEOF, exiting...");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("failed to read operator input: {e}");
                    break;
                }
            }

            match ControlCommand::parse(&line) {
                ControlCommand::Empty => continue,
                ControlCommand::Quit => {
                    println!("exiting...");
                    break;
                }
                ControlCommand::Default => self.send_default(),
                ControlCommand::Up => self.stand_up(),
                ControlCommand::Last => self.reload_last(),
                ControlCommand::List => self.list_motions(),
                ControlCommand::Clear => self.clear_motions(),
                ControlCommand::Status => self.print_status(),
                ControlCommand::Tunnel => self.print_tunnel_help(),
                ControlCommand::Help => println!("{BANNER}"),
                ControlCommand::Generate(text) => {
                    if let Some(identifier) = self.generate(&text) {
                        self.load(&identifier);
                    }
                }
            }
        }
    }

    fn send_default(&self) {
        self.sink.send(commands::DEFAULT_POSE);
        self.session.lock().status = SessionStatus::Idle;
    }

    /// Begin the stand-up sequence: play the recovery motion and ask the
    /// control process to watch for an upright posture.
    fn stand_up(&self) {
        println!("[stand up] starting recovery sequence...");
        self.session.lock().status = SessionStatus::StandingUp;
        self.registry.set(
            StatusEvent::UprightSuccess,
            Box::new(UprightSuccessHandler::new(
                Arc::clone(&self.session),
                Arc::clone(&self.sink),
            )),
        );
        self.sink.send(commands::RECOVERY_MOTION);
        self.sink.send(commands::START_UPRIGHT_MONITORING);
    }

    /// Run one generation exchange; returns the stored identifier.
    ///
    /// Any failure (connection, service-reported error, malformed archive,
    /// store write) leaves the session in `Error` without issuing a control
    /// command; a stored artifact moves it to `Loading`.
    pub fn generate(&self, text: &str) -> Option<String> {
        println!("\n[generating] '{text}'");
        let defaults = &self.config.generation;
        println!(
            "             length: {}s, inference steps: {}",
            defaults.motion_length, defaults.num_inference_steps
        );
        self.session.lock().status = SessionStatus::Generating;

        let request = GenerationRequest::new(text, defaults);
        let reply = match self.client.request(&request) {
            Ok(reply) => reply,
            Err(e) => {
                println!("[error] {e}");
                if matches!(e, ClientError::Connection(_)) {
                    println!("\nHint: make sure the SSH tunnel to the GPU server is up.");
                    self.print_tunnel_help();
                }
                self.session.lock().status = SessionStatus::Error;
                return None;
            }
        };

        let raw = match reply {
            ServiceReply::Archive(raw) => raw,
            ServiceReply::Error(message) => {
                println!("[error] service: {message}");
                self.session.lock().status = SessionStatus::Error;
                return None;
            }
        };

        println!("[converting] parsing motion data...");
        let artifact = match codec::decode(&raw, &self.remap, &self.deploy) {
            Ok(artifact) => artifact,
            Err(e) => {
                println!("[error] archive conversion failed: {e}");
                self.session.lock().status = SessionStatus::Error;
                return None;
            }
        };
        println!(
            "[converting] {} frames at {} fps, joints remapped to deployment order",
            artifact.frames(),
            artifact.fps()
        );

        match self.store.save(&artifact) {
            Ok(identifier) => {
                let mut session = self.session.lock();
                session.last_generated = Some(identifier.clone());
                session.status = SessionStatus::Loading;
                Some(identifier)
            }
            Err(e) => {
                println!("[error] {e}");
                self.session.lock().status = SessionStatus::Error;
                None
            }
        }
    }

    /// Ask the control process to load a stored artifact.
    fn load(&self, identifier: &str) {
        println!("[loading] {identifier}");
        if self.sink.send(&commands::load(identifier)) {
            self.session.lock().status = SessionStatus::Executing;
        }
    }

    fn reload_last(&self) {
        let last = self.session.lock().last_generated.clone();
        match last {
            Some(identifier) => self.load(&identifier),
            None => println!("no motion generated yet"),
        }
    }

    fn list_motions(&self) {
        match self.store.list() {
            Ok(identifiers) if identifiers.is_empty() => println!("\nno generated motions"),
            Ok(identifiers) => {
                println!("\n=== generated motions ({}) ===", identifiers.len());
                for (i, identifier) in identifiers.iter().enumerate() {
                    match MotionArchiveStore::timestamp_of(identifier) {
                        Some(ts) => println!("  {}. {} ({})", i + 1, identifier, ts),
                        None => println!("  {}. {}", i + 1, identifier),
                    }
                }
            }
            Err(e) => println!("[error] {e}"),
        }
    }

    fn clear_motions(&self) {
        let keep = self.config.archive.retention;
        match self.store.prune(keep) {
            Ok(0) => println!("nothing to prune (keeping up to {keep})"),
            Ok(removed) => println!("[clear] removed {removed} old motions, keeping {keep}"),
            Err(e) => println!("[error] {e}"),
        }
    }

    fn print_status(&self) {
        let (status, last) = {
            let session = self.session.lock();
            (session.status, session.last_generated.clone())
        };
        println!("\n=== session status ===");
        println!("status: {status}");
        println!("last generated: {}", last.as_deref().unwrap_or("none"));
        println!(
            "auto default: {}",
            if self.config.session.auto_default_on_complete {
                "on"
            } else {
                "off"
            }
        );
        println!("service: {}", self.client.url());
        println!(
            "control commands: udp://{}:{}",
            self.config.control.host, self.config.control.command_port
        );
        println!(
            "status events: udp://{}:{}",
            self.config.control.host, self.config.control.status_port
        );
    }

    fn print_tunnel_help(&self) {
        let remote = &self.config.remote;
        let port = self.config.service.port;
        println!("\n=== SSH tunnel setup ===");
        if !remote.ssh_alias.is_empty() {
            println!("  ssh -L {port}:127.0.0.1:{port} {}", remote.ssh_alias);
        }
        if !remote.host.is_empty() {
            println!(
                "  ssh -L {port}:127.0.0.1:{port} {}@{} -p {}",
                remote.user, remote.host, remote.port
            );
        }
        if remote.ssh_alias.is_empty() && remote.host.is_empty() {
            println!("  (no remote server configured; see [remote] in mogen.toml)");
        }
        println!("verify with: curl http://127.0.0.1:{port}/");
    }
}
