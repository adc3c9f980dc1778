// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! mogen - interactive text-to-motion client.

use clap::Parser;
use mogen_client::{
    GenerationClient, InteractiveController, MotionArchiveStore, MotionCompleteHandler,
    SessionState,
};
use mogen_io::{HandlerRegistry, StatusEvent, StatusListener, UdpCommandChannel};
use mogen_motion::{g1, JointOrderTable, RemapIndex};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Drive a robot's motion from natural-language descriptions.
#[derive(Debug, Parser)]
#[command(name = "mogen", version)]
struct Cli {
    /// Path to the configuration file (default: search for mogen.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = mogen_config::load_config(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Fixed permutation between the two externally defined joint orders;
    // any inconsistency here is a fatal configuration error.
    let service_order = JointOrderTable::new(g1::SERVICE_JOINT_ORDER.iter().copied())?;
    let deploy_order = JointOrderTable::new(g1::DEPLOY_JOINT_ORDER.iter().copied())?;
    let remap = RemapIndex::build(&service_order, &deploy_order)?;

    let session = SessionState::shared();
    let sink = Arc::new(UdpCommandChannel::new(
        &config.control.host,
        config.control.command_port,
    )?);

    let registry = Arc::new(HandlerRegistry::new());
    registry.set(
        StatusEvent::MotionComplete,
        Box::new(MotionCompleteHandler::new(
            Arc::clone(&session),
            sink.clone(),
            config.session.auto_default_on_complete,
        )),
    );

    // A failed bind disables status events but does not kill the client.
    let mut listener = match StatusListener::bind(
        &config.control.host,
        config.control.status_port,
        Arc::clone(&registry),
    ) {
        Ok(mut listener) => {
            listener.start();
            Some(listener)
        }
        Err(e) => {
            warn!("{e}; continuing without motion status notifications");
            None
        }
    };

    let store = MotionArchiveStore::new(&config.archive.dir)?;
    let client = GenerationClient::new(&config.service);

    let controller = InteractiveController::new(
        config,
        session,
        sink,
        registry,
        client,
        store,
        remap,
        deploy_order,
    );
    controller.run();

    // Release the status port deterministically before exiting.
    if let Some(listener) = listener.as_mut() {
        listener.stop();
    }
    Ok(())
}
