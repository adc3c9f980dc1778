// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! One request/reply exchange with the motion-generation service.
//!
//! The protocol is a persistent WebSocket opened per request: send one JSON
//! request, await exactly one data reply, close. Success and failure replies
//! are distinguished by payload kind - a binary frame carries the NPZ
//! archive, a text frame carries `{"error": ...}`.

use crate::ClientError;
use mogen_config::{GenerationConfig, ServiceConfig};
use serde::Serialize;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;
use tungstenite::client::IntoClientRequest;
use tungstenite::{Message, WebSocket};

/// Outbound generation request, serialized as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub text: String,
    pub motion_length: f64,
    pub num_inference_steps: u32,
    pub seed: u32,
    pub adaptive_smooth: bool,
    pub static_start: bool,
    pub static_frames: u32,
    pub blend_frames: u32,
}

impl GenerationRequest {
    /// Build a request from the configured defaults with a freshly derived
    /// seed.
    pub fn new(text: &str, defaults: &GenerationConfig) -> Self {
        Self {
            text: text.to_string(),
            motion_length: defaults.motion_length,
            num_inference_steps: defaults.num_inference_steps,
            seed: derive_seed(),
            adaptive_smooth: defaults.adaptive_smooth,
            static_start: defaults.static_start,
            static_frames: defaults.static_frames,
            blend_frames: defaults.blend_frames,
        }
    }
}

/// Seed derived from the wall clock, bounded to the service's seed space.
fn derive_seed() -> u32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    (secs % 10_000) as u32
}

/// The single reply of a generation exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceReply {
    /// Binary NPZ archive in the service's wire layout.
    Archive(Vec<u8>),
    /// Service-reported failure text.
    Error(String),
}

impl ServiceReply {
    /// Classify one WebSocket message. Returns `Ok(None)` for control
    /// frames that should be skipped while waiting for the data reply.
    pub fn from_message(message: Message) -> Result<Option<Self>, ClientError> {
        match message {
            Message::Binary(bytes) => Ok(Some(ServiceReply::Archive(bytes))),
            Message::Text(text) => Ok(Some(ServiceReply::Error(extract_error(&text)))),
            Message::Close(_) => Err(ClientError::Connection(
                "service closed the connection before replying".to_string(),
            )),
            // Ping/Pong/raw frames: keep waiting
            _ => Ok(None),
        }
    }
}

/// A text reply is an error payload `{"error": "..."}`; fall back to the
/// raw text if it is not shaped that way.
fn extract_error(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => value
            .get("error")
            .and_then(|e| e.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("unrecognized error payload: {text}")),
        Err(_) => format!("unrecognized error payload: {text}"),
    }
}

/// Blocking WebSocket client for the generation endpoint.
pub struct GenerationClient {
    host: String,
    port: u16,
    url: String,
    connect_timeout: Duration,
}

impl GenerationClient {
    pub fn new(service: &ServiceConfig) -> Self {
        Self {
            host: service.host.clone(),
            port: service.port,
            url: service.ws_url(),
            connect_timeout: Duration::from_secs(service.connect_timeout_secs),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bounded TCP connect + WebSocket handshake.
    fn connect(&self) -> Result<WebSocket<TcpStream>, ClientError> {
        let addrs = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ClientError::Connection(format!("cannot resolve {}: {e}", self.host)))?;

        let mut stream = None;
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = Some(e),
            }
        }
        let stream = stream.ok_or_else(|| {
            ClientError::Connection(match last_err {
                Some(e) => format!("cannot connect to {}: {e}", self.url),
                None => format!("{} resolved to no addresses", self.host),
            })
        })?;

        // Bound the handshake as well; the reply wait is uncapped later.
        stream.set_read_timeout(Some(self.connect_timeout))?;
        stream.set_write_timeout(Some(self.connect_timeout))?;

        let request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| ClientError::Connection(format!("bad service URL {}: {e}", self.url)))?;
        let (socket, _response) = tungstenite::client(request, stream)
            .map_err(|e| ClientError::Connection(format!("WebSocket handshake failed: {e}")))?;
        Ok(socket)
    }

    /// Send one request and block for its single reply.
    pub fn request(&self, request: &GenerationRequest) -> Result<ServiceReply, ClientError> {
        let mut socket = self.connect()?;
        let payload = serde_json::to_string(request)?;
        debug!("sending generation request to {}", self.url);
        socket
            .send(Message::Text(payload))
            .map_err(|e| ClientError::Connection(format!("failed to send request: {e}")))?;

        // No cap on the generation itself beyond the transport.
        socket.get_ref().set_read_timeout(None)?;

        loop {
            let message = socket
                .read()
                .map_err(|e| ClientError::Connection(format!("failed awaiting reply: {e}")))?;
            if let Some(reply) = ServiceReply::from_message(message)? {
                let _ = socket.close(None);
                return Ok(reply);
            }
        }
    }

    /// Startup probe: connect and immediately close. Used to warn early
    /// about a missing SSH tunnel.
    pub fn probe(&self) -> Result<(), ClientError> {
        let mut socket = self.connect()?;
        let _ = socket.close(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_all_fields() {
        let request = GenerationRequest::new("wave both hands", &GenerationConfig::default());
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();
        assert_eq!(json["text"], "wave both hands");
        assert_eq!(json["motion_length"], 4.0);
        assert_eq!(json["num_inference_steps"], 10);
        assert_eq!(json["adaptive_smooth"], true);
        assert_eq!(json["static_start"], true);
        assert_eq!(json["static_frames"], 2);
        assert_eq!(json["blend_frames"], 8);
        assert!(json["seed"].as_u64().unwrap() < 10_000);
    }

    #[test]
    fn test_binary_message_is_archive() {
        let reply = ServiceReply::from_message(Message::Binary(vec![1, 2, 3]))
            .unwrap()
            .unwrap();
        assert_eq!(reply, ServiceReply::Archive(vec![1, 2, 3]));
    }

    #[test]
    fn test_text_message_is_error_payload() {
        let reply =
            ServiceReply::from_message(Message::Text(r#"{"error": "CUDA out of memory"}"#.into()))
                .unwrap()
                .unwrap();
        assert_eq!(reply, ServiceReply::Error("CUDA out of memory".to_string()));
    }

    #[test]
    fn test_malformed_text_is_still_an_error_reply() {
        let reply = ServiceReply::from_message(Message::Text("oops".into()))
            .unwrap()
            .unwrap();
        match reply {
            ServiceReply::Error(msg) => assert!(msg.contains("oops")),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_ping_is_skipped() {
        assert!(ServiceReply::from_message(Message::Ping(vec![]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_close_before_reply_is_connection_error() {
        let err = ServiceReply::from_message(Message::Close(None)).unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }

    #[test]
    fn test_connect_refused_is_connection_error() {
        // Reserved port with nothing listening; connect must fail fast.
        let mut cfg = ServiceConfig::default();
        cfg.port = 9; // discard
        cfg.connect_timeout_secs = 1;
        let client = GenerationClient::new(&cfg);
        assert!(matches!(client.probe(), Err(ClientError::Connection(_))));
    }
}
