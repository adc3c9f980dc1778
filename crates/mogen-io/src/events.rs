// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Background listener for status notifications from the control process.
//!
//! The control process reports asynchronous events ("motion finished",
//! "robot is upright") as bare UTF-8 tags on a local UDP port. The listener
//! runs on its own thread with a bounded receive timeout per iteration so a
//! stop request is observed within one interval, and dispatches each known
//! tag through a typed handler registry. Handlers are replaceable at runtime
//! without touching the listener; a swap affects only future events.

use crate::IoChannelError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Bounded wait per receive iteration; also the upper bound on how long
/// `stop` waits for the thread to notice the flag.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Tagged notification from the control process. No payload beyond the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusEvent {
    MotionComplete,
    UprightSuccess,
}

impl StatusEvent {
    /// Parse a wire tag; unknown tags yield `None` and are ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "MOTION_COMPLETE" => Some(Self::MotionComplete),
            "UPRIGHT_SUCCESS" => Some(Self::UprightSuccess),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::MotionComplete => "MOTION_COMPLETE",
            Self::UprightSuccess => "UPRIGHT_SUCCESS",
        }
    }
}

/// Typed callback for one event kind.
pub trait StatusHandler: Send {
    fn on_event(&self);
}

/// At most one handler per event kind, swappable at runtime.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Mutex<HashMap<StatusEvent, Box<dyn StatusHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the handler for `event`. Replacement affects
    /// only events dispatched after this call returns.
    pub fn set(&self, event: StatusEvent, handler: Box<dyn StatusHandler>) {
        self.handlers.lock().insert(event, handler);
    }

    pub fn clear(&self, event: StatusEvent) {
        self.handlers.lock().remove(&event);
    }

    /// Invoke the registered handler, if any. Returns whether one ran.
    pub fn dispatch(&self, event: StatusEvent) -> bool {
        let handlers = self.handlers.lock();
        match handlers.get(&event) {
            Some(handler) => {
                handler.on_event();
                true
            }
            None => {
                debug!("no handler registered for {}", event.tag());
                false
            }
        }
    }
}

/// Long-lived UDP listener thread for status events.
pub struct StatusListener {
    registry: Arc<HandlerRegistry>,
    running: Arc<AtomicBool>,
    socket: Option<UdpSocket>,
    handle: Option<JoinHandle<()>>,
    local_addr: SocketAddr,
}

impl StatusListener {
    /// Bind the status endpoint. A bind failure is surfaced to the caller,
    /// which reports it and runs without a listener rather than crashing.
    pub fn bind(
        host: &str,
        port: u16,
        registry: Arc<HandlerRegistry>,
    ) -> Result<Self, IoChannelError> {
        Self::bind_with_poll_interval(host, port, registry, POLL_INTERVAL)
    }

    /// [`StatusListener::bind`] with a custom receive timeout per iteration.
    pub fn bind_with_poll_interval(
        host: &str,
        port: u16,
        registry: Arc<HandlerRegistry>,
        poll_interval: Duration,
    ) -> Result<Self, IoChannelError> {
        let addr = format!("{host}:{port}");
        let socket = UdpSocket::bind(&addr).map_err(|source| IoChannelError::Bind {
            addr: addr.clone(),
            source,
        })?;
        let local_addr = socket.local_addr().map_err(|source| IoChannelError::Bind {
            addr,
            source,
        })?;
        socket
            .set_read_timeout(Some(poll_interval))
            .map_err(|source| IoChannelError::Bind {
                addr: local_addr.to_string(),
                source,
            })?;
        Ok(Self {
            registry,
            running: Arc::new(AtomicBool::new(false)),
            socket: Some(socket),
            handle: None,
            local_addr,
        })
    }

    /// Address the listener is bound to (useful when bound to port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Spawn the receive loop. Idempotent once started.
    pub fn start(&mut self) {
        let socket = match self.socket.take() {
            Some(s) => s,
            None => return, // already started or stopped
        };
        info!("listening for status events on udp://{}", self.local_addr);
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let registry = Arc::clone(&self.registry);
        self.handle = Some(std::thread::spawn(move || {
            receive_loop(socket, running, registry);
        }));
    }

    /// Stop the receive loop and wait for it to exit. After this returns no
    /// handler runs and the bound port is released.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("status listener thread panicked");
            }
        }
        self.socket = None;
    }
}

impl Drop for StatusListener {
    fn drop(&mut self) {
        self.stop();
    }
}

fn receive_loop(socket: UdpSocket, running: Arc<AtomicBool>, registry: Arc<HandlerRegistry>) {
    let mut buf = [0u8; 1024];
    while running.load(Ordering::SeqCst) {
        match socket.recv_from(&mut buf) {
            Ok((len, _)) => {
                let msg = String::from_utf8_lossy(&buf[..len]);
                let tag = msg.trim();
                match StatusEvent::from_tag(tag) {
                    Some(event) => {
                        debug!("status event: {}", event.tag());
                        registry.dispatch(event);
                    }
                    None => {
                        debug!("ignoring unrecognized status datagram: '{tag}'");
                    }
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                continue;
            }
            Err(e) => {
                if running.load(Ordering::SeqCst) {
                    warn!("status listener receive error: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counter(Arc<AtomicUsize>);

    impl StatusHandler for Counter {
        fn on_event(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn listener_with_counter(
        event: StatusEvent,
    ) -> (StatusListener, UdpSocket, SocketAddr, Arc<AtomicUsize>) {
        let registry = Arc::new(HandlerRegistry::new());
        let count = Arc::new(AtomicUsize::new(0));
        registry.set(event, Box::new(Counter(Arc::clone(&count))));
        let mut listener = StatusListener::bind_with_poll_interval(
            "127.0.0.1",
            0,
            registry,
            Duration::from_millis(50),
        )
        .unwrap();
        let addr = listener.local_addr();
        listener.start();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        (listener, sender, addr, count)
    }

    fn wait_for(count: &AtomicUsize, expected: usize) -> bool {
        for _ in 0..100 {
            if count.load(Ordering::SeqCst) >= expected {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_delivers_known_tag() {
        let (mut listener, sender, addr, count) =
            listener_with_counter(StatusEvent::MotionComplete);
        sender.send_to(b"MOTION_COMPLETE", addr).unwrap();
        assert!(wait_for(&count, 1));
        listener.stop();
    }

    #[test]
    fn test_ignores_unknown_tags() {
        let (mut listener, sender, addr, count) =
            listener_with_counter(StatusEvent::MotionComplete);
        sender.send_to(b"SOMETHING_ELSE", addr).unwrap();
        sender.send_to(b"", addr).unwrap();
        sender.send_to(b"MOTION_COMPLETE", addr).unwrap();
        assert!(wait_for(&count, 1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        listener.stop();
    }

    #[test]
    fn test_no_delivery_after_stop() {
        let (mut listener, sender, addr, count) =
            listener_with_counter(StatusEvent::UprightSuccess);

        // Hammer the port from another thread while stopping.
        let stop_flag = Arc::new(AtomicBool::new(false));
        let sender_flag = Arc::clone(&stop_flag);
        let sender_thread = std::thread::spawn(move || {
            while !sender_flag.load(Ordering::SeqCst) {
                let _ = sender.send_to(b"UPRIGHT_SUCCESS", addr);
            }
        });

        std::thread::sleep(Duration::from_millis(30));
        listener.stop();
        let frozen = count.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), frozen);

        stop_flag.store(true, Ordering::SeqCst);
        sender_thread.join().unwrap();
    }

    #[test]
    fn test_handler_replacement_affects_future_events_only() {
        let registry = Arc::new(HandlerRegistry::new());
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        registry.set(
            StatusEvent::MotionComplete,
            Box::new(Counter(Arc::clone(&first))),
        );
        registry.dispatch(StatusEvent::MotionComplete);
        registry.set(
            StatusEvent::MotionComplete,
            Box::new(Counter(Arc::clone(&second))),
        );
        registry.dispatch(StatusEvent::MotionComplete);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_without_handler_is_noop() {
        let registry = HandlerRegistry::new();
        assert!(!registry.dispatch(StatusEvent::MotionComplete));
    }

    #[test]
    fn test_tag_roundtrip() {
        for event in [StatusEvent::MotionComplete, StatusEvent::UprightSuccess] {
            assert_eq!(StatusEvent::from_tag(event.tag()), Some(event));
        }
        assert_eq!(StatusEvent::from_tag("default"), None);
    }
}
