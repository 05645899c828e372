//! Packet routing: handlers, events, and delivery modes
//!
//! # Architecture
//!
//! The [`Dispatcher`] is the junction between decoded packets and
//! application code. Two routing surfaces exist per packet hash:
//!
//! - **Handlers** — at most one per hash, the primary recipient
//! - **Event listeners** — any number per hash, the broadcast fallback
//!
//! A registered handler suppresses the listeners for that hash unless the
//! endpoint is configured to always invoke events; even then, a handler
//! returning [`DispatchOutcome::Handled`] suppresses the fallback for
//! that packet instance. Listeners run in registration order and a
//! `Handled` return short-circuits the rest.
//!
//! # Delivery modes
//!
//! In [`DispatchMode::Realtime`], routing happens synchronously inside
//! [`Dispatcher::dispatch`] on the calling (I/O) thread. In
//! [`DispatchMode::Batched`], packets queue in arrival order and
//! [`Dispatcher::tick`] drains exactly the packets present when it
//! started; anything arriving during the drain waits for the next tick.
//!
//! # Thread Safety
//!
//! All operations take `&self` and are safe from concurrent threads. The
//! dispatcher owns no threads of its own.

use crate::config::{DispatchMode, EndpointConfig};
use crate::connection::Connection;
use gamewire_core::{Direction, Phase, Result, WireError};
use gamewire_protocol::{ByteSink, Packet, PacketHash, PacketRegistry, WireReader};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// What a handler or listener did with a packet
///
/// Returned instead of mutating a shared "handled" flag; the dispatcher
/// short-circuits or falls through based on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The packet was consumed; suppress fallbacks
    Handled,
    /// Not consumed; continue to the next recipient
    NotHandled,
}

/// Direct packet handler: the single primary recipient for a hash
pub type Handler =
    Arc<dyn Fn(&Connection, &mut dyn Packet) -> DispatchOutcome + Send + Sync>;

/// Event listener: one of possibly many fallback recipients for a hash
pub type Listener =
    Arc<dyn Fn(&Connection, &dyn Packet) -> DispatchOutcome + Send + Sync>;

/// A decoded packet awaiting a batched-mode drain
struct Pending {
    conn: Arc<Connection>,
    hash: PacketHash,
    packet: Box<dyn Packet>,
}

/// Routes decoded packets to handlers and event listeners
pub struct Dispatcher {
    config: EndpointConfig,
    registry: Arc<PacketRegistry>,
    handlers: dashmap::DashMap<PacketHash, Handler>,
    listeners: dashmap::DashMap<PacketHash, Vec<Listener>>,
    pending: Mutex<VecDeque<Pending>>,
}

impl Dispatcher {
    pub fn new(config: EndpointConfig, registry: Arc<PacketRegistry>) -> Self {
        Self {
            config,
            registry,
            handlers: dashmap::DashMap::new(),
            listeners: dashmap::DashMap::new(),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    #[inline]
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &Arc<PacketRegistry> {
        &self.registry
    }

    /// Install the direct handler for a hash, replacing any existing one
    pub fn set_handler<F>(&self, hash: PacketHash, handler: F)
    where
        F: Fn(&Connection, &mut dyn Packet) -> DispatchOutcome + Send + Sync + 'static,
    {
        if self.handlers.insert(hash, Arc::new(handler)).is_some() {
            tracing::warn!("Replaced handler for packet {}", hash);
        } else {
            tracing::debug!("Registered handler for packet {}", hash);
        }
    }

    /// Remove the direct handler for a hash
    pub fn clear_handler(&self, hash: PacketHash) -> bool {
        self.handlers.remove(&hash).is_some()
    }

    /// Append an event listener for a hash
    ///
    /// Listeners fire in registration order.
    pub fn add_listener<F>(&self, hash: PacketHash, listener: F)
    where
        F: Fn(&Connection, &dyn Packet) -> DispatchOutcome + Send + Sync + 'static,
    {
        self.listeners
            .entry(hash)
            .or_default()
            .push(Arc::new(listener));
        tracing::debug!("Registered listener for packet {}", hash);
    }

    /// Deliver a decoded packet according to the endpoint's dispatch mode
    ///
    /// Realtime endpoints route on this thread before returning; batched
    /// endpoints enqueue and return immediately.
    pub fn dispatch(&self, conn: &Arc<Connection>, hash: PacketHash, packet: Box<dyn Packet>) {
        match self.config.dispatch_mode {
            DispatchMode::Realtime => {
                let mut packet = packet;
                self.route(conn, hash, packet.as_mut());
            }
            DispatchMode::Batched => {
                self.pending.lock().push_back(Pending {
                    conn: Arc::clone(conn),
                    hash,
                    packet,
                });
            }
        }
    }

    /// Drain and route the batched queue
    ///
    /// Takes the queue contents present at the moment `tick` begins and
    /// routes them in enqueue order (per-connection arrival order is
    /// preserved end to end). Packets enqueued while the drain runs are
    /// deferred to the next call. Returns the number routed.
    pub fn tick(&self) -> usize {
        let drained = std::mem::take(&mut *self.pending.lock());
        let count = drained.len();
        for mut item in drained {
            self.route(&item.conn, item.hash, item.packet.as_mut());
        }
        if count > 0 {
            tracing::trace!("Tick routed {} packets", count);
        }
        count
    }

    /// Number of packets currently waiting for a tick
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Decode one packet off a sink and deliver it
    ///
    /// Reads the ZigZag VarInt packet id, forms the hash from the given
    /// direction and the connection's current phase, constructs the
    /// registered type, decodes the payload, and dispatches.
    ///
    /// # Errors
    /// - [`WireError::PhaseMismatch`] if the (direction, id) pair is
    ///   registered under a different phase than the connection's current
    ///   one. Detection only; drop-vs-disconnect policy stays with the
    ///   caller.
    /// - [`WireError::NotRegistered`] if no phase knows this id.
    /// - [`WireError::Decode`] wrapping the codec failure, tagged with
    ///   the connection and packet id, if the payload is malformed or
    ///   truncated.
    pub fn receive(
        &self,
        conn: &Arc<Connection>,
        direction: Direction,
        sink: &mut dyn ByteSink,
    ) -> Result<()> {
        let mut reader = WireReader::new(sink);
        let id = reader.read_varint_signed()?;
        let current = conn.phase();
        let hash = PacketHash::new(direction, current, id)?;

        let mut packet = match self.registry.try_create(hash) {
            Some(packet) => packet,
            None => return Err(self.lookup_failure(conn, hash)),
        };

        packet.decode(&mut reader).map_err(|e| {
            tracing::warn!(
                "Connection {} failed to decode packet id {}: {}",
                conn.id(),
                id,
                e
            );
            WireError::Decode {
                connection: conn.id(),
                packet_id: id,
                source: Box::new(e),
            }
        })?;

        conn.touch();
        self.dispatch(conn, hash, packet);
        Ok(())
    }

    /// Distinguish "registered elsewhere" from "never registered"
    fn lookup_failure(&self, conn: &Arc<Connection>, hash: PacketHash) -> WireError {
        let current = hash.phase();
        for phase in [
            Phase::Initial,
            Phase::Status,
            Phase::Authentication,
            Phase::Joined,
        ] {
            if phase != current && self.registry.contains(hash.with_phase(phase)) {
                return WireError::PhaseMismatch {
                    connection: conn.id(),
                    packet_id: hash.id(),
                    registered: phase,
                    current,
                };
            }
        }
        WireError::NotRegistered(hash.to_string())
    }

    /// Apply the handler/listener precedence rules to one packet
    fn route(&self, conn: &Arc<Connection>, hash: PacketHash, packet: &mut dyn Packet) {
        // Clone out of the map so a handler can re-enter the dispatcher
        let handler = self.handlers.get(&hash).map(|h| Arc::clone(&h));

        if let Some(handler) = handler {
            let outcome = handler(conn, packet);
            if outcome == DispatchOutcome::Handled || !self.config.always_invoke_events {
                return;
            }
        }

        let listeners: Vec<Listener> = self
            .listeners
            .get(&hash)
            .map(|l| l.clone())
            .unwrap_or_default();

        for listener in listeners {
            if listener(conn, packet) == DispatchOutcome::Handled {
                break;
            }
        }
    }
}
