//! Connection phase tracking
//!
//! A [`Connection`] is this core's view of one live peer: an identifier,
//! the current lifecycle [`Phase`], and a last-activity timestamp. The
//! transport-level socket and endpoint are opaque to this layer.
//!
//! # Lifecycle
//!
//! ```text
//! Initial → Status ────────→ Joined
//!        └→ Authentication ─┘
//! ```
//!
//! Phase advances are driven by the application reacting to a successful
//! handshake or authentication exchange, never inferred from packet
//! content. Closing is an orthogonal transport concern, not a phase.
//!
//! # Thread Safety
//!
//! Concurrent phase reads are safe from any thread; transitions are
//! serialized by the internal lock, and a transition validates against
//! the phase it actually observes under that lock.

use gamewire_core::{ConnectionId, Phase, Result, WireError};
use parking_lot::{Mutex, RwLock};
use std::time::{Duration, Instant};

/// One live connection's session state
#[derive(Debug)]
pub struct Connection {
    /// Unique identifier; orders this connection's packets in queue logs
    id: ConnectionId,

    /// Current lifecycle phase; gates which packet hashes decode
    phase: RwLock<Phase>,

    /// Last packet/transition activity, for the transport's idle policy
    last_activity: Mutex<Instant>,
}

impl Connection {
    /// Create a connection in the `Initial` phase
    #[inline]
    pub fn new(id: ConnectionId) -> Self {
        tracing::debug!("New connection {}", id);
        Self {
            id,
            phase: RwLock::new(Phase::Initial),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    #[inline]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The current phase
    #[inline]
    pub fn phase(&self) -> Phase {
        *self.phase.read()
    }

    /// Advance to the next lifecycle phase
    ///
    /// # Errors
    /// [`WireError::InvalidTransition`] if the step is not one of
    /// `Initial → Status | Authentication` or
    /// `Status | Authentication → Joined`.
    pub fn advance_phase(&self, to: Phase) -> Result<()> {
        let mut phase = self.phase.write();
        if !phase.can_advance_to(to) {
            return Err(WireError::InvalidTransition { from: *phase, to });
        }
        tracing::info!("Connection {} phase {} -> {}", self.id, *phase, to);
        *phase = to;
        *self.last_activity.lock() = Instant::now();
        Ok(())
    }

    /// Record activity (called per decoded packet)
    #[inline]
    pub fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }

    /// Time since the last recorded activity
    pub fn idle_for(&self) -> Duration {
        self.last_activity.lock().elapsed()
    }
}
