//! Connection ID generation

use crate::types::ConnectionId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe monotonic connection ID generator
///
/// IDs are never reused for the generator's lifetime, so a freed
/// connection's id can keep identifying it in logs and queued errors.
#[derive(Debug)]
pub struct ConnectionIdGenerator {
    next_id: AtomicU64,
}

impl ConnectionIdGenerator {
    pub const fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    /// Get the next available ID
    pub fn next(&self) -> ConnectionId {
        ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
