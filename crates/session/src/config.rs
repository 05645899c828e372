//! Endpoint configuration
//!
//! Delivery behavior is fixed per endpoint at configuration time; the
//! dispatcher never switches modes mid-flight.

use serde::{Deserialize, Serialize};

/// When packet handlers and events fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchMode {
    /// Fire synchronously on the I/O-driving thread as soon as a packet
    /// is fully decoded, before the next byte of that connection is
    /// consumed. No queueing.
    Realtime,

    /// Append decoded packets to a FIFO queue; handlers and events fire
    /// only inside an explicit `tick()` call. Suits game loops that want
    /// all packet effects applied at a fixed point in the frame.
    Batched,
}

/// Endpoint configuration options
///
/// # Default Values
/// - `dispatch_mode`: [`DispatchMode::Realtime`]
/// - `always_invoke_events`: `false` (a registered handler suppresses the
///   event listeners for that packet)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Delivery mode for decoded packets
    pub dispatch_mode: DispatchMode,

    /// Invoke event listeners even when a direct handler is registered
    ///
    /// Even with this set, a handler that returns `Handled` still
    /// suppresses the fallback listeners for that packet instance.
    pub always_invoke_events: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            dispatch_mode: DispatchMode::Realtime,
            always_invoke_events: false,
        }
    }
}
