//! Core error types for GameWire

use crate::types::{ConnectionId, Phase};

#[derive(thiserror::Error, Debug)]
pub enum WireError {
    /// Malformed wire encoding (unterminated VarInt, over-wide final group,
    /// invalid string bytes, out-of-range enum value). Never silently
    /// truncated.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The sink ran out of bytes mid-field. Distinct from `InvalidFormat`:
    /// the bytes seen so far were valid, there just weren't enough of them.
    #[error("Short read: needed {needed} bytes, got {got}")]
    ShortRead { needed: usize, got: usize },

    /// The sink accepted fewer bytes than a field required.
    #[error("Short write: needed {needed} bytes, wrote {wrote}")]
    ShortWrite { needed: usize, wrote: usize },

    /// Packet id outside the 27-bit two's-complement range.
    #[error("Packet id {0} out of range [-0x8000000, 0x7FFFFFF]")]
    IdOutOfRange(i32),

    /// A packet hash is already registered.
    #[error("Duplicate packet hash: {0}")]
    DuplicateKey(String),

    /// A packet type is already registered under another hash.
    #[error("Packet type already registered: {0}")]
    DuplicateType(String),

    /// Lookup for a hash or type that was never registered.
    #[error("Not registered: {0}")]
    NotRegistered(String),

    /// The registered activator does not produce the declared type.
    #[error("Incompatible packet type: {0}")]
    IncompatibleType(String),

    /// A packet's registered phase does not match the connection's phase.
    #[error("Phase mismatch on connection {connection}: packet id {packet_id} is registered for phase {registered}, connection is in {current}")]
    PhaseMismatch {
        connection: ConnectionId,
        packet_id: i32,
        registered: Phase,
        current: Phase,
    },

    /// Illegal connection phase transition.
    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: Phase, to: Phase },

    /// A codec failure tied to a specific connection and packet id, so the
    /// application can act on one connection without affecting others.
    #[error("Decode error on connection {connection}, packet id {packet_id}: {source}")]
    Decode {
        connection: ConnectionId,
        packet_id: i32,
        #[source]
        source: Box<WireError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WireError>;
