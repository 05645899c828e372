//! Core type definitions

use serde::{Deserialize, Serialize};

/// Connection ID (64-bit unsigned)
///
/// Orders connections inside the batched dispatch queue and tags decode
/// errors with the connection they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ConnectionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traffic direction of a packet type
///
/// Packed into the top 2 bits of a packet hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Direction not stated (distinct from `Any`)
    Unspecified = 0,
    /// Client to server
    ServerBound = 1,
    /// Server to client
    ClientBound = 2,
    /// Valid in both directions
    Any = 3,
}

impl Direction {
    pub fn from_bits(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::ServerBound),
            2 => Some(Self::ClientBound),
            3 => Some(Self::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::ServerBound => "serverbound",
            Self::ClientBound => "clientbound",
            Self::Any => "any",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection lifecycle phase
///
/// Packed into 3 bits of a packet hash (room for growth); gates which
/// packet hashes are valid to decode on a connection.
///
/// # Lifecycle
/// ```text
/// Initial → Status ────────→ Joined
///        └→ Authentication ─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    /// Connection just established, protocol not negotiated
    Initial = 0,
    /// Server status/info exchange (no login intended)
    Status = 1,
    /// Credentials are being exchanged
    Authentication = 2,
    /// Fully joined, gameplay traffic
    Joined = 3,
}

impl Phase {
    pub fn from_bits(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Initial),
            1 => Some(Self::Status),
            2 => Some(Self::Authentication),
            3 => Some(Self::Joined),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Status => "status",
            Self::Authentication => "authentication",
            Self::Joined => "joined",
        }
    }

    /// Whether a transition from `self` to `to` is legal.
    ///
    /// Transitions are driven by the session layer reacting to a successful
    /// handshake or authentication exchange, never by packet decoding.
    pub fn can_advance_to(&self, to: Phase) -> bool {
        matches!(
            (self, to),
            (Phase::Initial, Phase::Status)
                | (Phase::Initial, Phase::Authentication)
                | (Phase::Status, Phase::Joined)
                | (Phase::Authentication, Phase::Joined)
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_bits_roundtrip() {
        for dir in [
            Direction::Unspecified,
            Direction::ServerBound,
            Direction::ClientBound,
            Direction::Any,
        ] {
            assert_eq!(Direction::from_bits(dir as u8), Some(dir));
        }
        assert_eq!(Direction::from_bits(4), None);
    }

    #[test]
    fn test_phase_bits_roundtrip() {
        for phase in [
            Phase::Initial,
            Phase::Status,
            Phase::Authentication,
            Phase::Joined,
        ] {
            assert_eq!(Phase::from_bits(phase as u8), Some(phase));
        }
        assert_eq!(Phase::from_bits(5), None);
    }

    #[test]
    fn test_legal_transitions() {
        assert!(Phase::Initial.can_advance_to(Phase::Status));
        assert!(Phase::Initial.can_advance_to(Phase::Authentication));
        assert!(Phase::Status.can_advance_to(Phase::Joined));
        assert!(Phase::Authentication.can_advance_to(Phase::Joined));

        assert!(!Phase::Initial.can_advance_to(Phase::Joined));
        assert!(!Phase::Joined.can_advance_to(Phase::Initial));
        assert!(!Phase::Status.can_advance_to(Phase::Authentication));
    }
}
