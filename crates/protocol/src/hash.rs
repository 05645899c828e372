//! Bit-packed packet identity key
//!
//! A [`PacketHash`] merges a packet type's traffic direction, connection
//! phase, and numeric id into a single `u32` so a registry lookup is one
//! hash-map probe on a plain integer.
//!
//! # Packed layout
//! ```text
//! bit 31 30 | 29 28 27 | 26 ........................ 0
//!  direction |  phase   | packet id (two's complement)
//! ```

use gamewire_core::{Direction, Phase, Result, WireError};

/// Inclusive bounds of the 27-bit two's-complement packet id
pub const MIN_PACKET_ID: i32 = -0x800_0000;
pub const MAX_PACKET_ID: i32 = 0x7FF_FFFF;

const ID_MASK: u32 = 0x07FF_FFFF;
const PHASE_SHIFT: u32 = 27;
const PHASE_MASK: u32 = 0x7;
const DIRECTION_SHIFT: u32 = 30;

/// Packet identity key: direction, phase, and id packed into 32 bits
///
/// Immutable once constructed; equality, ordering, and hashing all go by
/// the raw packed value, and the packing is injective over the valid
/// domain, so two keys are equal exactly when all three fields are equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PacketHash(u32);

impl PacketHash {
    /// Pack a (direction, phase, id) triple
    ///
    /// # Errors
    /// [`WireError::IdOutOfRange`] if `id` does not fit in 27 bits. Fails
    /// fast; an out-of-range id is never truncated.
    pub fn new(direction: Direction, phase: Phase, id: i32) -> Result<Self> {
        if !(MIN_PACKET_ID..=MAX_PACKET_ID).contains(&id) {
            return Err(WireError::IdOutOfRange(id));
        }
        let raw = ((direction as u32) << DIRECTION_SHIFT)
            | ((phase as u32) << PHASE_SHIFT)
            | ((id as u32) & ID_MASK);
        Ok(Self(raw))
    }

    /// Rehydrate a key from its packed representation
    ///
    /// # Errors
    /// [`WireError::InvalidFormat`] if the phase bits hold a value with no
    /// [`Phase`] variant. All direction bit patterns are valid.
    pub fn from_raw(raw: u32) -> Result<Self> {
        let phase_bits = ((raw >> PHASE_SHIFT) & PHASE_MASK) as u8;
        if Phase::from_bits(phase_bits).is_none() {
            return Err(WireError::InvalidFormat(format!(
                "packet hash 0x{raw:08X} has invalid phase bits {phase_bits}"
            )));
        }
        Ok(Self(raw))
    }

    /// The packed 32-bit value, usable directly as a map key
    #[inline]
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Traffic direction (bits 30-31)
    #[inline]
    pub fn direction(&self) -> Direction {
        // 2 bits; all four patterns are variants
        Direction::from_bits((self.0 >> DIRECTION_SHIFT) as u8)
            .unwrap_or(Direction::Unspecified)
    }

    /// Connection phase (bits 27-29)
    #[inline]
    pub fn phase(&self) -> Phase {
        // Constructors validate the phase bits, so this cannot miss
        Phase::from_bits(((self.0 >> PHASE_SHIFT) & PHASE_MASK) as u8)
            .unwrap_or(Phase::Initial)
    }

    /// Packet id (bits 0-26), sign-extended
    #[inline]
    pub fn id(&self) -> i32 {
        ((self.0 << 5) as i32) >> 5
    }

    /// The same id under a different phase
    ///
    /// Used by the session layer to report which phase a mismatched packet
    /// actually belongs to.
    pub fn with_phase(&self, phase: Phase) -> Self {
        Self((self.0 & !(PHASE_MASK << PHASE_SHIFT)) | ((phase as u32) << PHASE_SHIFT))
    }
}

impl std::fmt::Debug for PacketHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketHash")
            .field("direction", &self.direction())
            .field("phase", &self.phase())
            .field("id", &self.id())
            .finish()
    }
}

impl std::fmt::Display for PacketHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.direction().as_str(),
            self.phase().as_str(),
            self.id()
        )
    }
}
