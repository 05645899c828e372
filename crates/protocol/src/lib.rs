//! # GameWire Protocol Library
//!
//! Binary wire-protocol substrate for the GameWire client/server
//! networking framework.
//!
//! ## Architecture
//!
//! The protocol is organized into layers, leaves first:
//!
//! ### 1. VarInt Codec ([`varint`])
//! Variable-length integer encoding: 7 payload bits per byte with a
//! continuation flag, 1-5 bytes for a `u32` and 1-10 for a `u64`, plus
//! the ZigZag transform so signed values of small magnitude stay short.
//!
//! ### 2. Binary Primitive Codec ([`sink`], [`codec`])
//! Endian-aware typed reads/writes over an abstract [`ByteSink`]:
//! booleans, fixed-width integers, half/single/double floats, VarInts,
//! length-prefixed strings, backed-integer enums, and POD structs.
//!
//! ### 3. Packet Identity ([`hash`])
//! [`PacketHash`] packs traffic direction (2 bits), connection phase
//! (3 bits), and a signed 27-bit packet id into one comparable, hashable
//! `u32`.
//!
//! ### 4. Packet Registry ([`packet`], [`registry`])
//! [`PacketRegistry`] maps hashes to packet types in both directions and
//! constructs instances through cached [`Activator`]s, safe under
//! concurrent registration and lookup.
//!
//! Session phase tracking and dispatch live in `gamewire-session`; the
//! socket/transport loop is a separate layer that feeds bytes into a
//! [`ByteSink`].

pub mod codec;
pub mod hash;
pub mod packet;
pub mod registry;
pub mod sink;
pub mod varint;

// Re-export commonly used items
pub use codec::{EnumRepr, WireEnum, WireReader, WireWriter};
pub use hash::{PacketHash, MAX_PACKET_ID, MIN_PACKET_ID};
pub use packet::{Activator, DefaultActivator, Packet};
pub use registry::PacketRegistry;
pub use sink::{ByteSink, Endianness, MemorySink, TextEncoding};
