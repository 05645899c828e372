//! Packet contract and fast-activation boundary

use crate::codec::{WireReader, WireWriter};
use gamewire_core::Result;
use std::any::Any;

/// A wire packet: a mutable, decodable/encodable payload object
///
/// Payload schemas belong to packet authors; this core only requires that
/// a packet can move itself through the primitive codec. The connection
/// that received (or will send) a packet owns it for the duration of one
/// dispatch call.
pub trait Packet: Any + Send + std::fmt::Debug {
    /// Write this packet's payload
    fn encode(&self, writer: &mut WireWriter<'_>) -> Result<()>;

    /// Fill this packet's fields from the wire
    ///
    /// Called on a freshly activated instance right after the id has been
    /// consumed from the sink.
    fn decode(&mut self, reader: &mut WireReader<'_>) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Constructs packet instances without per-call reflection or lookup cost
///
/// The registry caches one activator per registered type at registration
/// time; after that, every [`activate`](Activator::activate) call is a
/// plain indirect call returning a fresh default-initialized instance.
pub trait Activator: Send + Sync {
    fn activate(&self) -> Box<dyn Packet>;
}

/// Stock activator for any `Default` packet type
pub struct DefaultActivator<T>(std::marker::PhantomData<fn() -> T>);

impl<T> DefaultActivator<T> {
    pub fn new() -> Self {
        Self(std::marker::PhantomData)
    }
}

impl<T> Default for DefaultActivator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Packet + Default> Activator for DefaultActivator<T> {
    fn activate(&self) -> Box<dyn Packet> {
        Box::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Endianness, MemorySink};

    #[derive(Debug, Default, PartialEq)]
    struct Ping {
        nonce: u64,
    }

    impl Packet for Ping {
        fn encode(&self, writer: &mut WireWriter<'_>) -> Result<()> {
            writer.write_varlong(self.nonce)
        }

        fn decode(&mut self, reader: &mut WireReader<'_>) -> Result<()> {
            self.nonce = reader.read_varlong()?;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_default_activator_produces_fresh_instances() {
        let activator = DefaultActivator::<Ping>::new();
        let a = activator.activate();
        let b = activator.activate();

        let a = a.as_any().downcast_ref::<Ping>().unwrap();
        let b = b.as_any().downcast_ref::<Ping>().unwrap();
        assert_eq!(a, &Ping::default());
        assert_eq!(b, &Ping::default());
    }

    #[test]
    fn test_packet_roundtrip_through_codec() {
        let original = Ping { nonce: 0xCAFE };

        let mut sink = MemorySink::new(Endianness::Little);
        original
            .encode(&mut WireWriter::new(&mut sink))
            .unwrap();

        let mut decoded = Ping::default();
        decoded
            .decode(&mut WireReader::new(&mut sink))
            .unwrap();
        assert_eq!(decoded, original);
    }
}
