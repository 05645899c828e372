//! Thread-safe packet type registry and factory
//!
//! Maps packet hashes to packet types in both directions and constructs
//! instances on demand through cached activators. An explicit instance,
//! not process-global state: tests and multi-endpoint processes can hold
//! independent registries without cross-contamination.
//!
//! # Atomic visibility
//!
//! Both internal maps (hash → entry, type → hash) live under one
//! `RwLock`, so a registration is either fully visible to concurrent
//! lookups or not visible at all; a reader can never observe one map
//! updated and the other not.

use crate::hash::PacketHash;
use crate::packet::{Activator, DefaultActivator, Packet};
use gamewire_core::{Result, WireError};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

struct Entry {
    type_id: TypeId,
    type_name: &'static str,
    activator: Arc<dyn Activator>,
}

#[derive(Default)]
struct Maps {
    by_hash: HashMap<PacketHash, Entry>,
    by_type: HashMap<TypeId, PacketHash>,
}

/// Bidirectional packet hash ↔ type mapping with cached construction
#[derive(Default)]
pub struct PacketRegistry {
    maps: RwLock<Maps>,
}

impl PacketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a packet type under a hash
    ///
    /// The encode/decode capability and the zero-argument constructor are
    /// enforced by the `Packet + Default` bounds, so an incompatible type
    /// is a compile error rather than a registration failure.
    ///
    /// # Errors
    /// - [`WireError::DuplicateKey`] if `hash` is already registered
    /// - [`WireError::DuplicateType`] if `T` is already registered under
    ///   another hash (the reverse mapping must stay unambiguous)
    pub fn register<T: Packet + Default>(&self, hash: PacketHash) -> Result<()> {
        self.register_with(
            hash,
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            Arc::new(DefaultActivator::<T>::new()),
        )
    }

    /// Register with an explicit activator (the fast-activator boundary)
    ///
    /// The activator is probed once here; if the instance it produces is
    /// not of the declared type, registration fails with
    /// [`WireError::IncompatibleType`] instead of deferring the surprise
    /// to the first decode.
    pub fn register_with(
        &self,
        hash: PacketHash,
        type_id: TypeId,
        type_name: &'static str,
        activator: Arc<dyn Activator>,
    ) -> Result<()> {
        let probe = activator.activate();
        if probe.as_any().type_id() != type_id {
            return Err(WireError::IncompatibleType(format!(
                "activator for {type_name} produced a different type"
            )));
        }

        let mut maps = self.maps.write();
        if maps.by_hash.contains_key(&hash) {
            return Err(WireError::DuplicateKey(hash.to_string()));
        }
        if maps.by_type.contains_key(&type_id) {
            return Err(WireError::DuplicateType(type_name.to_string()));
        }

        maps.by_hash.insert(
            hash,
            Entry {
                type_id,
                type_name,
                activator,
            },
        );
        maps.by_type.insert(type_id, hash);
        tracing::debug!("Registered packet {} as {}", type_name, hash);
        Ok(())
    }

    /// The hash a packet type was registered under
    pub fn hash_of<T: Packet>(&self) -> Result<PacketHash> {
        self.try_hash_of::<T>().ok_or_else(|| {
            WireError::NotRegistered(std::any::type_name::<T>().to_string())
        })
    }

    /// Non-failing variant of [`hash_of`](Self::hash_of)
    pub fn try_hash_of<T: Packet>(&self) -> Option<PacketHash> {
        self.maps.read().by_type.get(&TypeId::of::<T>()).copied()
    }

    /// The hash of a packet instance's concrete type
    pub fn hash_of_packet(&self, packet: &dyn Packet) -> Result<PacketHash> {
        let type_id = packet.as_any().type_id();
        self.maps
            .read()
            .by_type
            .get(&type_id)
            .copied()
            .ok_or_else(|| WireError::NotRegistered(format!("{packet:?}")))
    }

    /// Construct a fresh default-initialized packet for a hash
    pub fn create(&self, hash: PacketHash) -> Result<Box<dyn Packet>> {
        self.try_create(hash)
            .ok_or_else(|| WireError::NotRegistered(hash.to_string()))
    }

    /// Non-failing variant of [`create`](Self::create)
    pub fn try_create(&self, hash: PacketHash) -> Option<Box<dyn Packet>> {
        // Clone the Arc so the activator runs outside the lock
        let activator = {
            let maps = self.maps.read();
            Arc::clone(&maps.by_hash.get(&hash)?.activator)
        };
        Some(activator.activate())
    }

    /// Whether a hash is registered
    pub fn contains(&self, hash: PacketHash) -> bool {
        self.maps.read().by_hash.contains_key(&hash)
    }

    /// The registered type name for a hash, for log lines
    pub fn type_name(&self, hash: PacketHash) -> Option<&'static str> {
        self.maps.read().by_hash.get(&hash).map(|e| e.type_name)
    }

    /// Remove a registration, returning whether it existed
    ///
    /// Provided for symmetry and test isolation; a live endpoint normally
    /// registers once at startup and never removes.
    pub fn unregister(&self, hash: PacketHash) -> bool {
        let mut maps = self.maps.write();
        match maps.by_hash.remove(&hash) {
            Some(entry) => {
                maps.by_type.remove(&entry.type_id);
                tracing::debug!("Unregistered packet {} from {}", entry.type_name, hash);
                true
            }
            None => false,
        }
    }

    /// Number of registered packet types
    pub fn len(&self) -> usize {
        self.maps.read().by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.read().by_hash.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{WireReader, WireWriter};
    use gamewire_core::{Direction, Phase};
    use std::any::Any;

    #[derive(Debug, Default, PartialEq)]
    struct Ping {
        nonce: u32,
    }

    impl Packet for Ping {
        fn encode(&self, writer: &mut WireWriter<'_>) -> Result<()> {
            writer.write_varint(self.nonce)
        }

        fn decode(&mut self, reader: &mut WireReader<'_>) -> Result<()> {
            self.nonce = reader.read_varint()?;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Debug, Default)]
    struct Pong;

    impl Packet for Pong {
        fn encode(&self, _writer: &mut WireWriter<'_>) -> Result<()> {
            Ok(())
        }

        fn decode(&mut self, _reader: &mut WireReader<'_>) -> Result<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn ping_hash() -> PacketHash {
        PacketHash::new(Direction::ServerBound, Phase::Initial, 1).unwrap()
    }

    #[test]
    fn test_register_then_create() {
        let registry = PacketRegistry::new();
        registry.register::<Ping>(ping_hash()).unwrap();

        let packet = registry.create(ping_hash()).unwrap();
        assert!(packet.as_any().is::<Ping>());
    }

    #[test]
    fn test_create_fails_when_direction_differs() {
        let registry = PacketRegistry::new();
        registry.register::<Ping>(ping_hash()).unwrap();

        let other = PacketHash::new(Direction::ClientBound, Phase::Initial, 1).unwrap();
        let err = registry.create(other).unwrap_err();
        assert!(matches!(err, WireError::NotRegistered(_)));
        assert!(registry.try_create(other).is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let registry = PacketRegistry::new();
        registry.register::<Ping>(ping_hash()).unwrap();

        let err = registry.register::<Pong>(ping_hash()).unwrap_err();
        assert!(matches!(err, WireError::DuplicateKey(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let registry = PacketRegistry::new();
        registry.register::<Ping>(ping_hash()).unwrap();

        let second = PacketHash::new(Direction::ServerBound, Phase::Initial, 2).unwrap();
        let err = registry.register::<Ping>(second).unwrap_err();
        assert!(matches!(err, WireError::DuplicateType(_)));
    }

    #[test]
    fn test_hash_lookup_by_type() {
        let registry = PacketRegistry::new();
        registry.register::<Ping>(ping_hash()).unwrap();

        assert_eq!(registry.hash_of::<Ping>().unwrap(), ping_hash());
        assert_eq!(registry.try_hash_of::<Pong>(), None);
        assert!(matches!(
            registry.hash_of::<Pong>().unwrap_err(),
            WireError::NotRegistered(_)
        ));
    }

    #[test]
    fn test_hash_of_packet_instance() {
        let registry = PacketRegistry::new();
        registry.register::<Ping>(ping_hash()).unwrap();

        let packet: Box<dyn Packet> = Box::new(Ping { nonce: 9 });
        assert_eq!(registry.hash_of_packet(packet.as_ref()).unwrap(), ping_hash());
    }

    #[test]
    fn test_incompatible_activator_rejected_at_registration() {
        struct WrongActivator;
        impl Activator for WrongActivator {
            fn activate(&self) -> Box<dyn Packet> {
                Box::new(Pong)
            }
        }

        let registry = PacketRegistry::new();
        let err = registry
            .register_with(
                ping_hash(),
                TypeId::of::<Ping>(),
                "Ping",
                Arc::new(WrongActivator),
            )
            .unwrap_err();
        assert!(matches!(err, WireError::IncompatibleType(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_clears_both_directions() {
        let registry = PacketRegistry::new();
        registry.register::<Ping>(ping_hash()).unwrap();

        assert!(registry.unregister(ping_hash()));
        assert!(!registry.unregister(ping_hash()));
        assert!(registry.try_create(ping_hash()).is_none());
        assert_eq!(registry.try_hash_of::<Ping>(), None);

        // The slot is reusable afterwards
        registry.register::<Ping>(ping_hash()).unwrap();
    }

    #[test]
    fn test_concurrent_register_and_lookup() {
        let registry = Arc::new(PacketRegistry::new());

        let writer = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                registry.register::<Ping>(ping_hash()).unwrap();
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    // Either view is fine, but the two maps must agree
                    for _ in 0..1000 {
                        let created = registry.try_create(ping_hash()).is_some();
                        let mapped = registry.try_hash_of::<Ping>().is_some();
                        if mapped {
                            // Reverse mapping visible implies forward visible
                            assert!(registry.contains(ping_hash()));
                        }
                        if created {
                            break;
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert!(registry.contains(ping_hash()));
    }
}
