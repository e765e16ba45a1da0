//! Checked handles for callers that cannot hold a `ChaCha20Rng` by value.
//!
//! A [`Registry`] owns every generator it creates and hands out opaque
//! [`Handle`]s. Using a handle after [`Registry::release`] is reported as
//! [`Error::InvalidHandle`] instead of reading freed state.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU64;

use crate::error::Error;
use crate::rng::ChaCha20Rng;

/// Opaque generator handle. Ids are never reused within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(NonZeroU64);

impl Handle {
    pub fn id(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    issued: u64,
    live: HashMap<u64, ChaCha20Rng>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator for `seed` and returns its handle. Always succeeds.
    pub fn create(&mut self, seed: i64) -> Handle {
        self.insert(ChaCha20Rng::from_i64(seed))
    }

    /// Takes ownership of an existing generator.
    pub fn insert(&mut self, rng: ChaCha20Rng) -> Handle {
        let handle = Handle(NonZeroU64::MIN.saturating_add(self.issued));
        self.issued += 1;
        self.live.insert(handle.id(), rng);
        log::debug!("created generator {}", handle);
        handle
    }

    pub fn next_u32(&mut self, handle: Handle) -> Result<u32, Error> {
        Ok(self.get_mut(handle)?.next_u32())
    }

    pub fn next_u64(&mut self, handle: Handle) -> Result<u64, Error> {
        Ok(self.get_mut(handle)?.next_u64())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut ChaCha20Rng, Error> {
        self.live
            .get_mut(&handle.id())
            .ok_or(Error::InvalidHandle(handle.id()))
    }

    /// Drops the generator behind `handle`. A second release of the same
    /// handle is an error.
    pub fn release(&mut self, handle: Handle) -> Result<(), Error> {
        match self.live.remove(&handle.id()) {
            Some(rng) => {
                rng.release();
                log::debug!("released generator {}", handle);
                Ok(())
            }
            None => {
                log::warn!("release of unknown generator {}", handle);
                Err(Error::InvalidHandle(handle.id()))
            }
        }
    }

    /// Removes the generator from the registry and returns it by value.
    pub fn detach(&mut self, handle: Handle) -> Result<ChaCha20Rng, Error> {
        self.live
            .remove(&handle.id())
            .ok_or(Error::InvalidHandle(handle.id()))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_draws_match_owned_generator() {
        let mut registry = Registry::new();
        let handle = registry.create(0);
        let mut owned = ChaCha20Rng::from_i64(0);

        assert_eq!(registry.next_u32(handle).unwrap(), 0x81f5f7b2);
        owned.next_u32();
        for _ in 0..20 {
            assert_eq!(registry.next_u64(handle).unwrap(), owned.next_u64());
            assert_eq!(registry.next_u32(handle).unwrap(), owned.next_u32());
        }
    }

    #[test]
    fn test_handles_are_independent() {
        let mut registry = Registry::new();
        let a = registry.create(1);
        let b = registry.create(1);
        assert_ne!(a, b);

        let first = registry.next_u32(a).unwrap();
        registry.next_u32(a).unwrap();
        assert_eq!(registry.next_u32(b).unwrap(), first);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_use_after_release_is_rejected() {
        let mut registry = Registry::new();
        let handle = registry.create(5);
        registry.release(handle).unwrap();

        assert!(matches!(
            registry.next_u32(handle),
            Err(Error::InvalidHandle(id)) if id == handle.id()
        ));
        assert!(matches!(registry.next_u64(handle), Err(Error::InvalidHandle(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_double_release_is_rejected() {
        let mut registry = Registry::new();
        let handle = registry.create(-3);
        assert!(registry.release(handle).is_ok());
        assert!(matches!(registry.release(handle), Err(Error::InvalidHandle(_))));
    }

    #[test]
    fn test_ids_not_reused() {
        let mut registry = Registry::new();
        let first = registry.create(0);
        registry.release(first).unwrap();
        let second = registry.create(0);
        assert_ne!(first, second);
        assert!(registry.next_u32(first).is_err());
        assert!(registry.next_u32(second).is_ok());
    }

    #[test]
    fn test_never_issued_id_is_rejected() {
        let mut issuing = Registry::new();
        let mut other = Registry::new();
        issuing.create(0);
        issuing.create(0);
        let stray = issuing.create(0);
        other.create(0);
        assert!(matches!(other.next_u32(stray), Err(Error::InvalidHandle(3))));
    }

    #[test]
    fn test_detach_hands_back_state() {
        let mut registry = Registry::new();
        let handle = registry.create(9);
        registry.next_u64(handle).unwrap();

        let mut rng = registry.detach(handle).unwrap();
        assert_eq!(rng.get_word_pos(), 2);
        assert!(registry.next_u32(handle).is_err());

        let mut fresh = ChaCha20Rng::from_i64(9);
        fresh.next_u64();
        assert_eq!(rng.next_u32(), fresh.next_u32());
    }

    #[test]
    fn test_handle_display() {
        let mut registry = Registry::new();
        let handle = registry.create(0);
        assert_eq!(handle.to_string(), "#1");
    }
}
