//! The seeded ChaCha20 generator.
//!
//! The generator reads one continuous keystream: block 0, block 1, ... of
//! ChaCha20 under a fixed key with stream id 0. Draws slice consecutive bytes
//! off that stream, so the value returned by any call depends only on the key
//! and on how many bytes were consumed before it.

use std::fmt;
use std::sync::atomic::{fence, Ordering};

use crate::block::{chacha20_block, input_state, key_words, BLOCK_LEN};
use crate::seed::{self, SEED_LEN};

/// Stream id (words 14 and 15 of the input matrix). Never varies.
const STREAM: u64 = 0;

/// Byte positions live in a 70-bit space: 64-bit block counter, 6-bit offset.
const BYTE_POS_MASK: u128 = (1 << 70) - 1;

/// Word positions live in a 68-bit space.
const WORD_POS_MASK: u128 = (1 << 68) - 1;

#[derive(Clone)]
pub struct ChaCha20Rng {
    key: [u32; 8],
    /// Index of the next block to generate.
    counter: u64,
    buffer: [u8; BLOCK_LEN],
    /// Bytes of `buffer` already handed out; `BLOCK_LEN` means exhausted.
    offset: usize,
}

impl ChaCha20Rng {
    /// Creates a generator keyed directly with 32 bytes.
    pub fn new(key: [u8; SEED_LEN]) -> Self {
        Self {
            key: key_words(&key),
            counter: 0,
            buffer: [0u8; BLOCK_LEN],
            offset: BLOCK_LEN,
        }
    }

    /// Creates a generator from a signed 64-bit seed. Any value is accepted.
    pub fn from_i64(seed: i64) -> Self {
        Self::new(seed::expand_i64(seed))
    }

    pub fn from_u64(seed: u64) -> Self {
        Self::new(seed::expand_u64(seed))
    }

    pub fn from_phrase(phrase: &str) -> Self {
        Self::new(seed::derive_from_phrase(phrase))
    }

    /// Returns the 32-byte key this generator was created with.
    pub fn get_seed(&self) -> [u8; SEED_LEN] {
        let mut key = [0u8; SEED_LEN];
        for (chunk, word) in key.chunks_exact_mut(4).zip(&self.key) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        key
    }

    /// Next 4 keystream bytes as a little-endian `u32`.
    pub fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    /// Next 8 keystream bytes as a little-endian `u64`; the low half comes
    /// from the earlier 4 bytes.
    pub fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take())
    }

    /// Copies the next `dest.len()` keystream bytes into `dest`.
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut filled = 0;
        while filled < dest.len() {
            if self.offset == BLOCK_LEN {
                self.refill();
            }
            let n = (BLOCK_LEN - self.offset).min(dest.len() - filled);
            dest[filled..filled + n].copy_from_slice(&self.buffer[self.offset..self.offset + n]);
            self.offset += n;
            filled += n;
        }
    }

    /// Consumes the generator. Its key material is wiped on drop.
    pub fn release(self) {
        log::trace!("releasing generator at byte {}", self.get_byte_pos());
    }

    /// Position of the next unread byte in the keystream.
    pub fn get_byte_pos(&self) -> u128 {
        ((self.counter as u128) << 6)
            .wrapping_add(self.offset as u128)
            .wrapping_sub(BLOCK_LEN as u128)
            & BYTE_POS_MASK
    }

    /// Position of the next unread 32-bit word. Rounds down if a byte draw
    /// left the stream unaligned.
    pub fn get_word_pos(&self) -> u128 {
        self.get_byte_pos() >> 2
    }

    /// Seeks to word `pos` (modulo 2^68). The next draw starts there.
    pub fn set_word_pos(&mut self, pos: u128) {
        let byte_pos = (pos & WORD_POS_MASK) << 2;
        let block = (byte_pos >> 6) as u64;
        let offset = (byte_pos & (BLOCK_LEN as u128 - 1)) as usize;

        log::debug!("seeking to word {} (block {}, offset {})", pos & WORD_POS_MASK, block, offset);

        self.counter = block;
        if offset == 0 {
            self.offset = BLOCK_LEN;
        } else {
            self.refill();
            self.offset = offset;
        }
    }

    /// Index of the next block the generator will produce.
    pub fn block_counter(&self) -> u64 {
        self.counter
    }

    fn refill(&mut self) {
        self.buffer = chacha20_block(&input_state(&self.key, self.counter, STREAM));
        self.counter = self.counter.wrapping_add(1);
        self.offset = 0;
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        if BLOCK_LEN - self.offset >= N {
            out.copy_from_slice(&self.buffer[self.offset..self.offset + N]);
            self.offset += N;
        } else {
            self.fill_bytes(&mut out);
        }
        out
    }
}

impl Drop for ChaCha20Rng {
    fn drop(&mut self) {
        for word in self.key.iter_mut() {
            // SAFETY: pointer is valid and aligned (derived from a live mutable ref).
            unsafe { core::ptr::write_volatile(word, 0) };
        }
        for byte in self.buffer.iter_mut() {
            // SAFETY: as above.
            unsafe { core::ptr::write_volatile(byte, 0) };
        }
        fence(Ordering::SeqCst);
    }
}

impl fmt::Debug for ChaCha20Rng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaCha20Rng")
            .field("counter", &self.counter)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl rand_core::RngCore for ChaCha20Rng {
    fn next_u32(&mut self) -> u32 {
        ChaCha20Rng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        ChaCha20Rng::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        ChaCha20Rng::fill_bytes(self, dest)
    }
}

impl rand_core::SeedableRng for ChaCha20Rng {
    type Seed = [u8; SEED_LEN];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(seed)
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::from_u64(state)
    }
}
