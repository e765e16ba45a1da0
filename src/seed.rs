//! Seed expansion into the 256-bit generator key.
//!
//! Every function here is part of the output contract: changing any of them
//! changes every value a seeded generator produces.

use blake2::{
    digest::{consts::U32, Digest},
    Blake2b,
};

use crate::error::Error;

type Blake2b256 = Blake2b<U32>;

/// Key length in bytes.
pub const SEED_LEN: usize = 32;

const PCG_MUL: u64 = 6364136223846793005;
const PCG_INC: u64 = 11634580027462260723;

const PHRASE_DOMAIN: &[u8] = b"chacharng-seed-v1";

/// Expands a 64-bit seed into a key with PCG32 (XSH RR), one output word per
/// four key bytes. This is the expansion `rand_core::SeedableRng::seed_from_u64`
/// uses, so keys agree with generators seeded through `rand_chacha`.
pub fn expand_u64(mut state: u64) -> [u8; SEED_LEN] {
    let mut key = [0u8; SEED_LEN];
    for chunk in key.chunks_exact_mut(4) {
        // State advances before each output word.
        state = state.wrapping_mul(PCG_MUL).wrapping_add(PCG_INC);
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        chunk.copy_from_slice(&xorshifted.rotate_right(rot).to_le_bytes());
    }
    key
}

/// Signed seeds are reinterpreted as their two's complement bit pattern.
pub fn expand_i64(seed: i64) -> [u8; SEED_LEN] {
    expand_u64(seed as u64)
}

/// Derives a key from a text phrase through BLAKE2b-256 with a domain tag and
/// a length prefix.
pub fn derive_from_phrase(phrase: &str) -> [u8; SEED_LEN] {
    let mut hasher = Blake2b256::new();
    hasher.update(PHRASE_DOMAIN);
    hasher.update((phrase.len() as u64).to_le_bytes());
    hasher.update(phrase.as_bytes());

    let mut key = [0u8; SEED_LEN];
    key.copy_from_slice(&hasher.finalize());
    key
}

/// Parses a key given as 64 hex characters.
pub fn parse_hex(text: &str) -> Result<[u8; SEED_LEN], Error> {
    let bytes = hex::decode(text.trim())
        .map_err(|e| Error::InvalidSeed(format!("not valid hex: {}", e)))?;
    bytes.as_slice().try_into().map_err(|_| {
        Error::InvalidSeed(format!(
            "expected {} bytes, got {}",
            SEED_LEN,
            bytes.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    #[test]
    fn test_expand_zero_golden() {
        assert_eq!(
            hex::encode(expand_u64(0)),
            "ecf273f981b5cd4587f0467306ad6cadd0d0a3e33317e767f29bea72d78a7dfe"
        );
    }

    #[test]
    fn test_negative_seed_is_bit_pattern() {
        assert_eq!(expand_i64(-1), expand_u64(u64::MAX));
        assert_eq!(
            hex::encode(expand_i64(-1)),
            "2f4792e3d610281035542d952cf95e439ae9347b03ddc537637ac7b04320613e"
        );
    }

    #[test]
    fn test_matches_rand_core_expansion() {
        for seed in [0u64, 1, 42, 0xdead_beef, u64::MAX, 1 << 63] {
            let reference = rand_chacha::ChaCha20Rng::seed_from_u64(seed).get_seed();
            assert_eq!(expand_u64(seed), reference, "seed {}", seed);
        }
    }

    #[test]
    fn test_phrase_golden() {
        assert_eq!(
            hex::encode(derive_from_phrase("correct horse battery staple")),
            "d28d3a3beab7cc4b1f01c0ce6df854b4be20fa297f6a26827cb1754257c91bd5"
        );
    }

    #[test]
    fn test_phrases_differ() {
        assert_ne!(derive_from_phrase("a"), derive_from_phrase("b"));
        assert_ne!(derive_from_phrase(""), derive_from_phrase(" "));
    }

    #[test]
    fn test_parse_hex() {
        let text = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
        let key = parse_hex(text).unwrap();
        assert_eq!(key[0], 0);
        assert_eq!(key[31], 0x1f);
        assert!(parse_hex(&format!("  {}\n", text)).is_ok());
    }

    #[test]
    fn test_parse_hex_rejects_bad_input() {
        assert!(matches!(parse_hex("zz"), Err(Error::InvalidSeed(_))));
        assert!(matches!(parse_hex("0011"), Err(Error::InvalidSeed(_))));
    }
}
