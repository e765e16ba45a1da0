//! ChaCha20 block function (RFC 8439 §2.3).
//!
//! The function is pure: it maps a 16-word input matrix to one 64-byte
//! keystream block and touches no shared state.

/// Size in bytes of one keystream block.
pub const BLOCK_LEN: usize = 64;

/// "expand 32-byte k" as little-endian words.
pub const CONSTANTS: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

#[inline(always)]
fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] = (state[d] ^ state[a]).rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] = (state[d] ^ state[a]).rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_left(7);
}

/// Builds the input matrix for block `counter` of `stream` under `key`.
///
/// Words 12 and 13 hold the 64-bit block counter, words 14 and 15 the 64-bit
/// stream id. With `stream == 0` and `counter < 2^32` this is the RFC 8439
/// layout with an all-zero 96-bit nonce.
pub fn input_state(key: &[u32; 8], counter: u64, stream: u64) -> [u32; 16] {
    let mut state = [0u32; 16];
    state[..4].copy_from_slice(&CONSTANTS);
    state[4..12].copy_from_slice(key);
    state[12] = counter as u32;
    state[13] = (counter >> 32) as u32;
    state[14] = stream as u32;
    state[15] = (stream >> 32) as u32;
    state
}

/// Runs 20 rounds over `input`, adds the input back in and serializes the
/// result little-endian.
pub fn chacha20_block(input: &[u32; 16]) -> [u8; BLOCK_LEN] {
    let mut state = *input;

    for _ in 0..10 {
        // columns
        quarter_round(&mut state, 0, 4, 8, 12);
        quarter_round(&mut state, 1, 5, 9, 13);
        quarter_round(&mut state, 2, 6, 10, 14);
        quarter_round(&mut state, 3, 7, 11, 15);
        // diagonals
        quarter_round(&mut state, 0, 5, 10, 15);
        quarter_round(&mut state, 1, 6, 11, 12);
        quarter_round(&mut state, 2, 7, 8, 13);
        quarter_round(&mut state, 3, 4, 9, 14);
    }

    let mut out = [0u8; BLOCK_LEN];
    for ((chunk, word), orig) in out.chunks_exact_mut(4).zip(&state).zip(input) {
        chunk.copy_from_slice(&word.wrapping_add(*orig).to_le_bytes());
    }
    out
}

/// Decodes 32 key bytes into little-endian words.
pub fn key_words(key: &[u8; 32]) -> [u32; 8] {
    let mut words = [0u32; 8];
    for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}
