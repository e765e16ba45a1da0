//! Deterministic ChaCha20 random number generator.
//!
//! A generator created from a 64-bit seed always produces the same sequence of
//! values, on every platform:
//!
//! ```
//! use chacharng::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::from_i64(0);
//! assert_eq!(rng.next_u32(), 0x81f5f7b2);
//! let _wide = rng.next_u64();
//! rng.release();
//! ```

pub mod block;
pub mod error;
pub mod handle;
pub mod rng;
pub mod seed;

pub use error::Error;
pub use handle::{Handle, Registry};
pub use rng::ChaCha20Rng;
