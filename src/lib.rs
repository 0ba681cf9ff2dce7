//! Dragon stream cipher.
//!
//! A word-based nonlinear feedback shift register design: a 128-bit key and
//! a 128-bit IV prime a 32-word circular register, which is then clocked to
//! emit 8-byte keystream blocks XORed with plaintext or ciphertext.
//!
//! This implementation is compatible with the `cipher` crate traits. Its
//! structure separates the core state machine from the trait plumbing, with
//! a buffered [`Dragon`] session type on top for byte-at-a-time streaming,
//! passphrase-derived keying and IV re-keying.
//!
//! # Examples
//!
//! ```
//! use dragon::Dragon;
//!
//! let key = [0x11; 16];
//! let iv = [0x22; 16];
//!
//! let mut encrypt = Dragon::new(&key, &iv).unwrap();
//! let ciphertext = encrypt.process_bytes(b"attack at dawn");
//!
//! let mut decrypt = Dragon::new(&key, &iv).unwrap();
//! assert_eq!(decrypt.process_bytes(&ciphertext), b"attack at dawn");
//! ```
//!
//! Keys and IVs can also be derived from passphrases:
//!
//! ```
//! use dragon::Dragon;
//!
//! let mut session = Dragon::from_passphrases("my key phrase", "my iv phrase");
//! let ciphertext = session.process_bytes(b"hello");
//! ```

#![no_std]

extern crate alloc;

pub use cipher; // Re-export cipher crate for downstream users

// --- Core Cipher Logic ---

pub(crate) mod core;
pub(crate) mod sbox;
pub(crate) mod update;

// --- Software Backend ---
pub(crate) mod backends;

// --- Session Layer ---
pub(crate) mod error;
pub(crate) mod passphrase;
pub(crate) mod stream;

// --- Constants ---

/// Size of the NLFSR in 32-bit words. A power of two, so circular
/// addressing reduces to a mask.
pub const NLFSR_WORDS: usize = 32;

/// Keystream bytes emitted per round.
pub const BLOCK_BYTES: usize = 8;

/// Raw key material size in bytes. 128-bit keys are the only supported size.
pub const KEY_BYTES: usize = 16;

/// Raw IV material size in bytes.
pub const IV_BYTES: usize = 16;

/// Number of mixing stages run while scheduling an IV.
pub(crate) const MIXING_STAGES: usize = 16;

/// Initial values of the two carry words threaded through the mixing
/// stages and packed into the round counter afterwards.
pub(crate) const INITIAL_E: u32 = 0x0000_4472;
pub(crate) const INITIAL_F: u32 = 0x6167_6F6E;

// --- Public API ---

pub use crate::core::DragonCore;
pub use crate::error::DragonError;
pub use crate::passphrase::derive_key_or_iv;
pub use crate::stream::Dragon;

/// The Dragon cipher behind the standard `cipher` stream traits.
pub type DragonStream = cipher::StreamCipherCoreWrapper<DragonCore>;
