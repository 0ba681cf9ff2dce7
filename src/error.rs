//! Error types for the Dragon cipher.

use thiserror::Error;

/// Errors raised while validating key/IV material or buffer sizes.
///
/// All of these occur at setup time, before any mixing or keystream
/// generation; once a session is validly constructed, processing bytes
/// cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DragonError {
    /// Raw key material must be exactly 16 bytes (128 bits).
    #[error("key must be 16 bytes, got {0}")]
    InvalidKeySize(usize),

    /// Raw IV material must be exactly 16 bytes (128 bits).
    #[error("IV must be 16 bytes, got {0}")]
    InvalidIvSize(usize),

    /// A caller-provided output buffer must match the input length.
    #[error("output buffer is {output} bytes but input is {input}")]
    LengthMismatch {
        /// Input length in bytes.
        input: usize,
        /// Output buffer length in bytes.
        output: usize,
    },
}
