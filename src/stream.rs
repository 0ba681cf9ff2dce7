//! Buffered byte-stream driver over the cipher core.

use crate::core::DragonCore;
use crate::error::DragonError;
use crate::passphrase::derive_key_or_iv;
use crate::{BLOCK_BYTES, IV_BYTES, KEY_BYTES};
use alloc::vec::Vec;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A Dragon cipher session.
///
/// Owns a primed [`DragonCore`] plus the cursor into the most recently
/// generated 8-byte keystream block. Bytes are served from the current block
/// until it is exhausted, then the core is clocked for the next one. The
/// same `process_bytes` call encrypts and decrypts.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct Dragon {
    core: DragonCore,
    block: [u8; BLOCK_BYTES],
    pos: usize,
}

impl Dragon {
    /// Builds a session from raw key and IV material.
    ///
    /// Both must be exactly 16 bytes; any other length is rejected before
    /// any scheduling happens.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, DragonError> {
        let key: &[u8; KEY_BYTES] = key
            .try_into()
            .map_err(|_| DragonError::InvalidKeySize(key.len()))?;
        let iv: &[u8; IV_BYTES] = iv
            .try_into()
            .map_err(|_| DragonError::InvalidIvSize(iv.len()))?;
        Ok(Self::from_core(DragonCore::from_key_iv(key, iv)))
    }

    /// Builds a session by deriving both key and IV material from
    /// passphrases via [`derive_key_or_iv`]. Total; derivation always
    /// yields 16 bytes.
    pub fn from_passphrases(key: &str, iv: &str) -> Self {
        Self::from_core(DragonCore::from_key_iv(
            &derive_key_or_iv(key),
            &derive_key_or_iv(iv),
        ))
    }

    fn from_core(core: DragonCore) -> Self {
        Self {
            core,
            block: [0; BLOCK_BYTES],
            pos: BLOCK_BYTES,
        }
    }

    /// Applies a new IV to the already-scheduled key.
    ///
    /// The register is restored from the post-key-schedule snapshot before
    /// the new IV is mixed in, so the session ends up identical to a fresh
    /// one built from the same key and this IV. Any buffered keystream from
    /// the previous IV is discarded.
    pub fn rekey_iv(&mut self, iv: &[u8]) -> Result<(), DragonError> {
        let iv: &[u8; IV_BYTES] = iv
            .try_into()
            .map_err(|_| DragonError::InvalidIvSize(iv.len()))?;
        self.core.schedule_iv(iv);
        self.block = [0; BLOCK_BYTES];
        self.pos = BLOCK_BYTES;
        Ok(())
    }

    /// Scheduled key size in bits.
    pub fn key_bits(&self) -> u32 {
        self.core.key_bits()
    }

    /// Fills `out` with raw keystream bytes.
    pub fn keystream_bytes(&mut self, out: &mut [u8]) {
        for byte in out.iter_mut() {
            *byte = self.next_keystream_byte();
        }
    }

    /// XORs the keystream into `input` and returns the transformed bytes.
    ///
    /// Output length always equals input length. Running ciphertext through
    /// a session re-derived from the same key and IV recovers the plaintext.
    pub fn process_bytes(&mut self, input: &[u8]) -> Vec<u8> {
        input
            .iter()
            .map(|&byte| byte ^ self.next_keystream_byte())
            .collect()
    }

    /// Like [`Dragon::process_bytes`], writing into a caller-provided
    /// buffer. Fails if `output` is not the same length as `input`.
    pub fn process_bytes_into(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(), DragonError> {
        if input.len() != output.len() {
            return Err(DragonError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        for (dst, &src) in output.iter_mut().zip(input) {
            *dst = src ^ self.next_keystream_byte();
        }
        Ok(())
    }

    #[inline]
    fn next_keystream_byte(&mut self) -> u8 {
        if self.pos == BLOCK_BYTES {
            self.block = self.core.clock();
            self.pos = 0;
        }
        let byte = self.block[self.pos];
        self.pos += 1;
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 16] = [0xA5; 16];
    const IV: [u8; 16] = [0x5A; 16];

    #[test]
    fn cursor_survives_split_reads() {
        // 5 + 3 bytes must equal one 8-byte read: the cursor serves the
        // whole block before clocking again.
        let mut split = Dragon::new(&KEY, &IV).unwrap();
        let mut head = [0u8; 5];
        let mut tail = [0u8; 3];
        split.keystream_bytes(&mut head);
        split.keystream_bytes(&mut tail);

        let mut whole = Dragon::new(&KEY, &IV).unwrap();
        let mut all = [0u8; 8];
        whole.keystream_bytes(&mut all);

        assert_eq!(all[..5], head[..]);
        assert_eq!(all[5..], tail[..]);
    }

    #[test]
    fn process_is_keystream_xor() {
        let mut ks_session = Dragon::new(&KEY, &IV).unwrap();
        let mut ks = [0u8; 24];
        ks_session.keystream_bytes(&mut ks);

        let plaintext = *b"twenty-four byte message";
        let mut enc_session = Dragon::new(&KEY, &IV).unwrap();
        let ciphertext = enc_session.process_bytes(&plaintext);
        for ((&ct, &pt), &k) in ciphertext.iter().zip(&plaintext).zip(&ks) {
            assert_eq!(ct, pt ^ k);
        }
    }

    #[test]
    fn process_bytes_into_checks_length() {
        let mut session = Dragon::new(&KEY, &IV).unwrap();
        let mut short = [0u8; 4];
        assert_eq!(
            session.process_bytes_into(b"hello", &mut short),
            Err(DragonError::LengthMismatch {
                input: 5,
                output: 4
            })
        );

        let mut exact = [0u8; 5];
        session.process_bytes_into(b"hello", &mut exact).unwrap();
        let mut reference = Dragon::new(&KEY, &IV).unwrap();
        assert_eq!(reference.process_bytes(b"hello"), exact);
    }

    #[test]
    fn rekey_discards_buffered_keystream() {
        let iv2 = [0x77; 16];

        let mut session = Dragon::new(&KEY, &IV).unwrap();
        let mut partial = [0u8; 3]; // leave 5 bytes buffered
        session.keystream_bytes(&mut partial);
        session.rekey_iv(&iv2).unwrap();

        let mut fresh = Dragon::new(&KEY, &iv2).unwrap();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        session.keystream_bytes(&mut a);
        fresh.keystream_bytes(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_sizes_are_rejected_before_setup() {
        assert_eq!(
            Dragon::new(&[0; 15], &IV).unwrap_err(),
            DragonError::InvalidKeySize(15)
        );
        assert_eq!(
            Dragon::new(&[0; 17], &IV).unwrap_err(),
            DragonError::InvalidKeySize(17)
        );
        assert_eq!(
            Dragon::new(&KEY, &[0; 15]).unwrap_err(),
            DragonError::InvalidIvSize(15)
        );
        let mut session = Dragon::new(&KEY, &IV).unwrap();
        assert_eq!(
            session.rekey_iv(&[0; 17]).unwrap_err(),
            DragonError::InvalidIvSize(17)
        );
    }

    #[test]
    fn passphrase_sessions_are_deterministic() {
        let mut one = Dragon::from_passphrases("alpha", "beta");
        let mut two = Dragon::from_passphrases("alpha", "beta");
        assert_eq!(one.process_bytes(b"payload"), two.process_bytes(b"payload"));
        assert_eq!(one.key_bits(), 128);
    }
}
