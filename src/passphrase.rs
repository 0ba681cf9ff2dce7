//! Passphrase-to-key-material derivation.

use crate::KEY_BYTES;

/// Number of distinct printable non-space ASCII characters (`0x21..=0x7E`);
/// the base of the positional accumulation.
const RADIX: u32 = 0x7E - 0x21 + 1;

const LIMBS: usize = 8;

/// Folds an arbitrary passphrase into 16 bytes of key or IV material.
///
/// The whole string is accumulated into eight 16-bit limbs as a base-94
/// positional number: each character's code point is added at the least
/// significant limb and carries propagate upward. The limbs are then packed
/// big-endian. Deterministic and total, and used identically for keys and
/// IVs; note this is an ad hoc folding scheme, not a hardened key-derivation
/// function.
pub fn derive_key_or_iv(passphrase: &str) -> [u8; KEY_BYTES] {
    let mut limbs = [0u32; LIMBS];
    for ch in passphrase.chars() {
        let mut carry = ch as u32;
        for limb in limbs.iter_mut().rev() {
            carry += *limb * RADIX;
            *limb = carry & 0xFFFF;
            carry >>= 16;
        }
    }

    let mut material = [0u8; KEY_BYTES];
    for (bytes, limb) in material.chunks_exact_mut(2).zip(limbs) {
        bytes[0] = (limb >> 8) as u8;
        bytes[1] = limb as u8;
    }
    material
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_passphrase_is_all_zero() {
        assert_eq!(derive_key_or_iv(""), [0u8; 16]);
    }

    #[test]
    fn single_character_lands_in_last_limb() {
        let mut expected = [0u8; 16];
        expected[15] = b'A';
        assert_eq!(derive_key_or_iv("A"), expected);
    }

    #[test]
    fn frozen_derivations() {
        assert_eq!(
            derive_key_or_iv("testkey"),
            [
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x49, 0x76, 0xF1,
                0xE9, 0x82, 0xAB
            ]
        );
        assert_eq!(
            derive_key_or_iv("testvector"),
            [
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0xA3, 0x11, 0xB1, 0x4F, 0x34,
                0x16, 0xA7, 0x7C
            ]
        );
        assert_eq!(
            derive_key_or_iv("dragon"),
            [
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xAC, 0xF7,
                0x75, 0x80, 0x64
            ]
        );
    }

    #[test]
    fn deterministic_and_typically_distinct() {
        assert_eq!(derive_key_or_iv("hunter2"), derive_key_or_iv("hunter2"));
        assert_ne!(derive_key_or_iv("hunter2"), derive_key_or_iv("hunter3"));
    }
}
