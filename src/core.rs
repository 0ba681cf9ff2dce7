use crate::update::update;
use crate::{backends, INITIAL_E, INITIAL_F, IV_BYTES, KEY_BYTES, MIXING_STAGES, NLFSR_WORDS};
use cipher::{BlockSizeUser, Iv, IvSizeUser, Key, KeyIvInit, KeySizeUser, StreamCipherCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The core state for the Dragon cipher.
///
/// The NLFSR and the 64-bit counter comprise the cipher state. Register
/// shifting is modelled by moving `offset`, the logical origin of the
/// circular buffer, instead of copying words around. The post-key-schedule
/// register is kept in `snapshot` so that a later IV can be applied to the
/// same key without rerunning the key schedule.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct DragonCore {
    register: [u32; NLFSR_WORDS],
    /// Logical rotation pointer. Only the low 5 bits are significant, so
    /// wrapping arithmetic is harmless.
    offset: u32,
    counter: u64,
    snapshot: [u32; NLFSR_WORDS],
    fresh_key: bool,
    key_bits: u32,
}

impl DragonCore {
    /// Schedules `key` and `iv` into a primed core, ready to emit keystream.
    pub fn from_key_iv(key: &[u8; KEY_BYTES], iv: &[u8; IV_BYTES]) -> Self {
        let mut core = Self {
            register: [0; NLFSR_WORDS],
            offset: 0,
            counter: 0,
            snapshot: [0; NLFSR_WORDS],
            fresh_key: false,
            key_bits: 0,
        };
        core.schedule_key(key);
        core.schedule_iv(iv);
        core
    }

    /// Scheduled key size in bits.
    pub fn key_bits(&self) -> u32 {
        self.key_bits
    }

    /// Retrieves the ith 32-bit word of the NLFSR.
    #[inline(always)]
    fn word_at(&self, i: usize) -> u32 {
        self.register[(self.offset.wrapping_add(i as u32) & (NLFSR_WORDS as u32 - 1)) as usize]
    }

    /// Sets the ith 32-bit word of the NLFSR.
    #[inline(always)]
    fn set_word_at(&mut self, i: usize, val: u32) {
        self.register[(self.offset.wrapping_add(i as u32) & (NLFSR_WORDS as u32 - 1)) as usize] =
            val;
    }

    #[inline(always)]
    fn xor_word_at(&mut self, i: usize, val: u32) {
        let merged = self.word_at(i) ^ val;
        self.set_word_at(i, merged);
    }

    /// Lays key bytes out into the register.
    ///
    /// Each of the two key halves is copied into three mirrored groups of
    /// register slots; each register word is seeded from a single key byte.
    /// The remaining slots are populated by the IV schedule. No mixing
    /// happens here; the register is snapshotted as-is for later re-keying.
    pub(crate) fn schedule_key(&mut self, key: &[u8; KEY_BYTES]) {
        self.register = [0; NLFSR_WORDS];
        self.offset = 0;
        self.counter = 0;
        self.key_bits = (KEY_BYTES * 8) as u32;

        for idx in 0..4 {
            let word = u32::from(key[idx * 4]);
            self.set_word_at(idx, word);
            self.set_word_at(12 + idx, word);
            self.set_word_at(20 + idx, word);
        }
        for idx in 0..2 {
            let word = u32::from(key[8 + idx * 4]);
            self.set_word_at(4 + idx, word);
            self.set_word_at(16 + idx, word);
            self.set_word_at(28 + idx, word);

            let word = u32::from(key[idx * 4]);
            self.set_word_at(6 + idx, word);
            self.set_word_at(18 + idx, word);
            self.set_word_at(30 + idx, word);
        }

        self.snapshot = self.register;
        self.fresh_key = true;
    }

    /// Lays IV bytes out into the register and runs the mixing stages.
    ///
    /// On a second or later IV for the same key, the register is first
    /// restored from the post-key-schedule snapshot (taken at offset 0),
    /// which makes re-keying equivalent to a fresh session. IV words land
    /// directly in the slots the key schedule left untouched and are
    /// XOR-merged into the slots it populated, entangling key and IV
    /// material before diffusion.
    pub(crate) fn schedule_iv(&mut self, iv: &[u8; IV_BYTES]) {
        if !self.fresh_key {
            self.register = self.snapshot;
            self.offset = 0;
        }

        for idx in 0..4 {
            let word = u32::from(iv[idx * 4]);
            self.set_word_at(8 + idx, word);
            self.xor_word_at(20 + idx, word);
            self.xor_word_at(28 + idx, word);
        }
        for idx in 0..2 {
            let word = u32::from(iv[8 + idx * 4]);
            self.xor_word_at(4 + idx, word);
            self.xor_word_at(12 + idx, word);
            self.set_word_at(24 + idx, word);

            let word = u32::from(iv[idx * 4]);
            self.xor_word_at(6 + idx, word);
            self.xor_word_at(14 + idx, word);
            self.set_word_at(26 + idx, word);
        }

        let mut e = INITIAL_E;
        let mut f = INITIAL_F;
        for _ in 0..MIXING_STAGES {
            let mut words = [
                self.word_at(0) ^ self.word_at(24) ^ self.word_at(28),
                self.word_at(1) ^ self.word_at(25) ^ self.word_at(29),
                self.word_at(2) ^ self.word_at(26) ^ self.word_at(30),
                self.word_at(3) ^ self.word_at(27) ^ self.word_at(31),
                e,
                f,
            ];
            update(&mut words);

            // Shift the register by four, leaving room at the front.
            self.offset = self.offset.wrapping_add(NLFSR_WORDS as u32 - 4);

            self.set_word_at(0, words[0] ^ self.word_at(20));
            self.set_word_at(1, words[1] ^ self.word_at(21));
            self.set_word_at(2, words[2] ^ self.word_at(22));
            self.set_word_at(3, words[3] ^ self.word_at(23));

            e = words[4];
            f = words[5];
        }

        self.counter = (u64::from(e) << 32) | u64::from(f);

        // The next keying operation on this core is IV-only.
        self.fresh_key = false;
    }

    /// Clocks the NLFSR once, producing one 8-byte keystream block.
    pub(crate) fn clock(&mut self) -> [u8; crate::BLOCK_BYTES] {
        let mut words = [
            self.word_at(0),
            self.word_at(9),
            self.word_at(16),
            self.word_at(19),
            self.word_at(30) ^ (self.counter >> 32) as u32,
            self.word_at(31) ^ self.counter as u32,
        ];
        update(&mut words);

        self.counter = self.counter.wrapping_add(1);

        // Shift by two; the slots consumed as e and f become the front of
        // the register and receive the feedback words.
        self.offset = self.offset.wrapping_sub(2);
        self.set_word_at(0, words[1]);
        self.set_word_at(1, words[2]);

        let mut block = [0u8; crate::BLOCK_BYTES];
        block[..4].copy_from_slice(&words[0].to_be_bytes());
        block[4..].copy_from_slice(&words[4].to_be_bytes());
        block
    }
}

impl KeySizeUser for DragonCore {
    type KeySize = cipher::consts::U16;
}

impl IvSizeUser for DragonCore {
    type IvSize = cipher::consts::U16;
}

impl BlockSizeUser for DragonCore {
    type BlockSize = cipher::consts::U8;
}

impl KeyIvInit for DragonCore {
    fn new(key: &Key<Self>, iv: &Iv<Self>) -> Self {
        let mut key_bytes = [0u8; KEY_BYTES];
        key_bytes.copy_from_slice(key);
        let mut iv_bytes = [0u8; IV_BYTES];
        iv_bytes.copy_from_slice(iv);
        Self::from_key_iv(&key_bytes, &iv_bytes)
    }
}

impl StreamCipherCore for DragonCore {
    fn remaining_blocks(&self) -> Option<usize> {
        None
    }

    fn process_with_backend(&mut self, f: impl cipher::StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut backends::soft::Backend(self));
    }
}
