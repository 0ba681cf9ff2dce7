use crate::core::DragonCore;
use cipher::{Block, BlockSizeUser, ParBlocksSizeUser, StreamBackend};

/// The software backend for Dragon.
///
/// Each keystream block is one round of the cipher: the NLFSR is clocked
/// once and emits 8 bytes. Rounds mutate the register, so blocks are
/// strictly sequential and there is no parallel block generation.
pub struct Backend<'a>(pub(crate) &'a mut DragonCore);

impl<'a> BlockSizeUser for Backend<'a> {
    type BlockSize = cipher::consts::U8;
}

impl<'a> ParBlocksSizeUser for Backend<'a> {
    type ParBlocksSize = cipher::consts::U1;
}

impl<'a> StreamBackend for Backend<'a> {
    #[inline]
    fn gen_ks_block(&mut self, block: &mut Block<Self>) {
        block.copy_from_slice(&self.0.clock());
    }
}
