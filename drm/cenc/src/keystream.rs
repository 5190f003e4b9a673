use aes::{
    Aes128,
    cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray},
};

use crate::constants::AES_BLOCK_SIZE;
use crate::counter::Counter;
use crate::types::CounterWrap;

/**
    AES-128-CTR keystream cursor.

    Keystream byte `p` (counted from the last reset) is byte `p % 16` of
    `AES(key, base + p / 16)`. The last generated block is cached so a call
    that stops mid-block is resumed by the next call without regenerating or
    skipping keystream.

    Blocks are generated lazily: a new block is only encrypted once a byte
    beyond the cached one is requested. `blocks` therefore always equals
    `ceil(bytes_processed / 16)` since the last reset.
*/
pub(crate) struct Keystream {
    cipher: Aes128,
    wrap: CounterWrap,
    base: Counter,
    blocks: u64,
    offset: usize,
    block: [u8; AES_BLOCK_SIZE],
}

impl Keystream {
    pub fn new(key: &[u8; 16], base: Counter, wrap: CounterWrap) -> Self {
        Self {
            cipher: Aes128::new(key.into()),
            wrap,
            base,
            blocks: 0,
            offset: 0,
            block: [0u8; AES_BLOCK_SIZE],
        }
    }

    /**
        Restart the stream at `base`, dropping any partially consumed block.
    */
    pub fn reset(&mut self, base: Counter) {
        self.base = base;
        self.blocks = 0;
        self.offset = 0;
        self.block = [0u8; AES_BLOCK_SIZE];
    }

    /**
        Move the origin of future blocks to `base` while keeping the cached
        block and the offset into it.
    */
    pub fn rebase(&mut self, base: Counter) {
        self.base = base;
        self.blocks = 0;
    }

    pub fn set_wrap(&mut self, wrap: CounterWrap) {
        self.wrap = wrap;
    }

    /**
        Number of keystream blocks generated since the last reset or rebase.
    */
    pub const fn blocks(&self) -> u64 {
        self.blocks
    }

    /**
        Bytes of the cached block already consumed, in `0..16`.
    */
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /**
        XOR `data` with the next `data.len()` keystream bytes.
    */
    pub fn apply(&mut self, data: &mut [u8]) {
        let mut start = 0;

        if self.offset != 0 {
            let take = (AES_BLOCK_SIZE - self.offset).min(data.len());
            xor_in_place(&mut data[..take], &self.block[self.offset..self.offset + take]);
            self.offset = (self.offset + take) % AES_BLOCK_SIZE;
            start = take;
        }

        for chunk in data[start..].chunks_mut(AES_BLOCK_SIZE) {
            self.next_block();
            xor_in_place(chunk, &self.block[..chunk.len()]);
            self.offset = chunk.len() % AES_BLOCK_SIZE;
        }
    }

    fn next_block(&mut self) {
        self.block = self.base.offset(self.blocks, self.wrap).to_be_bytes();
        self.cipher
            .encrypt_block(GenericArray::from_mut_slice(&mut self.block));
        self.blocks = self.blocks.wrapping_add(1);
    }
}

fn xor_in_place(data: &mut [u8], keystream: &[u8]) {
    for (byte, key) in data.iter_mut().zip(keystream) {
        *byte ^= key;
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    const KEY: [u8; 16] = hex!("2b7e151628aed2a6abf7158809cf4f3c");

    fn encrypt_counter(counter: Counter) -> [u8; AES_BLOCK_SIZE] {
        let mut block = counter.to_be_bytes();
        Aes128::new((&KEY).into()).encrypt_block(GenericArray::from_mut_slice(&mut block));
        block
    }

    #[test]
    fn bytes_follow_counter_position() {
        let base = Counter::new(0, u64::MAX - 1);
        let mut ks = Keystream::new(&KEY, base, CounterWrap::Full128);
        let mut stream = vec![0u8; 50];
        ks.apply(&mut stream);

        for (p, byte) in stream.iter().enumerate() {
            let block = encrypt_counter(base.wrapping_add((p / AES_BLOCK_SIZE) as u64));
            assert_eq!(*byte, block[p % AES_BLOCK_SIZE], "keystream byte {p}");
        }
        assert_eq!(ks.blocks(), 4);
        assert_eq!(ks.offset(), 2);
    }

    #[test]
    fn low64_wrap_keeps_high_word() {
        let base = Counter::new(9, u64::MAX);
        let mut ks = Keystream::new(&KEY, base, CounterWrap::Low64);
        let mut stream = vec![0u8; 32];
        ks.apply(&mut stream);

        assert_eq!(stream[..16], encrypt_counter(base));
        assert_eq!(stream[16..], encrypt_counter(Counter::new(9, 0)));
    }

    #[test]
    fn blocks_are_generated_lazily() {
        let mut ks = Keystream::new(&KEY, Counter::default(), CounterWrap::Full128);
        ks.apply(&mut [0u8; 0]);
        assert_eq!(ks.blocks(), 0);

        ks.apply(&mut [0u8; 16]);
        assert_eq!((ks.blocks(), ks.offset()), (1, 0));

        ks.apply(&mut [0u8; 1]);
        assert_eq!((ks.blocks(), ks.offset()), (2, 1));

        ks.apply(&mut [0u8; 15]);
        assert_eq!((ks.blocks(), ks.offset()), (2, 0));
    }

    #[test]
    fn reset_drops_partial_block() {
        let mut ks = Keystream::new(&KEY, Counter::default(), CounterWrap::Full128);
        let mut first = [0u8; 5];
        ks.apply(&mut first);

        ks.reset(Counter::default());
        assert_eq!((ks.blocks(), ks.offset()), (0, 0));

        let mut again = [0u8; 5];
        ks.apply(&mut again);
        assert_eq!(first, again);
    }

    #[test]
    fn rebase_keeps_cached_tail() {
        let mut ks = Keystream::new(&KEY, Counter::default(), CounterWrap::Full128);
        ks.apply(&mut [0u8; 10]);

        let next = Counter::new(0, 100);
        ks.rebase(next);
        assert_eq!(ks.offset(), 10);

        let mut tail = [0u8; 22];
        ks.apply(&mut tail);
        assert_eq!(tail[..6], encrypt_counter(Counter::default())[10..]);
        assert_eq!(tail[6..], encrypt_counter(next));
    }
}
