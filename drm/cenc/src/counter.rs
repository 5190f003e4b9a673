use core::fmt;

use crate::constants::AES_BLOCK_SIZE;
use crate::error::{CencError, CencResult};
use crate::types::{CounterWrap, IvSize};

/**
    A 128-bit big-endian counter block, held as two 64-bit words.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct Counter {
    hi: u64,
    lo: u64,
}

impl Counter {
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    pub fn from_be_bytes(bytes: [u8; AES_BLOCK_SIZE]) -> Self {
        let mut hi = [0u8; 8];
        let mut lo = [0u8; 8];
        hi.copy_from_slice(&bytes[..8]);
        lo.copy_from_slice(&bytes[8..]);
        Self::new(u64::from_be_bytes(hi), u64::from_be_bytes(lo))
    }

    pub fn to_be_bytes(self) -> [u8; AES_BLOCK_SIZE] {
        let mut out = [0u8; AES_BLOCK_SIZE];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }

    /**
        128-bit addition modulo 2^128. The carry out of the low word
        propagates into the high word.
    */
    pub const fn wrapping_add(self, n: u64) -> Self {
        let (lo, carry) = self.lo.overflowing_add(n);
        let hi = if carry {
            self.hi.wrapping_add(1)
        } else {
            self.hi
        };
        Self { hi, lo }
    }

    /**
        Addition of a full 128-bit amount, modulo 2^128.
    */
    pub const fn wrapping_add_wide(self, n: u128) -> Self {
        let (lo, carry) = self.lo.overflowing_add(n as u64);
        let hi = self.hi.wrapping_add((n >> 64) as u64).wrapping_add(carry as u64);
        Self { hi, lo }
    }

    /**
        64-bit addition on the low word only, modulo 2^64.
    */
    pub const fn wrapping_add_low(self, n: u64) -> Self {
        Self {
            hi: self.hi,
            lo: self.lo.wrapping_add(n),
        }
    }

    /**
        Counter value of the `n`-th block after this one.
    */
    pub const fn offset(self, n: u64, wrap: CounterWrap) -> Self {
        match wrap {
            CounterWrap::Full128 => self.wrapping_add(n),
            CounterWrap::Low64 => self.wrapping_add_low(n),
        }
    }
}

/**
    A CENC initialization vector: its declared size plus the 128-bit counter
    block it seeds.

    An 8-byte IV occupies the low 8 bytes of the counter block with the high
    8 bytes held at zero. The IV is always reported back at its declared size.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Iv {
    size: IvSize,
    counter: Counter,
}

impl Iv {
    /**
        Parse an IV from raw bytes. Only 8 and 16 byte IVs are accepted.
    */
    pub fn from_bytes(bytes: &[u8]) -> CencResult<Self> {
        let size = IvSize::try_from(bytes.len())?;
        let mut block = [0u8; AES_BLOCK_SIZE];
        block[AES_BLOCK_SIZE - bytes.len()..].copy_from_slice(bytes);
        Ok(Self {
            size,
            counter: Counter::from_be_bytes(block),
        })
    }

    pub const fn size(&self) -> IvSize {
        self.size
    }

    pub(crate) const fn counter(&self) -> Counter {
        self.counter
    }

    /**
        The IV bytes at their declared size, never padded.
    */
    pub fn to_vec(&self) -> Vec<u8> {
        let block = self.counter.to_be_bytes();
        block[AES_BLOCK_SIZE - self.size.to_len()..].to_vec()
    }

    /**
        IV for the sample following one that consumed `blocks` keystream blocks.

        - 16-byte IVs grow by `blocks`, modulo 2^128.
        - 8-byte IVs grow by exactly one, modulo 2^64, whatever `blocks` is.
    */
    pub const fn advance(self, blocks: u64) -> Self {
        let counter = match self.size {
            IvSize::Bits128 => self.counter.wrapping_add(blocks),
            IvSize::Bits64 => self.counter.wrapping_add_low(1),
        };
        Self {
            size: self.size,
            counter,
        }
    }

    /**
        IV after `samples` consecutive samples of `blocks` blocks each.

        Same result as calling `advance(blocks)` `samples` times, computed
        directly.
    */
    pub const fn advance_samples(self, blocks: u64, samples: u64) -> Self {
        let counter = match self.size {
            IvSize::Bits128 => self
                .counter
                .wrapping_add_wide(blocks as u128 * samples as u128),
            IvSize::Bits64 => self.counter.wrapping_add_low(samples),
        };
        Self {
            size: self.size,
            counter,
        }
    }
}

impl TryFrom<&[u8]> for Iv {
    type Error = CencError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_vec()))
    }
}

impl fmt::Debug for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iv")
            .field("size", &self.size)
            .field("value", &format_args!("{self}"))
            .finish()
    }
}
