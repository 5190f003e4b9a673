use core::fmt;
use core::str::FromStr;

use crate::constants::{IV_SIZE_64, IV_SIZE_128};
use crate::error::{CencError, ParseError};

/**
    Declared size of a CENC initialization vector.

    The size decides how the IV advances from one sample to the next:
    - 8 bytes: incremented by one per sample (64-bit wraparound)
    - 16 bytes: incremented by the block count of the sample (128-bit wraparound)
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IvSize {
    Bits64,
    Bits128,
}

impl IvSize {
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            IV_SIZE_64 => Some(Self::Bits64),
            IV_SIZE_128 => Some(Self::Bits128),
            _ => None,
        }
    }

    pub const fn to_len(self) -> usize {
        match self {
            Self::Bits64 => IV_SIZE_64,
            Self::Bits128 => IV_SIZE_128,
        }
    }
}

impl TryFrom<usize> for IvSize {
    type Error = CencError;

    fn try_from(len: usize) -> Result<Self, Self::Error> {
        Self::from_len(len).ok_or(CencError::InvalidIvSize(len))
    }
}

impl fmt::Display for IvSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits64 => f.write_str("64-bit"),
            Self::Bits128 => f.write_str("128-bit"),
        }
    }
}

/**
    How the keystream counter moves from one block to the next within a sample.

    `Full128` treats the counter block as one 128-bit big-endian integer.
    `Low64` only increments the low 64 bits and lets them wrap without
    carrying into the high half, which is how CENC defines the block counter.

    Advancing the IV between samples is unaffected by this setting.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CounterWrap {
    #[default]
    Full128,
    Low64,
}

impl CounterWrap {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("full128") {
            Some(Self::Full128)
        } else if name.eq_ignore_ascii_case("low64") {
            Some(Self::Low64)
        } else {
            None
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Full128 => "full128",
            Self::Low64 => "low64",
        }
    }
}

impl fmt::Display for CounterWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for CounterWrap {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseError {
            kind: "counter wrap",
            value: s.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iv_size_from_len() {
        assert_eq!(IvSize::from_len(8), Some(IvSize::Bits64));
        assert_eq!(IvSize::from_len(16), Some(IvSize::Bits128));
        assert_eq!(IvSize::from_len(15), None);
        assert_eq!(IvSize::try_from(0), Err(CencError::InvalidIvSize(0)));
        assert_eq!(IvSize::Bits64.to_len(), 8);
    }

    #[test]
    fn counter_wrap_parse() {
        assert_eq!("low64".parse::<CounterWrap>(), Ok(CounterWrap::Low64));
        assert_eq!(" FULL128 ".parse::<CounterWrap>(), Ok(CounterWrap::Full128));
        let err = "ctr32".parse::<CounterWrap>().unwrap_err();
        assert_eq!(err.to_string(), "unknown counter wrap 'ctr32'");
        assert_eq!(CounterWrap::default(), CounterWrap::Full128);
    }

    #[test]
    fn counter_wrap_accepts_only_canonical_names() {
        assert_eq!(CounterWrap::from_name("full"), None);
        assert_eq!(CounterWrap::from_name("cenc"), None);
        for wrap in [CounterWrap::Full128, CounterWrap::Low64] {
            assert_eq!(CounterWrap::from_name(wrap.to_name()), Some(wrap));
        }
    }
}
