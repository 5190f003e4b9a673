use crate::error::{CencError, CencResult};

/**
    Decode a hex string such as a key or IV given on a command line.

    Surrounding whitespace, an optional `0x` prefix and `-` or `:` separators
    are ignored, so `00112233-4455...` and `0x00112233...` both parse.
*/
pub fn decode_hex(s: &str) -> CencResult<Vec<u8>> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let cleaned: String = s.chars().filter(|c| !matches!(c, '-' | ':')).collect();
    hex::decode(&cleaned).map_err(|e| CencError::InvalidHex(e.to_string()))
}
