use thiserror::Error;

/**
    Errors from the AES-CTR encryptor.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CencError {
    // ── Initialization ────────────────────────────────────────────────
    #[error("invalid key size {0}, expected 16 bytes")]
    InvalidKeySize(usize),
    #[error("invalid IV size {0}, expected 8 or 16 bytes")]
    InvalidIvSize(usize),

    // ── Transform ─────────────────────────────────────────────────────
    #[error("encryptor used before initialization")]
    Uninitialized,
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    OutputTooSmall { needed: usize, available: usize },
    #[error("decrypted data is not valid UTF-8")]
    InvalidUtf8,

    // ── Encoding ──────────────────────────────────────────────────────
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/**
    Error returned by `FromStr` implementations on enum types.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

/**
    Type alias for results that may return a [`CencError`].
*/
pub type CencResult<T> = std::result::Result<T, CencError>;
