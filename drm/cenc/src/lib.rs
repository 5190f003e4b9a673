/*!
    AES-128-CTR encryption for Common Encryption (CENC, ISO/IEC 23001-7)
    `cenc` scheme content.

    - Subsample processing: a sample split across calls encrypts exactly like
      the whole sample in one call
    - Per-sample IV advance for 8-byte and 16-byte IVs
    - In-place and out-of-place transforms over bytes and text
*/

mod constants;
mod counter;
mod encryptor;
mod error;
mod keystream;
mod types;

pub mod utils;

pub use self::constants::{AES_128_KEY_SIZE, AES_BLOCK_SIZE, IV_SIZE_64, IV_SIZE_128};
pub use self::counter::Iv;
pub use self::encryptor::AesCtrEncryptor;
pub use self::error::{CencError, CencResult, ParseError};
pub use self::types::{CounterWrap, IvSize};
pub use self::utils::decode_hex;
