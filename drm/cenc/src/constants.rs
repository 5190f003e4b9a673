/// AES block size in bytes. One keystream block covers this many bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Key size of AES-128, the only key size CENC `cenc` content uses.
pub const AES_128_KEY_SIZE: usize = 16;

/// 64-bit IV size. The IV is bumped by one per sample.
pub const IV_SIZE_64: usize = 8;

/// 128-bit IV size. The IV is bumped by the block count of each sample.
pub const IV_SIZE_128: usize = 16;
