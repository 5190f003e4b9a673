use core::fmt;

use rand::{CryptoRng, RngCore};

use crate::constants::AES_128_KEY_SIZE;
use crate::counter::Iv;
use crate::error::{CencError, CencResult};
use crate::keystream::Keystream;
use crate::types::{CounterWrap, IvSize};

/**
    AES-128-CTR encryptor following the Common Encryption (CENC) conventions.

    A sample may be fed through in any number of consecutive calls
    (subsamples). Each call resumes the keystream where the previous one
    stopped, so splitting a sample never changes its ciphertext.

    After a sample is done, [`update_iv`](Self::update_iv) derives the IV for
    the next sample:
    - 8-byte IVs are incremented by one
    - 16-byte IVs are incremented by the number of blocks the sample used

    Encryption and decryption are the same operation in CTR mode; both names
    are provided so call sites read naturally.

    The encryptor holds a mutable keystream cursor and must not be shared
    between threads without external synchronization.
*/
#[derive(Default)]
pub struct AesCtrEncryptor {
    wrap: CounterWrap,
    state: Option<State>,
}

struct State {
    iv: Iv,
    keystream: Keystream,
}

impl AesCtrEncryptor {
    /**
        Create an encryptor that still needs a key and an IV.
        Transform calls fail with [`CencError::Uninitialized`] until then.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Create an encryptor initialized with `key` and `iv`.
    */
    pub fn with_iv(key: &[u8], iv: &[u8]) -> CencResult<Self> {
        let mut encryptor = Self::new();
        encryptor.initialize_with_iv(key, iv)?;
        Ok(encryptor)
    }

    /**
        Create an encryptor initialized with `key` and a random IV of
        `iv_size` bytes (8 or 16).
    */
    pub fn with_random_iv(key: &[u8], iv_size: usize) -> CencResult<Self> {
        let mut encryptor = Self::new();
        encryptor.initialize_with_random_iv(key, iv_size)?;
        Ok(encryptor)
    }

    /**
        Select how the block counter advances within a sample.
        Applies to keystream blocks generated from now on.
    */
    pub fn with_counter_wrap(mut self, wrap: CounterWrap) -> Self {
        self.wrap = wrap;
        if let Some(state) = &mut self.state {
            state.keystream.set_wrap(wrap);
        }
        self
    }

    /**
        Set the key and IV, restarting the keystream at the IV.

        The key must be 16 bytes and the IV 8 or 16 bytes. On error the
        encryptor is left exactly as it was.
    */
    pub fn initialize_with_iv(&mut self, key: &[u8], iv: &[u8]) -> CencResult<()> {
        let key: &[u8; AES_128_KEY_SIZE] = key
            .try_into()
            .map_err(|_| CencError::InvalidKeySize(key.len()))?;
        let iv = Iv::from_bytes(iv)?;

        tracing::debug!(iv_size = %iv.size(), %iv, "initialized AES-CTR encryptor");

        self.state = Some(State {
            iv,
            keystream: Keystream::new(key, iv.counter(), self.wrap),
        });
        Ok(())
    }

    /**
        Set the key and a freshly generated random IV of `iv_size` bytes.
    */
    pub fn initialize_with_random_iv(&mut self, key: &[u8], iv_size: usize) -> CencResult<()> {
        self.initialize_with_random_iv_from(&mut rand::rng(), key, iv_size)
    }

    /**
        Like [`initialize_with_random_iv`](Self::initialize_with_random_iv),
        drawing the IV from the given cryptographically secure generator.
    */
    pub fn initialize_with_random_iv_from<R>(
        &mut self,
        rng: &mut R,
        key: &[u8],
        iv_size: usize,
    ) -> CencResult<()>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        if key.len() != AES_128_KEY_SIZE {
            return Err(CencError::InvalidKeySize(key.len()));
        }
        let size = IvSize::try_from(iv_size)?;

        let mut iv = vec![0u8; size.to_len()];
        rng.fill_bytes(&mut iv);
        self.initialize_with_iv(key, &iv)
    }

    /**
        Replace the IV while keeping the key, restarting the keystream at the
        new IV. Used to re-process a sample from a known point, or to start
        the next sample after [`update_iv`](Self::update_iv).
    */
    pub fn set_iv(&mut self, iv: &[u8]) -> CencResult<()> {
        let iv = Iv::from_bytes(iv)?;
        let state = self.state.as_mut().ok_or(CencError::Uninitialized)?;

        tracing::debug!(iv_size = %iv.size(), %iv, "reset AES-CTR IV");

        state.iv = iv;
        state.keystream.reset(iv.counter());
        Ok(())
    }

    /**
        Advance the IV to the one the next sample should use.

        The block offset and any partially consumed keystream block are kept.
        Keystream blocks generated after this call start from the new IV.
        Does nothing on an uninitialized encryptor.
    */
    pub fn update_iv(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let blocks = state.keystream.blocks();
        state.iv = state.iv.advance(blocks);
        state.keystream.rebase(state.iv.counter());

        tracing::trace!(blocks, iv = %state.iv, "advanced AES-CTR IV");
    }

    /**
        The current IV at its declared size, or an empty vector before
        initialization.
    */
    pub fn iv(&self) -> Vec<u8> {
        self.state
            .as_ref()
            .map(|state| state.iv.to_vec())
            .unwrap_or_default()
    }

    /**
        Declared size of the current IV.
    */
    pub fn iv_size(&self) -> Option<IvSize> {
        self.state.as_ref().map(|state| state.iv.size())
    }

    /**
        Position inside the current keystream block, in `0..16`.
        Equal to the bytes processed since the last IV reset, modulo 16.
    */
    pub fn block_offset(&self) -> usize {
        self.state
            .as_ref()
            .map(|state| state.keystream.offset())
            .unwrap_or(0)
    }

    pub fn counter_wrap(&self) -> CounterWrap {
        self.wrap
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    // ── Encrypt ───────────────────────────────────────────────────────

    /**
        Encrypt `input` into a new buffer. Accepts byte slices, byte vectors
        and text alike; equal bytes give equal output.
    */
    pub fn encrypt(&mut self, input: impl AsRef<[u8]>) -> CencResult<Vec<u8>> {
        let mut out = input.as_ref().to_vec();
        self.apply_keystream(&mut out)?;
        Ok(out)
    }

    /**
        Encrypt `src` into the first `src.len()` bytes of `dst`.
    */
    pub fn encrypt_into(&mut self, src: &[u8], dst: &mut [u8]) -> CencResult<()> {
        self.ensure_initialized()?;
        if dst.len() < src.len() {
            return Err(CencError::OutputTooSmall {
                needed: src.len(),
                available: dst.len(),
            });
        }

        let dst = &mut dst[..src.len()];
        dst.copy_from_slice(src);
        self.apply_keystream(dst)
    }

    /**
        Encrypt `buf` in place.
    */
    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) -> CencResult<()> {
        self.apply_keystream(buf)
    }

    /**
        Encrypt `input`, replacing the contents of `out` with the result.
    */
    pub fn encrypt_to_vec(&mut self, input: impl AsRef<[u8]>, out: &mut Vec<u8>) -> CencResult<()> {
        self.ensure_initialized()?;
        out.clear();
        out.extend_from_slice(input.as_ref());
        self.apply_keystream(out)
    }

    // ── Decrypt ───────────────────────────────────────────────────────

    /**
        Decrypt `input` into a new buffer.
    */
    pub fn decrypt(&mut self, input: impl AsRef<[u8]>) -> CencResult<Vec<u8>> {
        self.encrypt(input)
    }

    /**
        Decrypt `src` into the first `src.len()` bytes of `dst`.
    */
    pub fn decrypt_into(&mut self, src: &[u8], dst: &mut [u8]) -> CencResult<()> {
        self.encrypt_into(src, dst)
    }

    /**
        Decrypt `buf` in place.
    */
    pub fn decrypt_in_place(&mut self, buf: &mut [u8]) -> CencResult<()> {
        self.apply_keystream(buf)
    }

    /**
        Decrypt `input`, replacing the contents of `out` with the result.
    */
    pub fn decrypt_to_vec(&mut self, input: impl AsRef<[u8]>, out: &mut Vec<u8>) -> CencResult<()> {
        self.encrypt_to_vec(input, out)
    }

    /**
        Decrypt `input` and interpret the plaintext as UTF-8 text.

        The keystream advances even when the plaintext turns out not to be
        valid UTF-8.
    */
    pub fn decrypt_to_string(&mut self, input: impl AsRef<[u8]>) -> CencResult<String> {
        let plaintext = self.decrypt(input)?;
        String::from_utf8(plaintext).map_err(|_| CencError::InvalidUtf8)
    }

    fn ensure_initialized(&self) -> CencResult<()> {
        if self.state.is_some() {
            Ok(())
        } else {
            Err(CencError::Uninitialized)
        }
    }

    fn apply_keystream(&mut self, buf: &mut [u8]) -> CencResult<()> {
        let state = self.state.as_mut().ok_or(CencError::Uninitialized)?;
        state.keystream.apply(buf);
        Ok(())
    }
}

impl fmt::Debug for AesCtrEncryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("AesCtrEncryptor");
        s.field("counter_wrap", &self.wrap);
        match &self.state {
            Some(state) => s
                .field("iv", &state.iv)
                .field("block_offset", &state.keystream.offset())
                .finish_non_exhaustive(),
            None => s.field("initialized", &false).finish(),
        }
    }
}
