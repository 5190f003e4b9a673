use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use drm_cenc::{AesCtrEncryptor, CencResult, CounterWrap};

/**
    Options shared by `encrypt` and `decrypt`.
*/
#[derive(Args)]
pub struct TransformArgs {
    /// 16-byte AES key in hex.
    #[arg(short, long)]
    pub key: String,

    /// Input file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Split the input into samples of this many bytes, advancing the IV
    /// after each one. The whole file is one sample if omitted.
    #[arg(short, long)]
    pub sample_size: Option<usize>,

    /// Block counter behavior within a sample (full128 or low64).
    #[arg(long, default_value = "full128")]
    pub counter_wrap: CounterWrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl TransformArgs {
    pub fn encryptor(&self) -> AesCtrEncryptor {
        AesCtrEncryptor::new().with_counter_wrap(self.counter_wrap)
    }

    /**
        Read the input, transform it and write the output, printing the IV
        each sample started at.
    */
    pub fn run(&self, encryptor: &mut AesCtrEncryptor, direction: Direction) -> Result<()> {
        let mut data = std::fs::read(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;

        let ivs = transform_samples(encryptor, &mut data, self.sample_size, direction)
            .context("failed to transform samples")?;

        std::fs::write(&self.output, &data)
            .with_context(|| format!("failed to write {}", self.output.display()))?;

        println!("Samples:    {}", ivs.len());
        for (index, iv) in ivs.iter().enumerate() {
            println!("  {index:>6}  {}", hex::encode(iv));
        }
        tracing::info!(bytes = data.len(), samples = ivs.len(), ?direction, "done");

        Ok(())
    }
}

/**
    Transform `data` in place, one sample of `sample_size` bytes at a time.

    Each sample restarts the keystream at the IV produced by advancing past
    the previous sample. Returns the IV every sample started at.
*/
pub fn transform_samples(
    encryptor: &mut AesCtrEncryptor,
    data: &mut [u8],
    sample_size: Option<usize>,
    direction: Direction,
) -> CencResult<Vec<Vec<u8>>> {
    let sample_size = match sample_size {
        Some(size) if size > 0 => size,
        _ => data.len().max(1),
    };

    let mut ivs = Vec::new();
    for sample in data.chunks_mut(sample_size) {
        let iv = encryptor.iv();
        encryptor.set_iv(&iv)?;
        match direction {
            Direction::Encrypt => encryptor.encrypt_in_place(sample)?,
            Direction::Decrypt => encryptor.decrypt_in_place(sample)?,
        }
        encryptor.update_iv();
        ivs.push(iv);
    }

    Ok(ivs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 16] = [0x11; 16];

    #[test]
    fn samples_use_advancing_ivs() {
        let mut encryptor = AesCtrEncryptor::with_iv(&KEY, &[0u8; 16]).unwrap();
        let mut data = vec![0u8; 40];
        let ivs = transform_samples(&mut encryptor, &mut data, Some(20), Direction::Encrypt).unwrap();

        let mut expected_second = AesCtrEncryptor::with_iv(&KEY, &ivs[1]).unwrap();
        assert_eq!(ivs.len(), 2);
        assert_eq!(ivs[0], [0u8; 16]);
        assert_eq!(ivs[1][15], 2);
        assert_eq!(expected_second.encrypt([0u8; 20]).unwrap(), data[20..]);
    }

    #[test]
    fn round_trip_with_short_iv() {
        let plaintext: Vec<u8> = (0..=255).collect();
        let mut data = plaintext.clone();

        let mut encryptor = AesCtrEncryptor::with_iv(&KEY, &[7u8; 8]).unwrap();
        let ivs = transform_samples(&mut encryptor, &mut data, Some(33), Direction::Encrypt).unwrap();
        assert_eq!(ivs.len(), 8);
        assert_ne!(data, plaintext);

        let mut encryptor = AesCtrEncryptor::with_iv(&KEY, &[7u8; 8]).unwrap();
        transform_samples(&mut encryptor, &mut data, Some(33), Direction::Decrypt).unwrap();
        assert_eq!(data, plaintext);
    }

    #[test]
    fn whole_input_is_one_sample_by_default() {
        let mut encryptor = AesCtrEncryptor::with_iv(&KEY, &[0u8; 16]).unwrap();
        let mut data = vec![0u8; 100];
        let ivs = transform_samples(&mut encryptor, &mut data, None, Direction::Encrypt).unwrap();
        assert_eq!(ivs.len(), 1);
        assert_eq!(encryptor.iv()[15], 7);

        let mut empty = Vec::new();
        let ivs = transform_samples(&mut encryptor, &mut empty, None, Direction::Encrypt).unwrap();
        assert!(ivs.is_empty());
    }
}
