use anyhow::{Context, Result};
use clap::Args;
use drm_cenc::{AES_BLOCK_SIZE, Iv, decode_hex};

/**
    Compute the IV that follows one or more samples.
*/
#[derive(Args)]
pub struct NextIvCommand {
    /// IV of the first sample in hex (8 or 16 bytes).
    #[arg(long)]
    pub iv: String,

    /// Size of each sample in bytes.
    #[arg(long)]
    pub bytes: u64,

    /// Number of samples to advance past.
    #[arg(long, default_value_t = 1)]
    pub samples: u64,
}

impl NextIvCommand {
    pub fn run(self) -> Result<()> {
        let bytes = decode_hex(&self.iv).context("invalid --iv")?;
        let iv = Iv::from_bytes(&bytes).context("invalid --iv")?;

        println!("{}", advance(iv, self.bytes, self.samples));
        Ok(())
    }
}

fn advance(iv: Iv, sample_bytes: u64, samples: u64) -> Iv {
    let blocks = sample_bytes.div_ceil(AES_BLOCK_SIZE as u64);
    iv.advance_samples(blocks, samples)
}
