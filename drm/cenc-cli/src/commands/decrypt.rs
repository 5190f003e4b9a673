use anyhow::{Context, Result};
use clap::Args;
use drm_cenc::decode_hex;

use super::transform::{Direction, TransformArgs};

/**
    Decrypt a file with AES-128-CTR.
*/
#[derive(Args)]
pub struct DecryptCommand {
    #[command(flatten)]
    pub args: TransformArgs,

    /// IV of the first sample in hex (8 or 16 bytes).
    #[arg(long)]
    pub iv: String,
}

impl DecryptCommand {
    pub fn run(self) -> Result<()> {
        let key = decode_hex(&self.args.key).context("invalid --key")?;
        let iv = decode_hex(&self.iv).context("invalid --iv")?;

        let mut encryptor = self.args.encryptor();
        encryptor
            .initialize_with_iv(&key, &iv)
            .context("failed to initialize encryptor")?;

        self.args.run(&mut encryptor, Direction::Decrypt)
    }
}
