use anyhow::{Context, Result, bail};
use clap::Args;
use drm_cenc::decode_hex;

use super::transform::{Direction, TransformArgs};

/**
    Encrypt a file with AES-128-CTR.
*/
#[derive(Args)]
pub struct EncryptCommand {
    #[command(flatten)]
    pub args: TransformArgs,

    /// IV of the first sample in hex (8 or 16 bytes).
    #[arg(long, conflicts_with = "random_iv")]
    pub iv: Option<String>,

    /// Generate a random IV of this many bytes (8 or 16) instead of --iv.
    #[arg(long)]
    pub random_iv: Option<usize>,
}

impl EncryptCommand {
    pub fn run(self) -> Result<()> {
        let key = decode_hex(&self.args.key).context("invalid --key")?;
        let mut encryptor = self.args.encryptor();

        let initialized = match (&self.iv, self.random_iv) {
            (Some(iv), _) => {
                let iv = decode_hex(iv).context("invalid --iv")?;
                encryptor.initialize_with_iv(&key, &iv)
            }
            (None, Some(size)) => encryptor.initialize_with_random_iv(&key, size),
            (None, None) => bail!("either --iv or --random-iv is required"),
        };
        initialized.context("failed to initialize encryptor")?;

        println!("IV:         {}", hex::encode(encryptor.iv()));
        self.args.run(&mut encryptor, Direction::Encrypt)
    }
}
