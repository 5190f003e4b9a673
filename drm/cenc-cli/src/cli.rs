use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{DecryptCommand, EncryptCommand, NextIvCommand};

/**
    CENC AES-128-CTR command-line tool.
*/
#[derive(Parser)]
#[command(name = "cenc-cli")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encrypt a file, sample by sample.
    Encrypt(EncryptCommand),
    /// Decrypt a file, sample by sample.
    Decrypt(DecryptCommand),
    /// Compute the IV that follows one or more samples.
    NextIv(NextIvCommand),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Encrypt(cmd) => cmd.run(),
            Command::Decrypt(cmd) => cmd.run(),
            Command::NextIv(cmd) => cmd.run(),
        }
    }
}
