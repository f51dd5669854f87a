use std::path::PathBuf;

use clap::Args;

use crate::CliResult;

/// Hides a secret BMP image as shadows in the carrier BMP images of a folder
#[derive(Args, Debug)]
pub struct DistributeArgs {
    /// 8-bit BMP image to share
    #[arg(short, long, value_name = "secret image", required = true)]
    pub secret: PathBuf,

    /// Number of shadows needed to recover the secret (4 to 6)
    #[arg(
        short,
        value_name = "threshold",
        required = true,
        value_parser = clap::value_parser!(u8).range(4..=6)
    )]
    pub k: u8,

    /// Folder with carrier BMP images of the same size as the secret
    #[arg(short, long, value_name = "shadow folder", required = true)]
    pub dir: PathBuf,

    /// Folder for the shadows, the carriers are overwritten if omitted
    #[arg(short, long, value_name = "output folder")]
    pub out: Option<PathBuf>,
}

impl DistributeArgs {
    pub fn run(self) -> CliResult<()> {
        let written = stegano_shadow_core::commands::distribute(
            &self.secret,
            self.k as usize,
            &self.dir,
            self.out,
        )?;
        log::info!("{} shadows written", written.len());

        Ok(())
    }
}
