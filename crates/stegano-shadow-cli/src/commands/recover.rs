use std::path::PathBuf;

use clap::Args;

use crate::CliResult;

/// Recovers a secret BMP image from k shadow images of a folder
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// The recovered secret image will be stored as this file
    #[arg(short, long, value_name = "output image", required = true)]
    pub out: PathBuf,

    /// Number of shadows the secret was shared with (4 to 6)
    #[arg(
        short,
        value_name = "threshold",
        required = true,
        value_parser = clap::value_parser!(u8).range(4..=6)
    )]
    pub k: u8,

    /// Folder with the shadow BMP images
    #[arg(short, long, value_name = "shadow folder", required = true)]
    pub dir: PathBuf,
}

impl RecoverArgs {
    pub fn run(self) -> CliResult<()> {
        stegano_shadow_core::commands::recover(&self.out, self.k as usize, &self.dir)
    }
}
