use std::path::{Path, PathBuf};

use super::shared::load_matching_bitmaps;
use crate::{Carrier, GaloisField, Persist, Reconstructor, ShadowError};

pub fn prepare() -> RecoverApi {
    RecoverApi::default()
}

#[derive(Default, Debug)]
pub struct RecoverApi {
    threshold: Option<usize>,
    shadow_dir: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl RecoverApi {
    /// Number of shadows the secret was shared with
    pub fn with_threshold(mut self, k: usize) -> Self {
        self.threshold = Some(k);
        self
    }

    /// Folder with the shadow bitmaps, the first `k` of them that pass the
    /// parity check are used
    pub fn with_shadow_dir<A: AsRef<Path>>(mut self, shadow_dir: A) -> Self {
        self.shadow_dir = Some(shadow_dir.as_ref().to_path_buf());
        self
    }

    /// The recovered secret image is written to this file
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Execute the recovery and blocks until it is finished
    pub fn execute(self) -> Result<(), ShadowError> {
        let Some(k) = self.threshold else {
            return Err(ShadowError::ThresholdNotSet);
        };
        let Some(shadow_dir) = self.shadow_dir else {
            return Err(ShadowError::ShadowDirNotSet);
        };
        let Some(output) = self.output else {
            return Err(ShadowError::TargetNotSet);
        };

        let mut bitmaps = load_matching_bitmaps(&shadow_dir, None)?;
        if bitmaps.len() < k {
            return Err(ShadowError::NotEnoughShadows {
                found: bitmaps.len(),
                required: k,
            });
        }

        let field = GaloisField::eager();
        let reconstructor = Reconstructor::new(&field, k);
        let (width, height) = bitmaps[0].1.carrier().dimensions();
        let mut shadows: Vec<Carrier> = bitmaps.iter().map(|(_, b)| b.carrier().clone()).collect();

        // bitmaps that fail the parity check are no shadows of this secret,
        // e.g. the secret itself, they make room for the next candidate
        let secret = loop {
            match reconstructor.recover(&shadows, width * height) {
                Ok(secret) => break secret,
                Err(ShadowError::CorruptedShare { shadow, block }) if shadows.len() > k => {
                    let (path, _) = bitmaps.remove(shadow);
                    shadows.remove(shadow);
                    log::warn!("Skipping {path:?}: parity check failed at block {block}");
                }
                Err(e) => return Err(e),
            }
        };
        for (path, _) in bitmaps.iter().take(k) {
            log::info!("Used shadow {path:?}");
        }

        let template = &bitmaps[0].1;
        template
            .with_carrier(Carrier::new(width, height, secret)?)?
            .save_as(&output)?;
        log::info!("Recovered secret written to {output:?}");

        Ok(())
    }
}
