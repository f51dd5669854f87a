use std::path::{Path, PathBuf};

use super::shared::load_matching_bitmaps;
use crate::{Bitmap, Carrier, Distributor, GaloisField, Persist, ShadowError};

pub fn prepare() -> DistributeApi {
    DistributeApi::default()
}

#[derive(Default, Debug)]
pub struct DistributeApi {
    secret_image: Option<PathBuf>,
    threshold: Option<usize>,
    shadow_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl DistributeApi {
    /// The 8-bit bitmap to be shared
    pub fn with_secret_image<A: AsRef<Path>>(mut self, secret_image: A) -> Self {
        self.secret_image = Some(secret_image.as_ref().to_path_buf());
        self
    }

    /// Number of shadows needed for recovery, between 4 and 6
    pub fn with_threshold(mut self, k: usize) -> Self {
        self.threshold = Some(k);
        self
    }

    /// Folder with the carrier bitmaps, every bitmap with the dimensions of the
    /// secret image becomes a shadow
    pub fn with_shadow_dir<A: AsRef<Path>>(mut self, shadow_dir: A) -> Self {
        self.shadow_dir = Some(shadow_dir.as_ref().to_path_buf());
        self
    }

    /// Folder to write the shadows to, by default the carriers are overwritten
    pub fn with_output_dir<A: AsRef<Path>>(mut self, output_dir: A) -> Self {
        self.output_dir = Some(output_dir.as_ref().to_path_buf());
        self
    }

    /// Same as [`Self::with_output_dir`], `None` keeps writing in place
    pub fn use_output_dir<A: AsRef<Path>>(mut self, output_dir: Option<A>) -> Self {
        self.output_dir = output_dir.map(|d| d.as_ref().to_path_buf());
        self
    }

    /// Distributes the secret and returns the paths of the written shadows
    pub fn execute(self) -> Result<Vec<PathBuf>, ShadowError> {
        let Some(secret_image) = self.secret_image else {
            return Err(ShadowError::SecretNotSet);
        };
        let Some(k) = self.threshold else {
            return Err(ShadowError::ThresholdNotSet);
        };
        let Some(shadow_dir) = self.shadow_dir else {
            return Err(ShadowError::ShadowDirNotSet);
        };

        let secret = Bitmap::open(&secret_image)?;
        let dimensions = secret.carrier().dimensions();
        let bitmaps = load_matching_bitmaps(&shadow_dir, Some(dimensions))?
            .into_iter()
            .filter(|(path, _)| !is_same_file(path, &secret_image))
            .collect::<Vec<_>>();
        if bitmaps.len() < k {
            return Err(ShadowError::NotEnoughShadows {
                found: bitmaps.len(),
                required: k,
            });
        }
        log::info!(
            "Sharing {secret_image:?} with k = {k} across {} carriers",
            bitmaps.len()
        );

        let (paths, bitmaps): (Vec<PathBuf>, Vec<Bitmap>) = bitmaps.into_iter().unzip();
        let mut carriers: Vec<Carrier> = bitmaps.iter().map(|b| b.carrier().clone()).collect();

        let field = GaloisField::eager();
        Distributor::new(&field, k).distribute(secret.carrier().pixels(), &mut carriers)?;

        let mut written = Vec::with_capacity(paths.len());
        for ((path, bitmap), carrier) in paths.iter().zip(&bitmaps).zip(carriers) {
            let target = match &self.output_dir {
                Some(dir) => dir.join(path.file_name().unwrap_or(path.as_os_str())),
                None => path.clone(),
            };
            bitmap.with_carrier(carrier)?.save_as(&target)?;
            log::debug!("Wrote shadow {target:?}");
            written.push(target);
        }

        Ok(written)
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
