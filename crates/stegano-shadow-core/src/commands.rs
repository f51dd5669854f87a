use std::path::{Path, PathBuf};

use crate::ShadowError;

/// Shares `secret_image` over the carrier bitmaps in `shadow_dir`, see
/// [`crate::api::distribute`].
pub fn distribute(
    secret_image: &Path,
    k: usize,
    shadow_dir: &Path,
    output_dir: Option<PathBuf>,
) -> Result<Vec<PathBuf>, ShadowError> {
    crate::api::distribute::prepare()
        .with_secret_image(secret_image)
        .with_threshold(k)
        .with_shadow_dir(shadow_dir)
        .use_output_dir(output_dir)
        .execute()
}

/// Recovers the secret hidden in the shadows of `shadow_dir` into `output`,
/// see [`crate::api::recover`].
pub fn recover(output: &Path, k: usize, shadow_dir: &Path) -> Result<(), ShadowError> {
    crate::api::recover::prepare()
        .with_threshold(k)
        .with_shadow_dir(shadow_dir)
        .with_output(output)
        .execute()
}
