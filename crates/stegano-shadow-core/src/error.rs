use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShadowError {
    /// Represents a scheme parameter or buffer that breaks the preconditions of the scheme.
    /// For example a threshold of 7 or carriers of different dimensions
    #[error("invalid {param} `{value}`: {reason}")]
    InvalidParameter {
        param: &'static str,
        value: String,
        reason: String,
    },

    /// Represents a parity mismatch while extracting a share, the shadow image was damaged or tampered
    #[error("shadow #{shadow} is corrupted, parity check failed at block {block}")]
    CorruptedShare { shadow: usize, block: usize },

    /// Represents an attempt to invert the zero element of GF(256)
    #[error("zero has no multiplicative inverse in GF(256)")]
    DegenerateInverse,

    /// Represents a broken bitmap file. For example a truncated header
    #[error("Bitmap is invalid: {0}")]
    InvalidBitmap(String),

    /// Represents a well formed bitmap in a pixel format the scheme cannot carry
    #[error("Bitmap format is not supported: {bits_per_pixel} bits per pixel, compression {compression}")]
    UnsupportedBitmap {
        bits_per_pixel: u16,
        compression: u32,
    },

    /// Represents a shadow directory that does not hold enough usable carrier images
    #[error("Found {found} usable shadow images but at least {required} are required")]
    NotEnoughShadows { found: usize, required: usize },

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("API Error: No secret image set")]
    SecretNotSet,

    #[error("API Error: No shadow directory set")]
    ShadowDirNotSet,

    #[error("API Error: No target file set")]
    TargetNotSet,

    #[error("API Error: No threshold set")]
    ThresholdNotSet,
}

impl ShadowError {
    pub(crate) fn invalid(
        param: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ShadowError::InvalidParameter {
            param,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
