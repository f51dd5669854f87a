use crate::{Result, ShadowError};

/// Smallest supported threshold.
pub const MIN_THRESHOLD: usize = 4;

/// Largest supported threshold, 8 payload bits per 2x2 block limit it.
pub const MAX_THRESHOLD: usize = 6;

/// Every shadow needs its own evaluation point per block, there are only 256 of them.
pub const MAX_SHADOWS: usize = 256;

/// Parameters of a (k,n) threshold scheme.
///
/// `k` shadows are needed to recover the secret, `n` shadows are produced.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Scheme {
    k: usize,
    n: usize,
}

impl Scheme {
    pub fn new(k: usize, n: usize) -> Result<Self> {
        check_threshold(k)?;
        if n < k {
            return Err(ShadowError::invalid(
                "n",
                n,
                format!("at least k = {k} shadows are required"),
            ));
        }
        if n > MAX_SHADOWS {
            return Err(ShadowError::invalid(
                "n",
                n,
                format!("at most {MAX_SHADOWS} shadows are possible"),
            ));
        }

        Ok(Self { k, n })
    }

    /// Shadows needed for recovery.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Shadows produced by distribution.
    pub fn n(&self) -> usize {
        self.n
    }
}

pub(crate) fn check_threshold(k: usize) -> Result<()> {
    if (MIN_THRESHOLD..=MAX_THRESHOLD).contains(&k) {
        Ok(())
    } else {
        Err(ShadowError::invalid(
            "k",
            k,
            format!("must be between {MIN_THRESHOLD} and {MAX_THRESHOLD}"),
        ))
    }
}
