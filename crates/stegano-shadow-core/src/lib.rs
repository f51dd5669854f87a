//! # Stegano Shadow Core API
//!
//! A (k,n) threshold secret image sharing scheme: a secret image is split into
//! `n` shadows, each one hidden in the low bits of an innocent looking carrier
//! image. Any `k` of the carriers recover the secret exactly, fewer reveal
//! nothing about it. Every 2x2 pixel block of a carrier stores one point of a
//! polynomial over GF(256) plus a parity bit that detects damaged shadows.
//!
//! The building blocks work on plain pixel buffers ([`Carrier`]):
//! - [`Distributor`] hides a secret across carriers
//! - [`Reconstructor`] recovers it from `k` shadows
//!
//! The [`api`] module wraps them for 8-bit BMP files in a directory.
//!
//! # Usage Examples
//!
//! ## Share a secret in memory
//!
//! ```rust
//! use stegano_shadow_core::{Carrier, Distributor, GaloisField, Reconstructor};
//!
//! let field = GaloisField::eager();
//! let secret: Vec<u8> = (0..64).collect();
//! let mut carriers: Vec<Carrier> = (0..6)
//!     .map(|i| Carrier::new(8, 8, vec![i * 40; 64]).unwrap())
//!     .collect();
//!
//! Distributor::new(&field, 4)
//!     .distribute(&secret, &mut carriers)
//!     .expect("Failed to distribute the secret");
//!
//! let recovered = Reconstructor::new(&field, 4)
//!     .recover(&carriers[2..], secret.len())
//!     .expect("Failed to recover the secret");
//! assert_eq!(recovered, secret);
//! ```
//!
//! ## Share a secret image over a directory of carrier images
//!
//! ```rust,no_run
//! stegano_shadow_core::api::distribute::prepare()
//!     .with_secret_image("secret.bmp")
//!     .with_threshold(4)
//!     .with_shadow_dir("carriers/")
//!     .execute()
//!     .expect("Failed to distribute the secret image");
//!
//! stegano_shadow_core::api::recover::prepare()
//!     .with_threshold(4)
//!     .with_shadow_dir("carriers/")
//!     .with_output("recovered.bmp")
//!     .execute()
//!     .expect("Failed to recover the secret image");
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod bitmap;
pub mod codec;
pub mod commands;
pub mod distribute;
pub mod error;
pub mod galois;
pub mod planner;
pub mod polynomial;
pub mod recover;
pub mod result;
pub mod scheme;

use std::path::Path;

pub use crate::bitmap::Bitmap;
pub use crate::distribute::Distributor;
pub use crate::error::ShadowError;
pub use crate::galois::GaloisField;
pub use crate::planner::Carrier;
pub use crate::recover::Reconstructor;
pub use crate::result::Result;
pub use crate::scheme::Scheme;

pub trait Persist {
    fn save_as(&self, _: &Path) -> Result<()>;
}
