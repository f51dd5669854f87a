//! Arithmetic in GF(256).
//!
//! Elements are bytes read as polynomials over GF(2), reduced modulo the
//! irreducible polynomial `x^8 + x^6 + x^5 + x + 1` ([`PRIMITIVE`]).
//!
//! Multiplication works without any precomputation, but a [`GaloisField`]
//! can build its [`FieldTables`] once and answer every later product and
//! inverse with a single lookup. The tables are an optimisation only, a
//! product is the same with or without them.

use std::fmt;
use std::sync::OnceLock;

use crate::{Result, ShadowError};

/// x^8 + x^6 + x^5 + x + 1
pub const PRIMITIVE: u16 = 0x163;

const ORDER: usize = 256;

/// Addition and subtraction in GF(256), both are xor.
#[inline]
pub fn sum(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiplies without consulting any table.
///
/// Russian peasant multiplication: `a` is doubled and `b` halved until one of
/// them runs out, every odd `b` adds the current `a` to the product. Doubling
/// an `a` with the high bit set is reduced by the field polynomial.
pub fn full_multiply(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0;
    while a != 0 && b != 0 {
        if b & 1 == 1 {
            product = sum(product, a);
        }
        a = if a & 0x80 != 0 {
            (((a as u16) << 1) ^ PRIMITIVE) as u8
        } else {
            a << 1
        };
        b >>= 1;
    }
    product
}

/// Complete multiplication and inverse tables for GF(256).
#[derive(Clone)]
pub struct FieldTables {
    products: Box<[u8]>,
    inverses: [u8; ORDER],
}

impl FieldTables {
    /// Computes all 256x256 products, the table is symmetric so only the
    /// lower triangle is multiplied. Every product equal to 1 pairs up two
    /// inverses.
    pub fn build() -> Self {
        let mut products = vec![0u8; ORDER * ORDER].into_boxed_slice();
        let mut inverses = [0u8; ORDER];

        for i in 0..ORDER {
            for j in 0..=i {
                let product = full_multiply(i as u8, j as u8);
                products[i * ORDER + j] = product;
                products[j * ORDER + i] = product;
                if product == 1 {
                    inverses[i] = j as u8;
                    inverses[j] = i as u8;
                }
            }
        }

        Self { products, inverses }
    }

    #[inline]
    pub fn product(&self, a: u8, b: u8) -> u8 {
        self.products[a as usize * ORDER + b as usize]
    }

    /// `None` for zero, every other element has an inverse.
    #[inline]
    pub fn inverse(&self, x: u8) -> Option<u8> {
        if x == 0 {
            None
        } else {
            Some(self.inverses[x as usize])
        }
    }
}

impl fmt::Debug for FieldTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTables")
            .field("products", &format_args!("[u8; {}]", self.products.len()))
            .field("inverses", &format_args!("[u8; {}]", self.inverses.len()))
            .finish()
    }
}

/// Owner of the lazily built [`FieldTables`].
///
/// The tables are created at most once per value, on the first [`inverse`]
/// or an explicit [`load`]. Concurrent readers are fine, the initialisation
/// is guarded. Only [`reload`] throws them away again and it needs exclusive
/// access.
///
/// [`inverse`]: GaloisField::inverse
/// [`load`]: GaloisField::load
/// [`reload`]: GaloisField::reload
#[derive(Debug, Default)]
pub struct GaloisField {
    tables: OnceLock<FieldTables>,
}

impl GaloisField {
    /// A field without tables, they get built on demand.
    pub fn new() -> Self {
        Self::default()
    }

    /// A field with tables built right away.
    pub fn eager() -> Self {
        let field = Self::new();
        field.load();
        field
    }

    pub fn is_loaded(&self) -> bool {
        self.tables.get().is_some()
    }

    /// Builds the tables unless they already exist.
    pub fn load(&self) -> &FieldTables {
        self.tables.get_or_init(|| {
            log::debug!("building GF(256) multiplication and inverse tables");
            FieldTables::build()
        })
    }

    /// Discards the current tables and builds fresh ones.
    pub fn reload(&mut self) {
        self.tables = OnceLock::new();
        self.load();
    }

    #[inline]
    pub fn sum(&self, a: u8, b: u8) -> u8 {
        sum(a, b)
    }

    #[inline]
    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        match self.tables.get() {
            Some(tables) => tables.product(a, b),
            None => full_multiply(a, b),
        }
    }

    /// Multiplicative inverse, builds the tables on first use.
    ///
    /// Zero has no inverse and is reported as [`ShadowError::DegenerateInverse`].
    pub fn inverse(&self, x: u8) -> Result<u8> {
        self.load().inverse(x).ok_or(ShadowError::DegenerateInverse)
    }

    pub fn divide(&self, a: u8, b: u8) -> Result<u8> {
        Ok(self.multiply(a, self.inverse(b)?))
    }
}
