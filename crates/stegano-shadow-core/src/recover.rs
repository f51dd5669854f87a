//! Reconstruction of a secret from `k` shadows.
//!
//! Every block gives one point `(X, F(X))` per shadow. Lagrange interpolation
//! over GF(256) turns the `k` points back into the `k` coefficients of `F`,
//! and the coefficients are the secret bytes of that block.

use rayon::prelude::*;

use crate::codec;
use crate::distribute::check_same_dimensions;
use crate::galois::{sum, GaloisField};
use crate::planner::{partition_carrier, Carrier};
use crate::scheme::check_threshold;
use crate::{Result, ShadowError};

/// Which half of a point to read from the shadows.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Dimension {
    /// The evaluation point, stored as plain pixel value.
    X,
    /// The embedded `F(X)`, checked against its parity bit.
    Value,
}

/// Collects `points[block][shadow]` from every shadow.
///
/// Reading [`Dimension::Value`] fails as a whole on the first parity
/// mismatch with [`ShadowError::CorruptedShare`].
pub fn recover_points(
    shadows: &[Carrier],
    block_count: usize,
    dimension: Dimension,
) -> Result<Vec<Vec<u8>>> {
    let Some(first) = shadows.first() else {
        return Ok(vec![Vec::new(); block_count]);
    };
    check_same_dimensions(shadows)?;
    let positions = partition_carrier(first, block_count)?;

    let per_shadow = shadows
        .par_iter()
        .enumerate()
        .map(|(shadow, carrier)| {
            positions
                .iter()
                .enumerate()
                .map(|(index, position)| {
                    let block = carrier.block_at(position);
                    match dimension {
                        Dimension::X => Ok(block.x),
                        Dimension::Value => codec::extract_at(&block, shadow, index),
                    }
                })
                .collect::<Result<Vec<u8>>>()
        })
        .collect::<Result<Vec<Vec<u8>>>>()?;

    Ok((0..block_count)
        .map(|block| per_shadow.iter().map(|points| points[block]).collect())
        .collect())
}

/// Interpolates the degree `k - 1` polynomial of every block.
///
/// `xs[block]` and `ys[block]` hold at least `k` coordinates, the first `k`
/// are used. Two equal `X` within a block leave the interpolation without a
/// solution and surface as [`ShadowError::DegenerateInverse`].
pub fn lagrange_interpolate(
    field: &GaloisField,
    k: usize,
    xs: &[Vec<u8>],
    ys: &[Vec<u8>],
) -> Result<Vec<Vec<u8>>> {
    if xs.len() != ys.len() {
        return Err(ShadowError::invalid(
            "points",
            ys.len(),
            format!("expected values for {} blocks", xs.len()),
        ));
    }
    if let Some(block) = xs
        .iter()
        .zip(ys)
        .position(|(x, y)| x.len() < k || y.len() < k)
    {
        return Err(ShadowError::invalid(
            "points",
            format!("block {block}"),
            format!("fewer than k = {k} points"),
        ));
    }

    field.load();
    xs.par_iter()
        .zip(ys.par_iter())
        .map(|(x, y)| interpolate_block(field, &x[..k], &y[..k]))
        .collect()
}

fn interpolate_block(field: &GaloisField, xs: &[u8], ys: &[u8]) -> Result<Vec<u8>> {
    let k = xs.len();
    let mut coefficients = vec![0u8; k];

    for (i, (&xi, &yi)) in xs.iter().zip(ys).enumerate() {
        // basis = prod (x - xj), denominator = prod (xi - xj), for j != i
        let mut basis = vec![0u8; k];
        basis[0] = 1;
        let mut degree = 0;
        let mut denominator = 1;

        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            for d in (1..=degree + 1).rev() {
                basis[d] = sum(basis[d - 1], field.multiply(basis[d], xj));
            }
            basis[0] = field.multiply(basis[0], xj);
            degree += 1;
            denominator = field.multiply(denominator, sum(xi, xj));
        }

        let scale = field.divide(yi, denominator)?;
        for (coefficient, &b) in coefficients.iter_mut().zip(&basis) {
            *coefficient = sum(*coefficient, field.multiply(b, scale));
        }
    }

    Ok(coefficients)
}

/// Concatenates recovered blocks in block order.
pub fn assemble_secret(blocks: &[Vec<u8>]) -> Vec<u8> {
    blocks.concat()
}

/// Recovers a secret from shadows written by [`Distributor`].
///
/// [`Distributor`]: crate::distribute::Distributor
#[derive(Debug)]
pub struct Reconstructor<'f> {
    field: &'f GaloisField,
    k: usize,
}

impl<'f> Reconstructor<'f> {
    pub fn new(field: &'f GaloisField, k: usize) -> Self {
        Self { field, k }
    }

    /// Reads `secret_len` bytes back from the first `k` of `shadows`.
    ///
    /// Recovery is all or nothing, a single corrupted block in any of the
    /// used shadows fails the call. The shadows are not modified.
    pub fn recover(&self, shadows: &[Carrier], secret_len: usize) -> Result<Vec<u8>> {
        let k = self.k;
        check_threshold(k)?;
        if shadows.len() < k {
            return Err(ShadowError::invalid(
                "n",
                shadows.len(),
                format!("at least k = {k} shadows are required"),
            ));
        }
        if secret_len % k != 0 {
            return Err(ShadowError::invalid(
                "secret",
                secret_len,
                format!("length must be a multiple of k = {k}"),
            ));
        }

        let chosen = &shadows[..k];
        let block_count = secret_len / k;
        log::debug!("recovering {secret_len} secret bytes as {block_count} blocks from {k} shadows");

        let xs = recover_points(chosen, block_count, Dimension::X)?;
        let ys = recover_points(chosen, block_count, Dimension::Value)?;
        let blocks = lagrange_interpolate(self.field, k, &xs, &ys)?;

        Ok(assemble_secret(&blocks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{embed, Xwvu};
    use crate::polynomial::evaluate;

    #[test]
    fn should_interpolate_a_known_polynomial() {
        let field = GaloisField::new();
        let secret = [12u8, 215, 64, 27];
        let xs = vec![vec![69u8, 1, 2, 200]];
        let ys = vec![xs[0].iter().map(|&x| evaluate(&field, x, &secret)).collect()];

        let blocks = lagrange_interpolate(&field, 4, &xs, &ys).unwrap();
        assert_eq!(blocks, vec![secret.to_vec()]);
    }

    #[test]
    fn should_interpolate_every_threshold_with_extra_points() {
        let field = GaloisField::eager();
        for k in 4..=6 {
            let secret: Vec<u8> = (0..k as u8).map(|i| i.wrapping_mul(37) ^ 0x5C).collect();
            let xs = vec![vec![9u8, 250, 0, 17, 33, 128, 77]];
            let ys = vec![xs[0].iter().map(|&x| evaluate(&field, x, &secret)).collect()];

            let blocks = lagrange_interpolate(&field, k, &xs, &ys).unwrap();
            assert_eq!(blocks[0], secret, "k = {k}");
        }
    }

    #[test]
    fn should_fail_loudly_on_repeated_points() {
        let field = GaloisField::new();
        let xs = vec![vec![5u8, 6, 5, 7]];
        let ys = vec![vec![1u8, 2, 3, 4]];

        assert!(matches!(
            lagrange_interpolate(&field, 4, &xs, &ys),
            Err(ShadowError::DegenerateInverse)
        ));
    }

    #[test]
    fn should_collect_points_per_block() {
        let mut shadows = Vec::new();
        for shadow in 0..4u8 {
            let mut carrier = Carrier::new(4, 2, vec![0; 8]).unwrap();
            let positions = partition_carrier(&carrier, 2).unwrap();
            for (index, position) in positions.iter().enumerate() {
                let mut block = Xwvu::new(10 * shadow + index as u8, 0, 0, 0);
                embed(&mut block, 100 + shadow + index as u8);
                carrier.set_block_at(position, &block);
            }
            shadows.push(carrier);
        }

        let xs = recover_points(&shadows, 2, Dimension::X).unwrap();
        let ys = recover_points(&shadows, 2, Dimension::Value).unwrap();
        assert_eq!(xs, vec![vec![0, 10, 20, 30], vec![1, 11, 21, 31]]);
        assert_eq!(ys, vec![vec![100, 101, 102, 103], vec![101, 102, 103, 104]]);
    }

    #[test]
    fn should_refuse_corrupted_values() {
        let mut carrier = Carrier::new(2, 2, vec![0; 4]).unwrap();
        let positions = partition_carrier(&carrier, 1).unwrap();
        let mut block = Xwvu::new(3, 0, 0, 0);
        embed(&mut block, 0b0100_0000);
        block.v ^= 0b001;
        carrier.set_block_at(&positions[0], &block);

        assert!(recover_points(&[carrier.clone()], 1, Dimension::X).is_ok());
        assert!(matches!(
            recover_points(&[carrier], 1, Dimension::Value),
            Err(ShadowError::CorruptedShare { shadow: 0, block: 0 })
        ));
    }

    #[test]
    fn should_require_k_shadows() {
        let field = GaloisField::new();
        let shadows = vec![Carrier::new(2, 2, vec![0; 4]).unwrap(); 3];
        assert!(matches!(
            Reconstructor::new(&field, 4).recover(&shadows, 4),
            Err(ShadowError::InvalidParameter { param: "n", .. })
        ));
    }

    #[test]
    fn should_assemble_blocks_in_order() {
        let blocks = vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]];
        assert_eq!(assemble_secret(&blocks), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
