use rayon::prelude::*;

use crate::codec;
use crate::galois::GaloisField;
use crate::planner::{enforce_distinct_x, partition_carrier, partition_secret, Carrier};
use crate::polynomial::evaluate;
use crate::scheme::Scheme;
use crate::{Result, ShadowError};

/// Hides a secret across `n` carriers so that any `k` of them recover it.
#[derive(Debug)]
pub struct Distributor<'f> {
    field: &'f GaloisField,
    k: usize,
}

impl<'f> Distributor<'f> {
    pub fn new(field: &'f GaloisField, k: usize) -> Self {
        Self { field, k }
    }

    /// Mutates every carrier in place.
    ///
    /// All parameters are checked before the first pixel changes: `k` within
    /// 4..=6, `k <= n <= 256` for `n = carriers.len()`, equal carrier
    /// dimensions, a secret length divisible by `k` and enough 2x2 blocks per
    /// carrier for `secret.len() / k` blocks.
    ///
    /// Only pixels inside the used blocks change. `X` may be nudged upwards to
    /// keep the evaluation points of a block distinct, `W`, `V` and `U` lose
    /// their three lowest bits to the payload.
    pub fn distribute(&self, secret: &[u8], carriers: &mut [Carrier]) -> Result<()> {
        let scheme = Scheme::new(self.k, carriers.len())?;
        let k = scheme.k();
        check_same_dimensions(carriers)?;
        if secret.len() % k != 0 {
            return Err(ShadowError::invalid(
                "secret",
                secret.len(),
                format!("length must be a multiple of k = {k}"),
            ));
        }

        let block_count = secret.len() / k;
        let positions = partition_carrier(&carriers[0], block_count)?;
        log::debug!(
            "distributing {} secret bytes as {block_count} blocks over {} carriers (k = {k})",
            secret.len(),
            scheme.n()
        );

        let mut points: Vec<Vec<u8>> = carriers
            .iter()
            .map(|carrier| {
                positions
                    .iter()
                    .map(|position| carrier.block_at(position).x)
                    .collect()
            })
            .collect();
        let adjustments = enforce_distinct_x(&mut points)?;
        log::debug!("{adjustments} evaluation points adjusted to be distinct");

        let coefficients: Vec<&[u8]> = partition_secret(secret, k).collect();
        let field = self.field;
        field.load();

        carriers
            .par_iter_mut()
            .zip(points.par_iter())
            .for_each(|(carrier, xs)| {
                for ((position, &x), block_coefficients) in
                    positions.iter().zip(xs).zip(&coefficients)
                {
                    let mut block = carrier.block_at(position);
                    block.x = x;
                    codec::embed(&mut block, evaluate(field, x, block_coefficients));
                    carrier.set_block_at(position, &block);
                }
            });

        Ok(())
    }
}

pub(crate) fn check_same_dimensions(carriers: &[Carrier]) -> Result<()> {
    let Some(first) = carriers.first() else {
        return Ok(());
    };
    match carriers
        .iter()
        .position(|c| c.dimensions() != first.dimensions())
    {
        Some(index) => {
            let (width, height) = carriers[index].dimensions();
            Err(ShadowError::invalid(
                "carrier",
                format!("#{index} {width}x{height}"),
                format!(
                    "all carriers must be {}x{} like the first one",
                    first.width(),
                    first.height()
                ),
            ))
        }
        None => Ok(()),
    }
}
