use crate::galois::{sum, GaloisField};

/// Evaluates `F(x) = c0 + c1*x + ... + c(k-1)*x^(k-1)` in GF(256).
///
/// Every term raises `x` by repeated multiplication instead of using Horner's
/// scheme, the result is the same.
pub fn evaluate(field: &GaloisField, x: u8, coefficients: &[u8]) -> u8 {
    coefficients
        .iter()
        .enumerate()
        .fold(0, |result, (degree, &coefficient)| {
            let term = (0..degree).fold(coefficient, |term, _| field.multiply(term, x));
            sum(result, term)
        })
}
