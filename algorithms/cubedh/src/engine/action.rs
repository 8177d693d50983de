//! Group Action Engine
//!
//! Applies a matrix tuple to one half of a tensor's axes.
//!
//! For the `dim`-th axis of the selected half, matrix `M = tuple[dim]` sends
//! the basis vector `e_b` along that axis to column `b` of `M`:
//!
//! ```text
//! out[ind with ind[axis] = k] += M[k][b] * in[ind]     where b = ind[axis]
//! ```
//!
//! The contributions of all `d/2` axes accumulate into one fresh zero tensor
//! and every axis reads only the input, so axis order within a call does not
//! matter. Every store is reduced mod `2^κ`.
//!
//! Tuples acting on the first and second halves touch disjoint axes and
//! therefore commute.

use crate::kernels::ring::Ring;
use crate::tensor::{axis_stride, ensure_same, MatrixTuple, Odometer, Tensor};
use crate::types::{KexError, Side};

// =============================================================================
// ACTION
// =============================================================================

/// Act with `tuple` on the `side` half of `tensor`'s axes.
///
/// Returns a new tensor of the same shape; the input is not modified.
///
/// # Errors
/// Returns [`KexError::ShapeMismatch`] if `tensor` and `tuple` were built
/// for different parameter sets.
///
/// # Example
/// ```rust
/// use cubedh::{act, generate_matrix_tuple, generate_tensor, Params, Side};
///
/// let p = Params::REFERENCE;
/// let t = generate_tensor(b"public", &p);
/// let a = generate_matrix_tuple(b"alice", &p);
/// let b = generate_matrix_tuple(b"bob", &p);
///
/// let ab = act(&act(&t, &b, Side::Second)?, &a, Side::First)?;
/// let ba = act(&act(&t, &a, Side::First)?, &b, Side::Second)?;
/// assert_eq!(ab, ba);
/// # Ok::<(), cubedh::KexError>(())
/// ```
pub fn act(tensor: &Tensor, tuple: &MatrixTuple, side: Side) -> Result<Tensor, KexError> {
    let params = *tensor.params();
    ensure_same(&params, tuple.params())?;

    let ring = Ring::new(&params);
    let n = params.n();
    let input = tensor.as_slice();
    let mut out = vec![0u64; params.len()];

    for (dim, axis) in side.axes(&params).enumerate() {
        let matrix = &tuple.as_slice()[dim * n * n..(dim + 1) * n * n];
        let stride = axis_stride(&params, axis);

        let mut odo = Odometer::new(&params);
        while odo.is_valid() {
            let pos = odo.position();
            let basis = odo.digits()[axis];
            let value = input[pos];
            // Position of `ind` with `ind[axis]` cleared to zero.
            let base = pos - basis * stride;

            for k in 0..n {
                let target = base + k * stride;
                out[target] = ring.mul_add(out[target], matrix[k * n + basis], value);
            }
            odo.advance();
        }
    }

    Ok(Tensor::from_raw(params, out))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Params;

    fn identity(p: Params) -> MatrixTuple {
        let n = p.n();
        let mut coeffs = Vec::new();
        for _ in 0..p.half() {
            for r in 0..n {
                for c in 0..n {
                    coeffs.push(u64::from(r == c));
                }
            }
        }
        MatrixTuple::from_coefficients(p, coeffs).unwrap()
    }

    #[test]
    fn rank_two_is_matrix_vector_product() {
        // d = 2: the first half is axis 0, so out[k][j] = sum_b M[k][b] * T[b][j].
        let p = Params::new(2, 2, 16).unwrap();
        let t = Tensor::from_coefficients(p, vec![1, 2, 3, 4]).unwrap();
        let m = MatrixTuple::from_coefficients(p, vec![5, 6, 7, 8]).unwrap();

        let out = act(&t, &m, Side::First).unwrap();
        assert_eq!(out.as_slice(), &[5 + 18, 10 + 24, 7 + 24, 14 + 32]);

        // Second half is axis 1: out[i][k] = sum_b M[k][b] * T[i][b].
        let out = act(&t, &m, Side::Second).unwrap();
        assert_eq!(out.as_slice(), &[5 + 12, 7 + 16, 15 + 24, 21 + 32]);
    }

    #[test]
    fn identity_tuple_scales_by_half_rank() {
        // Each of the d/2 axes contributes one copy of the input.
        let p = Params::new(4, 2, 16).unwrap();
        let t = Tensor::from_coefficients(p, (1..=16).collect()).unwrap();
        let out = act(&t, &identity(p), Side::First).unwrap();
        let expected: Vec<u64> = (1..=16).map(|v| 2 * v).collect();
        assert_eq!(out.as_slice(), expected.as_slice());
    }

    #[test]
    fn every_axis_reads_its_own_matrix() {
        // Only matrix `dim` is the identity, the others are zero: exactly one
        // axis contributes and the input comes back unchanged.
        let p = Params::new(6, 2, 16).unwrap();
        let t = Tensor::from_coefficients(p, (1..=64).collect()).unwrap();
        for dim in 0..p.half() {
            let mut coeffs = vec![0u64; p.matrix_tuple_len()];
            coeffs[dim * 4] = 1;
            coeffs[dim * 4 + 3] = 1;
            let m = MatrixTuple::from_coefficients(p, coeffs).unwrap();
            for side in [Side::First, Side::Second] {
                assert_eq!(act(&t, &m, side).unwrap(), t);
            }
        }
    }

    #[test]
    fn accumulation_wraps() {
        let p = Params::new(2, 1, 8).unwrap();
        let t = Tensor::from_coefficients(p, vec![200]).unwrap();
        let m = MatrixTuple::from_coefficients(p, vec![3]).unwrap();
        assert_eq!(act(&t, &m, Side::First).unwrap().as_slice(), &[88]);
    }

    #[test]
    fn input_is_untouched() {
        let p = Params::REFERENCE;
        let t = Tensor::from_coefficients(p, (0..16).collect()).unwrap();
        let before = t.clone();
        let _out = act(&t, &identity(p), Side::Second).unwrap();
        assert_eq!(t, before);
    }

    #[test]
    fn rejects_foreign_tuple() {
        let t = Tensor::zeros(Params::REFERENCE);
        let m = identity(Params::WIDE);
        assert!(matches!(
            act(&t, &m, Side::First),
            Err(KexError::ShapeMismatch { .. })
        ));
    }
}
