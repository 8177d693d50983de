//! Seeded Generator
//!
//! Expands a seed into a tensor or a matrix tuple with SHAKE256. The stream
//! is consumed `⌈κ/8⌉` bytes per coefficient, in the fixed enumeration order,
//! so regeneration from the same seed is bit-exact on any platform.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

use crate::kernels::ring::Ring;
use crate::tensor::{MatrixTuple, Odometer, Tensor};
use crate::types::Params;

// =============================================================================
// COEFFICIENT STREAM
// =============================================================================

/// SHAKE256 stream keyed by a seed, yielding reduced coefficients.
pub struct CoefficientStream {
    reader: <Shake256 as ExtendableOutput>::Reader,
    ring: Ring,
    buf: [u8; 8],
}

impl CoefficientStream {
    /// Absorb `seed` and prepare to squeeze coefficients for `params`.
    pub fn new(seed: &[u8], params: &Params) -> Self {
        Self {
            reader: Shake256::default().chain(seed).finalize_xof(),
            ring: Ring::new(params),
            buf: [0u8; 8],
        }
    }

    /// Next `⌈κ/8⌉` bytes, big-endian, masked to `κ` bits.
    #[inline]
    pub fn next_coefficient(&mut self) -> u64 {
        let bytes = &mut self.buf[..self.ring.width()];
        self.reader.read(bytes);
        self.ring.decode_be(bytes)
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Deterministic tensor from `seed`.
///
/// Coefficients are drawn in lexicographic multi-index order.
///
/// # Example
/// ```rust
/// use cubedh::{generate_tensor, Params};
///
/// let t1 = generate_tensor(&[0u8; 32], &Params::REFERENCE);
/// let t2 = generate_tensor(&[0u8; 32], &Params::REFERENCE);
/// assert_eq!(t1, t2);
/// assert_eq!(t1.as_slice().len(), 16);
/// ```
pub fn generate_tensor(seed: &[u8], params: &Params) -> Tensor {
    let mut stream = CoefficientStream::new(seed, params);
    let mut coeffs = vec![0u64; params.len()];
    let mut odo = Odometer::new(params);
    while odo.is_valid() {
        coeffs[odo.position()] = stream.next_coefficient();
        odo.advance();
    }
    Tensor::from_raw(*params, coeffs)
}

/// Deterministic matrix tuple from `seed`.
///
/// Coefficients are drawn by tuple index, then row, then column.
pub fn generate_matrix_tuple(seed: &[u8], params: &Params) -> MatrixTuple {
    let mut stream = CoefficientStream::new(seed, params);
    let n = params.n();
    let mut coeffs = Vec::with_capacity(params.matrix_tuple_len());
    for _dim in 0..params.half() {
        for _row in 0..n {
            for _col in 0..n {
                coeffs.push(stream.next_coefficient());
            }
        }
    }
    MatrixTuple::from_raw(*params, coeffs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn stream_matches_one_shot_squeeze() {
        let p = Params::REFERENCE;
        let mut expected = [0u8; 32];
        Shake256::default()
            .chain(b"seed")
            .finalize_xof()
            .read(&mut expected);

        let t = generate_tensor(b"seed", &p);
        for (i, chunk) in expected.chunks(2).enumerate() {
            let v = u64::from(u16::from_be_bytes([chunk[0], chunk[1]]));
            assert_eq!(t.as_slice()[i], v);
        }
    }

    #[test]
    fn tensor_and_tuple_share_stream_prefix() {
        let p = Params::new(2, 2, 16).unwrap();
        let t = generate_tensor(b"k", &p);
        let m = generate_matrix_tuple(b"k", &p);
        assert_eq!(t.as_slice(), m.as_slice());
    }

    #[test]
    fn coefficients_respect_kappa() {
        let p = Params::new(2, 4, 8).unwrap();
        let ring = Ring::new(&p);
        let t = generate_tensor(&[7u8; 32], &p);
        assert!(t.as_slice().iter().all(|&c| ring.contains(c)));
    }

    #[test]
    fn different_seeds_diverge() {
        let p = Params::WIDE;
        assert_ne!(
            generate_tensor(&[0u8; 32], &p),
            generate_tensor(&[1u8; 32], &p)
        );
        assert_ne!(
            generate_matrix_tuple(&[0u8; 16], &p),
            generate_matrix_tuple(&[1u8; 16], &p)
        );
    }
}
