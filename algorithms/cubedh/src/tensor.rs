//! Tensor and matrix-tuple values.
//!
//! Both are dense, row-major, and immutable once built. Every operation that
//! transforms a tensor returns a new one.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::kernels::ring::Ring;
use crate::types::{KexError, Params};

// =============================================================================
// ODOMETER
// =============================================================================

/// Mixed-radix counter over `d` digits, each in `0..n`.
///
/// Steps through multi-indices in lexicographic order (last digit fastest),
/// which is the enumeration order used for generation, action and key
/// serialization. The flat position of the current index always equals the
/// number of steps taken.
#[derive(Debug, Clone)]
pub struct Odometer {
    digits: Vec<usize>,
    radix: usize,
    position: usize,
    len: usize,
}

impl Odometer {
    /// Counter positioned at `(0, 0, ..., 0)`.
    pub fn new(params: &Params) -> Self {
        Self {
            digits: vec![0; params.d()],
            radix: params.n(),
            position: 0,
            len: params.len(),
        }
    }

    /// Current multi-index.
    #[inline]
    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    /// Flat row-major position of the current multi-index.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Whether the counter still points at a valid index.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.position < self.len
    }

    /// Advance by one. Returns `false` once every index has been visited.
    pub fn advance(&mut self) -> bool {
        self.position += 1;
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.radix {
                return self.is_valid();
            }
            *digit = 0;
        }
        false
    }
}

/// Row-major flat position of `index` in a tensor of shape `params`.
///
/// Returns `None` if `index` has the wrong rank or a digit is out of range.
pub fn flat_position(params: &Params, index: &[usize]) -> Option<usize> {
    if index.len() != params.d() {
        return None;
    }
    index.iter().try_fold(0usize, |acc, &digit| {
        (digit < params.n()).then_some(acc * params.n() + digit)
    })
}

/// Distance in the flat buffer between neighbours along `axis`: `n^(d-1-axis)`.
pub(crate) fn axis_stride(params: &Params, axis: usize) -> usize {
    (axis + 1..params.d()).fold(1, |stride, _| stride * params.n())
}

// =============================================================================
// TENSOR
// =============================================================================

/// Rank-`d` tensor with `n^d` coefficients in `Z / 2^κ`.
#[derive(Clone, PartialEq, Eq)]
pub struct Tensor {
    params: Params,
    coeffs: Vec<u64>,
}

impl Tensor {
    /// All-zero tensor.
    pub fn zeros(params: Params) -> Self {
        Self {
            coeffs: vec![0; params.len()],
            params,
        }
    }

    /// Build from row-major coefficients.
    ///
    /// # Errors
    /// Returns [`KexError::LengthMismatch`] if `coeffs.len() != n^d`, or
    /// [`KexError::CoefficientOutOfRange`] if any value exceeds `κ` bits.
    pub fn from_coefficients(params: Params, coeffs: Vec<u64>) -> Result<Self, KexError> {
        check_coefficients(&params, params.len(), &coeffs)?;
        Ok(Self { params, coeffs })
    }

    /// Crate-internal constructor for buffers already known to be reduced.
    pub(crate) fn from_raw(params: Params, coeffs: Vec<u64>) -> Self {
        debug_assert_eq!(coeffs.len(), params.len());
        Self { params, coeffs }
    }

    /// Parameter set this tensor was built for.
    #[inline]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Coefficients in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.coeffs
    }

    /// Coefficient at a multi-index, or `None` if the index is out of range.
    pub fn get(&self, index: &[usize]) -> Option<u64> {
        flat_position(&self.params, index).map(|pos| self.coeffs[pos])
    }

    /// Entrywise sum mod `2^κ`.
    ///
    /// # Errors
    /// Returns [`KexError::ShapeMismatch`] if the parameter sets differ.
    pub fn add_mod(&self, other: &Self) -> Result<Self, KexError> {
        ensure_same(&self.params, &other.params)?;
        let ring = Ring::new(&self.params);
        let coeffs = self
            .coeffs
            .iter()
            .zip(&other.coeffs)
            .map(|(&a, &b)| ring.add(a, b))
            .collect();
        Ok(Self::from_raw(self.params, coeffs))
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("params", &self.params)
            .field("coeffs", &self.coeffs)
            .finish()
    }
}

/// Prints one line per innermost row, prefixed by the leading indices.
impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.params.n();
        let mut odo = Odometer::new(&self.params);
        for row in self.coeffs.chunks(n) {
            let lead = &odo.digits()[..self.params.d() - 1];
            write!(f, "{lead:?}:")?;
            for value in row {
                write!(f, " {value}")?;
            }
            writeln!(f)?;
            for _ in 0..n {
                odo.advance();
            }
        }
        Ok(())
    }
}

// =============================================================================
// MATRIX TUPLE
// =============================================================================

/// A party's secret: `d/2` square `n × n` matrices over `Z / 2^κ`.
///
/// Zeroized on drop. `Debug` does not print coefficients.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MatrixTuple {
    #[zeroize(skip)]
    params: Params,
    coeffs: Vec<u64>,
}

impl MatrixTuple {
    /// Build from coefficients ordered by matrix, then row, then column.
    ///
    /// # Errors
    /// Returns [`KexError::LengthMismatch`] if `coeffs.len() != d/2 · n²`, or
    /// [`KexError::CoefficientOutOfRange`] if any value exceeds `κ` bits.
    pub fn from_coefficients(params: Params, coeffs: Vec<u64>) -> Result<Self, KexError> {
        check_coefficients(&params, params.matrix_tuple_len(), &coeffs)?;
        Ok(Self { params, coeffs })
    }

    pub(crate) fn from_raw(params: Params, coeffs: Vec<u64>) -> Self {
        debug_assert_eq!(coeffs.len(), params.matrix_tuple_len());
        Self { params, coeffs }
    }

    /// Parameter set this tuple was built for.
    #[inline]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Number of matrices (`d/2`).
    #[inline]
    pub const fn len(&self) -> usize {
        self.params.half()
    }

    /// Always `false` for a valid parameter set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.params.half() == 0
    }

    /// Matrix `i` as a row-major `n × n` slice.
    pub fn matrix(&self, i: usize) -> Option<&[u64]> {
        let size = self.params.n() * self.params.n();
        self.coeffs.get(i * size..(i + 1) * size)
    }

    /// Entry `M_i[row][col]`.
    pub fn entry(&self, i: usize, row: usize, col: usize) -> Option<u64> {
        let n = self.params.n();
        if row >= n || col >= n {
            return None;
        }
        self.matrix(i).map(|m| m[row * n + col])
    }

    /// All coefficients, matrix-major.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.coeffs
    }
}

impl fmt::Debug for MatrixTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixTuple")
            .field("params", &self.params)
            .field("coeffs", &"<redacted>")
            .finish()
    }
}

/// Prints each matrix as `n` rows. Only for explicit debugging dumps.
impl fmt::Display for MatrixTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.params.n();
        for (i, matrix) in self.coeffs.chunks(n * n).enumerate() {
            writeln!(f, "[{i}]")?;
            for row in matrix.chunks(n) {
                for value in row {
                    write!(f, " {value}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// INTERNAL HELPERS
// =============================================================================

pub(crate) fn ensure_same(expected: &Params, actual: &Params) -> Result<(), KexError> {
    if expected == actual {
        Ok(())
    } else {
        Err(KexError::ShapeMismatch {
            expected: *expected,
            actual: *actual,
        })
    }
}

fn check_coefficients(params: &Params, expected: usize, coeffs: &[u64]) -> Result<(), KexError> {
    if coeffs.len() != expected {
        return Err(KexError::LengthMismatch {
            expected,
            actual: coeffs.len(),
        });
    }
    let ring = Ring::new(params);
    match coeffs.iter().position(|&c| !ring.contains(c)) {
        Some(index) => Err(KexError::CoefficientOutOfRange {
            index,
            value: coeffs[index],
            kappa: params.kappa(),
        }),
        None => Ok(()),
    }
}
