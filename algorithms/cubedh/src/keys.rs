//! Key Derivation
//!
//! Serializes a tensor canonically and hashes it with SHA3-256.

use core::fmt;

use sha3::{Digest, Sha3_256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::kernels::constants::KEY_SIZE;
use crate::kernels::ring::Ring;
use crate::tensor::{Odometer, Tensor};

// =============================================================================
// SHARED KEY
// =============================================================================

/// Symmetric key agreed by an exchange. Compared in constant time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedKey([u8; KEY_SIZE]);

impl SharedKey {
    /// Wrap raw key bytes.
    pub const fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl ConstantTimeEq for SharedKey {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for SharedKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SharedKey {}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedKey(<redacted>)")
    }
}

// =============================================================================
// DERIVATION
// =============================================================================

/// Canonical byte encoding: every coefficient as exactly `κ/8` big-endian
/// bytes, in lexicographic multi-index order.
pub fn encode_tensor(tensor: &Tensor) -> Vec<u8> {
    let params = tensor.params();
    let ring = Ring::new(params);
    let width = params.coeff_bytes();
    let coeffs = tensor.as_slice();

    let mut out = vec![0u8; params.len() * width];
    let mut odo = Odometer::new(params);
    while odo.is_valid() {
        let pos = odo.position();
        ring.encode_be(coeffs[pos], &mut out[pos * width..(pos + 1) * width]);
        odo.advance();
    }
    out
}

/// Derive the symmetric key: `SHA3-256(encode_tensor(tensor))`.
///
/// # Example
/// ```rust
/// use cubedh::{derive_key, generate_tensor, Params};
///
/// let t = generate_tensor(b"seed", &Params::REFERENCE);
/// assert_eq!(derive_key(&t), derive_key(&t.clone()));
/// ```
pub fn derive_key(tensor: &Tensor) -> SharedKey {
    let mut encoded = encode_tensor(tensor);
    let digest = Sha3_256::digest(&encoded);
    encoded.zeroize();
    SharedKey(digest.into())
}

/// Check a tensor against an expected key in constant time.
pub fn verify_key(tensor: &Tensor, expected: &SharedKey) -> bool {
    derive_key(tensor).ct_eq(expected).into()
}
