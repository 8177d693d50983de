//! cubedh Constants
//!
//! Seed sizes follow the reference parameterization: a 256-bit seed for the
//! public tensor and 128-bit seeds for each party's secret. Any length at or
//! above [`MIN_SEED_LEN`] is accepted.

// =============================================================================
// COEFFICIENTS
// =============================================================================

/// Widest supported coefficient (bits). Coefficients are stored in `u64`.
pub const KAPPA_MAX: u32 = 64;

/// Largest accepted tensor (`n^d` coefficients): 128 MiB of `u64`.
pub const MAX_COEFFS: usize = 1 << 24;

// =============================================================================
// SEEDS
// =============================================================================

/// Default seed length for the public tensor (bytes).
pub const TENSOR_SEED_LEN: usize = 32;

/// Default seed length for each secret matrix tuple (bytes).
pub const SECRET_SEED_LEN: usize = 16;

/// Entropy floor for any seed: 128 bits.
pub const MIN_SEED_LEN: usize = 16;

// =============================================================================
// KEYS
// =============================================================================

/// Derived key length: SHA3-256 digest size (bytes).
pub const KEY_SIZE: usize = 32;
