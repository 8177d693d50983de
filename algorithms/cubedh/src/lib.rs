//! # cubedh
//!
//! Symmetric key exchange from commuting tensor actions.
//!
//! Both parties share a public random tensor `T` of rank `d` with `n^d`
//! coefficients in `Z / 2^κ`. Each party holds a secret tuple of `d/2`
//! matrices and acts on its own half of the axes. The two actions touch
//! disjoint axes and commute, so both parties reach the same tensor and hash
//! it into the same key.

//! # Usage
//! ```rust
//! use cubedh::{run_exchange, ExchangeConfig, OsEntropy, Params};
//!
//! // 1. Full exchange with fresh seeds
//! let outcome = run_exchange(ExchangeConfig::new(Params::REFERENCE), &mut OsEntropy)?;
//! println!("key = {}", outcome.key.to_hex());
//!
//! // 2. Two parties, computed separately
//! use cubedh::{generate_tensor, Party, Side};
//!
//! let p = Params::WIDE;
//! let base = generate_tensor(&[7u8; 32], &p);
//! let alice = Party::from_seed(&p, Side::First, &[1u8; 16]);
//! let bob = Party::from_seed(&p, Side::Second, &[2u8; 16]);
//!
//! let from_alice = alice.public_value(&base)?;
//! let from_bob = bob.public_value(&base)?;
//! assert_eq!(alice.shared_key(&from_bob)?, bob.shared_key(&from_alice)?);
//! # Ok::<(), cubedh::KexError>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod engine;
mod exchange;
#[doc(hidden)]
pub mod kernels; // Public for test/bench use only
mod keys;
mod party;
mod tensor;
pub(crate) mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use engine::{act, generate_matrix_tuple, generate_tensor};
pub use exchange::{
    replay_exchange, run_exchange, EntropySource, Exchange, ExchangeConfig, ExchangeOutcome,
    OsEntropy, Seeds, Transcript,
};
pub use kernels::constants::{
    KEY_SIZE, MAX_COEFFS, MIN_SEED_LEN, SECRET_SEED_LEN, TENSOR_SEED_LEN,
};
pub use keys::{derive_key, encode_tensor, verify_key, SharedKey};
pub use party::Party;
pub use tensor::{flat_position, MatrixTuple, Odometer, Tensor};
pub use types::{ExchangeState, KexError, ParamError, Params, Side};
