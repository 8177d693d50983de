//! One side of the exchange.
//!
//! A party owns a secret matrix tuple and the half of the axes it acts on.
//! It publishes its action on the base tensor and combines the
//! counterparty's published tensor with its own secret, applied last.

use tracing::trace;
use zeroize::Zeroize;

use crate::engine::{act, generate_matrix_tuple};
use crate::exchange::EntropySource;
use crate::kernels::constants::SECRET_SEED_LEN;
use crate::keys::{derive_key, SharedKey};
use crate::tensor::{ensure_same, MatrixTuple, Tensor};
use crate::types::{KexError, Params, Side};

/// Holder of one secret matrix tuple.
#[derive(Debug, Clone)]
pub struct Party {
    side: Side,
    secret: MatrixTuple,
}

impl Party {
    /// Regenerate a party's secret from its seed.
    pub fn from_seed(params: &Params, side: Side, seed: &[u8]) -> Self {
        Self {
            side,
            secret: generate_matrix_tuple(seed, params),
        }
    }

    /// Fresh party with a secret drawn from `entropy`.
    ///
    /// # Errors
    /// Propagates any failure of `entropy`; no secret is built in that case.
    pub fn generate(
        params: &Params,
        side: Side,
        entropy: &mut impl EntropySource,
    ) -> Result<Self, KexError> {
        let mut seed = [0u8; SECRET_SEED_LEN];
        entropy.fill(&mut seed)?;
        let party = Self::from_seed(params, side, &seed);
        seed.zeroize();
        Ok(party)
    }

    /// Wrap an existing secret.
    pub const fn from_secret(side: Side, secret: MatrixTuple) -> Self {
        Self { side, secret }
    }

    /// Axes this party acts on.
    #[inline]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Parameter set of the secret.
    #[inline]
    pub const fn params(&self) -> &Params {
        self.secret.params()
    }

    /// The secret tuple. Exposed for debugging dumps only.
    #[inline]
    pub const fn secret(&self) -> &MatrixTuple {
        &self.secret
    }

    /// Act with this party's secret on `tensor`.
    ///
    /// # Errors
    /// Returns [`KexError::ShapeMismatch`] if `tensor` uses other parameters.
    pub fn apply(&self, tensor: &Tensor) -> Result<Tensor, KexError> {
        act(tensor, &self.secret, self.side)
    }

    /// The value this party publishes: its action on the public base tensor.
    ///
    /// # Errors
    /// Returns [`KexError::ShapeMismatch`] if `base` uses other parameters.
    pub fn public_value(&self, base: &Tensor) -> Result<Tensor, KexError> {
        let public = self.apply(base)?;
        trace!(side = %self.side, tensor = ?public.as_slice(), "public value");
        Ok(public)
    }

    /// Shared tensor: own secret applied to the counterparty's public value.
    ///
    /// # Errors
    /// Returns [`KexError::ShapeMismatch`] if `counterparty` uses other parameters.
    pub fn shared_tensor(&self, counterparty: &Tensor) -> Result<Tensor, KexError> {
        ensure_same(self.params(), counterparty.params())?;
        self.apply(counterparty)
    }

    /// Shared key derived from [`Party::shared_tensor`].
    ///
    /// # Errors
    /// Returns [`KexError::ShapeMismatch`] if `counterparty` uses other parameters.
    pub fn shared_key(&self, counterparty: &Tensor) -> Result<SharedKey, KexError> {
        self.shared_tensor(counterparty).map(|t| derive_key(&t))
    }
}
