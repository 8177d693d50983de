//! Exchange Protocol
//!
//! Drives one complete key exchange as a state machine:
//!
//! ```text
//! INIT -> SEEDS_GENERATED -> ACTIONS_COMPUTED -> KEYS_DERIVED -> SUCCESS | MISMATCH
//! ```
//!
//! Party 1 holds `A` (first half), party 2 holds `B` (second half). The two
//! paths `T -B-> T_B -A-> T_AB` and `T -A-> T_A -B-> T_BA` are computed
//! independently and must hash to the same key. A mismatch is terminal and
//! points at a defect, not a transient fault: replaying the same seeds
//! reproduces it, so a retry needs a fresh [`Exchange`].

use tracing::{debug, trace, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::engine::generate_tensor;
use crate::engine::parallel::join_paths;
use crate::keys::{derive_key, SharedKey};
use crate::kernels::constants::{MIN_SEED_LEN, SECRET_SEED_LEN, TENSOR_SEED_LEN};
use crate::party::Party;
use crate::tensor::Tensor;
use crate::types::{ExchangeState, KexError, ParamError, Params, Side};

// =============================================================================
// ENTROPY
// =============================================================================

/// Source of seed bytes.
pub trait EntropySource {
    /// Fill `buf` completely with unpredictable bytes.
    ///
    /// # Errors
    /// Returns [`KexError::Entropy`] if the source is unavailable or short.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), KexError>;
}

/// Operating-system CSPRNG via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), KexError> {
        getrandom::fill(buf).map_err(|e| KexError::Entropy(e.to_string()))
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Per-session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Tensor shape and coefficient width.
    pub params: Params,
    /// Length of the public tensor seed (bytes).
    pub tensor_seed_len: usize,
    /// Length of each secret seed (bytes).
    pub secret_seed_len: usize,
}

impl ExchangeConfig {
    /// Default seed sizes for `params`.
    pub const fn new(params: Params) -> Self {
        Self {
            params,
            tensor_seed_len: TENSOR_SEED_LEN,
            secret_seed_len: SECRET_SEED_LEN,
        }
    }

    /// Check the seed lengths against the entropy floor.
    ///
    /// # Errors
    /// Returns [`ParamError::SeedTooShort`] for any seed under 128 bits.
    pub const fn validate(&self) -> Result<(), ParamError> {
        if self.tensor_seed_len < MIN_SEED_LEN {
            return Err(ParamError::SeedTooShort(self.tensor_seed_len));
        }
        if self.secret_seed_len < MIN_SEED_LEN {
            return Err(ParamError::SeedTooShort(self.secret_seed_len));
        }
        Ok(())
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::new(Params::REFERENCE)
    }
}

// =============================================================================
// SEEDS
// =============================================================================

/// The three seeds of one exchange. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seeds {
    /// Seed of the public tensor `T`.
    pub tensor: Vec<u8>,
    /// Seed of party 1's secret `A`.
    pub secret_a: Vec<u8>,
    /// Seed of party 2's secret `B`.
    pub secret_b: Vec<u8>,
}

impl Seeds {
    /// Draw fresh seeds of the configured lengths.
    ///
    /// # Errors
    /// Propagates any failure of `entropy`.
    pub fn generate(
        config: &ExchangeConfig,
        entropy: &mut impl EntropySource,
    ) -> Result<Self, KexError> {
        let mut seeds = Self {
            tensor: vec![0u8; config.tensor_seed_len],
            secret_a: vec![0u8; config.secret_seed_len],
            secret_b: vec![0u8; config.secret_seed_len],
        };
        entropy.fill(&mut seeds.tensor)?;
        entropy.fill(&mut seeds.secret_a)?;
        entropy.fill(&mut seeds.secret_b)?;
        Ok(seeds)
    }
}

impl core::fmt::Debug for Seeds {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Seeds")
            .field("tensor", &self.tensor.len())
            .field("secret_a", &self.secret_a.len())
            .field("secret_b", &self.secret_b.len())
            .finish()
    }
}

// =============================================================================
// TRANSCRIPT & OUTCOME
// =============================================================================

/// Public and agreed tensors of one exchange, for reporting.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Public base tensor `T`.
    pub base: Tensor,
    /// `T_A`, published by party 1.
    pub public_a: Tensor,
    /// `T_B`, published by party 2.
    pub public_b: Tensor,
    /// `T_AB = T_BA`, the agreed secret tensor.
    pub shared: Tensor,
}

/// Result of a successful exchange.
#[derive(Debug)]
pub struct ExchangeOutcome {
    /// The agreed key.
    pub key: SharedKey,
    /// Seeds that reproduce this exchange.
    pub seeds: Seeds,
    /// Intermediate tensors.
    pub transcript: Transcript,
    /// Party 1 (first half).
    pub party_a: Party,
    /// Party 2 (second half).
    pub party_b: Party,
}

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Tensors produced by the two action paths.
#[derive(Debug)]
struct Paths {
    base: Tensor,
    public_a: Tensor,
    public_b: Tensor,
    t_ab: Tensor,
    t_ba: Tensor,
}

/// One key-exchange run.
#[derive(Debug)]
pub struct Exchange {
    config: ExchangeConfig,
    state: ExchangeState,
    seeds: Option<Seeds>,
    parties: Option<(Party, Party)>,
    paths: Option<Paths>,
    keys: Option<(SharedKey, SharedKey)>,
}

impl Exchange {
    /// Start a new exchange.
    ///
    /// # Errors
    /// Returns [`KexError::Config`] if the seed lengths are too short.
    pub fn new(config: ExchangeConfig) -> Result<Self, KexError> {
        config.validate()?;
        Ok(Self {
            config,
            state: ExchangeState::Init,
            seeds: None,
            parties: None,
            paths: None,
            keys: None,
        })
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> ExchangeState {
        self.state
    }

    /// Session configuration.
    #[inline]
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// `INIT -> SEEDS_GENERATED`: draw three fresh seeds.
    ///
    /// An entropy failure leaves the exchange in `INIT` with no seed state.
    ///
    /// # Errors
    /// [`KexError::InvalidTransition`] outside `INIT`; [`KexError::Entropy`]
    /// if the source fails.
    pub fn generate_seeds(&mut self, entropy: &mut impl EntropySource) -> Result<(), KexError> {
        self.expect_state(ExchangeState::Init, ExchangeState::SeedsGenerated)?;
        let seeds = Seeds::generate(&self.config, entropy).inspect_err(|e| {
            warn!(error = %e, "entropy source failed; exchange aborted");
        })?;
        self.accept_seeds(seeds);
        Ok(())
    }

    /// `INIT -> SEEDS_GENERATED` with caller-supplied seeds (replay).
    ///
    /// # Errors
    /// [`KexError::InvalidTransition`] outside `INIT`.
    pub fn with_seeds(&mut self, seeds: Seeds) -> Result<(), KexError> {
        self.expect_state(ExchangeState::Init, ExchangeState::SeedsGenerated)?;
        self.accept_seeds(seeds);
        Ok(())
    }

    fn accept_seeds(&mut self, seeds: Seeds) {
        self.seeds = Some(seeds);
        self.transition(ExchangeState::SeedsGenerated);
    }

    /// `SEEDS_GENERATED -> ACTIONS_COMPUTED`: generate `T`, `A`, `B` and
    /// evaluate both paths.
    ///
    /// # Errors
    /// [`KexError::InvalidTransition`] outside `SEEDS_GENERATED`.
    pub fn compute_actions(&mut self) -> Result<(), KexError> {
        self.expect_state(
            ExchangeState::SeedsGenerated,
            ExchangeState::ActionsComputed,
        )?;
        let seeds = self.seeds.as_ref().ok_or(KexError::InvalidTransition {
            from: self.state,
            to: ExchangeState::ActionsComputed,
        })?;
        let params = self.config.params;

        let base = generate_tensor(&seeds.tensor, &params);
        let party_a = Party::from_seed(&params, Side::First, &seeds.secret_a);
        let party_b = Party::from_seed(&params, Side::Second, &seeds.secret_b);
        trace!(tensor = ?base.as_slice(), "public base tensor");

        let (path_ab, path_ba) = join_paths(
            || -> Result<(Tensor, Tensor), KexError> {
                let public_b = party_b.public_value(&base)?;
                let t_ab = party_a.shared_tensor(&public_b)?;
                Ok((public_b, t_ab))
            },
            || -> Result<(Tensor, Tensor), KexError> {
                let public_a = party_a.public_value(&base)?;
                let t_ba = party_b.shared_tensor(&public_a)?;
                Ok((public_a, t_ba))
            },
        );
        let (public_b, t_ab) = path_ab?;
        let (public_a, t_ba) = path_ba?;

        self.paths = Some(Paths {
            base,
            public_a,
            public_b,
            t_ab,
            t_ba,
        });
        self.parties = Some((party_a, party_b));
        self.transition(ExchangeState::ActionsComputed);
        Ok(())
    }

    /// `ACTIONS_COMPUTED -> KEYS_DERIVED`: hash both final tensors.
    ///
    /// # Errors
    /// [`KexError::InvalidTransition`] outside `ACTIONS_COMPUTED`.
    pub fn derive_keys(&mut self) -> Result<(), KexError> {
        self.expect_state(ExchangeState::ActionsComputed, ExchangeState::KeysDerived)?;
        let paths = self.paths.as_ref().ok_or(KexError::InvalidTransition {
            from: self.state,
            to: ExchangeState::KeysDerived,
        })?;
        let (key_ab, key_ba) = join_paths(|| derive_key(&paths.t_ab), || derive_key(&paths.t_ba));
        self.keys = Some((key_ab, key_ba));
        self.transition(ExchangeState::KeysDerived);
        Ok(())
    }

    /// `KEYS_DERIVED -> SUCCESS | MISMATCH`: compare the keys.
    ///
    /// # Errors
    /// [`KexError::KeyMismatch`] if the keys differ (the exchange is then
    /// terminally in `MISMATCH`); [`KexError::InvalidTransition`] outside
    /// `KEYS_DERIVED`.
    pub fn finish(&mut self) -> Result<ExchangeOutcome, KexError> {
        self.expect_state(ExchangeState::KeysDerived, ExchangeState::Success)?;
        let invalid = KexError::InvalidTransition {
            from: self.state,
            to: ExchangeState::Success,
        };
        let (Some((key_ab, key_ba)), Some(paths), Some((party_a, party_b)), Some(seeds)) = (
            self.keys.take(),
            self.paths.take(),
            self.parties.take(),
            self.seeds.take(),
        ) else {
            return Err(invalid);
        };

        if key_ab != key_ba {
            self.transition(ExchangeState::Mismatch);
            warn!(params = %self.config.params, "derived keys differ");
            return Err(KexError::KeyMismatch);
        }

        self.transition(ExchangeState::Success);
        Ok(ExchangeOutcome {
            key: key_ab,
            seeds,
            transcript: Transcript {
                base: paths.base,
                public_a: paths.public_a,
                public_b: paths.public_b,
                shared: paths.t_ab,
            },
            party_a,
            party_b,
        })
    }

    /// Run every remaining step from the current state.
    ///
    /// # Errors
    /// Any error of the individual steps.
    pub fn run(&mut self, entropy: &mut impl EntropySource) -> Result<ExchangeOutcome, KexError> {
        if self.state == ExchangeState::Init {
            self.generate_seeds(entropy)?;
        }
        if self.state == ExchangeState::SeedsGenerated {
            self.compute_actions()?;
        }
        if self.state == ExchangeState::ActionsComputed {
            self.derive_keys()?;
        }
        self.finish()
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn expect_state(&self, from: ExchangeState, to: ExchangeState) -> Result<(), KexError> {
        if self.state == from {
            Ok(())
        } else {
            Err(KexError::InvalidTransition {
                from: self.state,
                to,
            })
        }
    }

    fn transition(&mut self, to: ExchangeState) {
        debug!(from = %self.state, %to, "exchange transition");
        self.state = to;
    }
}

// =============================================================================
// DRIVERS
// =============================================================================

/// Run a complete exchange with fresh seeds from `entropy`.
///
/// # Errors
/// [`KexError::Config`], [`KexError::Entropy`] or [`KexError::KeyMismatch`].
///
/// # Example
/// ```rust
/// use cubedh::{run_exchange, ExchangeConfig, OsEntropy};
///
/// let outcome = run_exchange(ExchangeConfig::default(), &mut OsEntropy)?;
/// assert_eq!(outcome.key.as_bytes().len(), 32);
/// # Ok::<(), cubedh::KexError>(())
/// ```
pub fn run_exchange(
    config: ExchangeConfig,
    entropy: &mut impl EntropySource,
) -> Result<ExchangeOutcome, KexError> {
    Exchange::new(config)?.run(entropy)
}

/// Re-run an exchange from known seeds. Deterministic.
///
/// Seed lengths are taken as given; the config's lengths only govern
/// fresh generation.
///
/// # Errors
/// [`KexError::KeyMismatch`] if the keys disagree.
pub fn replay_exchange(params: Params, seeds: Seeds) -> Result<ExchangeOutcome, KexError> {
    let mut exchange = Exchange {
        config: ExchangeConfig::new(params),
        state: ExchangeState::Init,
        seeds: None,
        parties: None,
        paths: None,
        keys: None,
    };
    exchange.with_seeds(seeds)?;
    exchange.compute_actions()?;
    exchange.derive_keys()?;
    exchange.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Counter-based source for reproducible tests.
    struct CountingEntropy(u8);

    impl EntropySource for CountingEntropy {
        fn fill(&mut self, buf: &mut [u8]) -> Result<(), KexError> {
            for b in buf {
                *b = self.0;
                self.0 = self.0.wrapping_add(1);
            }
            Ok(())
        }
    }

    struct BrokenEntropy;

    impl EntropySource for BrokenEntropy {
        fn fill(&mut self, _buf: &mut [u8]) -> Result<(), KexError> {
            Err(KexError::Entropy("device unavailable".into()))
        }
    }

    #[test]
    fn steps_walk_every_state() {
        let mut ex = Exchange::new(ExchangeConfig::default()).unwrap();
        assert_eq!(ex.state(), ExchangeState::Init);
        ex.generate_seeds(&mut CountingEntropy(0)).unwrap();
        assert_eq!(ex.state(), ExchangeState::SeedsGenerated);
        ex.compute_actions().unwrap();
        assert_eq!(ex.state(), ExchangeState::ActionsComputed);
        ex.derive_keys().unwrap();
        assert_eq!(ex.state(), ExchangeState::KeysDerived);
        let outcome = ex.finish().unwrap();
        assert_eq!(ex.state(), ExchangeState::Success);
        assert_eq!(outcome.transcript.shared.params(), &Params::REFERENCE);
    }

    #[test]
    fn counting_seeds_are_split_in_order() {
        let seeds =
            Seeds::generate(&ExchangeConfig::default(), &mut CountingEntropy(0)).unwrap();
        assert_eq!(seeds.tensor, (0..32).collect::<Vec<u8>>());
        assert_eq!(seeds.secret_a, (32..48).collect::<Vec<u8>>());
        assert_eq!(seeds.secret_b, (48..64).collect::<Vec<u8>>());
    }

    #[test]
    fn out_of_order_step_is_rejected() {
        let mut ex = Exchange::new(ExchangeConfig::default()).unwrap();
        assert!(matches!(
            ex.compute_actions(),
            Err(KexError::InvalidTransition {
                from: ExchangeState::Init,
                to: ExchangeState::ActionsComputed
            })
        ));
        assert!(matches!(ex.finish(), Err(KexError::InvalidTransition { .. })));
    }

    #[test]
    fn entropy_failure_aborts_before_seeds() {
        let mut ex = Exchange::new(ExchangeConfig::default()).unwrap();
        assert!(matches!(
            ex.run(&mut BrokenEntropy),
            Err(KexError::Entropy(_))
        ));
        assert_eq!(ex.state(), ExchangeState::Init);
        assert!(ex.seeds.is_none());
    }

    #[test]
    fn short_seeds_are_a_config_error() {
        let config = ExchangeConfig {
            secret_seed_len: 8,
            ..ExchangeConfig::default()
        };
        assert!(matches!(
            Exchange::new(config),
            Err(KexError::Config(ParamError::SeedTooShort(8)))
        ));
    }

    #[test]
    fn finished_exchange_cannot_rerun() {
        let mut ex = Exchange::new(ExchangeConfig::default()).unwrap();
        ex.run(&mut CountingEntropy(9)).unwrap();
        assert!(matches!(
            ex.run(&mut CountingEntropy(9)),
            Err(KexError::InvalidTransition {
                from: ExchangeState::Success,
                ..
            })
        ));
    }

    #[test]
    fn tampered_key_ends_in_mismatch() {
        let mut ex = Exchange::new(ExchangeConfig::default()).unwrap();
        ex.generate_seeds(&mut CountingEntropy(1)).unwrap();
        ex.compute_actions().unwrap();
        ex.derive_keys().unwrap();
        if let Some((_, key_ba)) = ex.keys.as_mut() {
            *key_ba = SharedKey::from_bytes([0u8; 32]);
        }
        assert!(matches!(ex.finish(), Err(KexError::KeyMismatch)));
        assert_eq!(ex.state(), ExchangeState::Mismatch);
        assert!(matches!(
            ex.finish(),
            Err(KexError::InvalidTransition {
                from: ExchangeState::Mismatch,
                ..
            })
        ));
    }

    #[test]
    fn replay_reproduces_key() {
        let outcome = run_exchange(ExchangeConfig::default(), &mut CountingEntropy(3)).unwrap();
        let replayed = replay_exchange(Params::REFERENCE, outcome.seeds.clone()).unwrap();
        assert_eq!(outcome.key, replayed.key);
        assert_eq!(outcome.transcript.shared, replayed.transcript.shared);
    }

    #[test]
    fn transcript_is_consistent_with_parties() {
        let outcome = run_exchange(ExchangeConfig::new(Params::WIDE), &mut OsEntropy).unwrap();
        let t = &outcome.transcript;
        assert_eq!(outcome.party_a.apply(&t.base).unwrap(), t.public_a);
        assert_eq!(outcome.party_b.apply(&t.base).unwrap(), t.public_b);
        assert_eq!(outcome.party_b.apply(&t.public_a).unwrap(), t.shared);
    }
}
