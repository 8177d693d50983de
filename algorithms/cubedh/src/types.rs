//! Shared types used across the cubedh library.

use core::fmt;
use core::ops::Range;

use thiserror::Error;

use crate::kernels::constants::{KAPPA_MAX, MAX_COEFFS, MIN_SEED_LEN};

// =============================================================================
// PARAMETER SET
// =============================================================================

/// Session parameters `(d, n, κ)` shared by both parties out-of-band.
///
/// - `d`: tensor rank, even and at least 2. Each party acts on `d / 2` axes.
/// - `n`: length of every tensor axis and side of every matrix.
/// - `kappa`: coefficient bit-width; coefficients live in `Z / 2^kappa`.
///
/// A `Params` value can only be obtained through [`Params::new`], so every
/// instance in circulation is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Params {
    d: usize,
    n: usize,
    kappa: u32,
    len: usize,
}

impl Params {
    /// Reference parameter set: `d = 4, n = 2, κ = 16`.
    pub const REFERENCE: Self = Self {
        d: 4,
        n: 2,
        kappa: 16,
        len: 16,
    };

    /// Larger parameter set: `d = 4, n = 3, κ = 32`.
    pub const WIDE: Self = Self {
        d: 4,
        n: 3,
        kappa: 32,
        len: 81,
    };

    /// Validate and build a parameter set.
    ///
    /// # Errors
    /// Returns [`ParamError`] if `d` is odd or below 2, `n` is zero, `kappa` is
    /// not a multiple of 8 in `8..=64`, or `n^d` exceeds [`MAX_COEFFS`].
    pub fn new(d: usize, n: usize, kappa: u32) -> Result<Self, ParamError> {
        if d < 2 {
            return Err(ParamError::RankTooSmall(d));
        }
        if !d.is_multiple_of(2) {
            return Err(ParamError::OddRank(d));
        }
        if n == 0 {
            return Err(ParamError::ZeroDimension);
        }
        if !kappa.is_multiple_of(8) {
            return Err(ParamError::KappaNotByteAligned(kappa));
        }
        if kappa == 0 || kappa > KAPPA_MAX {
            return Err(ParamError::KappaOutOfRange(kappa));
        }
        let exp = u32::try_from(d).map_err(|_| ParamError::TensorTooLarge { d, n })?;
        let len = n
            .checked_pow(exp)
            .filter(|&len| len <= MAX_COEFFS)
            .ok_or(ParamError::TensorTooLarge { d, n })?;

        Ok(Self { d, n, kappa, len })
    }

    /// Tensor rank.
    #[inline]
    pub const fn d(&self) -> usize {
        self.d
    }

    /// Axis length / matrix side.
    #[inline]
    pub const fn n(&self) -> usize {
        self.n
    }

    /// Coefficient bit-width.
    #[inline]
    pub const fn kappa(&self) -> u32 {
        self.kappa
    }

    /// Number of axes each party acts on (`d / 2`).
    #[inline]
    pub const fn half(&self) -> usize {
        self.d / 2
    }

    /// Number of tensor coefficients (`n^d`).
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a valid tensor has at least one coefficient.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes per encoded coefficient (`κ / 8`).
    #[inline]
    pub const fn coeff_bytes(&self) -> usize {
        (self.kappa / 8) as usize
    }

    /// Number of coefficients in a matrix tuple (`d/2 · n²`).
    #[inline]
    pub const fn matrix_tuple_len(&self) -> usize {
        self.half() * self.n * self.n
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n = {}, d = {}, kappa = {}", self.n, self.d, self.kappa)
    }
}

// =============================================================================
// ACTION SIDE
// =============================================================================

/// Which half of the tensor axes a matrix tuple acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Axes `0 .. d/2`.
    First,
    /// Axes `d/2 .. d`.
    Second,
}

impl Side {
    /// Index of the first axis in this half.
    #[inline]
    pub const fn offset(self, params: &Params) -> usize {
        match self {
            Self::First => 0,
            Self::Second => params.half(),
        }
    }

    /// The axes this half covers.
    #[inline]
    pub const fn axes(self, params: &Params) -> Range<usize> {
        let start = self.offset(params);
        start..start + params.half()
    }

    /// The opposite half.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first half"),
            Self::Second => f.write_str("second half"),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Invalid session configuration. Detected before any seed is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamError {
    /// `d` must be even so the axes split into two equal halves.
    #[error("tensor rank d = {0} must be even")]
    OddRank(usize),
    /// `d` must be at least 2.
    #[error("tensor rank d = {0} must be at least 2")]
    RankTooSmall(usize),
    /// `n` must be at least 1.
    #[error("axis dimension n must be at least 1")]
    ZeroDimension,
    /// `κ` must be a multiple of 8.
    #[error("kappa = {0} must be a multiple of 8")]
    KappaNotByteAligned(u32),
    /// `κ` must be in `8..=64`.
    #[error("kappa = {0} must be between 8 and {max}", max = KAPPA_MAX)]
    KappaOutOfRange(u32),
    /// `n^d` exceeds the coefficient limit.
    #[error("tensor with d = {d}, n = {n} has too many coefficients")]
    TensorTooLarge {
        /// Requested rank.
        d: usize,
        /// Requested dimension.
        n: usize,
    },
    /// Seed length below the entropy floor.
    #[error("seed length {0} bytes is below the {min}-byte minimum", min = MIN_SEED_LEN)]
    SeedTooShort(usize),
}

/// Protocol stage, used for state-machine errors and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeState {
    /// Nothing computed yet.
    Init,
    /// Seeds drawn from the entropy source.
    SeedsGenerated,
    /// Both action paths evaluated.
    ActionsComputed,
    /// Both keys hashed.
    KeysDerived,
    /// Keys agreed.
    Success,
    /// Keys disagreed. Terminal.
    Mismatch,
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "INIT",
            Self::SeedsGenerated => "SEEDS_GENERATED",
            Self::ActionsComputed => "ACTIONS_COMPUTED",
            Self::KeysDerived => "KEYS_DERIVED",
            Self::Success => "SUCCESS",
            Self::Mismatch => "MISMATCH",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by generation, action and the exchange protocol.
#[derive(Debug, Error)]
pub enum KexError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ParamError),
    /// The secure random source failed.
    #[error("entropy source failure: {0}")]
    Entropy(String),
    /// Operands were built for different parameter sets.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Parameters of the receiver.
        expected: Params,
        /// Parameters of the operand.
        actual: Params,
    },
    /// Coefficient data of the wrong length.
    #[error("expected {expected} coefficients, got {actual}")]
    LengthMismatch {
        /// Required coefficient count.
        expected: usize,
        /// Supplied coefficient count.
        actual: usize,
    },
    /// A coefficient outside `[0, 2^κ)`.
    #[error("coefficient {value:#x} at position {index} exceeds {kappa} bits")]
    CoefficientOutOfRange {
        /// Flat position.
        index: usize,
        /// Offending value.
        value: u64,
        /// Coefficient width.
        kappa: u32,
    },
    /// An exchange step was called in the wrong state.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// State the exchange was in.
        from: ExchangeState,
        /// State the caller tried to reach.
        to: ExchangeState,
    },
    /// The two independently derived keys differ.
    #[error("key mismatch: the two action paths derived different keys")]
    KeyMismatch,
}
