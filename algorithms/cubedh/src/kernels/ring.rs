//! Coefficient ring `Z / 2^κ`.
//!
//! Values are held in `u64`. Wrapping arithmetic is arithmetic mod `2^64`,
//! and since `2^κ` divides `2^64` masking afterwards gives the residue mod
//! `2^κ` exactly. Every operation returns a reduced value, so no
//! intermediate ever leaves `[0, 2^κ)`.

use crate::types::Params;

/// Arithmetic modulo `2^κ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    mask: u64,
    /// Bytes drawn per coefficient when decoding from a stream: `⌈κ/8⌉`.
    width: usize,
}

impl Ring {
    /// Ring for the coefficient width of `params`.
    pub const fn new(params: &Params) -> Self {
        Self::with_kappa(params.kappa())
    }

    /// Ring for an explicit `κ` in `1..=64`.
    pub const fn with_kappa(kappa: u32) -> Self {
        let mask = if kappa >= 64 {
            u64::MAX
        } else {
            (1u64 << kappa) - 1
        };
        Self {
            mask,
            width: kappa.div_ceil(8) as usize,
        }
    }

    /// Largest representable coefficient, `2^κ - 1`.
    #[inline]
    pub const fn mask(&self) -> u64 {
        self.mask
    }

    /// Bytes per coefficient in a stream or encoding.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// `x mod 2^κ`.
    #[inline]
    pub const fn reduce(&self, x: u64) -> u64 {
        x & self.mask
    }

    /// `(a + b) mod 2^κ`.
    #[inline]
    pub const fn add(&self, a: u64, b: u64) -> u64 {
        a.wrapping_add(b) & self.mask
    }

    /// `(a · b) mod 2^κ`.
    #[inline]
    pub const fn mul(&self, a: u64, b: u64) -> u64 {
        a.wrapping_mul(b) & self.mask
    }

    /// `acc + a · b`, each step reduced.
    #[inline]
    pub const fn mul_add(&self, acc: u64, a: u64, b: u64) -> u64 {
        self.add(acc, self.mul(a, b))
    }

    /// Whether `x` is a canonical residue.
    #[inline]
    pub const fn contains(&self, x: u64) -> bool {
        x & !self.mask == 0
    }

    /// Interpret `bytes` (at most 8) as a big-endian integer, then reduce.
    #[inline]
    pub fn decode_be(&self, bytes: &[u8]) -> u64 {
        let raw = bytes
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        self.reduce(raw)
    }

    /// Write `x` as exactly `width()` big-endian bytes into `out`.
    #[inline]
    pub fn encode_be(&self, x: u64, out: &mut [u8]) {
        let be = x.to_be_bytes();
        out[..self.width].copy_from_slice(&be[be.len() - self.width..]);
    }
}
