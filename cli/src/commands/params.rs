//! Parameter Arguments
//!
//! A named preset, optionally overridden per field.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use cubedh::Params;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Preset {
    /// d = 4, n = 2, kappa = 16
    Reference,
    /// d = 4, n = 3, kappa = 32
    Wide,
}

impl Preset {
    const fn params(self) -> Params {
        match self {
            Self::Reference => Params::REFERENCE,
            Self::Wide => Params::WIDE,
        }
    }
}

#[derive(Args, Debug)]
pub struct ParamArgs {
    /// Parameter preset
    #[arg(long, value_enum, global = true, default_value_t = Preset::Reference)]
    preset: Preset,

    /// Tensor rank (even)
    #[arg(short = 'd', long = "rank", global = true)]
    d: Option<usize>,

    /// Axis dimension
    #[arg(short = 'n', long = "dim", global = true)]
    n: Option<usize>,

    /// Coefficient bit-width (multiple of 8, at most 64)
    #[arg(short = 'k', long, global = true)]
    kappa: Option<u32>,
}

impl ParamArgs {
    /// Preset with overrides applied, validated.
    pub fn resolve(&self) -> Result<Params> {
        let base = self.preset.params();
        let d = self.d.unwrap_or_else(|| base.d());
        let n = self.n.unwrap_or_else(|| base.n());
        let kappa = self.kappa.unwrap_or_else(|| base.kappa());
        Params::new(d, n, kappa)
            .with_context(|| format!("Invalid parameters d={d} n={n} kappa={kappa}"))
    }
}
