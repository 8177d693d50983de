//! Report Output
//!
//! Console dumps of an exchange, matching the layout of the reference run.

use cubedh::ExchangeOutcome;
use std::io::{self, Write};

/// Print every tensor and secret of a finished exchange.
pub fn dump(out: &mut impl Write, outcome: &ExchangeOutcome) -> io::Result<()> {
    let t = &outcome.transcript;
    writeln!(out, "T (public):\n{}", t.base)?;
    writeln!(out, "A (secret):\n{}", outcome.party_a.secret())?;
    writeln!(out, "B (secret):\n{}", outcome.party_b.secret())?;
    writeln!(out, "T_A (public):\n{}", t.public_a)?;
    writeln!(out, "T_B (public):\n{}", t.public_b)?;
    writeln!(out, "T_AB = T_BA (secret):\n{}", t.shared)
}

/// Print the seeds that reproduce an exchange.
pub fn seeds(out: &mut impl Write, outcome: &ExchangeOutcome) -> io::Result<()> {
    writeln!(out, "tensor seed = {}", hex::encode(&outcome.seeds.tensor))?;
    writeln!(out, "seed A      = {}", hex::encode(&outcome.seeds.secret_a))?;
    writeln!(out, "seed B      = {}", hex::encode(&outcome.seeds.secret_b))
}
