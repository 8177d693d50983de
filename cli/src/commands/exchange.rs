//! Exchange Commands
//!
//! Fresh exchanges (optionally many, spread over Rayon) and seed replay.

use anyhow::{Context, Result};
use cubedh::{
    replay_exchange, run_exchange, ExchangeConfig, ExchangeOutcome, KexError, OsEntropy, Params,
    Seeds,
};
use rayon::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

use super::report;

// =============================================================================
// FRESH EXCHANGES
// =============================================================================

/// Run `runs` independent exchanges with fresh OS entropy.
pub fn run_exchanges(params: Params, runs: usize, dump: bool) -> Result<()> {
    let config = ExchangeConfig::new(params);
    println!("parameters : {params}\n");

    if runs <= 1 {
        let t0 = Instant::now();
        let result = run_exchange(config, &mut OsEntropy);
        let elapsed = t0.elapsed().as_secs_f64();
        return finish_one(result, elapsed, dump);
    }

    let t0 = Instant::now();
    let results: Vec<Result<ExchangeOutcome, KexError>> = (0..runs)
        .into_par_iter()
        .map(|_| run_exchange(config, &mut OsEntropy))
        .collect();
    let elapsed = t0.elapsed().as_secs_f64();

    let mut stdout = io::stdout().lock();
    let mut failed = 0;
    for (i, result) in results.iter().enumerate() {
        if !report_run(&mut stdout, i, result, dump)? {
            failed += 1;
        }
    }
    drop(stdout);

    println!();
    if failed == 0 {
        println!("All {runs} exchanges agreed ({elapsed:.3} seconds)");
        Ok(())
    } else {
        eprintln!("WARNING: {failed} of {runs} exchanges did NOT agree");
        anyhow::bail!("{failed} exchange(s) failed")
    }
}

/// One line per run, preceded by the full dump when requested.
/// Returns whether the run succeeded.
fn report_run(
    out: &mut impl Write,
    index: usize,
    result: &Result<ExchangeOutcome, KexError>,
    dump: bool,
) -> io::Result<bool> {
    match result {
        Ok(outcome) => {
            if dump {
                writeln!(out, "--- run {index} ---")?;
                report::dump(out, outcome)?;
                report::seeds(out, outcome)?;
            }
            writeln!(out, "run {index:>4}: SUCCESS key = {}", outcome.key.to_hex())?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "run {index:>4}: FAIL ({e})")?;
            Ok(false)
        }
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Re-run an exchange from hex-encoded seeds.
pub fn replay(
    params: Params,
    tensor_seed: &str,
    seed_a: &str,
    seed_b: &str,
    dump: bool,
) -> Result<()> {
    let seeds = Seeds {
        tensor: hex::decode(tensor_seed).context("Invalid tensor seed hex")?,
        secret_a: hex::decode(seed_a).context("Invalid seed A hex")?,
        secret_b: hex::decode(seed_b).context("Invalid seed B hex")?,
    };
    println!("parameters : {params}\n");

    let t0 = Instant::now();
    let result = replay_exchange(params, seeds);
    finish_one(result, t0.elapsed().as_secs_f64(), dump)
}

fn finish_one(result: Result<ExchangeOutcome, KexError>, elapsed: f64, dump: bool) -> Result<()> {
    match result {
        Ok(outcome) => {
            if dump {
                let mut stdout = io::stdout().lock();
                report::dump(&mut stdout, &outcome)?;
                report::seeds(&mut stdout, &outcome)?;
                writeln!(stdout)?;
            }
            println!("SUCCESS ({elapsed} seconds)\nkey = {}", outcome.key.to_hex());
            Ok(())
        }
        Err(KexError::KeyMismatch) => {
            println!("FAIL");
            anyhow::bail!("derived keys differ")
        }
        Err(e) => Err(e).context("Exchange aborted"),
    }
}
