//! Check Command
//!
//! Verify golden vectors from a JSON file (same layout as the library's
//! `tests/test_vectors.json`).

use anyhow::{Context, Result};
use cubedh::{replay_exchange, Params, Seeds};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Deserialize)]
struct Vector {
    name: String,
    d: usize,
    n: usize,
    kappa: u32,
    tensor_seed: String,
    seed_a: String,
    seed_b: String,
    key: String,
}

#[derive(Deserialize)]
struct VectorFile {
    vectors: Vec<Vector>,
}

// =============================================================================
// CHECK
// =============================================================================

/// Replay every vector and compare the derived key.
pub fn check_mode(vectors_file: &PathBuf) -> Result<()> {
    let file = File::open(vectors_file)
        .with_context(|| format!("Failed to open: {}", vectors_file.display()))?;
    let data: VectorFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse: {}", vectors_file.display()))?;

    let total = data.vectors.len();
    let mut failed = 0;

    for vector in &data.vectors {
        match check_vector(vector) {
            Ok(true) => println!("{}: OK", vector.name),
            Ok(false) => {
                println!("{}: FAILED", vector.name);
                failed += 1;
            }
            Err(e) => {
                println!("{}: FAILED ({e:#})", vector.name);
                failed += 1;
            }
        }
    }

    println!();
    if failed == 0 {
        println!("All {total} vectors verified");
        Ok(())
    } else {
        eprintln!("WARNING: {failed} of {total} vectors did NOT match");
        anyhow::bail!("{failed} vector(s) failed")
    }
}

fn check_vector(vector: &Vector) -> Result<bool> {
    let params = Params::new(vector.d, vector.n, vector.kappa)?;
    let seeds = Seeds {
        tensor: hex::decode(&vector.tensor_seed).context("tensor_seed")?,
        secret_a: hex::decode(&vector.seed_a).context("seed_a")?,
        secret_b: hex::decode(&vector.seed_b).context("seed_b")?,
    };
    let outcome = replay_exchange(params, seeds)?;
    Ok(outcome.key.to_hex() == vector.key)
}
