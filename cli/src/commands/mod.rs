//! CLI Commands
//!
//! All cubedh CLI commands organized as separate modules.

mod check;
mod exchange;
mod params;
mod report;

pub use check::check_mode;
pub use exchange::{replay, run_exchanges};
pub use params::ParamArgs;
