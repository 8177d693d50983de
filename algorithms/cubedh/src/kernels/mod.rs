//! Arithmetic Kernels
//!
//! Coefficient-ring arithmetic and the constants shared by every stage.

pub mod constants;
pub mod ring;
