//! Execution Engine
//!
//! Seeded generation, the group action, and parallel path evaluation.

pub mod action;
pub mod generator;
pub mod parallel;

pub use action::act;
pub use generator::{generate_matrix_tuple, generate_tensor};
