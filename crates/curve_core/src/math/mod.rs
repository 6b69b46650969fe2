//! Numerical building blocks.
//!
//! - [`linalg`]: Checked inversion, symmetry checks, and variance clipping on
//!   `nalgebra` dense matrices

pub mod linalg;
