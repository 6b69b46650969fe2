//! Curve abstractions.
//!
//! - [`YieldCurve`]: Generic trait for discount factor and rate calculations

mod traits;

pub use traits::YieldCurve;
