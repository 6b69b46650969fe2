//! Market data abstractions.
//!
//! # Components
//!
//! - [`curves`]: The generic [`curves::YieldCurve`] trait
//! - [`error`]: Market data error types ([`MarketDataError`])

pub mod curves;
pub mod error;

pub use curves::YieldCurve;
pub use error::MarketDataError;
