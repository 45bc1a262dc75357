//! Pricing-curve and share-accounting math for the pairswap engine
//!
//! Pure functions over `Decimal` amounts: the fee-retaining constant-product
//! curve ([`CurveMath`]) and the proportional liquidity-share arithmetic
//! ([`ShareMath`]). No state, no I/O. Pool and registry state live in the
//! exchange crate, which delegates every number it commits to this one.
//!
//! All divisions truncate toward zero at 18 fractional digits so results
//! match integer arithmetic over 10^-18 sub-units exactly.

pub mod curve;
pub mod liquidity;

pub use curve::{CurveMath, BPS_DENOMINATOR};
pub use liquidity::ShareMath;

/// Common types for curve calculations
pub use rust_decimal::Decimal;
