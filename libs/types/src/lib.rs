//! Shared type system for the pairswap engine
//!
//! Everything the engine crates agree on lives here: 20-byte asset and
//! account identifiers, the 18-fractional-digit amount discipline, the
//! error taxonomy, and the economic events the registry emits.

pub mod amount;
pub mod error;
pub mod events;
pub mod identifiers;

pub use error::ExchangeError;
pub use events::ExchangeEvent;
pub use identifiers::{AccountId, AssetId, PoolId};

/// Common numeric types re-exported for downstream crates
pub use rust_decimal::Decimal;
