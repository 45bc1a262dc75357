//! # Pairswap Exchange Engine
//!
//! ## Purpose
//!
//! The stateful core of the token-exchange protocol: a [`PoolRegistry`]
//! owning one [`LiquidityPool`] per unordered asset pair, each pool owning
//! its reserves and a [`ShareLedger`] of proportional ownership. Pricing is
//! delegated to the pure math in `pairswap-amm`; asset movement goes through
//! the injected [`AssetLedger`] capability.
//!
//! ## Integration Points
//!
//! - **Input Sources**: host-issued calls carrying the acting account
//! - **Output Destinations**: typed receipts per call, plus a drainable
//!   [`ExchangeEvent`](pairswap_types::ExchangeEvent) log for observers
//! - **External Capability**: any [`AssetLedger`] implementation; a
//!   reference [`InMemoryAssetLedger`] ships for tests and demos
//!
//! ## Execution Model
//!
//! Synchronous and single-writer: mutating entry points take `&mut self`
//! and either fully commit or leave no trace; quotes take `&self` and are
//! pure. The host serializes mutations; the engine carries no locks and no
//! interior mutability.

pub mod config;
pub mod ledger;
pub mod pool;
pub mod registry;
pub mod share_ledger;

pub use config::ExchangeConfig;
pub use ledger::{AssetLedger, InMemoryAssetLedger};
pub use pool::{LiquidityPool, Orientation, ProvisionReceipt, SwapReceipt, WithdrawalReceipt};
pub use registry::PoolRegistry;
pub use share_ledger::ShareLedger;
