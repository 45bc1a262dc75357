//! Engine configuration

use serde::{Deserialize, Serialize};

/// Configuration applied to newly created pools.
///
/// The fee is fixed into each pool at creation; changing the config later
/// affects only pools created afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Swap fee in basis points (30 = 0.3%).
    pub fee_bps: u32,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self { fee_bps: 30 }
    }
}
