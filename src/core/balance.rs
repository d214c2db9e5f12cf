//! Balance abstractions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An aggregated per-asset balance, already valued in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub asset: String,
    #[serde(default)]
    pub amount: Decimal,
    pub usd_value: Decimal,
}

impl BalanceEntry {
    pub fn new(asset: &str, amount: Decimal, usd_value: Decimal) -> Self {
        Self {
            asset: asset.to_string(),
            amount,
            usd_value,
        }
    }
}

/// Read access to the current balances. Implementations bump `revision` on
/// every change to any of the values below.
pub trait BalanceProvider: Send + Sync {
    fn aggregated_balances(&self) -> Vec<BalanceEntry>;
    fn liabilities(&self) -> Vec<BalanceEntry>;
    fn nf_total_value(&self) -> Decimal;
    fn lp_total(&self, include_nft: bool) -> Decimal;
    fn revision(&self) -> u64;
}

/// A liquidity pool position. Some pools (concentrated liquidity) represent
/// positions as NFTs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityPosition {
    pub pool: String,
    pub usd_value: Decimal,
    #[serde(default)]
    pub nft: bool,
}

/// Total value of the given pool positions, leaving out NFT positions unless
/// `include_nft` is set.
pub fn liquidity_total(positions: &[LiquidityPosition], include_nft: bool) -> Decimal {
    positions
        .iter()
        .filter(|position| include_nft || !position.nft)
        .fold(Decimal::ZERO, |sum, position| {
            sum.saturating_add(position.usd_value)
        })
}
