//! In-memory balance, rate and settings holders.
//!
//! Each holder bumps its revision on every write so that derived statistics
//! are recomputed on the next read.

use crate::core::balance::{BalanceEntry, BalanceProvider, LiquidityPosition, liquidity_total};
use crate::core::config::{AppConfig, BalancesConfig};
use crate::core::currency::ExchangeRateProvider;
use crate::core::reactive::Revision;
use crate::core::settings::SettingsProvider;
use crate::core::timeframe::Timeframe;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Default)]
pub struct MemoryBalances {
    state: RwLock<BalancesConfig>,
    revision: Revision,
}

impl MemoryBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &BalancesConfig) -> Self {
        Self {
            state: RwLock::new(config.clone()),
            revision: Revision::new(),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut BalancesConfig)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
        let revision = self.revision.bump();
        debug!(revision, "Balances updated");
    }

    pub fn set_assets(&self, assets: Vec<BalanceEntry>) {
        self.update(|state| state.assets = assets);
    }

    pub fn set_liabilities(&self, liabilities: Vec<BalanceEntry>) {
        self.update(|state| state.liabilities = liabilities);
    }

    pub fn set_nfts(&self, nfts: Vec<BalanceEntry>) {
        self.update(|state| state.nfts = nfts);
    }

    pub fn set_liquidity_positions(&self, positions: Vec<LiquidityPosition>) {
        self.update(|state| state.liquidity_positions = positions);
    }

    fn read<T>(&self, f: impl FnOnce(&BalancesConfig) -> T) -> T {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl BalanceProvider for MemoryBalances {
    fn aggregated_balances(&self) -> Vec<BalanceEntry> {
        self.read(|state| state.assets.clone())
    }

    fn liabilities(&self) -> Vec<BalanceEntry> {
        self.read(|state| state.liabilities.clone())
    }

    fn nf_total_value(&self) -> Decimal {
        self.read(|state| {
            state
                .nfts
                .iter()
                .fold(Decimal::ZERO, |sum, nft| sum.saturating_add(nft.usd_value))
        })
    }

    fn lp_total(&self, include_nft: bool) -> Decimal {
        self.read(|state| liquidity_total(&state.liquidity_positions, include_nft))
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }
}

/// Exchange rates relative to the base currency, keyed by upper-case code.
#[derive(Debug, Default)]
pub struct MemoryRates {
    rates: RwLock<HashMap<String, Decimal>>,
    revision: Revision,
}

impl MemoryRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rates(rates: &HashMap<String, Decimal>) -> Self {
        Self {
            rates: RwLock::new(
                rates
                    .iter()
                    .map(|(code, rate)| (code.to_uppercase(), *rate))
                    .collect(),
            ),
            revision: Revision::new(),
        }
    }

    pub fn set_rate(&self, currency: &str, rate: Decimal) {
        self.rates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(currency.to_uppercase(), rate);
        let revision = self.revision.bump();
        debug!(currency, %rate, revision, "Exchange rate updated");
    }

    pub fn remove_rate(&self, currency: &str) {
        self.rates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&currency.to_uppercase());
        self.revision.bump();
    }
}

impl ExchangeRateProvider for MemoryRates {
    fn exchange_rate(&self, currency: &str) -> Option<Decimal> {
        self.rates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&currency.to_uppercase())
            .copied()
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }
}

#[derive(Debug, Clone)]
struct Settings {
    currency: String,
    floating_precision: u32,
    nfts_in_net_value: bool,
    timeframe: Timeframe,
}

#[derive(Debug)]
pub struct MemorySettings {
    state: RwLock<Settings>,
    revision: Revision,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            state: RwLock::new(Settings {
                currency: config.currency.to_uppercase(),
                floating_precision: config.floating_precision,
                nfts_in_net_value: config.nfts_in_net_value,
                timeframe: config.timeframe,
            }),
            revision: Revision::new(),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Settings)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
        let revision = self.revision.bump();
        debug!(revision, settings = ?state, "Settings updated");
    }

    pub fn set_currency(&self, currency: &str) {
        let currency = currency.to_uppercase();
        self.update(|state| state.currency = currency);
    }

    pub fn set_nfts_in_net_value(&self, include: bool) {
        self.update(|state| state.nfts_in_net_value = include);
    }

    pub fn set_timeframe(&self, timeframe: Timeframe) {
        self.update(|state| state.timeframe = timeframe);
    }

    fn read<T>(&self, f: impl FnOnce(&Settings) -> T) -> T {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl SettingsProvider for MemorySettings {
    fn currency_symbol(&self) -> String {
        self.read(|state| state.currency.clone())
    }

    fn floating_precision(&self) -> u32 {
        self.read(|state| state.floating_precision)
    }

    fn nfts_in_net_value(&self) -> bool {
        self.read(|state| state.nfts_in_net_value)
    }

    fn selected_timeframe(&self) -> Timeframe {
        self.read(|state| state.timeframe)
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balances_totals_and_revisions() {
        let balances = MemoryBalances::new();
        assert_eq!(balances.revision(), 0);

        balances.set_nfts(vec![
            BalanceEntry::new("PUNK-1", dec!(1), dec!(300)),
            BalanceEntry::new("APE-2", dec!(1), dec!(200)),
        ]);
        balances.set_liquidity_positions(vec![
            LiquidityPosition {
                pool: "ETH/USDC".to_string(),
                usd_value: dec!(1000),
                nft: false,
            },
            LiquidityPosition {
                pool: "UNI-V3 ETH/DAI".to_string(),
                usd_value: dec!(400),
                nft: true,
            },
        ]);

        assert_eq!(balances.nf_total_value(), dec!(500));
        assert_eq!(balances.lp_total(true), dec!(1400));
        assert_eq!(balances.lp_total(false), dec!(1000));
        assert_eq!(balances.revision(), 2);
    }

    #[test]
    fn test_rates_are_case_insensitive() {
        let mut initial = HashMap::new();
        initial.insert("eur".to_string(), dec!(0.9));
        let rates = MemoryRates::from_rates(&initial);

        assert_eq!(rates.exchange_rate("EUR"), Some(dec!(0.9)));
        assert_eq!(rates.exchange_rate("gbp"), None);

        rates.set_rate("gbp", dec!(0.8));
        assert_eq!(rates.exchange_rate("GBP"), Some(dec!(0.8)));
        assert_eq!(rates.revision(), 1);

        rates.remove_rate("EUR");
        assert_eq!(rates.exchange_rate("eur"), None);
        assert_eq!(rates.revision(), 2);
    }

    #[test]
    fn test_settings_defaults_and_updates() {
        let settings = MemorySettings::new();
        assert_eq!(settings.currency_symbol(), "USD");
        assert_eq!(settings.floating_precision(), 2);
        assert!(settings.nfts_in_net_value());
        assert_eq!(settings.selected_timeframe(), Timeframe::OneMonth);

        settings.set_currency("eur");
        settings.set_timeframe(Timeframe::OneWeek);
        assert_eq!(settings.currency_symbol(), "EUR");
        assert_eq!(settings.selected_timeframe(), Timeframe::OneWeek);
        assert_eq!(settings.revision(), 2);
    }
}
