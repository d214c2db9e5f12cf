use crate::core::balance::{BalanceEntry, LiquidityPosition};
use crate::core::currency::BASE_CURRENCY;
use crate::core::timeframe::Timeframe;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BalancesConfig {
    #[serde(default)]
    pub assets: Vec<BalanceEntry>,
    #[serde(default)]
    pub liabilities: Vec<BalanceEntry>,
    #[serde(default)]
    pub nfts: Vec<BalanceEntry>,
    #[serde(default)]
    pub liquidity_positions: Vec<LiquidityPosition>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    #[serde(default = "default_retries")]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_retries() -> usize {
    2
}

fn default_retry_delay_ms() -> u64 {
    200
}

fn default_currency() -> String {
    BASE_CURRENCY.to_string()
}

fn default_floating_precision() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_floating_precision")]
    pub floating_precision: u32,
    #[serde(default = "default_true")]
    pub nfts_in_net_value: bool,
    #[serde(default)]
    pub timeframe: Timeframe,
    #[serde(default)]
    pub exchange_rates: HashMap<String, Decimal>,
    pub balances: BalancesConfig,
    pub source: Option<SourceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            floating_precision: default_floating_precision(),
            nfts_in_net_value: true,
            timeframe: Timeframe::default(),
            exchange_rates: HashMap::new(),
            balances: BalancesConfig::default(),
            source: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "networth", "networth")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "EUR"
floating_precision: 3
nfts_in_net_value: false
timeframe: "3M"
exchange_rates:
  EUR: "0.92"
  GBP: 0.79
balances:
  assets:
    - asset: "ETH"
      amount: 1.5
      usd_value: "4500.25"
    - asset: "BTC"
      usd_value: 30000
  liabilities:
    - asset: "DAI"
      amount: 1000
      usd_value: "1000.00"
  nfts:
    - asset: "PUNK-7804"
      usd_value: 250000
  liquidity_positions:
    - pool: "ETH/USDC"
      usd_value: "1200"
    - pool: "UNI-V3 WBTC/ETH"
      usd_value: "800"
      nft: true
source:
  base_url: "http://localhost:4242"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.floating_precision, 3);
        assert!(!config.nfts_in_net_value);
        assert_eq!(config.timeframe, Timeframe::ThreeMonths);
        assert_eq!(config.exchange_rates.get("EUR"), Some(&dec!(0.92)));
        assert_eq!(config.exchange_rates.get("GBP"), Some(&dec!(0.79)));

        assert_eq!(config.balances.assets.len(), 2);
        assert_eq!(config.balances.assets[0].asset, "ETH");
        assert_eq!(config.balances.assets[0].amount, dec!(1.5));
        assert_eq!(config.balances.assets[0].usd_value, dec!(4500.25));
        assert_eq!(config.balances.assets[1].amount, Decimal::ZERO);
        assert_eq!(config.balances.assets[1].usd_value, dec!(30000));
        assert_eq!(config.balances.liabilities[0].usd_value, dec!(1000));
        assert_eq!(config.balances.nfts[0].usd_value, dec!(250000));
        assert!(!config.balances.liquidity_positions[0].nft);
        assert!(config.balances.liquidity_positions[1].nft);

        let source = config.source.expect("Expected a source");
        assert_eq!(source.base_url, "http://localhost:4242");
        assert_eq!(source.retries, 2);
        assert_eq!(source.retry_delay_ms, 200);
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("balances: {}").unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.floating_precision, 2);
        assert!(config.nfts_in_net_value);
        assert_eq!(config.timeframe, Timeframe::OneMonth);
        assert!(config.exchange_rates.is_empty());
        assert!(config.balances.assets.is_empty());
        assert!(config.source.is_none());
    }

    #[test]
    fn test_config_rejects_unknown_timeframe() {
        let result = serde_yaml::from_str::<AppConfig>("timeframe: \"6M\"\nbalances: {}");
        assert!(result.is_err());
    }
}
