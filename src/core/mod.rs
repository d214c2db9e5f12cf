//! Domain types, collaborator abstractions and the statistics engine

pub mod amount;
pub mod analytics;
pub mod balance;
pub mod clock;
pub mod config;
pub mod currency;
pub mod log;
pub mod notify;
pub mod reactive;
pub mod series;
pub mod settings;
pub mod source;
pub mod statistics;
pub mod timeframe;

// Re-export main types for cleaner imports
pub use analytics::PeriodSummary;
pub use balance::{BalanceEntry, BalanceProvider, LiquidityPosition};
pub use currency::ExchangeRateProvider;
pub use series::TimeSeries;
pub use settings::SettingsProvider;
pub use source::NetValueSource;
pub use statistics::StatisticsStore;
pub use timeframe::{Timeframe, TimeframeTable};
