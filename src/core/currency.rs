//! Currency conversion abstractions

use rust_decimal::Decimal;

/// Currency in which all balances and stored history are denominated.
pub const BASE_CURRENCY: &str = "USD";

pub trait ExchangeRateProvider: Send + Sync {
    /// Rate of `currency` relative to the base currency, if known.
    fn exchange_rate(&self, currency: &str) -> Option<Decimal>;
    fn revision(&self) -> u64;
}

pub fn is_base_currency(currency: &str) -> bool {
    currency.eq_ignore_ascii_case(BASE_CURRENCY)
}
