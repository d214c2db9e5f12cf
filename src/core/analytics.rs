//! Pure derivations behind the net worth statistics.
//!
//! Nothing in here reads shared state or the clock; the statistics store feeds
//! in the current inputs and caches the results.
use crate::core::amount::{format_amount, format_percentage, percentage_change};
use crate::core::balance::{BalanceEntry, BalanceProvider};
use crate::core::currency::is_base_currency;
use crate::core::series::TimeSeries;
use crate::core::timeframe::Timeframe;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Formatted snapshot of how net worth moved over the selected timeframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub period: Timeframe,
    pub currency: String,
    pub net_worth: String,
    pub delta: String,
    pub percentage: String,
    /// `None` when net worth did not move.
    pub up: Option<bool>,
}

/// Sums the USD values of a set of balances.
pub fn sum_usd_values(entries: &[BalanceEntry]) -> Decimal {
    entries
        .iter()
        .fold(Decimal::ZERO, |sum, entry| sum.saturating_add(entry.usd_value))
}

/// Assets plus NFTs plus liquidity positions, minus liabilities, in USD.
///
/// NFTs only count when `include_nft` is set; the same flag is passed on to
/// the liquidity pool total.
pub fn calculate_total_value(balances: &dyn BalanceProvider, include_nft: bool) -> Decimal {
    let asset_value = sum_usd_values(&balances.aggregated_balances());
    let liability_value = sum_usd_values(&balances.liabilities());
    let nft_total = if include_nft {
        balances.nf_total_value()
    } else {
        Decimal::ZERO
    };
    let lp_total = balances.lp_total(include_nft);

    let total = asset_value
        .saturating_add(nft_total)
        .saturating_add(lp_total)
        .saturating_sub(liability_value);
    debug!(
        %asset_value, %nft_total, %lp_total, %liability_value, %total,
        include_nft, "Calculated total value"
    );
    total
}

/// Missing rates fall back to parity with the base currency.
pub fn rate_or_unity(rate: Option<Decimal>) -> Decimal {
    rate.unwrap_or(Decimal::ONE)
}

/// Converts a base currency amount into `currency`.
pub fn convert_amount(amount: Decimal, currency: &str, rate: Option<Decimal>) -> Decimal {
    if is_base_currency(currency) {
        return amount;
    }
    amount.saturating_mul(rate_or_unity(rate))
}

/// Keeps the points at or after `starting_date`, converted into `currency`.
///
/// An empty input stays empty.
pub fn filter_and_convert(
    raw: &TimeSeries,
    starting_date: i64,
    currency: &str,
    rate: Option<Decimal>,
) -> TimeSeries {
    let mut series = TimeSeries::empty();
    if raw.is_empty() {
        return series;
    }
    if raw.times.len() != raw.data.len() {
        debug!(
            times = raw.times.len(),
            data = raw.data.len(),
            "Net value series lengths differ, ignoring unmatched entries"
        );
    }

    for (time, value) in raw.points() {
        if time < starting_date {
            continue;
        }
        series.push(time, convert_amount(value, currency, rate));
    }
    series
}

/// Appends the live valuation at `now` to an already converted series.
///
/// A series without stored history is returned unchanged: no data is not the
/// same as data starting now.
pub fn append_current_point(
    mut series: TimeSeries,
    had_history: bool,
    now: i64,
    net_worth: Decimal,
) -> TimeSeries {
    if had_history {
        series.push(now, net_worth);
    }
    series
}

/// Projects the stored history onto the display currency and closes it with
/// the current net worth.
pub fn project_net_value(
    raw: &TimeSeries,
    starting_date: i64,
    currency: &str,
    rate: Option<Decimal>,
    now: i64,
    net_worth: Decimal,
) -> TimeSeries {
    append_current_point(
        filter_and_convert(raw, starting_date, currency, rate),
        !raw.is_empty(),
        now,
        net_worth,
    )
}

/// The first point, or the first non-zero point after it when the first is
/// zero. A zero here means there was no valuation yet.
pub fn starting_value(data: &[Decimal]) -> Decimal {
    match data.split_first() {
        Some((first, rest)) if first.is_zero() => rest
            .iter()
            .copied()
            .find(|value| !value.is_zero())
            .unwrap_or(Decimal::ZERO),
        Some((first, _)) => *first,
        None => Decimal::ZERO,
    }
}

/// Summarizes the change from the start of `data` to `net_worth`.
pub fn summarize_period(
    period: Timeframe,
    currency: &str,
    rate: Option<Decimal>,
    precision: u32,
    net_worth: Decimal,
    data: &[Decimal],
) -> PeriodSummary {
    let starting = starting_value(data);
    let balance_delta = net_worth.saturating_sub(starting);
    let percentage = percentage_change(balance_delta, starting);

    let up = if balance_delta > Decimal::ZERO {
        Some(true)
    } else if balance_delta < Decimal::ZERO {
        Some(false)
    } else {
        None
    };
    debug!(%starting, %balance_delta, ?percentage, ?up, %period, "Summarized period");

    PeriodSummary {
        period,
        currency: currency.to_string(),
        net_worth: format_amount(net_worth, precision),
        delta: format_amount(convert_amount(balance_delta, currency, rate), precision),
        percentage: format_percentage(percentage),
        up,
    }
}
