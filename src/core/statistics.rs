//! Net worth statistics for a single user session.
//!
//! [`StatisticsStore`] ties the balance, price and settings collaborators to
//! the stored net value history and exposes the derived values. Derived reads
//! are synchronous and always reflect the latest input writes; only
//! [`StatisticsStore::fetch_net_value`] suspends.

use crate::core::analytics::{self, PeriodSummary};
use crate::core::balance::BalanceProvider;
use crate::core::clock::{Clock, SystemClock};
use crate::core::currency::ExchangeRateProvider;
use crate::core::notify::{Notification, Notifier};
use crate::core::reactive::Memo;
use crate::core::series::TimeSeries;
use crate::core::settings::SettingsProvider;
use crate::core::source::NetValueSource;
use crate::core::timeframe::{CalendarTimeframes, Timeframe, TimeframeTable};
use crate::store::NetValueStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const FETCH_ERROR_TITLE: &str = "Net value query failed";

pub struct StatisticsStore {
    balances: Arc<dyn BalanceProvider>,
    rates: Arc<dyn ExchangeRateProvider>,
    settings: Arc<dyn SettingsProvider>,
    source: Arc<dyn NetValueSource>,
    notifier: Arc<dyn Notifier>,
    timeframes: Arc<dyn TimeframeTable>,
    clock: Arc<dyn Clock>,
    net_value: NetValueStore,
    total_value: Memo<bool, Decimal>,
    net_worth: Memo<(), Decimal>,
    converted_series: Memo<i64, TimeSeries>,
}

impl StatisticsStore {
    pub fn new(
        balances: Arc<dyn BalanceProvider>,
        rates: Arc<dyn ExchangeRateProvider>,
        settings: Arc<dyn SettingsProvider>,
        source: Arc<dyn NetValueSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            balances,
            rates,
            settings,
            source,
            notifier,
            timeframes: Arc::new(CalendarTimeframes),
            clock: Arc::new(SystemClock),
            net_value: NetValueStore::new(),
            total_value: Memo::new("total_value"),
            net_worth: Memo::new("total_net_worth"),
            converted_series: Memo::new("net_value_series"),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timeframes(mut self, timeframes: Arc<dyn TimeframeTable>) -> Self {
        self.timeframes = timeframes;
        self
    }

    /// The raw history as last fetched, in the base currency.
    pub fn net_value(&self) -> TimeSeries {
        self.net_value.get()
    }

    /// Total value of all balances in USD. NFTs count only with `include_nft`.
    pub fn calculate_total_value(&self, include_nft: bool) -> Decimal {
        self.total_value
            .get_or_compute(include_nft, &[self.balances.revision()], || {
                analytics::calculate_total_value(self.balances.as_ref(), include_nft)
            })
    }

    /// Net worth in the selected display currency.
    pub fn total_net_worth(&self) -> Decimal {
        let deps = [
            self.balances.revision(),
            self.rates.revision(),
            self.settings.revision(),
        ];
        self.net_worth.get_or_compute((), &deps, || {
            let currency = self.settings.currency_symbol();
            let rate = self.rates.exchange_rate(&currency);
            let total = self.calculate_total_value(self.settings.nfts_in_net_value());
            analytics::convert_amount(total, &currency, rate)
        })
    }

    /// Net worth in USD with NFTs always included, independent of settings.
    pub fn total_net_worth_usd(&self) -> Decimal {
        self.calculate_total_value(true)
    }

    /// The stored history from `starting_date` on, in the display currency,
    /// followed by the current net worth at the present instant.
    ///
    /// Returns an empty series when there is no stored history.
    pub fn get_net_value(&self, starting_date: i64) -> TimeSeries {
        let deps = [
            self.net_value.revision(),
            self.rates.revision(),
            self.settings.revision(),
        ];
        let raw = self.net_value.get();
        let converted = self
            .converted_series
            .get_or_compute(starting_date, &deps, || {
                let currency = self.settings.currency_symbol();
                let rate = self.rates.exchange_rate(&currency);
                analytics::filter_and_convert(&raw, starting_date, &currency, rate)
            });

        analytics::append_current_point(
            converted,
            !raw.is_empty(),
            self.clock.now().timestamp(),
            self.total_net_worth(),
        )
    }

    /// Unix timestamp where the lookback window of `timeframe` begins.
    pub fn starting_date(&self, timeframe: Timeframe) -> i64 {
        self.timeframes.starting_date(timeframe, self.clock.now())
    }

    /// Summary of the net worth change over the selected timeframe.
    pub fn overall(&self) -> PeriodSummary {
        let currency = self.settings.currency_symbol();
        let rate = self.rates.exchange_rate(&currency);
        let timeframe = self.settings.selected_timeframe();
        let starting_date = self.starting_date(timeframe);
        debug!(%timeframe, starting_date, "Computing period summary");

        let series = self.get_net_value(starting_date);
        analytics::summarize_period(
            timeframe,
            &currency,
            rate,
            self.settings.floating_precision(),
            self.total_net_worth(),
            &series.data,
        )
    }

    /// Replaces the stored history with a fresh copy from the data source.
    ///
    /// Failures leave the stored history untouched and raise a notification.
    /// When fetches overlap only the most recently started one is applied.
    #[instrument(skip(self))]
    pub async fn fetch_net_value(&self) {
        let ticket = self.net_value.begin_fetch();
        let include_nft = self.settings.nfts_in_net_value();

        match self.source.query_net_value_data(include_nft).await {
            Ok(series) => {
                let points = series.len();
                if self.net_value.replace(ticket, series) {
                    info!(points, include_nft, "Net value history updated");
                }
            }
            Err(e) if self.net_value.is_current(ticket) => {
                self.notifier.notify(Notification {
                    title: FETCH_ERROR_TITLE.to_string(),
                    message: format!("Failed to fetch the net value history: {e}"),
                    display: false,
                });
            }
            Err(e) => {
                debug!(ticket, error = %e, "Ignoring failure of superseded net value fetch");
            }
        }
    }

    /// Drops the stored history, e.g. on logout or account switch.
    pub fn reset(&self) {
        info!("Resetting net value history");
        self.net_value.reset();
    }
}
