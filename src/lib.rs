pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::ui;
use crate::core::config::AppConfig;
use crate::core::notify::NotificationQueue;
use crate::core::settings::SettingsProvider;
use crate::core::source::NetValueSource;
use crate::core::statistics::StatisticsStore;
use crate::core::timeframe::Timeframe;
use crate::providers::util::RetryPolicy;
use crate::store::memory::{MemoryBalances, MemoryRates, MemorySettings};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Summary,
    History,
}

/// Per-invocation overrides of the configured settings.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub timeframe: Option<Timeframe>,
    pub currency: Option<String>,
}

/// The statistics store and the state it derives from, for one user session.
pub struct Session {
    pub statistics: StatisticsStore,
    pub balances: Arc<MemoryBalances>,
    pub rates: Arc<MemoryRates>,
    pub settings: Arc<MemorySettings>,
    pub notifications: Arc<NotificationQueue>,
    has_source: bool,
}

impl Session {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let balances = Arc::new(MemoryBalances::from_config(&config.balances));
        let rates = Arc::new(MemoryRates::from_rates(&config.exchange_rates));
        let settings = Arc::new(MemorySettings::from_config(config));
        let notifications = Arc::new(NotificationQueue::new());

        let source: Arc<dyn NetValueSource> = match &config.source {
            Some(source) => Arc::new(providers::NetValueApi::new(
                &source.base_url,
                RetryPolicy::from(source),
            )?),
            None => Arc::new(providers::UnconfiguredSource),
        };

        let statistics = StatisticsStore::new(
            balances.clone(),
            rates.clone(),
            settings.clone(),
            source,
            notifications.clone(),
        );

        Ok(Self {
            statistics,
            balances,
            rates,
            settings,
            notifications,
            has_source: config.source.is_some(),
        })
    }

    pub fn apply(&self, options: &RunOptions) {
        if let Some(timeframe) = options.timeframe {
            self.settings.set_timeframe(timeframe);
        }
        if let Some(currency) = &options.currency {
            self.settings.set_currency(currency);
        }
    }

    /// Fetches the stored history if a backend is configured.
    pub async fn refresh(&self) {
        if !self.has_source {
            debug!("No net value source configured, skipping history fetch");
            return;
        }
        let pb = ui::new_spinner("Fetching net value history...");
        self.statistics.fetch_net_value().await;
        pb.finish_and_clear();
    }

    /// Logs out: drops the fetched history.
    pub fn reset(&self) {
        self.statistics.reset();
    }
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    options: &RunOptions,
) -> Result<()> {
    info!("Net worth tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let session = Session::from_config(&config)?;
    session.apply(options);
    session.refresh().await;

    let precision = session.settings.floating_precision();
    match command {
        AppCommand::Summary => cli::summary::run(&session.statistics, precision),
        AppCommand::History => cli::history::run(
            &session.statistics,
            session.settings.selected_timeframe(),
            &session.settings.currency_symbol(),
            precision,
        ),
    }

    for notification in session.notifications.drain() {
        eprintln!(
            "\n{}: {}",
            ui::style_text(&notification.title, ui::StyleType::Error),
            notification.message
        );
    }

    Ok(())
}
