pub mod memory;

use crate::core::reactive::Revision;
use crate::core::series::TimeSeries;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Holds the raw net value history fetched from the data source.
///
/// Every fetch takes a generation ticket; only the completion holding the
/// latest ticket may replace the series, and `reset` invalidates all
/// outstanding tickets.
#[derive(Debug, Default)]
pub struct NetValueStore {
    inner: RwLock<Inner>,
    revision: Revision,
}

#[derive(Debug, Default)]
struct Inner {
    series: TimeSeries,
    generation: u64,
}

impl NetValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> TimeSeries {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .series
            .clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Starts a fetch and returns its ticket, superseding earlier ones.
    pub fn begin_fetch(&self) -> u64 {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.generation += 1;
        inner.generation
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
            == ticket
    }

    /// Replaces the whole series if `ticket` is still the latest one.
    /// Returns whether the series was replaced.
    pub fn replace(&self, ticket: u64, series: TimeSeries) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.generation != ticket {
            debug!(
                ticket,
                current = inner.generation,
                "Discarding superseded net value fetch"
            );
            return false;
        }
        inner.series = series;
        self.revision.bump();
        true
    }

    /// Clears the series and invalidates in-flight fetches.
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.generation += 1;
        inner.series = TimeSeries::empty();
        self.revision.bump();
    }
}
