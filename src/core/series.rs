use anyhow::{Result, bail};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net worth history as two parallel sequences: unix timestamps (seconds,
/// non-decreasing) and the value recorded at each of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub times: Vec<i64>,
    pub data: Vec<Decimal>,
}

impl TimeSeries {
    /// Builds a series, rejecting sequences of different lengths.
    pub fn new(times: Vec<i64>, data: Vec<Decimal>) -> Result<Self> {
        if times.len() != data.len() {
            bail!(
                "Mismatched net value series: {} timestamps but {} values",
                times.len(),
                data.len()
            );
        }
        Ok(Self { times, data })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty() && self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.times.len().min(self.data.len())
    }

    pub fn push(&mut self, time: i64, value: Decimal) {
        self.times.push(time);
        self.data.push(value);
    }

    /// Iterates over `(time, value)` pairs. Trailing entries of the longer
    /// sequence are ignored if the series is malformed.
    pub fn points(&self) -> impl Iterator<Item = (i64, Decimal)> + '_ {
        self.times.iter().copied().zip(self.data.iter().copied())
    }
}
