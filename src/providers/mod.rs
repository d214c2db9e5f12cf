pub mod netvalue_api;
pub mod util;

pub use netvalue_api::NetValueApi;

use crate::core::series::TimeSeries;
use crate::core::source::NetValueSource;
use anyhow::{Result, bail};
use async_trait::async_trait;

/// Stand-in used when no history backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredSource;

#[async_trait]
impl NetValueSource for UnconfiguredSource {
    async fn query_net_value_data(&self, _include_nft: bool) -> Result<TimeSeries> {
        bail!("No net value source configured")
    }
}
