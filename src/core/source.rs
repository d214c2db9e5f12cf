use super::series::TimeSeries;
use anyhow::Result;
use async_trait::async_trait;

/// Remote store of historical net value snapshots.
#[async_trait]
pub trait NetValueSource: Send + Sync {
    async fn query_net_value_data(&self, include_nft: bool) -> Result<TimeSeries>;
}
