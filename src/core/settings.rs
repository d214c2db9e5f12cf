use super::timeframe::Timeframe;

/// User preferences that drive the derived statistics.
pub trait SettingsProvider: Send + Sync {
    fn currency_symbol(&self) -> String;
    fn floating_precision(&self) -> u32;
    fn nfts_in_net_value(&self) -> bool;
    fn selected_timeframe(&self) -> Timeframe;
    fn revision(&self) -> u64;
}
