//! The timer-driven scan/dedupe/claim loop.

mod tick;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tracing::info;

use dropwatch_core::{
    config::Config,
    store::ConfigStore,
    traits::{ChannelScanner, CodeClaimer},
    watermark::ChannelWatermarks,
};

/// Owns the scan state and drives one tick per interval.
///
/// All mutable state (watermarks, cached config) lives here and is touched
/// only from the run loop's task; ticks are strictly sequential, so a slow
/// scan delays the next tick rather than overlapping it.
pub struct Watcher {
    store: Arc<ConfigStore>,
    scanner: Arc<dyn ChannelScanner>,
    claimer: Arc<dyn CodeClaimer>,
    watermarks: ChannelWatermarks,
    /// Config snapshot used synchronously within a tick. Refreshed at the
    /// top of every tick; may lag a save by at most one interval.
    cached: Config,
    config_rx: watch::Receiver<u64>,
}

impl Watcher {
    pub async fn new(
        store: Arc<ConfigStore>,
        scanner: Arc<dyn ChannelScanner>,
        claimer: Arc<dyn CodeClaimer>,
    ) -> Self {
        let cached = store.config().await;
        let mut watermarks = ChannelWatermarks::new();
        watermarks.sync_channels(&cached.channel_ids);
        let config_rx = store.subscribe();
        Self {
            store,
            scanner,
            claimer,
            watermarks,
            cached,
            config_rx,
        }
    }

    /// Run ticks at the configured cadence until ctrl-c.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(
            "watcher running | interval: {}s | channels: {}",
            self.cached.scan_interval_secs,
            self.cached.channel_ids.len()
        );

        let mut ticker = self.make_ticker();
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let interval_before = self.cached.scan_interval_secs;
                    self.tick().await;
                    if self.cached.scan_interval_secs != interval_before {
                        info!("scan interval changed to {}s", self.cached.scan_interval_secs);
                        ticker = self.make_ticker();
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received, stopping watcher");
                    break;
                }
            }
        }
        Ok(())
    }

    fn make_ticker(&self) -> Interval {
        let mut ticker = interval(Duration::from_secs(self.cached.scan_interval_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}
