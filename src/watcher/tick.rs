//! One pass of the scan/dedupe/claim loop.

use tracing::{debug, error, info, warn};

use dropwatch_core::{
    claim::{claim_url, HistoryEntry},
    config::Config,
    error::DropwatchError,
    sighting::CodeSighting,
    watermark::ScanOutcome,
};

use super::Watcher;

impl Watcher {
    /// One timer tick: refresh the config cache, supervise tabs, scan each
    /// channel, claim what's new. Failures are logged and scoped to their
    /// channel; the loop itself never dies.
    pub(super) async fn tick(&mut self) {
        if let Err(e) = self.refresh_config().await {
            warn!("config refresh failed: {e}");
        }
        let cfg = self.cached.clone();

        if cfg.channel_ids.is_empty() {
            debug!("no channels configured, skipping tick");
            return;
        }

        let supervised = match self.scanner.supervise(&cfg.channel_ids).await {
            Ok(channels) => channels,
            Err(e) => {
                warn!("tab supervision failed: {e}");
                return;
            }
        };

        for channel in supervised {
            let sightings = match self.scanner.scan(&channel).await {
                Ok(s) => s,
                Err(e) => {
                    warn!("scan failed for channel {channel}: {e}");
                    continue;
                }
            };

            match self.watermarks.observe(&channel, &sightings) {
                ScanOutcome::Baselined { watermark } => {
                    info!("channel {channel} baselined at message {watermark}");
                }
                ScanOutcome::Advanced { new, watermark } => {
                    for sighting in &new {
                        self.claim_sighting(&cfg, &channel, sighting).await;
                    }
                    if !new.is_empty() {
                        debug!("channel {channel} watermark advanced to {watermark}");
                    }
                }
                ScanOutcome::Untracked => {
                    debug!("channel {channel} is not tracked, ignoring scan");
                }
            }
        }
    }

    async fn claim_sighting(&self, cfg: &Config, channel: &str, sighting: &CodeSighting) {
        info!(
            "new code in channel {channel}: {} (message {})",
            sighting.code, sighting.message_id
        );

        if !cfg.automation_enabled {
            info!("automation disabled, not claiming code {}", sighting.code);
            return;
        }
        if cfg.active_stake_domain.is_empty() {
            warn!("no active domain configured, not claiming code {}", sighting.code);
            return;
        }

        let url = claim_url(&cfg.active_stake_domain, &sighting.code);
        match self.claimer.claim(&sighting.code, &url).await {
            Ok(()) => {
                if let Err(e) = self
                    .store
                    .append_history(HistoryEntry::new(&sighting.code, &url))
                    .await
                {
                    error!("failed to record claim for {}: {e}", sighting.code);
                }
            }
            Err(e) => warn!("claim failed for code {}: {e}", sighting.code),
        }
    }

    /// Pick up external file edits and in-process saves; resync watermarks
    /// when the channel list changed.
    async fn refresh_config(&mut self) -> Result<(), DropwatchError> {
        self.store.refresh_from_disk().await?;
        if self.config_rx.has_changed().unwrap_or(false) {
            self.config_rx.borrow_and_update();
            let latest = self.store.config().await;
            if latest.channel_ids != self.cached.channel_ids {
                info!("channel list changed, resetting affected watermarks");
                self.watermarks.sync_channels(&latest.channel_ids);
            }
            self.cached = latest;
        }
        Ok(())
    }
}
