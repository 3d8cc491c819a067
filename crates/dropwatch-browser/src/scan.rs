//! `ChannelScanner` implementation: DOM extraction over CDP.

use async_trait::async_trait;
use tracing::debug;

use dropwatch_core::{error::DropwatchError, sighting::CodeSighting, traits::ChannelScanner};

use crate::js;
use crate::session::BrowserSession;

#[async_trait]
impl ChannelScanner for BrowserSession {
    async fn supervise(&self, channels: &[String]) -> Result<Vec<String>, DropwatchError> {
        Ok(self.supervise_tabs(channels).await?)
    }

    async fn scan(&self, channel: &str) -> Result<Vec<CodeSighting>, DropwatchError> {
        let page = self
            .page_for_channel(channel)
            .await?
            .ok_or_else(|| DropwatchError::Extraction(format!("no tab for channel {channel}")))?;

        let eval = page
            .evaluate(js::EXTRACT_CODES)
            .await
            .map_err(|e| DropwatchError::Extraction(format!("channel {channel}: {e}")))?;

        // A page that hasn't rendered (or whose markup drifted) yields
        // nothing extractable; that is zero sightings, not an error.
        let sightings = match eval.into_value::<Vec<CodeSighting>>() {
            Ok(sightings) => sightings,
            Err(e) => {
                debug!("channel {channel}: extraction result did not match expected shape: {e}");
                Vec::new()
            }
        };

        debug!(
            "channel {channel}: {} code sighting(s) on page",
            sightings.len()
        );
        Ok(sightings)
    }
}
