//! Tab supervision and URL-to-channel classification.

use chromiumoxide::Page;
use tracing::{info, warn};

use crate::error::BrowserError;
use crate::session::BrowserSession;

/// Map a tab URL to the channel it belongs to: the first configured id the
/// URL contains wins. Returns `None` for tabs outside the watched set.
///
/// When one configured id is a substring of another this is ambiguous; the
/// config layer warns about such pairs but the first match stays
/// authoritative.
pub fn channel_for_url<'a>(url: &str, channels: &'a [String]) -> Option<&'a str> {
    channels
        .iter()
        .find(|id| url.contains(id.as_str()))
        .map(String::as_str)
}

fn channel_tab_url(host: &str, channel: &str) -> String {
    format!("{}/a/#{channel}", host.trim_end_matches('/'))
}

impl BrowserSession {
    /// Ensure one tab exists per configured channel and report which
    /// channels currently have one, in tab order.
    ///
    /// Idempotent: existing tabs are left alone, missing ones are opened
    /// in the background, nothing is ever closed. A failed open is logged
    /// and retried naturally on the next pass.
    pub(crate) async fn supervise_tabs(
        &self,
        channels: &[String],
    ) -> Result<Vec<String>, BrowserError> {
        self.set_channels(channels);

        let pages = self
            .browser
            .pages()
            .await
            .map_err(|e| BrowserError::Cdp(e.to_string()))?;

        let mut urls = Vec::with_capacity(pages.len());
        for page in &pages {
            if let Ok(Some(url)) = page.url().await {
                urls.push(url);
            }
        }

        for channel in channels {
            let exists = urls.iter().any(|url| url.contains(channel.as_str()));
            if exists {
                continue;
            }
            let url = channel_tab_url(&self.telegram_host, channel);
            match self.browser.new_page(url.as_str()).await {
                Ok(_) => {
                    info!("no tab for channel {channel}, opened {url}");
                    urls.push(url);
                }
                Err(e) => warn!("failed to open tab for channel {channel}: {e}"),
            }
        }

        let mut supervised = Vec::new();
        for url in &urls {
            if let Some(channel) = channel_for_url(url, channels) {
                if !supervised.iter().any(|c| c == channel) {
                    supervised.push(channel.to_string());
                }
            }
        }
        Ok(supervised)
    }

    /// First tab classified to `channel`, if any.
    pub(crate) async fn page_for_channel(
        &self,
        channel: &str,
    ) -> Result<Option<Page>, BrowserError> {
        let channels = self.configured_channels();
        let pages = self
            .browser
            .pages()
            .await
            .map_err(|e| BrowserError::Cdp(e.to_string()))?;

        for page in pages {
            if let Ok(Some(url)) = page.url().await {
                if channel_for_url(&url, &channels) == Some(channel) {
                    return Ok(Some(page));
                }
            }
        }
        Ok(None)
    }
}
