use crate::{error::DropwatchError, sighting::CodeSighting};
use async_trait::async_trait;

/// Extraction adapter: the fragile, swappable seam against the rendered
/// Telegram page.
///
/// Everything behind this trait is schema-less and may break whenever the
/// watched page's markup changes, so every call is fallible and a page
/// whose shape no longer matches simply yields an empty scan.
#[async_trait]
pub trait ChannelScanner: Send + Sync {
    /// Ensure one background tab exists per configured channel and return
    /// the channels that currently have a tab, in tab order. Idempotent;
    /// never closes or duplicates tabs.
    async fn supervise(&self, channels: &[String]) -> Result<Vec<String>, DropwatchError>;

    /// Extract all code sightings currently rendered in `channel`'s tab.
    async fn scan(&self, channel: &str) -> Result<Vec<CodeSighting>, DropwatchError>;
}

/// Executes a claim: open the redemption URL in a new tab and best-effort
/// confirm the dialog on the resulting page.
#[async_trait]
pub trait CodeClaimer: Send + Sync {
    /// Open `claim_url` for `code`. Returns once the tab is open; the
    /// confirmation click runs in the background and is not guaranteed.
    async fn claim(&self, code: &str, claim_url: &str) -> Result<(), DropwatchError>;
}
