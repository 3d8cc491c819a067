//! `CodeClaimer` implementation: claim tab plus best-effort confirmation.

use async_trait::async_trait;
use chromiumoxide::Page;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use dropwatch_core::{error::DropwatchError, traits::CodeClaimer};

use crate::js;
use crate::session::BrowserSession;

/// How often the claim page is probed for a clickable confirmation.
const CONFIRM_POLL: Duration = Duration::from_millis(500);
/// Retry budget; after this the claim is left for the user to finish.
const CONFIRM_ATTEMPTS: u32 = 20;

#[async_trait]
impl CodeClaimer for BrowserSession {
    async fn claim(&self, code: &str, claim_url: &str) -> Result<(), DropwatchError> {
        let page = self
            .browser
            .new_page(claim_url)
            .await
            .map_err(|e| DropwatchError::Claim(format!("failed to open claim tab: {e}")))?;

        info!("opened claim tab for code {code}");

        // Confirmation runs detached so a slow claim page never delays the
        // scan cadence.
        let code = code.to_string();
        tokio::spawn(async move {
            confirm_claim(page, &code).await;
        });
        Ok(())
    }
}

/// Poll the claim page for a confirmation button, trying each strategy in
/// order until one clicks or the budget runs out. Silent on failure; the
/// tab stays open either way.
async fn confirm_claim(page: Page, code: &str) {
    if let Err(e) = page.wait_for_navigation().await {
        debug!("claim page for {code} did not settle: {e}");
    }

    for attempt in 1..=CONFIRM_ATTEMPTS {
        for (name, script) in js::CONFIRM_STRATEGIES {
            let clicked = match page.evaluate(*script).await {
                Ok(eval) => eval.into_value::<bool>().unwrap_or(false),
                Err(e) => {
                    debug!("confirm strategy '{name}' errored for {code}: {e}");
                    false
                }
            };
            if clicked {
                info!("confirmed claim for {code} via '{name}' strategy (attempt {attempt})");
                return;
            }
        }
        sleep(CONFIRM_POLL).await;
    }

    debug!("gave up confirming claim for {code} after {CONFIRM_ATTEMPTS} attempts");
}
