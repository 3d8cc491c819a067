//! Browser session lifecycle.

use std::path::Path;
use std::sync::Mutex;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tracing::{debug, info};

use dropwatch_core::config::Config;

use crate::detect;
use crate::error::BrowserError;

/// A daemon-owned Chromium instance.
///
/// Holds the CDP handle plus the configured channel identifiers used to
/// classify tab URLs. The child process dies with the session.
pub struct BrowserSession {
    pub(crate) browser: Browser,
    /// Configured channel ids, refreshed on every supervision pass.
    pub(crate) channels: Mutex<Vec<String>>,
    pub(crate) telegram_host: String,
}

impl BrowserSession {
    /// Launch Chromium with a persistent profile under `profile_dir`.
    ///
    /// The profile is persistent on purpose: the Telegram Web login lives
    /// in it, so a restarted daemon comes back already authenticated.
    pub async fn launch(config: &Config, profile_dir: &Path) -> Result<Self, BrowserError> {
        let executable = match &config.browser_path {
            Some(path) => Path::new(path).to_path_buf(),
            None => detect::find_executable()?,
        };
        std::fs::create_dir_all(profile_dir)
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1280, 900)
            .arg("--disable-dev-shm-usage")
            .user_data_dir(profile_dir)
            .chrome_executable(&executable);

        if config.headless {
            // New headless mode; .with_head() keeps chromiumoxide from
            // adding the legacy --headless flag on top of it.
            builder = builder.with_head().arg("--headless=new");
        } else {
            builder = builder.with_head();
        }

        let browser_config = builder.build().map_err(BrowserError::LaunchFailed)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // Drive the CDP event stream for the session's lifetime.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
            debug!("browser event stream closed");
        });

        info!(
            "browser session started ({}, profile {})",
            executable.display(),
            profile_dir.display()
        );

        Ok(Self {
            browser,
            channels: Mutex::new(Vec::new()),
            telegram_host: config.telegram_host.clone(),
        })
    }

    pub(crate) fn set_channels(&self, channels: &[String]) {
        if let Ok(mut guard) = self.channels.lock() {
            *guard = channels.to_vec();
        }
    }

    pub(crate) fn configured_channels(&self) -> Vec<String> {
        self.channels
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}
