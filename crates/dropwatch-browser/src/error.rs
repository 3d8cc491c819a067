use dropwatch_core::error::DropwatchError;
use thiserror::Error;

/// Errors from the browser layer.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// No usable Chromium-based browser on this machine.
    #[error(
        "no Chromium-based browser found; install Chrome/Chromium or set browserPath in the config"
    )]
    NoExecutable,

    /// Chromium refused to start.
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    /// A DevTools protocol call failed.
    #[error("devtools error: {0}")]
    Cdp(String),
}

impl From<BrowserError> for DropwatchError {
    fn from(err: BrowserError) -> Self {
        DropwatchError::Browser(err.to_string())
    }
}
