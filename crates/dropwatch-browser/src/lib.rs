//! # dropwatch-browser
//!
//! chromiumoxide adapter for the dropwatch daemon: owns the Chromium
//! instance, keeps one background tab open per watched channel, extracts
//! code sightings out of rendered pages, and opens claim tabs with a
//! best-effort confirmation click.

mod claim;
mod detect;
mod error;
mod js;
mod scan;
mod session;
mod tabs;

pub use error::BrowserError;
pub use session::BrowserSession;
pub use tabs::channel_for_url;
