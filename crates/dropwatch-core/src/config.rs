use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::claim::HistoryEntry;
use crate::error::DropwatchError;

/// Persisted configuration. Written wholesale as a single JSON object,
/// never partially; field names keep the original storage format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Master switch: when off, codes are observed but never claimed.
    pub automation_enabled: bool,
    /// Telegram channel identifiers to watch (treated as a set).
    pub channel_ids: Vec<String>,
    /// Known redemption domains, in display order.
    pub stake_domains: Vec<String>,
    /// The domain claims are sent to. Must be a member of `stake_domains`.
    pub active_stake_domain: String,
    /// Append-only log of every claim that opened a tab.
    pub history_log: Vec<HistoryEntry>,
    /// Telegram Web host the channel tabs are opened against.
    pub telegram_host: String,
    /// Seconds between scan ticks.
    pub scan_interval_secs: u64,
    /// Run the managed browser headless.
    pub headless: bool,
    /// Explicit browser executable path; auto-detected when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            automation_enabled: true,
            channel_ids: Vec::new(),
            stake_domains: default_stake_domains(),
            active_stake_domain: default_active_domain(),
            history_log: Vec::new(),
            telegram_host: default_telegram_host(),
            scan_interval_secs: default_scan_interval(),
            headless: true,
            browser_path: None,
        }
    }
}

impl Config {
    /// Check internal consistency. Called after every load and mutation.
    ///
    /// An active domain outside `stake_domains` is an error; ambiguous
    /// channel identifiers only produce a warning, since tab classification
    /// still resolves them first-match.
    pub fn validate(&self) -> Result<(), DropwatchError> {
        if !self.active_stake_domain.is_empty() {
            if !self.stake_domains.contains(&self.active_stake_domain) {
                return Err(DropwatchError::Config(format!(
                    "active domain '{}' is not in the stake domain list",
                    self.active_stake_domain
                )));
            }
            url::Url::parse(&self.active_stake_domain).map_err(|e| {
                DropwatchError::Config(format!(
                    "active domain '{}' is not a valid URL: {e}",
                    self.active_stake_domain
                ))
            })?;
        }
        if self.scan_interval_secs == 0 {
            return Err(DropwatchError::Config(
                "scan interval must be at least 1 second".into(),
            ));
        }
        for (a, b) in self.ambiguous_channel_pairs() {
            warn!("channel id '{a}' is a substring of '{b}'; tab classification picks the first match");
        }
        Ok(())
    }

    /// Pairs of configured channel ids where one contains the other, in
    /// which case a tab URL can match both and the first configured wins.
    pub fn ambiguous_channel_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (i, a) in self.channel_ids.iter().enumerate() {
            for b in self.channel_ids.iter().skip(i + 1) {
                if a.contains(b.as_str()) {
                    pairs.push((b.clone(), a.clone()));
                } else if b.contains(a.as_str()) {
                    pairs.push((a.clone(), b.clone()));
                }
            }
        }
        pairs
    }
}

// --- Default value functions ---

fn default_telegram_host() -> String {
    "https://web.telegram.org".to_string()
}

fn default_scan_interval() -> u64 {
    5
}

fn default_active_domain() -> String {
    "https://stake.ceo".to_string()
}

fn default_stake_domains() -> Vec<String> {
    [
        "https://stake.com",
        "https://stake1001.com",
        "https://stake1002.com",
        "https://stake1003.com",
        "https://stake1004.com",
        "https://stake1020.com",
        "https://stake1021.com",
        "https://stake1022.com",
        "https://stake1023.com",
        "https://stake.pet",
        "https://stakeru8.com",
        "https://stake.jp",
        "https://stake.bz",
        "https://stake.coach",
        "https://stake.pink",
        "https://stake.ac",
        "https://stake.games",
        "https://stake.bet",
        "https://stake.mba",
        "https://stake.ceo",
        "https://stake.krd",
        "https://stake.blue",
        "https://stake.mg",
        "https://stake.tel",
        "https://stake.horse",
        "https://stake.us",
        "https://staketr.com",
    ]
    .iter()
    .map(|d| d.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.automation_enabled);
        assert!(cfg.stake_domains.contains(&cfg.active_stake_domain));
        assert_eq!(cfg.scan_interval_secs, 5);
    }

    #[test]
    fn active_domain_must_be_listed() {
        let cfg = Config {
            active_stake_domain: "https://example.com".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn json_round_trip_keeps_original_field_names() {
        let cfg = Config {
            channel_ids: vec!["-1002239669640".into()],
            ..Config::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"automationEnabled\""));
        assert!(json.contains("\"channelIds\""));
        assert!(json.contains("\"activeStakeDomain\""));
        assert!(json.contains("\"historyLog\""));

        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.channel_ids, cfg.channel_ids);
        assert_eq!(back.active_stake_domain, cfg.active_stake_domain);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"automationEnabled": false}"#).unwrap();
        assert!(!cfg.automation_enabled);
        assert_eq!(cfg.telegram_host, "https://web.telegram.org");
        assert!(cfg.history_log.is_empty());
    }

    #[test]
    fn substring_channel_ids_are_flagged() {
        let cfg = Config {
            channel_ids: vec!["10022".into(), "-1002239669640".into(), "555".into()],
            ..Config::default()
        };
        let pairs = cfg.ambiguous_channel_pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "10022");
        assert_eq!(pairs[0].1, "-1002239669640");
    }
}
