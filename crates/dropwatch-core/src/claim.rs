//! Claim-URL construction and the claim history record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed query template appended to the active domain. The target site
/// routes `app`/`type`/`modal` to its bonus-redemption dialog; only the
/// code varies.
const CLAIM_PATH: &str = "/settings/offers";

/// Build the redemption URL for `code` on `domain`.
///
/// The code is percent-encoded; everything else is the fixed template the
/// claim flow expects, byte for byte.
pub fn claim_url(domain: &str, code: &str) -> String {
    let domain = domain.trim_end_matches('/');
    format!(
        "{domain}{CLAIM_PATH}?app=CodeClaim&type=drop&code={}&modal=redeemBonus",
        urlencoding::encode(code)
    )
}

/// One entry in the append-only claim history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The claimed code.
    pub code: String,
    /// When the claim tab was opened (ISO-8601).
    pub timestamp: DateTime<Utc>,
    /// The exact URL that was opened.
    pub claim_url: String,
}

impl HistoryEntry {
    /// Record a claim stamped with the current time.
    pub fn new(code: impl Into<String>, claim_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            timestamp: Utc::now(),
            claim_url: claim_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_url_matches_template_exactly() {
        assert_eq!(
            claim_url("https://stake.ceo", "ABC-123"),
            "https://stake.ceo/settings/offers?app=CodeClaim&type=drop&code=ABC-123&modal=redeemBonus"
        );
    }

    #[test]
    fn trailing_slash_on_domain_is_tolerated() {
        assert_eq!(
            claim_url("https://stake.bet/", "X"),
            "https://stake.bet/settings/offers?app=CodeClaim&type=drop&code=X&modal=redeemBonus"
        );
    }

    #[test]
    fn code_is_percent_encoded() {
        let url = claim_url("https://stake.com", "A B&C");
        assert!(url.contains("code=A%20B%26C"));

        let url = claim_url("https://stake.com", "drop/100%");
        assert!(url.contains("code=drop%2F100%25"));
    }

    #[test]
    fn history_entry_serializes_iso_timestamp() {
        let entry = HistoryEntry::new("ABC", "https://stake.ceo/x");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"claimUrl\""));
        // RFC 3339 / ISO-8601 wire format.
        assert!(json.contains('T'));
        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, "ABC");
    }
}
