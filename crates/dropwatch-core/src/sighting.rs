use serde::{Deserialize, Serialize};

/// A code spotted in a channel message.
///
/// Produced fresh on every scan straight from the rendered page and never
/// stored; deduplication happens against the channel watermark, not against
/// past sightings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSighting {
    /// The bonus code token as rendered in the message.
    pub code: String,
    /// Numeric message identifier the code was attached to.
    #[serde(rename = "messageId")]
    pub message_id: i64,
}

impl CodeSighting {
    pub fn new(code: impl Into<String>, message_id: i64) -> Self {
        Self {
            code: code.into(),
            message_id,
        }
    }
}
