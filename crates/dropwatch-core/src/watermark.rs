//! Per-channel high-water-mark tracking.
//!
//! The watermark map is the only state the scan loop carries between ticks.
//! It is deliberately not persisted: after a restart every channel
//! re-baselines on its first scan, suppressing whatever is already on the
//! page instead of re-claiming it.

use std::collections::HashMap;

use crate::sighting::CodeSighting;

/// Scan state for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelWatermark {
    /// False until the channel's first scan has recorded a baseline.
    pub initialized: bool,
    /// Highest message id already handled. Monotonically non-decreasing
    /// while `initialized` is true.
    pub last_processed_id: i64,
}

impl ChannelWatermark {
    fn uninitialized() -> Self {
        Self {
            initialized: false,
            last_processed_id: 0,
        }
    }
}

/// What a scan produced once filtered through the channel's watermark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// First scan after (re)initialization: nothing is claimable, the
    /// channel is now baselined at `watermark`.
    Baselined { watermark: i64 },
    /// Regular scan: `new` holds the sightings above the previous
    /// watermark, in the order they were scanned.
    Advanced {
        new: Vec<CodeSighting>,
        watermark: i64,
    },
    /// The channel is not in the tracked set.
    Untracked,
}

/// Watermarks for every configured channel.
#[derive(Debug, Default)]
pub struct ChannelWatermarks {
    channels: HashMap<String, ChannelWatermark>,
}

impl ChannelWatermarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Align the tracked set with the configured channel list.
    ///
    /// Removed channels are forgotten, added channels start uninitialized,
    /// and channels present in both keep their watermark untouched.
    pub fn sync_channels(&mut self, ids: &[String]) {
        self.channels.retain(|id, _| ids.contains(id));
        for id in ids {
            self.channels
                .entry(id.clone())
                .or_insert_with(ChannelWatermark::uninitialized);
        }
    }

    /// Run one scan's sightings through the channel's watermark.
    ///
    /// On the first scan the maximum observed id becomes the baseline and
    /// nothing is claimable. Afterwards, sightings above the watermark are
    /// returned for claiming and the watermark advances to the maximum id
    /// observed in this scan, even when none of the new codes end up
    /// claimed, so a failed claim can never stall the channel.
    pub fn observe(&mut self, channel: &str, sightings: &[CodeSighting]) -> ScanOutcome {
        let wm = match self.channels.get_mut(channel) {
            Some(wm) => wm,
            None => return ScanOutcome::Untracked,
        };

        let max_seen = sightings.iter().map(|s| s.message_id).max().unwrap_or(0);

        if !wm.initialized {
            wm.initialized = true;
            wm.last_processed_id = max_seen;
            return ScanOutcome::Baselined { watermark: max_seen };
        }

        let new: Vec<CodeSighting> = sightings
            .iter()
            .filter(|s| s.message_id > wm.last_processed_id)
            .cloned()
            .collect();

        wm.last_processed_id = wm.last_processed_id.max(max_seen);

        ScanOutcome::Advanced {
            new,
            watermark: wm.last_processed_id,
        }
    }

    pub fn get(&self, channel: &str) -> Option<&ChannelWatermark> {
        self.channels.get(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sightings(ids: &[i64]) -> Vec<CodeSighting> {
        ids.iter()
            .map(|id| CodeSighting::new(format!("CODE-{id}"), *id))
            .collect()
    }

    fn tracked(ids: &[&str]) -> ChannelWatermarks {
        let mut wms = ChannelWatermarks::new();
        wms.sync_channels(&ids.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        wms
    }

    #[test]
    fn first_scan_baselines_and_claims_nothing() {
        let mut wms = tracked(&["ch"]);
        let outcome = wms.observe("ch", &sightings(&[10, 42, 7]));
        assert_eq!(outcome, ScanOutcome::Baselined { watermark: 42 });
        let wm = wms.get("ch").unwrap();
        assert!(wm.initialized);
        assert_eq!(wm.last_processed_id, 42);
    }

    #[test]
    fn empty_first_scan_baselines_at_zero() {
        let mut wms = tracked(&["ch"]);
        assert_eq!(
            wms.observe("ch", &[]),
            ScanOutcome::Baselined { watermark: 0 }
        );
        // The next sighting is then genuinely new.
        match wms.observe("ch", &sightings(&[3])) {
            ScanOutcome::Advanced { new, watermark } => {
                assert_eq!(new, sightings(&[3]));
                assert_eq!(watermark, 3);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn only_ids_above_watermark_are_claimable() {
        let mut wms = tracked(&["ch"]);
        wms.observe("ch", &sightings(&[100]));

        match wms.observe("ch", &sightings(&[98, 101, 105])) {
            ScanOutcome::Advanced { new, watermark } => {
                assert_eq!(new, sightings(&[101, 105]));
                assert_eq!(watermark, 105);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn identical_rescan_claims_nothing() {
        let mut wms = tracked(&["ch"]);
        wms.observe("ch", &sightings(&[5]));
        let first = wms.observe("ch", &sightings(&[5, 8, 9]));
        assert!(matches!(first, ScanOutcome::Advanced { ref new, .. } if new.len() == 2));

        match wms.observe("ch", &sightings(&[5, 8, 9])) {
            ScanOutcome::Advanced { new, watermark } => {
                assert!(new.is_empty());
                assert_eq!(watermark, 9);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn watermark_advances_even_when_nothing_is_new() {
        let mut wms = tracked(&["ch"]);
        wms.observe("ch", &sightings(&[50]));
        wms.observe("ch", &sightings(&[60, 70]));
        assert_eq!(wms.get("ch").unwrap().last_processed_id, 70);
    }

    #[test]
    fn watermark_never_regresses() {
        let mut wms = tracked(&["ch"]);
        wms.observe("ch", &sightings(&[100]));
        // Page showing only older messages must not pull the mark back.
        match wms.observe("ch", &sightings(&[90, 95])) {
            ScanOutcome::Advanced { new, watermark } => {
                assert!(new.is_empty());
                assert_eq!(watermark, 100);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn claim_order_follows_scan_order() {
        let mut wms = tracked(&["ch"]);
        wms.observe("ch", &sightings(&[10]));
        match wms.observe("ch", &sightings(&[30, 20, 40])) {
            ScanOutcome::Advanced { new, .. } => {
                assert_eq!(new, sightings(&[30, 20, 40]));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn channel_list_change_resets_only_affected_channels() {
        let mut wms = tracked(&["a", "b"]);
        wms.observe("a", &sightings(&[10]));
        wms.observe("b", &sightings(&[20]));

        // Drop "b", add "c": "a" keeps its baseline, "c" starts fresh.
        wms.sync_channels(&["a".to_string(), "c".to_string()]);
        assert_eq!(wms.get("a").unwrap().last_processed_id, 10);
        assert!(wms.get("a").unwrap().initialized);
        assert!(wms.get("b").is_none());
        assert!(!wms.get("c").unwrap().initialized);

        // "c" re-baselines instead of claiming.
        assert_eq!(
            wms.observe("c", &sightings(&[99])),
            ScanOutcome::Baselined { watermark: 99 }
        );
    }

    #[test]
    fn untracked_channel_yields_nothing() {
        let mut wms = tracked(&["a"]);
        assert_eq!(wms.observe("zzz", &sightings(&[1])), ScanOutcome::Untracked);
    }
}
