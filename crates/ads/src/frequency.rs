//! Content-open frequency gate.
//!
//! Counts qualifying navigation events and decides, per event, whether the
//! interstitial should be shown or merely topped up.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// What a content open triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentOpenAction {
    /// Nothing to do (unsupported host, or interstitial already cached).
    Skipped,
    /// Interstitial preload started in the background.
    Prepare,
    /// Interstitial show started in the background.
    Show,
}

/// Counter plus the every-Nth rule.
pub struct FrequencyGate {
    every: u32,
    count: AtomicU64,
}

impl FrequencyGate {
    /// `every == 0` never triggers a show.
    pub fn new(every: u32) -> Self {
        Self {
            every,
            count: AtomicU64::new(0),
        }
    }

    /// Count one content open. Returns the new count and whether it is a show turn.
    pub fn record(&self) -> (u64, bool) {
        let count = self.count.fetch_add(1, Ordering::AcqRel) + 1;
        (count, self.is_show_turn(count))
    }

    pub fn is_show_turn(&self, count: u64) -> bool {
        self.every != 0 && count % u64::from(self.every) == 0
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    pub fn every(&self) -> u32 {
        self.every
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_second_open_is_a_show_turn() {
        let gate = FrequencyGate::new(2);
        let turns: Vec<bool> = (0..6).map(|_| gate.record().1).collect();
        assert_eq!(turns, vec![false, true, false, true, false, true]);
        assert_eq!(gate.count(), 6);
    }

    #[test]
    fn test_every_third_open() {
        let gate = FrequencyGate::new(3);
        let shows: Vec<u64> = (0..9)
            .map(|_| gate.record())
            .filter(|(_, show)| *show)
            .map(|(count, _)| count)
            .collect();
        assert_eq!(shows, vec![3, 6, 9]);
    }

    #[test]
    fn test_zero_frequency_never_shows() {
        let gate = FrequencyGate::new(0);
        assert!((0..10).all(|_| !gate.record().1));
    }

    #[test]
    fn test_every_open_when_frequency_is_one() {
        let gate = FrequencyGate::new(1);
        assert!((0..5).all(|_| gate.record().1));
    }
}
