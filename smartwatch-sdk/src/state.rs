//! Thread-safe counter state.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RateError;

/// Last observation of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Counter {
    /// Wall-clock time of the observation in seconds since the Unix epoch.
    pub timestamp: f64,
    /// Raw counter value.
    pub value: i64,
}

impl Counter {
    pub fn new(timestamp: f64, value: i64) -> Self {
        Self { timestamp, value }
    }
}

/// Something that turns successive counter observations into rates.
pub trait RateTracker {
    /// Record `value` observed at `now` under `key` and return the rate in
    /// counts per second since the previous observation.
    ///
    /// A counter that went backwards yields `0.0`. The observation is stored
    /// even when an error is returned.
    fn get_rate(&self, key: &str, now: f64, value: i64) -> Result<f64, RateError>;
}

/// Counter slot for a single key.
///
/// The mutex spans the whole read-modify-write of one evaluation.
type Slot = Arc<Mutex<Option<Counter>>>;

/// In-memory counter state for all keys.
#[derive(Debug, Default)]
pub struct RateState {
    counters: RwLock<BTreeMap<String, Slot>>,
}

impl RateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build state from previously persisted counters.
    pub fn from_counters(counters: BTreeMap<String, Counter>) -> Self {
        let counters = counters
            .into_iter()
            .map(|(key, counter)| (key, Arc::new(Mutex::new(Some(counter)))))
            .collect();
        Self {
            counters: RwLock::new(counters),
        }
    }

    /// Get or create the slot for a key.
    fn get_or_create(&self, key: &str) -> Slot {
        // Fast path: check if it exists
        {
            let counters = self.counters.read();
            if let Some(slot) = counters.get(key) {
                return slot.clone();
            }
        }

        // Slow path: create it
        let mut counters = self.counters.write();
        counters
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Last stored observation of a key.
    pub fn get(&self, key: &str) -> Option<Counter> {
        let slot = self.counters.read().get(key).cloned()?;
        let counter = *slot.lock();
        counter
    }

    /// Number of keys with a stored observation.
    pub fn len(&self) -> usize {
        self.counters
            .read()
            .values()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out every stored observation, ordered by key.
    pub fn counters(&self) -> BTreeMap<String, Counter> {
        self.counters
            .read()
            .iter()
            .filter_map(|(key, slot)| slot.lock().map(|counter| (key.clone(), counter)))
            .collect()
    }
}

impl RateTracker for RateState {
    fn get_rate(&self, key: &str, now: f64, value: i64) -> Result<f64, RateError> {
        let slot = self.get_or_create(key);
        let mut stored = slot.lock();
        let previous = stored.replace(Counter::new(now, value));

        let Some(previous) = previous else {
            warn!(key, value, "counter initialized");
            return Err(RateError::Initialized(key.to_string()));
        };

        let elapsed = now - previous.timestamp;
        if elapsed <= 0.0 {
            debug!(key, elapsed, "observation not newer than stored counter");
            return Err(RateError::NoTimeDifference(key.to_string()));
        }

        if value < previous.value {
            debug!(key, previous = previous.value, value, "counter reset");
            return Ok(0.0);
        }

        // `value >= previous.value` here, so the distance fits a u64
        Ok(value.abs_diff(previous.value) as f64 / elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "smart_stats./dev/sda.cmd_timeout";

    #[test]
    fn test_first_observation_initializes() {
        let state = RateState::new();

        assert_eq!(
            state.get_rate(KEY, 1000.0, 5),
            Err(RateError::Initialized(KEY.to_string()))
        );
        assert_eq!(state.get(KEY), Some(Counter::new(1000.0, 5)));
    }

    #[test]
    fn test_rate_is_delta_over_elapsed_time() {
        let state = RateState::new();
        let _ = state.get_rate(KEY, 0.0, 0);

        let rate = state.get_rate(KEY, 3600.0, 50).unwrap();
        assert!((rate - 50.0 / 3600.0).abs() < 1e-12);

        let rate = state.get_rate(KEY, 3610.0, 150).unwrap();
        assert!((rate - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_counter_reset_yields_zero_and_rebases() {
        let state = RateState::new();
        let _ = state.get_rate(KEY, 0.0, 1000);

        assert_eq!(state.get_rate(KEY, 60.0, 3), Ok(0.0));
        assert_eq!(state.get(KEY), Some(Counter::new(60.0, 3)));

        let rate = state.get_rate(KEY, 120.0, 63).unwrap();
        assert!((rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_range_jump_does_not_overflow() {
        let state = RateState::new();
        let _ = state.get_rate(KEY, 0.0, i64::MIN);

        let rate = state.get_rate(KEY, 3600.0, i64::MAX).unwrap();
        assert_eq!(rate, u64::MAX as f64 / 3600.0);

        let _ = state.get_rate("neg", 0.0, -5_000_000_000_000_000_000);
        let rate = state.get_rate("neg", 3600.0, 5_000_000_000_000_000_000).unwrap();
        assert!((rate - 1e19 / 3600.0).abs() < 1e6);
    }

    #[test]
    fn test_same_or_earlier_timestamp_is_rejected_but_stored() {
        let state = RateState::new();
        let _ = state.get_rate(KEY, 100.0, 1);

        assert_eq!(
            state.get_rate(KEY, 100.0, 2),
            Err(RateError::NoTimeDifference(KEY.to_string()))
        );
        assert_eq!(
            state.get_rate(KEY, 50.0, 3),
            Err(RateError::NoTimeDifference(KEY.to_string()))
        );
        assert_eq!(state.get(KEY), Some(Counter::new(50.0, 3)));
    }

    #[test]
    fn test_keys_are_independent() {
        let state = RateState::new();
        let _ = state.get_rate("a", 0.0, 0);
        let _ = state.get_rate("b", 0.0, 100);

        assert_eq!(state.get_rate("a", 10.0, 10), Ok(1.0));
        assert_eq!(state.get_rate("b", 10.0, 200), Ok(10.0));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_from_counters_resumes() {
        let state = RateState::from_counters(BTreeMap::from([(
            KEY.to_string(),
            Counter::new(0.0, 0),
        )]));

        let rate = state.get_rate(KEY, 3600.0, 100_000).unwrap();
        assert!(rate > 27.7 && rate < 27.8);
        assert_eq!(state.counters().get(KEY), Some(&Counter::new(3600.0, 100_000)));
    }

    #[test]
    fn test_get_or_create_returns_same_arc_on_second_call() {
        let state = RateState::new();

        let slot1 = state.get_or_create(KEY);
        let slot2 = state.get_or_create(KEY);

        assert!(Arc::ptr_eq(&slot1, &slot2));
        assert!(state.is_empty());
    }

    #[test]
    fn test_concurrent_updates_are_serialized_per_key() {
        use std::thread;

        let state = Arc::new(RateState::new());
        let _ = state.get_rate(KEY, 0.0, 0);

        let mut handles = vec![];
        for t in 0..10 {
            let s = state.clone();
            handles.push(thread::spawn(move || {
                for i in 1..=100 {
                    let n = t * 100 + i;
                    // Strictly increasing per thread; interleavings across
                    // threads may go backwards, which must never be negative.
                    if let Ok(rate) = s.get_rate(KEY, n as f64, n) {
                        assert!(rate >= 0.0);
                    }
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(state.len(), 1);
    }
}
