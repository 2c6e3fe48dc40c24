//! Suppression of repeated notifications within a time window.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Remembers when each notification key was last let through.
#[derive(Debug)]
pub struct EventDeduplicator {
    window: Duration,
    last_seen: Mutex<HashMap<String, Instant>>,
}

impl EventDeduplicator {
    /// A zero window disables deduplication.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.window.is_zero()
    }

    /// Returns `true` if a notification with `key` should be handled, `false`
    /// if the same key was handled less than one window ago.
    ///
    /// Keys whose window has elapsed are forgotten on the way.
    pub fn should_dispatch(&self, key: &str) -> bool {
        if !self.is_enabled() {
            return true;
        }
        let mut map = self.last_seen.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let window = self.window;
        map.retain(|_, v| now.duration_since(*v) < window);

        if let Some(last) = map.get(key) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }

        map.insert(key.to_string(), now);
        true
    }

    /// Number of remembered keys.
    pub fn len(&self) -> usize {
        self.last_seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
