//! Discovery and request tunables.

use std::time::Duration;

/// Timing and discovery settings shared by discovery and every [`crate::Light`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Stop discovery once this many distinct lights have replied.
    pub num_lights: Option<usize>,
    /// Total time spent listening for discovery replies.
    pub discovery_timeout: Duration,
    /// Number of GetService broadcasts sent within the discovery window.
    pub discovery_attempts: u32,
    /// How long to wait for a reply to a single request.
    pub request_timeout: Duration,
    /// Retries after the first request attempt.
    pub max_retries: u32,
    /// Backoff before each retry; the last value repeats.
    pub retry_delays: Vec<Duration>,
}

impl Config {
    pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 1000;
    pub const DEFAULT_DISCOVERY_ATTEMPTS: u32 = 2;
    pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1000;
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    const RETRY_DELAYS_MS: [u64; 3] = [100, 250, 500];

    pub fn new() -> Self {
        Config {
            num_lights: None,
            discovery_timeout: Duration::from_millis(Self::DEFAULT_DISCOVERY_TIMEOUT_MS),
            discovery_attempts: Self::DEFAULT_DISCOVERY_ATTEMPTS,
            request_timeout: Duration::from_millis(Self::DEFAULT_REQUEST_TIMEOUT_MS),
            max_retries: Self::DEFAULT_MAX_RETRIES,
            retry_delays: Self::RETRY_DELAYS_MS
                .iter()
                .copied()
                .map(Duration::from_millis)
                .collect(),
        }
    }

    pub fn with_num_lights(mut self, num_lights: Option<usize>) -> Self {
        self.num_lights = num_lights;
        self
    }

    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let idx = (attempt as usize).min(self.retry_delays.len().saturating_sub(1));
        self.retry_delays.get(idx).copied().unwrap_or_default()
    }

    /// Interval between discovery broadcasts.
    pub fn discovery_interval(&self) -> Duration {
        self.discovery_timeout / self.discovery_attempts.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
