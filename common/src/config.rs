use std::time::Duration;

/// Collection window after the last discovery frame has been sent.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(3);
/// Extra time granted to replies already in flight when the window closes.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(1);
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);
/// Upper bound on IPv6 host identifiers probed per scan.
pub const V6_CANDIDATE_CAP: usize = 128_000;

/// Timing and sizing policy of a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// How long the collector listens once every request has been sent.
    pub window: Duration,
    /// Drain period after the capture task has been told to stop.
    pub grace: Duration,
    /// Capacity of the bounded channel between the capture task and the collector.
    pub channel_capacity: usize,
    /// Longest a single capture read may block.
    ///
    /// This bounds how quickly the capture task observes the stop signal.
    pub read_timeout: Duration,
    pub v6_candidate_cap: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            grace: DEFAULT_GRACE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            read_timeout: DEFAULT_READ_TIMEOUT,
            v6_candidate_cap: V6_CANDIDATE_CAP,
        }
    }
}

impl ScanConfig {
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}
