//! Search defaults and runtime settings.

use std::time::Duration;

/// Default search radius in metres.
pub const DEFAULT_MAX_DISTANCE_M: f64 = 1000.0;

/// Default number of features requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default pause between page requests in milliseconds.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 0;

/// Default capacity of the progress channel.
pub const DEFAULT_PROGRESS_CAPACITY: usize = 16;

/// Runtime settings for [`PagedSearch`](super::PagedSearch).
///
/// # Example
///
/// ```
/// use geoprox::search::SearchSettings;
/// use std::time::Duration;
///
/// let settings = SearchSettings::new().with_page_delay(Duration::from_millis(250));
/// assert_eq!(settings.page_delay(), Duration::from_millis(250));
/// assert_eq!(settings.progress_capacity(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Pause between two page requests
    page_delay: Duration,
    /// Buffered progress snapshots before older ones are dropped
    progress_capacity: usize,
}

impl SearchSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pause between page requests. Default: none.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Set the progress channel capacity (at least 1).
    pub fn with_progress_capacity(mut self, capacity: usize) -> Self {
        self.progress_capacity = capacity.max(1);
        self
    }

    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }

    pub fn progress_capacity(&self) -> usize {
        self.progress_capacity
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            progress_capacity: DEFAULT_PROGRESS_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SearchSettings::default();
        assert_eq!(settings.page_delay(), Duration::ZERO);
        assert_eq!(settings.progress_capacity(), DEFAULT_PROGRESS_CAPACITY);
        assert_eq!(SearchSettings::new(), settings);
    }

    #[test]
    fn test_capacity_never_zero() {
        assert_eq!(SearchSettings::new().with_progress_capacity(0).progress_capacity(), 1);
    }
}
