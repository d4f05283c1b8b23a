//! Debounced view refresh.

use std::time::Duration;

/// Default delay between the first change and the refresh it triggers.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(150);

/// Coalesces bursts of changes into a single refresh.
///
/// The first poll that sees a change starts a timer; further changes inside
/// the window are absorbed. Once `delay` has elapsed the poll returns `true`
/// and the debounce goes back to idle.
///
/// ```
/// use std::time::Duration;
/// use debug_console::core::RefreshDebounce;
///
/// let mut debounce = RefreshDebounce::new(Duration::from_millis(100));
/// let frame = Duration::from_millis(40);
///
/// assert!(!debounce.poll(true, frame));
/// assert!(!debounce.poll(false, frame));
/// assert!(!debounce.poll(false, frame));
/// assert!(debounce.poll(false, frame));
/// ```
#[derive(Debug, Clone)]
pub struct RefreshDebounce {
    delay: Duration,
    waited: Option<Duration>,
}

impl Default for RefreshDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_DELAY)
    }
}

impl RefreshDebounce {
    /// Create a debounce with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self { delay, waited: None }
    }

    /// The configured delay.
    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a refresh is pending.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.waited.is_some()
    }

    /// Advance by one frame.
    ///
    /// `dirty` reports whether anything changed since the last poll and
    /// `delta` is the frame time. Returns `true` when it is time to refresh.
    pub fn poll(&mut self, dirty: bool, delta: Duration) -> bool {
        let waited = match self.waited {
            // The frame that sees the change starts the clock at zero
            None if dirty => Duration::ZERO,
            None => return false,
            Some(waited) => waited + delta,
        };

        if waited >= self.delay {
            self.waited = None;
            true
        } else {
            self.waited = Some(waited);
            false
        }
    }
}
