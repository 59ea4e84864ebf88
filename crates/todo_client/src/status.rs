//! Transient status line shown around create actions.

use std::time::{Duration, Instant};

/// Delay after which a status message clears itself.
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct StatusLine {
    clear_after: Duration,
    current: Option<(String, Instant)>,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(STATUS_CLEAR_DELAY)
    }
}

impl StatusLine {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            clear_after,
            current: None,
        }
    }

    /// Shows `text`, restarting the clear timer.
    pub fn show(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some((text.into(), now));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Clears the message once its delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        let expired = self.current.as_ref().is_some_and(|(_, shown_at)| {
            now.saturating_duration_since(*shown_at) >= self.clear_after
        });
        if expired {
            self.current = None;
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|(text, _)| text.as_str())
    }
}
