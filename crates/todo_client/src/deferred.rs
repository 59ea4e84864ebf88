//! Deferred (lagging) search input.
//!
//! Keystrokes update the raw text immediately; a query is released only
//! once input has been quiet for `quiet_period`. Each release carries the
//! input generation, so a response for an older generation can be
//! recognised and dropped no matter when it arrives.

use std::time::{Duration, Instant};

/// Default quiet period before a typed query is issued.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Query released by [`DeferredQuery::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    generation: u64,
    text: String,
}

impl QueryTicket {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Debounce/coalesce primitive with last-input-wins semantics.
#[derive(Debug, Clone)]
pub struct DeferredQuery {
    quiet_period: Duration,
    raw: String,
    generation: u64,
    last_input_at: Option<Instant>,
    released_generation: Option<u64>,
}

impl Default for DeferredQuery {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl DeferredQuery {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            raw: String::new(),
            generation: 0,
            last_input_at: None,
            released_generation: None,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Records a keystroke. Identical text does not restart the timer.
    pub fn input(&mut self, text: &str, now: Instant) {
        if text == self.raw && self.last_input_at.is_some() {
            return;
        }
        self.raw = text.to_string();
        self.generation += 1;
        self.last_input_at = Some(now);
    }

    /// Whether an input is waiting to be released.
    pub fn is_pending(&self) -> bool {
        self.last_input_at.is_some() && self.released_generation != Some(self.generation)
    }

    /// Releases the latest input once it has settled. Each generation is
    /// released at most once.
    pub fn poll(&mut self, now: Instant) -> Option<QueryTicket> {
        let last_input_at = self.last_input_at?;
        if self.released_generation == Some(self.generation) {
            return None;
        }
        if now.saturating_duration_since(last_input_at) < self.quiet_period {
            return None;
        }
        self.released_generation = Some(self.generation);
        Some(QueryTicket {
            generation: self.generation,
            text: self.raw.clone(),
        })
    }

    /// Whether results for `ticket` may still be applied.
    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Clears the input and invalidates every outstanding ticket.
    pub fn reset(&mut self) {
        self.raw.clear();
        self.generation += 1;
        self.last_input_at = None;
        self.released_generation = None;
    }
}
