//! Latest-intent slot for trailing debounce of selection input

use std::time::{Duration, Instant};

use super::SelectionIntent;

/// Quiet period after the last intent before it is committed
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Holds only the most recent pending intent.
///
/// Each [`push`](Self::push) overwrites the slot and restarts the window.
/// The single consumer calls [`take_due`](Self::take_due) from its loop and
/// commits the returned intent against whatever selection and visible order
/// are current at that moment.
#[derive(Debug, Clone)]
pub struct IntentSlot {
    pending: Option<SelectionIntent>,
    deadline: Option<Instant>,
    window: Duration,
}

impl Default for IntentSlot {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

impl IntentSlot {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self { pending: None, deadline: None, window }
    }

    pub fn push(&mut self, intent: SelectionIntent, now: Instant) {
        self.pending = Some(intent);
        self.deadline = Some(now + self.window);
    }

    /// Drain the slot once its window has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<SelectionIntent> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Drain immediately regardless of the window.
    pub fn flush(&mut self) -> Option<SelectionIntent> {
        self.deadline = None;
        self.pending.take()
    }

    /// How long the consumer may sleep before the slot becomes due.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
