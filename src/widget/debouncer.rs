use std::time::Duration;

use tokio::time::Instant;

pub const DEBOUNCE_MS: u64 = 500;
pub const BLUR_GRACE_MS: u64 = 200;

/// Pure debouncer: only handles timing and supersession.
/// Holds at most one value; every push replaces it and restarts the quiet period.
pub(super) struct Debouncer<T> {
    delay: Duration,
    pending: Option<T>,
    last_push: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub(super) fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last_push: None,
        }
    }

    pub(super) fn push(&mut self, value: T) {
        self.pending = Some(value);
        self.last_push = Some(Instant::now());
    }

    /// Take the latest value once the quiet period has elapsed.
    pub(super) fn take_if_ready(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        if Instant::now() < deadline {
            return None;
        }
        self.last_push = None;
        self.pending.take()
    }

    /// Instant at which the pending value becomes ready.
    pub(super) fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_push.map(|t| t + self.delay)
    }

    pub(super) fn cancel(&mut self) {
        self.pending = None;
        self.last_push = None;
    }

    pub(super) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
