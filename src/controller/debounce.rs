use std::time::Duration;

/// Delay between the last keystroke and the filter run
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// State of the debounce timer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DebounceState {
    /// No evaluation scheduled
    #[default]
    Idle,
    /// An evaluation of `value` is due at `deadline`
    Pending { deadline: Duration, value: String },
}

/// Cancel-and-restart timer: each new value replaces the pending one
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    pub fn deadline(&self) -> Option<Duration> {
        match self.state {
            DebounceState::Pending { deadline, .. } => Some(deadline),
            DebounceState::Idle => None,
        }
    }

    /// Schedule `value` for `now + delay`, discarding any pending value
    ///
    /// Returns the value that was superseded, if any.
    pub fn arm(&mut self, value: impl Into<String>, now: Duration) -> Option<String> {
        let previous = self.cancel();
        self.state = DebounceState::Pending {
            deadline: now + self.delay,
            value: value.into(),
        };
        previous
    }

    /// Drop the pending value without firing
    pub fn cancel(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            DebounceState::Pending { value, .. } => Some(value),
            DebounceState::Idle => None,
        }
    }

    /// Fire if the deadline has been reached, returning the value to apply
    pub fn fire(&mut self, now: Duration) -> Option<String> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.cancel(),
            _ => None,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}
