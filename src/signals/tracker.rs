//! Per-ticker memory of the last emitted signal

use std::collections::HashMap;

use crate::models::Signal;

/// Result of observing a freshly classified signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The signal differs from the last one recorded (or none was recorded)
    Changed {
        previous: Option<Signal>,
        current: Signal,
    },
    Unchanged,
}

impl Transition {
    pub fn is_changed(&self) -> bool {
        matches!(self, Transition::Changed { .. })
    }
}

/// Tracks the most recent signal per ticker.
///
/// A ticker that was never observed is unset, which is distinct from `Hold`:
/// the first observation of any signal always reports a transition.
#[derive(Debug, Clone, Default)]
pub struct SignalTracker {
    previous: HashMap<String, Signal>,
}

impl SignalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `signal` for `ticker`, reporting whether it changed.
    ///
    /// State is only written on a change.
    pub fn observe(&mut self, ticker: &str, signal: Signal) -> Transition {
        let previous = self.previous.get(ticker).copied();
        if previous == Some(signal) {
            return Transition::Unchanged;
        }

        self.previous.insert(ticker.to_string(), signal);
        Transition::Changed {
            previous,
            current: signal,
        }
    }

    pub fn previous(&self, ticker: &str) -> Option<Signal> {
        self.previous.get(ticker).copied()
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}
