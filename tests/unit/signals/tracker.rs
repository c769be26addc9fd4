//! Unit tests for signal tracker

use etfsignal::models::Signal;
use etfsignal::signals::tracker::{SignalTracker, Transition};

#[test]
fn test_first_observation_is_transition() {
    let mut tracker = SignalTracker::new();
    assert_eq!(
        tracker.observe("SPXL", Signal::Hold),
        Transition::Changed {
            previous: None,
            current: Signal::Hold
        }
    );
}

#[test]
fn test_repeat_and_change() {
    let mut tracker = SignalTracker::new();
    assert!(tracker.observe("SPXL", Signal::Hold).is_changed());
    assert!(!tracker.observe("SPXL", Signal::Hold).is_changed());
    assert_eq!(
        tracker.observe("SPXL", Signal::Sell),
        Transition::Changed {
            previous: Some(Signal::Hold),
            current: Signal::Sell
        }
    );
    assert_eq!(tracker.previous("SPXL"), Some(Signal::Sell));
}

#[test]
fn test_tickers_are_independent() {
    let mut tracker = SignalTracker::new();
    tracker.observe("SPXL", Signal::Buy);
    assert!(tracker.observe("TQQQ", Signal::Buy).is_changed());
    assert_eq!(tracker.len(), 2);
    assert!(tracker.previous("SOXL").is_none());
}
