//! Per-card scheduling state for spaced repetition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interval assigned to a card that has never been reviewed, in days.
pub const INITIAL_INTERVAL: f64 = 1.0;

/// Ease factor assigned to a card that has never been reviewed.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// The four scheduling fields of a card, kept separate from the card content
/// and from any front-end state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    /// Days until the next review (tenths of a day)
    #[serde(default = "default_interval")]
    pub interval: f64,
    /// Multiplier controlling interval growth, floored at 1.3
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Completed reviews of this card
    #[serde(default)]
    pub review_count: u32,
    /// When the card next becomes eligible for review
    pub due_date: DateTime<Utc>,
}

fn default_interval() -> f64 {
    INITIAL_INTERVAL
}

fn default_ease_factor() -> f64 {
    INITIAL_EASE_FACTOR
}

impl CardState {
    /// State for a card that has never been reviewed: due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            interval: INITIAL_INTERVAL,
            ease_factor: INITIAL_EASE_FACTOR,
            review_count: 0,
            due_date: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_card_defaults() {
        let now = Utc::now();
        let state = CardState::new(now);

        assert_eq!(state.interval, 1.0);
        assert_eq!(state.ease_factor, 2.5);
        assert_eq!(state.review_count, 0);
        assert_eq!(state.due_date, now);
        assert!(state.is_due(now));
    }

    #[test]
    fn test_is_due_respects_due_date() {
        let now = Utc::now();
        let mut state = CardState::new(now);
        state.due_date = now + Duration::days(3);

        assert!(!state.is_due(now));
        assert!(state.is_due(now + Duration::days(3)));
        assert!(state.is_due(now + Duration::days(4)));
    }
}
