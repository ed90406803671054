//! Spaced repetition scheduling.
//!
//! Computes a card's next scheduling state from a three-way recall rating:
//! - `easy`: the ease factor grows by 0.1 and the interval is multiplied by it
//! - `medium`: the ease factor is unchanged; the interval grows by a slightly
//!   discounted ease factor
//! - `hard`: the ease factor shrinks by 0.2 and the interval is halved
//! - The first review of a card uses faster calibration multipliers
//! - The ease factor never falls below 1.3
//! - Intervals are kept in tenths of a day; the next due date is always at
//!   least one full day out

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::CardState;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Recall rating for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Easy,
    Medium,
    Hard,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Easy => "easy",
            Rating::Medium => "medium",
            Rating::Hard => "hard",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Rating::Easy),
            "medium" => Ok(Rating::Medium),
            "hard" => Ok(Rating::Hard),
            other => Err(ReviewError::InvalidRating(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("unknown rating '{0}', expected easy, medium or hard")]
    InvalidRating(String),

    #[error("invalid scheduling state: {0}")]
    InvalidState(String),
}

/// Calculates the next scheduling state for a card.
///
/// Pure and deterministic for a fixed `now`; the caller persists the result
/// and appends the review log entry. Returns `InvalidState` (and no partial
/// update) when the input state is corrupt.
pub fn compute_review(
    current: &CardState,
    rating: Rating,
    now: DateTime<Utc>,
) -> Result<CardState, ReviewError> {
    if !current.interval.is_finite() || current.interval <= 0.0 {
        return Err(ReviewError::InvalidState(format!(
            "interval must be positive, got {}",
            current.interval
        )));
    }
    if !current.ease_factor.is_finite() || current.ease_factor < MIN_EASE_FACTOR {
        return Err(ReviewError::InvalidState(format!(
            "ease factor must be at least {MIN_EASE_FACTOR}, got {}",
            current.ease_factor
        )));
    }

    let (new_ease, raw_interval) = match rating {
        Rating::Easy => {
            let ease = current.ease_factor + 0.1;
            let interval = if current.review_count == 0 {
                current.interval * 4.0
            } else {
                // Easy growth uses the already-raised ease factor
                current.interval * ease
            };
            (ease, interval)
        }
        Rating::Medium => {
            let interval = if current.review_count == 0 {
                current.interval * 2.5
            } else {
                current.interval * (current.ease_factor - 0.1).max(MIN_EASE_FACTOR)
            };
            (current.ease_factor, interval)
        }
        Rating::Hard => {
            let ease = (current.ease_factor - 0.2).max(MIN_EASE_FACTOR);
            let interval = if current.review_count == 0 {
                1.0
            } else {
                (current.interval * 0.5).max(1.0)
            };
            (ease, interval)
        }
    };

    // Intervals are stored in tenths of a day
    let new_interval = (raw_interval * 10.0).round() / 10.0;

    // The due date is always at least one full day out, even if the stored
    // interval ends up below a day
    let due_date = now + fractional_days(new_interval.max(1.0));

    Ok(CardState {
        interval: new_interval,
        ease_factor: new_ease,
        review_count: current.review_count + 1,
        due_date,
    })
}

/// Converts a fractional number of days to an exact sub-day duration.
fn fractional_days(days: f64) -> Duration {
    Duration::milliseconds((days * 86_400_000.0).round() as i64)
}
