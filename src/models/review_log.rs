//! A single immutable rating event, appended to the review log after each
//! state update. Consumed by history/analytics, never by the scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Rating;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogEntry {
    pub deck_name: String,
    pub card_id: i64,
    pub rating: Rating,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewLogEntry {
    pub fn new(deck_name: String, card_id: i64, rating: Rating, reviewed_at: DateTime<Utc>) -> Self {
        Self {
            deck_name,
            card_id,
            rating,
            reviewed_at,
        }
    }
}
