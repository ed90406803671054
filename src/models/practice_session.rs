//! Practice session management for spaced repetition.
//! Walks the queue of due cards for one deck, applying ratings and
//! persisting the resulting scheduling state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use thiserror::Error;

use super::scheduler::{Rating, ReviewError, compute_review};
use super::{CardState, ReviewLogEntry, StoredCard};
use crate::database::db::{self, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no card left to rate")]
    Empty,

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A single pass over the cards that are due in one deck.
/// Each rated card leaves the queue; there is one active session per user.
pub struct PracticeSession {
    pub deck_name: String,
    queue: VecDeque<StoredCard>,
    reviewed: usize,
    conn: Arc<Mutex<Connection>>,
}

impl PracticeSession {
    /// Creates a session from cards that are due for review, as returned by
    /// the store's due query (oldest due first).
    pub fn new_from_due_cards(
        deck_name: String,
        due_cards: Vec<StoredCard>,
        conn: Arc<Mutex<Connection>>,
    ) -> Self {
        Self {
            deck_name,
            queue: due_cards.into(),
            reviewed: 0,
            conn,
        }
    }

    /// The card currently being practiced, `None` once the session is done.
    pub fn current(&self) -> Option<&StoredCard> {
        self.queue.front()
    }

    /// Applies a rating to the current card and returns its new state.
    ///
    /// The state write must succeed before the card leaves the queue; on
    /// failure the card stays current so the user can retry without losing
    /// progress. The review log append runs after the state write and is
    /// non-fatal: the log is analytics-only.
    pub fn rate_current(
        &mut self,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<CardState, SessionError> {
        let card = self.queue.front().ok_or(SessionError::Empty)?;
        let next_state = compute_review(&card.state, rating, now)?;

        let conn = self.conn.lock().unwrap();
        db::update_card_state(card.id, &next_state, &conn)?;

        let entry = ReviewLogEntry::new(self.deck_name.clone(), card.id, rating, now);
        if let Err(err) = db::append_review(&entry, &conn) {
            log::warn!("review log append failed for card {}: {err}", card.id);
        }
        drop(conn);

        self.queue.pop_front();
        self.reviewed += 1;
        Ok(next_state)
    }

    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn progress_message(&self) -> String {
        format!("{} reviewed, {} remaining", self.reviewed, self.remaining())
    }
}
