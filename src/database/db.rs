//! Database operations for the card store and review log
//!
//! Handles SQLite database initialization, CRUD operations for decks and
//! cards, per-card scheduling state, and the append-only review log.

use crate::models::{Card, CardState, Rating, ReviewLogEntry, StoredCard};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("deck not found: {0}")]
    DeckNotFound(String),

    #[error("card not found: {0}")]
    CardNotFound(i64),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Opens (or creates) the database at `path` and ensures the schema exists.
///
/// Scheduling fields live inline with the card record; the review log is a
/// separate append-only table.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS decks (
            name TEXT PRIMARY KEY
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_name TEXT NOT NULL,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            interval REAL NOT NULL DEFAULT 1.0,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            review_count INTEGER NOT NULL DEFAULT 0,
            due_date TEXT NOT NULL,
            FOREIGN KEY (deck_name) REFERENCES decks(name),
            UNIQUE(deck_name, front)
        )",
        (),
    )?;

    // Append-only: this module exposes insert and select for it, nothing else
    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_name TEXT NOT NULL,
            card_id INTEGER NOT NULL,
            rating TEXT NOT NULL,
            reviewed_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(conn)
}

/// Encodes a timestamp as fixed-width RFC 3339 UTC text, so that SQL string
/// comparison and ORDER BY match chronological order.
fn encode_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_time(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn decode_rating(idx: usize, s: &str) -> rusqlite::Result<Rating> {
    s.parse().map_err(|e: crate::models::ReviewError| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Creates a new deck in the database
pub fn create_deck(name: &str, conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO decks (name) VALUES (?1)", params![name])?;
    Ok(())
}

/// Retrieves all deck names from the database
pub fn deck_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM decks ORDER BY name")?;
    let decks = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(decks)
}

pub fn deck_exists(name: &str, conn: &Connection) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM decks WHERE name = ?1)",
        params![name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Adds a card to a deck with fresh scheduling state (due immediately).
///
/// Returns the card id. If the card already exists (same deck + front) the
/// insert is ignored due to the UNIQUE constraint and the existing id is
/// returned; existing scheduling progress is kept.
pub fn add_card(
    deck_name: &str,
    front: &str,
    back: &str,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<i64> {
    if !deck_exists(deck_name, conn)? {
        return Err(StoreError::DeckNotFound(deck_name.to_string()));
    }

    let state = CardState::new(now);
    conn.execute(
        "INSERT OR IGNORE INTO cards (deck_name, front, back, interval, ease_factor, review_count, due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            deck_name,
            front,
            back,
            state.interval,
            state.ease_factor,
            state.review_count,
            encode_time(state.due_date)
        ],
    )?;

    let card_id: i64 = conn.query_row(
        "SELECT id FROM cards WHERE deck_name = ?1 AND front = ?2",
        params![deck_name, front],
        |row| row.get(0),
    )?;

    Ok(card_id)
}

fn card_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredCard> {
    let due: String = row.get(6)?;
    Ok(StoredCard {
        id: row.get(0)?,
        card: Card {
            front: row.get(1)?,
            back: row.get(2)?,
        },
        state: CardState {
            interval: row.get(3)?,
            ease_factor: row.get(4)?,
            review_count: row.get(5)?,
            due_date: decode_time(6, &due)?,
        },
    })
}

/// Retrieves all cards for a given deck with their scheduling state
pub fn cards_in_deck(deck_name: &str, conn: &Connection) -> Result<Vec<StoredCard>> {
    let mut stmt = conn.prepare(
        "SELECT id, front, back, interval, ease_factor, review_count, due_date
         FROM cards WHERE deck_name = ?1
         ORDER BY id ASC",
    )?;

    let cards = stmt
        .query_map(params![deck_name], card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(cards)
}

/// Retrieves cards due for review in a deck
///
/// Returns cards where due_date <= now, ordered by due date (oldest first).
pub fn due_cards(deck_name: &str, now: DateTime<Utc>, conn: &Connection) -> Result<Vec<StoredCard>> {
    let mut stmt = conn.prepare(
        "SELECT id, front, back, interval, ease_factor, review_count, due_date
         FROM cards WHERE deck_name = ?1 AND due_date <= ?2
         ORDER BY due_date ASC",
    )?;

    let cards = stmt
        .query_map(params![deck_name, encode_time(now)], card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(cards)
}

/// Writes the scheduling state for one card after a review
pub fn update_card_state(card_id: i64, state: &CardState, conn: &Connection) -> Result<()> {
    let changed = conn.execute(
        "UPDATE cards
         SET interval = ?1, ease_factor = ?2, review_count = ?3, due_date = ?4
         WHERE id = ?5",
        params![
            state.interval,
            state.ease_factor,
            state.review_count,
            encode_time(state.due_date),
            card_id
        ],
    )?;

    if changed == 0 {
        return Err(StoreError::CardNotFound(card_id));
    }
    Ok(())
}

/// Appends one rating event to the review log
pub fn append_review(entry: &ReviewLogEntry, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO review_log (deck_name, card_id, rating, reviewed_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.deck_name,
            entry.card_id,
            entry.rating.as_str(),
            encode_time(entry.reviewed_at)
        ],
    )?;
    Ok(())
}

/// Reads a deck's review log back in insertion order
pub fn review_history(deck_name: &str, conn: &Connection) -> Result<Vec<ReviewLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT deck_name, card_id, rating, reviewed_at
         FROM review_log WHERE deck_name = ?1
         ORDER BY id ASC",
    )?;

    let entries = stmt
        .query_map(params![deck_name], |row| {
            let rating: String = row.get(2)?;
            let reviewed_at: String = row.get(3)?;
            Ok(ReviewLogEntry {
                deck_name: row.get(0)?,
                card_id: row.get(1)?,
                rating: decode_rating(2, &rating)?,
                reviewed_at: decode_time(3, &reviewed_at)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn test_conn() -> (TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = open(&dir.path().join("test.sqlite3")).unwrap();
        (dir, conn)
    }

    fn test_now() -> DateTime<Utc> {
        "2026-03-01T09:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_add_card_initializes_scheduling_state() {
        let (_dir, conn) = test_conn();
        create_deck("polish", &conn).unwrap();

        let id = add_card("polish", "cześć", "hello", test_now(), &conn).unwrap();
        let cards = cards_in_deck("polish", &conn).unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, id);
        assert_eq!(cards[0].card.front, "cześć");
        assert_eq!(cards[0].card.back, "hello");
        assert_eq!(cards[0].state, CardState::new(test_now()));
    }

    #[test]
    fn test_add_card_requires_deck() {
        let (_dir, conn) = test_conn();

        let err = add_card("missing", "a", "b", test_now(), &conn).unwrap_err();
        assert!(matches!(err, StoreError::DeckNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_add_card_keeps_existing_progress() {
        let (_dir, conn) = test_conn();
        create_deck("polish", &conn).unwrap();

        let id = add_card("polish", "tak", "yes", test_now(), &conn).unwrap();
        let mut state = CardState::new(test_now());
        state.review_count = 3;
        state.interval = 6.5;
        update_card_state(id, &state, &conn).unwrap();

        // Re-adding the same front is ignored, not a reset
        let id_again = add_card("polish", "tak", "yes", test_now(), &conn).unwrap();
        assert_eq!(id, id_again);

        let cards = cards_in_deck("polish", &conn).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].state.review_count, 3);
        assert_eq!(cards[0].state.interval, 6.5);
    }

    #[test]
    fn test_due_cards_filters_and_orders() {
        let (_dir, conn) = test_conn();
        create_deck("polish", &conn).unwrap();
        let now = test_now();

        let overdue = add_card("polish", "jeden", "one", now - Duration::days(3), &conn).unwrap();
        let due_now = add_card("polish", "dwa", "two", now, &conn).unwrap();
        let future = add_card("polish", "trzy", "three", now, &conn).unwrap();

        let mut state = CardState::new(now);
        state.due_date = now + Duration::days(2);
        update_card_state(future, &state, &conn).unwrap();

        let due = due_cards("polish", now, &conn).unwrap();
        let ids: Vec<i64> = due.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![overdue, due_now]);
    }

    #[test]
    fn test_update_card_state_roundtrip() {
        let (_dir, conn) = test_conn();
        create_deck("polish", &conn).unwrap();
        let id = add_card("polish", "pies", "dog", test_now(), &conn).unwrap();

        let state = CardState {
            interval: 4.2,
            ease_factor: 2.7,
            review_count: 5,
            due_date: test_now() + Duration::days(4) + Duration::hours(5),
        };
        update_card_state(id, &state, &conn).unwrap();

        let cards = cards_in_deck("polish", &conn).unwrap();
        assert_eq!(cards[0].state, state);
    }

    #[test]
    fn test_update_card_state_unknown_card() {
        let (_dir, conn) = test_conn();

        let err = update_card_state(42, &CardState::new(test_now()), &conn).unwrap_err();
        assert!(matches!(err, StoreError::CardNotFound(42)));
    }

    #[test]
    fn test_review_log_roundtrip_in_order() {
        let (_dir, conn) = test_conn();
        create_deck("polish", &conn).unwrap();
        let id = add_card("polish", "kot", "cat", test_now(), &conn).unwrap();

        let first = ReviewLogEntry::new("polish".to_string(), id, Rating::Hard, test_now());
        let second = ReviewLogEntry::new(
            "polish".to_string(),
            id,
            Rating::Easy,
            test_now() + Duration::days(1),
        );
        append_review(&first, &conn).unwrap();
        append_review(&second, &conn).unwrap();

        let history = review_history("polish", &conn).unwrap();
        assert_eq!(history, vec![first, second]);

        assert!(review_history("other", &conn).unwrap().is_empty());
    }
}
