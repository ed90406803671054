//! Application layer driving the library from the command line.
//! Owns the database connection and implements one handler per subcommand.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, bail};
use chrono::Utc;
use rusqlite::Connection;

use lexicard::database::db;
use lexicard::export::json;
use lexicard::models::{Deck, PracticeSession, Rating};

pub struct App {
    conn: Arc<Mutex<Connection>>,
}

impl App {
    pub fn open(db_path: &Path) -> anyhow::Result<Self> {
        let conn = db::open(db_path)
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn create_deck(&self, name: &str) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        db::create_deck(name, &conn)?;
        println!("Deck '{name}' created.");
        Ok(())
    }

    pub fn list_decks(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        let names = db::deck_names(&conn)?;
        if names.is_empty() {
            println!("No decks yet.");
            return Ok(());
        }
        for name in names {
            let count = db::cards_in_deck(&name, &conn)?.len();
            println!("{name} ({count} cards)");
        }
        Ok(())
    }

    pub fn add_card(&self, deck: &str, front: &str, back: &str) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        let id = db::add_card(deck, front, back, Utc::now(), &conn)?;
        println!("Card #{id} added to '{deck}'.");
        Ok(())
    }

    pub fn export_deck(&self, name: &str, path: &Path) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        if !db::deck_exists(name, &conn)? {
            bail!("deck not found: {name}");
        }
        let cards = db::cards_in_deck(name, &conn)?
            .into_iter()
            .map(|c| c.card)
            .collect();
        let deck = Deck {
            name: name.to_string(),
            cards,
        };
        json::export_deck_to_path(&deck, path)?;
        println!("Deck '{name}' exported to {}.", path.display());
        Ok(())
    }

    /// Imports a deck file; cards start with fresh scheduling state.
    pub fn import_deck(&self, path: &Path) -> anyhow::Result<()> {
        let deck = json::import_deck(path)
            .with_context(|| format!("failed to import {}", path.display()))?;
        let conn = self.conn.lock().unwrap();
        if !db::deck_exists(&deck.name, &conn)? {
            db::create_deck(&deck.name, &conn)?;
        }
        let now = Utc::now();
        for card in &deck.cards {
            db::add_card(&deck.name, &card.front, &card.back, now, &conn)?;
        }
        println!("Deck '{}' imported ({} cards).", deck.name, deck.cards.len());
        Ok(())
    }

    pub fn list_due(&self, deck: &str) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        if !db::deck_exists(deck, &conn)? {
            bail!("deck not found: {deck}");
        }
        let due = db::due_cards(deck, Utc::now(), &conn)?;
        if due.is_empty() {
            println!("No cards due in '{deck}'.");
            return Ok(());
        }
        for card in due {
            println!(
                "#{:<4} {}  (interval {:.1}d, ease {:.2}, due {})",
                card.id,
                card.card.front,
                card.state.interval,
                card.state.ease_factor,
                card.state.due_date.format("%Y-%m-%d %H:%M")
            );
        }
        Ok(())
    }

    pub fn history(&self, deck: &str) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        if !db::deck_exists(deck, &conn)? {
            bail!("deck not found: {deck}");
        }
        let entries = db::review_history(deck, &conn)?;
        if entries.is_empty() {
            println!("No reviews recorded for '{deck}'.");
            return Ok(());
        }
        for entry in entries {
            println!(
                "{}  card #{:<4} {}",
                entry.reviewed_at.format("%Y-%m-%d %H:%M"),
                entry.card_id,
                entry.rating
            );
        }
        Ok(())
    }

    /// Interactive review loop over the deck's due cards.
    pub fn practice(&self, deck: &str) -> anyhow::Result<()> {
        let due = {
            let conn = self.conn.lock().unwrap();
            if !db::deck_exists(deck, &conn)? {
                bail!("deck not found: {deck}");
            }
            db::due_cards(deck, Utc::now(), &conn)?
        };
        if due.is_empty() {
            println!("No cards due in '{deck}'.");
            return Ok(());
        }

        println!(
            "{} cards due in '{deck}'. Enter reveals the back, q quits.",
            due.len()
        );
        let mut session =
            PracticeSession::new_from_due_cards(deck.to_string(), due, Arc::clone(&self.conn));
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        'session: while let Some((front, back)) = session
            .current()
            .map(|c| (c.card.front.clone(), c.card.back.clone()))
        {
            println!();
            println!("[{}] {front}", session.progress_message());
            print!("  ... ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            if line?.trim() == "q" {
                break;
            }
            println!("  {back}");

            loop {
                print!("  rate (easy/medium/hard): ");
                io::stdout().flush()?;
                let Some(line) = lines.next() else {
                    break 'session;
                };
                let input = line?;
                let input = input.trim();
                if input == "q" {
                    break 'session;
                }
                match input.parse::<Rating>() {
                    Ok(rating) => match session.rate_current(rating, Utc::now()) {
                        Ok(state) => {
                            println!("  next review in {:.1} days", state.interval.max(1.0));
                            break;
                        }
                        Err(err) => {
                            // The card stayed in the queue; nothing was lost
                            eprintln!("  review failed: {err}");
                            break 'session;
                        }
                    },
                    Err(err) => println!("  {err}"),
                }
            }
        }

        println!();
        println!("Session finished: {}.", session.progress_message());
        Ok(())
    }
}
