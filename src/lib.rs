pub mod database;
pub mod export;
pub mod models;

pub use models::{Card, CardState, Deck, PracticeSession, Rating, ReviewLogEntry, StoredCard};
