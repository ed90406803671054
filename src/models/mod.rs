pub mod card;
pub mod card_state;
pub mod deck;
pub mod practice_session;
pub mod review_log;
pub mod scheduler;

pub use card::{Card, StoredCard};
pub use card_state::CardState;
pub use deck::Deck;
pub use practice_session::{PracticeSession, SessionError};
pub use review_log::ReviewLogEntry;
pub use scheduler::{Rating, ReviewError};
