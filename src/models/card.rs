//! Card is a pair <front, back>. Only text is used on both sides.
use super::CardState;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub front: String,
    pub back: String,
}

/// A card as read from the store: content plus id and scheduling state.
#[derive(Clone, Debug)]
pub struct StoredCard {
    pub id: i64,
    pub card: Card,
    pub state: CardState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_creation() {
        let card = Card {
            front: "hello".to_string(),
            back: "cześć".to_string(),
        };

        assert_eq!(card.front, "hello");
        assert_eq!(card.back, "cześć");
    }
}
