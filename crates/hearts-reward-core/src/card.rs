//! Card representation: suits, ranks, and the 52-card deck

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HeartsRewardError;

/// Card suit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];

    fn letter(self) -> char {
        match self {
            Suit::Club => 'C',
            Suit::Diamond => 'D',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Suit::Club),
            'D' => Some(Suit::Diamond),
            'H' => Some(Suit::Heart),
            'S' => Some(Suit::Spade),
            _ => None,
        }
    }
}

/// Card rank, 2 through 14 with the ace high
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const TWO: Rank = Rank(2);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);
    pub const ACE: Rank = Rank(14);

    pub fn new(value: u8) -> Result<Self, HeartsRewardError> {
        if (Rank::TWO.0..=Rank::ACE.0).contains(&value) {
            Ok(Rank(value))
        } else {
            Err(HeartsRewardError::InvalidCard(format!(
                "rank {} outside 2..=14",
                value
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// All thirteen ranks in ascending order
    pub fn all() -> impl Iterator<Item = Rank> {
        (Rank::TWO.0..=Rank::ACE.0).map(Rank)
    }
}

impl TryFrom<u8> for Rank {
    type Error = HeartsRewardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::new(value)
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.0
    }
}

/// A playing card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// The single card carrying the large penalty
    pub fn is_queen_of_spades(&self) -> bool {
        self.suit == Suit::Spade && self.rank == Rank::QUEEN
    }

    /// All 52 cards, grouped by suit
    pub fn full_deck() -> impl Iterator<Item = Card> {
        Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::all().map(move |rank| Card::new(suit, rank)))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            Rank::JACK => "J".to_string(),
            Rank::QUEEN => "Q".to_string(),
            Rank::KING => "K".to_string(),
            Rank::ACE => "A".to_string(),
            Rank(10) => "T".to_string(),
            Rank(n) => n.to_string(),
        };
        write!(f, "{}{}", rank, self.suit.letter())
    }
}

impl FromStr for Card {
    type Err = HeartsRewardError;

    /// Parse `QS`, `7C`, `10H` or `TH` style notation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let suit_char = chars
            .next_back()
            .ok_or_else(|| HeartsRewardError::InvalidCard("empty card string".into()))?;
        let suit = Suit::from_letter(suit_char)
            .ok_or_else(|| HeartsRewardError::InvalidCard(format!("unknown suit in {:?}", s)))?;

        let rank = match chars.as_str().to_ascii_uppercase().as_str() {
            "T" | "10" => 10,
            "J" => 11,
            "Q" => 12,
            "K" => 13,
            "A" => 14,
            digits => digits
                .parse::<u8>()
                .map_err(|_| HeartsRewardError::InvalidCard(format!("unknown rank in {:?}", s)))?,
        };

        Ok(Card::new(suit, Rank::new(rank)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_and_display() {
        let queen: Card = "QS".parse().unwrap();
        assert!(queen.is_queen_of_spades());
        assert_eq!(queen.to_string(), "QS");

        let ten: Card = "10h".parse().unwrap();
        assert_eq!(ten, Card::new(Suit::Heart, Rank::new(10).unwrap()));
        assert_eq!(ten.to_string(), "TH");

        let seven: Card = "7C".parse().unwrap();
        assert_eq!(seven.rank.value(), 7);
        assert_eq!(seven.suit, Suit::Club);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Card>().is_err());
        assert!("QX".parse::<Card>().is_err());
        assert!("1S".parse::<Card>().is_err());
        assert!("15H".parse::<Card>().is_err());
        assert!("ZZS".parse::<Card>().is_err());
    }

    #[test]
    fn test_rank_bounds() {
        assert!(Rank::new(1).is_err());
        assert!(Rank::new(15).is_err());
        assert_eq!(Rank::new(14).unwrap(), Rank::ACE);
    }

    #[test]
    fn test_full_deck_is_unique() {
        let deck: HashSet<Card> = Card::full_deck().collect();
        assert_eq!(deck.len(), 52);
        assert_eq!(deck.iter().filter(|c| c.is_queen_of_spades()).count(), 1);
    }

    #[test]
    fn test_serde_format() {
        let card = Card::new(Suit::Spade, Rank::QUEEN);
        let json = serde_json::to_value(card).unwrap();
        assert_eq!(json, serde_json::json!({"suit": "spade", "rank": 12}));

        let bad = serde_json::from_value::<Card>(serde_json::json!({"suit": "heart", "rank": 20}));
        assert!(bad.is_err());
    }
}
