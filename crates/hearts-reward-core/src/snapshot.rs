//! Previous-step game state consulted by the reward evaluator
//!
//! Rewards reach a player only at that player's next decision point, so the
//! evaluator never looks at the trick in progress. It reads what each player
//! did on their most recently completed turn and how the most recently
//! completed trick ended. [`GameView`] is that read-only contract;
//! [`HeartsSnapshot`] is a concrete, serializable implementation an engine
//! can keep up to date with [`HeartsSnapshot::record_turn`] and
//! [`HeartsSnapshot::record_trick`].

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::card::{Card, Suit};
use crate::error::{HeartsRewardError, Result};

/// Index of a seat at the table
pub type PlayerIndex = usize;

/// Table size and penalty values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub num_players: usize,
    pub max_num_cards_on_hand: usize,
    pub heart_penalty: f64,
    pub queen_of_spades_penalty: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            num_players: 4,
            max_num_cards_on_hand: 13,
            heart_penalty: 1.0,
            queen_of_spades_penalty: 13.0,
        }
    }
}

impl GameRules {
    /// Penalty carried by a single card
    pub fn penalty(&self, card: Card) -> f64 {
        if card.is_queen_of_spades() {
            self.queen_of_spades_penalty
        } else if card.suit == Suit::Heart {
            self.heart_penalty
        } else {
            0.0
        }
    }

    /// Check that the penalties and table size are usable
    pub fn validate(&self) -> Result<()> {
        if self.num_players == 0 {
            return Err(HeartsRewardError::InvalidSnapshot(
                "rules.num_players must be positive".into(),
            ));
        }
        if self.max_num_cards_on_hand == 0 {
            return Err(HeartsRewardError::InvalidSnapshot(
                "rules.max_num_cards_on_hand must be positive".into(),
            ));
        }
        for (name, value) in [
            ("heart_penalty", self.heart_penalty),
            ("queen_of_spades_penalty", self.queen_of_spades_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HeartsRewardError::InvalidSnapshot(format!(
                    "rules.{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.max_penalty() <= 0.0 {
            return Err(HeartsRewardError::InvalidSnapshot(
                "rules must give at least one card a positive penalty".into(),
            ));
        }
        Ok(())
    }

    /// Total penalty in the deck
    pub fn max_penalty(&self) -> f64 {
        Card::full_deck().map(|card| self.penalty(card)).sum()
    }
}

/// How the most recently completed trick ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrickOutcome {
    /// Player who took the trick
    pub winner: PlayerIndex,
    /// Player who played the first card
    pub leader: PlayerIndex,
    /// Penalty collected by the winner
    pub penalty: f64,
}

/// Read-only view of the previous-step state a reward is computed from
pub trait GameView {
    /// Number of seats
    fn num_players(&self) -> usize;

    /// Card `player` played on their last completed turn, if any
    fn prev_played_card(&self, player: PlayerIndex) -> Option<Card>;

    /// Whether that play was an illegal move the engine overrode
    fn prev_was_illegal(&self, player: PlayerIndex) -> bool;

    /// `player`'s hand immediately before their last play
    fn prev_hand(&self, player: PlayerIndex) -> &[Card];

    /// Outcome of the last completed trick; `None` until one closes
    fn prev_trick(&self) -> Option<&TrickOutcome>;

    /// Penalty value of a card
    fn penalty(&self, card: Card) -> f64;

    /// Whether `player` has captured every penalty card this hand
    fn has_shot_the_moon(&self, player: PlayerIndex) -> bool;

    /// Total penalty in the deck
    fn max_penalty(&self) -> f64;

    /// Hand size at the start of a hand
    fn max_num_cards_on_hand(&self) -> usize;
}

/// Serializable previous-step snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartsSnapshot {
    #[serde(default)]
    pub rules: GameRules,
    pub prev_played_cards: Vec<Option<Card>>,
    /// Empty means no player has made an illegal move
    #[serde(default)]
    pub prev_was_illegals: Vec<bool>,
    /// Empty means hands are not tracked
    #[serde(default)]
    pub prev_hands: Vec<Vec<Card>>,
    #[serde(default)]
    pub prev_trick: Option<TrickOutcome>,
    /// Penalty captured per player in the current hand
    #[serde(default)]
    pub captured_penalties: Vec<f64>,
}

impl HeartsSnapshot {
    /// Empty snapshot for a fresh hand
    pub fn new(rules: GameRules) -> Self {
        let n = rules.num_players;
        Self {
            rules,
            prev_played_cards: vec![None; n],
            prev_was_illegals: vec![false; n],
            prev_hands: vec![Vec::new(); n],
            prev_trick: None,
            captured_penalties: vec![0.0; n],
        }
    }

    /// Forget everything from the previous hand
    pub fn start_hand(&mut self) {
        *self = Self::new(self.rules.clone());
        trace!("Snapshot reset for new hand");
    }

    /// Overwrite `player`'s previous-turn fields after they play `card`
    pub fn record_turn(
        &mut self,
        player: PlayerIndex,
        hand_before: Vec<Card>,
        card: Card,
        was_illegal: bool,
    ) -> Result<()> {
        self.check_player(player)?;
        if !hand_before.contains(&card) {
            return Err(HeartsRewardError::InvalidSnapshot(format!(
                "player {} played {} which was not in their hand",
                player, card
            )));
        }
        self.fill_optional();
        trace!("Player {} played {} (illegal: {})", player, card, was_illegal);
        self.prev_played_cards[player] = Some(card);
        self.prev_was_illegals[player] = was_illegal;
        self.prev_hands[player] = hand_before;
        Ok(())
    }

    /// Overwrite the trick outcome and credit the winner with its penalty
    pub fn record_trick(
        &mut self,
        winner: PlayerIndex,
        leader: PlayerIndex,
        penalty: f64,
    ) -> Result<()> {
        self.check_player(winner)?;
        self.check_player(leader)?;
        if !penalty.is_finite() || penalty < 0.0 {
            return Err(HeartsRewardError::InvalidSnapshot(format!(
                "trick penalty must be finite and non-negative, got {}",
                penalty
            )));
        }
        self.fill_optional();
        trace!(
            "Trick closed: winner {}, leader {}, penalty {}",
            winner, leader, penalty
        );
        self.captured_penalties[winner] += penalty;
        self.prev_trick = Some(TrickOutcome {
            winner,
            leader,
            penalty,
        });
        Ok(())
    }

    /// Penalty `player` has captured in the current hand
    pub fn captured_penalty(&self, player: PlayerIndex) -> f64 {
        self.captured_penalties.get(player).copied().unwrap_or(0.0)
    }

    /// Check the snapshot invariants
    pub fn validate(&self) -> Result<()> {
        self.rules.validate()?;
        let n = self.rules.num_players;
        if self.prev_played_cards.len() != n {
            return Err(HeartsRewardError::InvalidSnapshot(format!(
                "prev_played_cards has {} entries, expected {}",
                self.prev_played_cards.len(),
                n
            )));
        }
        for (name, len) in [
            ("prev_was_illegals", self.prev_was_illegals.len()),
            ("prev_hands", self.prev_hands.len()),
            ("captured_penalties", self.captured_penalties.len()),
        ] {
            if len != 0 && len != n {
                return Err(HeartsRewardError::InvalidSnapshot(format!(
                    "{} has {} entries, expected 0 or {}",
                    name, len, n
                )));
            }
        }

        for (player, hand) in self.prev_hands.iter().enumerate() {
            if hand.len() > self.rules.max_num_cards_on_hand {
                return Err(HeartsRewardError::InvalidSnapshot(format!(
                    "player {} hand holds {} cards, limit is {}",
                    player,
                    hand.len(),
                    self.rules.max_num_cards_on_hand
                )));
            }
            if let Some(card) = self.prev_played_cards[player] {
                if !hand.is_empty() && !hand.contains(&card) {
                    return Err(HeartsRewardError::InvalidSnapshot(format!(
                        "player {} played {} which was not in their hand",
                        player, card
                    )));
                }
            }
        }

        if let Some(trick) = &self.prev_trick {
            for (role, index) in [("winner", trick.winner), ("leader", trick.leader)] {
                if index >= n {
                    return Err(HeartsRewardError::InvalidSnapshot(format!(
                        "trick {} {} out of range (players: {})",
                        role, index, n
                    )));
                }
            }
            if !trick.penalty.is_finite() || trick.penalty < 0.0 {
                return Err(HeartsRewardError::InvalidSnapshot(format!(
                    "trick penalty must be finite and non-negative, got {}",
                    trick.penalty
                )));
            }
        }

        if self
            .captured_penalties
            .iter()
            .any(|p| !p.is_finite() || *p < 0.0)
        {
            return Err(HeartsRewardError::InvalidSnapshot(
                "captured penalties must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Range-check a player index
    pub fn check_player(&self, player: PlayerIndex) -> Result<()> {
        if player < self.rules.num_players {
            Ok(())
        } else {
            Err(HeartsRewardError::InvalidPlayer {
                index: player,
                players: self.rules.num_players,
            })
        }
    }

    /// Size the optional per-player vectors before a write
    fn fill_optional(&mut self) {
        let n = self.rules.num_players;
        self.prev_was_illegals.resize(n, false);
        self.prev_hands.resize(n, Vec::new());
        self.captured_penalties.resize(n, 0.0);
    }
}

impl GameView for HeartsSnapshot {
    fn num_players(&self) -> usize {
        self.rules.num_players
    }

    fn prev_played_card(&self, player: PlayerIndex) -> Option<Card> {
        self.prev_played_cards[player]
    }

    fn prev_was_illegal(&self, player: PlayerIndex) -> bool {
        self.prev_was_illegals.get(player).copied().unwrap_or(false)
    }

    fn prev_hand(&self, player: PlayerIndex) -> &[Card] {
        self.prev_hands.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    fn prev_trick(&self) -> Option<&TrickOutcome> {
        self.prev_trick.as_ref()
    }

    fn penalty(&self, card: Card) -> f64 {
        self.rules.penalty(card)
    }

    fn has_shot_the_moon(&self, player: PlayerIndex) -> bool {
        self.captured_penalty(player) >= self.rules.max_penalty()
    }

    fn max_penalty(&self) -> f64 {
        self.rules.max_penalty()
    }

    fn max_num_cards_on_hand(&self) -> usize {
        self.rules.max_num_cards_on_hand
    }
}
