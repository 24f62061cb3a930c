//! Reward shaping for Hearts
//!
//! A player's reward is delivered when that player is next asked to act, so
//! most calls are about somebody other than the player who just moved. The
//! evaluator therefore reads the target's previous-turn fields from a
//! [`GameView`] and never the trick in progress.
//!
//! Rules are tried in order and the first match wins:
//!
//! 1. the target's last move was illegal: `-max_penalty * max_num_cards_on_hand`
//! 2. the target has not played yet: `0`
//! 3. the trick just closed and the target shot the moon: `+max_penalty * max_num_cards_on_hand`
//! 4. a trick has closed before: the trick-outcome adjustment
//! 5. otherwise: `card_value / 13`
//!
//! With the default lead-weighted policy the trick-outcome adjustment is
//! `±(trick_penalty + m * max(card_penalty, 0.5))`, negative for the trick
//! winner, with `m = 2` for the leader and `1` otherwise.

use tracing::{debug, trace};

use crate::card::{Card, Suit};
use crate::config::{ShapingConfig, TrickPolicy};
use crate::reward::{Reward, RewardBranch, RewardComponentDef, RewardFunction};
use crate::snapshot::{GameView, PlayerIndex, TrickOutcome};

/// Stateless reward evaluator
#[derive(Debug, Clone, Default)]
pub struct RewardEvaluator {
    config: ShapingConfig,
}

impl RewardEvaluator {
    pub fn new(config: ShapingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShapingConfig {
        &self.config
    }

    /// Bind to a game view, yielding a [`RewardFunction`]
    pub fn bind<'a, G: GameView + ?Sized>(&'a self, view: &'a G) -> BoundEvaluator<'a, G> {
        BoundEvaluator {
            evaluator: self,
            view,
        }
    }

    /// Scalar reward for `target`
    pub fn compute_reward<G: GameView + ?Sized>(
        &self,
        view: &G,
        target: PlayerIndex,
        acting: PlayerIndex,
        trick_closed: bool,
    ) -> f64 {
        self.evaluate(view, target, acting, trick_closed).value
    }

    /// Reward for `target` with the rule that produced it
    ///
    /// # Panics
    ///
    /// If `target` or `acting` is not a seat of `view`.
    pub fn evaluate<G: GameView + ?Sized>(
        &self,
        view: &G,
        target: PlayerIndex,
        acting: PlayerIndex,
        trick_closed: bool,
    ) -> Reward {
        let players = view.num_players();
        assert!(
            target < players,
            "target player {} out of range (players: {})",
            target,
            players
        );
        assert!(
            acting < players,
            "acting player {} out of range (players: {})",
            acting,
            players
        );

        let extreme = view.max_penalty() * view.max_num_cards_on_hand() as f64;

        if self.config.illegal_move_penalty && view.prev_was_illegal(target) {
            debug!("Player {} made an illegal move, reward {}", target, -extreme);
            return Reward::new(-extreme, RewardBranch::IllegalMove)
                .with_component("extreme", -extreme);
        }

        let Some(card) = view.prev_played_card(target) else {
            trace!("Player {} has not played yet", target);
            return Reward::new(0.0, RewardBranch::NoInformation);
        };

        if self.config.shoot_the_moon_bonus && trick_closed && view.has_shot_the_moon(target) {
            debug!("Player {} shot the moon, reward {}", target, extreme);
            return Reward::new(extreme, RewardBranch::ShotTheMoon)
                .with_component("extreme", extreme);
        }

        let card_value = self.card_value(view, target, card);
        let reward = match view.prev_trick() {
            Some(trick) => self.trick_reward(view, target, card, card_value, trick),
            None => self.shaping_only(card_value),
        };

        trace!(
            "Reward for player {} (acting {}, card {}, trick closed: {}): {} via {:?}",
            target, acting, card, trick_closed, reward.value, reward.branch
        );
        reward
    }

    /// Shaping value of the card `target` played
    ///
    /// Quadratic in rank for hearts and plain cards; the queen of spades
    /// is worth its full penalty.
    pub fn card_value<G: GameView + ?Sized>(&self, view: &G, target: PlayerIndex, card: Card) -> f64 {
        let c = &self.config;
        let rank_term = (card.rank.value() as f64 / c.rank_scale).powi(2) * c.rank_scale;

        let mut value = if card.is_queen_of_spades() {
            view.penalty(card)
        } else if card.suit == Suit::Heart {
            view.penalty(card) * c.heart_weight * rank_term
        } else {
            c.other_weight * rank_term
        };

        if c.void_suit_bonus {
            let hand = view.prev_hand(target);
            let same_suit = hand.iter().filter(|h| h.suit == card.suit).count();
            if !hand.is_empty() && (same_suit as f64) < c.void_suit_threshold * hand.len() as f64 {
                trace!(
                    "Player {} nearly void in {:?} ({} of {})",
                    target,
                    card.suit,
                    same_suit,
                    hand.len()
                );
                value *= c.void_suit_multiplier;
            }
        }
        value
    }

    fn trick_reward<G: GameView + ?Sized>(
        &self,
        view: &G,
        target: PlayerIndex,
        card: Card,
        card_value: f64,
        trick: &TrickOutcome,
    ) -> Reward {
        let won = trick.winner == target;
        match self.config.trick_policy {
            TrickPolicy::LeadWeighted => {
                let led = trick.leader == target;
                let card_penalty = view.penalty(card).max(self.config.min_card_penalty);
                let multiplier = if led { self.config.lead_multiplier } else { 1.0 };
                let magnitude = trick.penalty + multiplier * card_penalty;
                let value = if won { -magnitude } else { magnitude };
                Reward::new(value, RewardBranch::TrickOutcome)
                    .with_component("card_value", card_value)
                    .with_component("trick_penalty", trick.penalty)
                    .with_component("card_penalty", multiplier * card_penalty)
            }
            TrickPolicy::WinnerOnly if won => {
                Reward::new(-trick.penalty, RewardBranch::TrickOutcome)
                    .with_component("card_value", card_value)
                    .with_component("trick_penalty", trick.penalty)
            }
            TrickPolicy::WinnerOnly => self.shaping_only(card_value),
        }
    }

    fn shaping_only(&self, card_value: f64) -> Reward {
        Reward::new(
            card_value / self.config.no_trick_divisor,
            RewardBranch::CardShaping,
        )
        .with_component("card_value", card_value)
    }

    /// Components reported in [`Reward::components`]
    pub fn components(&self) -> Vec<RewardComponentDef> {
        vec![
            RewardComponentDef {
                name: "extreme".into(),
                description: Some(
                    "Illegal-move penalty or moon-shot bonus, max_penalty * max_num_cards_on_hand"
                        .into(),
                ),
            },
            RewardComponentDef {
                name: "card_value".into(),
                description: Some("Rank-weighted shaping value of the played card".into()),
            },
            RewardComponentDef {
                name: "trick_penalty".into(),
                description: Some("Penalty collected in the previous trick".into()),
            },
            RewardComponentDef {
                name: "card_penalty".into(),
                description: Some("Floored card penalty, scaled for the trick leader".into()),
            },
        ]
    }
}

/// [`RewardEvaluator`] bound to a game view
pub struct BoundEvaluator<'a, G: GameView + ?Sized> {
    evaluator: &'a RewardEvaluator,
    view: &'a G,
}

impl<G: GameView + ?Sized> BoundEvaluator<'_, G> {
    /// Reward for `target` with the rule that produced it
    pub fn evaluate(&self, target: PlayerIndex, acting: PlayerIndex, trick_closed: bool) -> Reward {
        self.evaluator
            .evaluate(self.view, target, acting, trick_closed)
    }
}

impl<G: GameView + ?Sized> RewardFunction for BoundEvaluator<'_, G> {
    fn compute_reward(&self, target: PlayerIndex, acting: PlayerIndex, trick_closed: bool) -> f64 {
        self.evaluator
            .compute_reward(self.view, target, acting, trick_closed)
    }

    fn components(&self) -> Vec<RewardComponentDef> {
        self.evaluator.components()
    }
}
