//! Shaping configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes. The defaults reproduce the lead-weighted reward described in
//! [`crate::evaluator`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HeartsRewardError, Result};

/// How the previous trick's outcome feeds into the reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrickPolicy {
    /// Sign by winning, magnitude doubled for the leader
    #[default]
    LeadWeighted,
    /// Only the trick winner is penalized; everyone else gets the card shaping
    WinnerOnly,
}

/// Reward shaping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingConfig {
    /// Return the extreme negative reward after an overridden illegal move
    pub illegal_move_penalty: bool,
    /// Return the extreme positive reward when a trick completes a moon shot
    pub shoot_the_moon_bonus: bool,
    /// Trick-outcome policy
    pub trick_policy: TrickPolicy,
    /// Fraction of a heart's penalty used in its card value
    pub heart_weight: f64,
    /// Baseline weight for cards without a penalty
    pub other_weight: f64,
    /// Rank normalizer for the quadratic rank term
    pub rank_scale: f64,
    /// Multiplier applied when the target led the trick
    pub lead_multiplier: f64,
    /// Floor on the card penalty used in the trick adjustment
    pub min_card_penalty: f64,
    /// Divisor for the card value before any trick has closed
    pub no_trick_divisor: f64,
    /// Boost the card value when the played suit was nearly exhausted
    pub void_suit_bonus: bool,
    /// Share of the hand below which a suit counts as nearly exhausted
    pub void_suit_threshold: f64,
    /// Card value multiplier for nearly exhausted suits
    pub void_suit_multiplier: f64,
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            illegal_move_penalty: true,
            shoot_the_moon_bonus: true,
            trick_policy: TrickPolicy::LeadWeighted,
            heart_weight: 0.5,
            other_weight: 0.25,
            rank_scale: 13.0,
            lead_multiplier: 2.0,
            min_card_penalty: 0.5,
            no_trick_divisor: 13.0,
            void_suit_bonus: false,
            void_suit_threshold: 0.25,
            void_suit_multiplier: 2.0,
        }
    }
}

impl ShapingConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ShapingConfig = serde_json::from_str(json)
            .map_err(|e| HeartsRewardError::Config(format!("invalid shaping config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            HeartsRewardError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Variant with the extreme rewards switched off and the winner-only policy
    pub fn winner_only() -> Self {
        Self {
            illegal_move_penalty: false,
            shoot_the_moon_bonus: false,
            trick_policy: TrickPolicy::WinnerOnly,
            ..Default::default()
        }
    }

    /// Check that every scale is finite and the divisors are positive
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("heart_weight", self.heart_weight),
            ("other_weight", self.other_weight),
            ("lead_multiplier", self.lead_multiplier),
            ("min_card_penalty", self.min_card_penalty),
            ("void_suit_threshold", self.void_suit_threshold),
            ("void_suit_multiplier", self.void_suit_multiplier),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(HeartsRewardError::Config(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("rank_scale", self.rank_scale),
            ("no_trick_divisor", self.no_trick_divisor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(HeartsRewardError::Config(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
