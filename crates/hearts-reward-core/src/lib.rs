//! # hearts-reward-core
//!
//! Per-step reward shaping for reinforcement-learning agents playing Hearts.
//!
//! This crate provides:
//! - Card, suit, and rank types
//! - The previous-step snapshot contract the reward is computed from
//! - The reward evaluator and its shaping configuration
//! - Error types shared with the reward server

pub mod card;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod reward;
pub mod snapshot;

pub use card::{Card, Rank, Suit};
pub use config::{ShapingConfig, TrickPolicy};
pub use error::{HeartsRewardError, Result, error_codes};
pub use evaluator::{BoundEvaluator, RewardEvaluator};
pub use reward::{Reward, RewardBranch, RewardComponentDef, RewardComponents, RewardFunction};
pub use snapshot::{GameRules, GameView, HeartsSnapshot, PlayerIndex, TrickOutcome};
