//! Reward types and the reward function trait

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::snapshot::PlayerIndex;

/// Scalar reward with its decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// Total scalar reward
    pub value: f64,
    /// Which rule produced the value
    pub branch: RewardBranch,
    /// Decomposed components for analysis
    #[serde(default)]
    pub components: RewardComponents,
}

/// Decomposed reward components
pub type RewardComponents = HashMap<String, f64>;

/// Rule that decided a reward, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardBranch {
    /// Target's last move was illegal
    IllegalMove,
    /// Target has not completed a turn yet
    NoInformation,
    /// Target swept every penalty card
    ShotTheMoon,
    /// Adjusted by the previous trick's outcome
    TrickOutcome,
    /// Card shaping only
    CardShaping,
}

impl Reward {
    pub(crate) fn new(value: f64, branch: RewardBranch) -> Self {
        Self {
            value,
            branch,
            components: RewardComponents::new(),
        }
    }

    pub(crate) fn with_component(mut self, name: &str, value: f64) -> Self {
        self.components.insert(name.to_string(), value);
        self
    }
}

/// Definition of a reward component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardComponentDef {
    /// Component name
    pub name: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Trait for computing the reward of one player
pub trait RewardFunction {
    /// Reward for `target` after `acting` finished a turn
    fn compute_reward(&self, target: PlayerIndex, acting: PlayerIndex, trick_closed: bool) -> f64;

    /// List available reward components
    fn components(&self) -> Vec<RewardComponentDef>;
}
