//! # hearts-reward-server
//!
//! Line-delimited JSON-RPC server for Hearts reward shaping.
//!
//! This crate provides:
//! - JSON-RPC message types
//! - Method handlers (`reward/compute`, `reward/batch`, ...)
//! - The stdio transport loop

pub mod handlers;
pub mod protocol;
pub mod transport;

use hearts_reward_core::{Result, RewardEvaluator, ShapingConfig};

/// Hearts reward server
pub struct RewardServer {
    /// Reward evaluator
    evaluator: RewardEvaluator,
}

impl RewardServer {
    /// Create a new server with the given shaping config
    pub fn new(config: ShapingConfig) -> Self {
        Self {
            evaluator: RewardEvaluator::new(config),
        }
    }

    /// Run the server on stdio transport
    pub async fn run_stdio(self) -> Result<()> {
        transport::stdio::run(self).await
    }

    pub fn evaluator(&self) -> &RewardEvaluator {
        &self.evaluator
    }

    pub fn name(&self) -> &'static str {
        env!("CARGO_PKG_NAME")
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
