//! Method handlers for the reward server

use hearts_reward_core::{
    HeartsRewardError, HeartsSnapshot, PlayerIndex, RewardBranch, error_codes,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::RewardServer;
use crate::protocol::{Request, Response, ServerInfo};

/// Params of `reward/compute`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeParams {
    pub snapshot: HeartsSnapshot,
    pub target: PlayerIndex,
    pub acting: PlayerIndex,
    #[serde(default)]
    pub trick_closed: bool,
}

/// Params of `reward/batch`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchParams {
    pub snapshot: HeartsSnapshot,
    pub targets: Vec<PlayerIndex>,
    pub acting: PlayerIndex,
    #[serde(default)]
    pub trick_closed: bool,
}

/// Result of `reward/compute`
#[derive(Debug, Clone, Serialize)]
pub struct ComputeResult {
    pub target: PlayerIndex,
    pub value: f64,
    pub branch: RewardBranch,
    pub components: hearts_reward_core::RewardComponents,
}

/// Dispatch a request to its handler
pub fn handle_request(request: &Request, server: &RewardServer) -> Response {
    match request.method.as_str() {
        "initialize" => handle_initialize(request, server),
        "reward/compute" => handle_compute(request, server),
        "reward/batch" => handle_batch(request, server),
        "reward/components" => Response::success(
            request.id.clone(),
            serde_json::json!({ "components": server.evaluator().components() }),
        ),
        "config/get" => Response::success(
            request.id.clone(),
            serde_json::json!({ "config": server.evaluator().config() }),
        ),
        _ => Response::error(
            request.id.clone(),
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

fn handle_initialize(request: &Request, server: &RewardServer) -> Response {
    let info = ServerInfo {
        name: server.name().to_string(),
        version: server.version().to_string(),
    };
    Response::success(
        request.id.clone(),
        serde_json::json!({
            "serverInfo": info,
            "config": server.evaluator().config(),
        }),
    )
}

fn handle_compute(request: &Request, server: &RewardServer) -> Response {
    let params: ComputeParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                request.id.clone(),
                error_codes::INVALID_PARAMS,
                format!("Invalid reward/compute params: {}", e),
            );
        }
    };

    match compute(server, &params.snapshot, params.target, params.acting, params.trick_closed) {
        Ok(result) => to_response(request, &result),
        Err(e) => error_response(request, e),
    }
}

fn handle_batch(request: &Request, server: &RewardServer) -> Response {
    let params: BatchParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                request.id.clone(),
                error_codes::INVALID_PARAMS,
                format!("Invalid reward/batch params: {}", e),
            );
        }
    };

    let results: Result<Vec<ComputeResult>, HeartsRewardError> = params
        .targets
        .iter()
        .map(|&target| {
            compute(server, &params.snapshot, target, params.acting, params.trick_closed)
        })
        .collect();

    match results {
        Ok(rewards) => to_response(request, &serde_json::json!({ "rewards": rewards })),
        Err(e) => error_response(request, e),
    }
}

/// Validate at the boundary, then evaluate
fn compute(
    server: &RewardServer,
    snapshot: &HeartsSnapshot,
    target: PlayerIndex,
    acting: PlayerIndex,
    trick_closed: bool,
) -> Result<ComputeResult, HeartsRewardError> {
    snapshot.validate()?;
    snapshot.check_player(target)?;
    snapshot.check_player(acting)?;

    let reward = server
        .evaluator()
        .evaluate(snapshot, target, acting, trick_closed);
    debug!(
        "Reward for player {}: {} ({:?})",
        target, reward.value, reward.branch
    );
    Ok(ComputeResult {
        target,
        value: reward.value,
        branch: reward.branch,
        components: reward.components,
    })
}

fn to_response<T: Serialize>(request: &Request, result: &T) -> Response {
    match serde_json::to_value(result) {
        Ok(value) => Response::success(request.id.clone(), value),
        Err(e) => Response::error(
            request.id.clone(),
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
        ),
    }
}

fn error_response(request: &Request, err: HeartsRewardError) -> Response {
    warn!("{} rejected: {}", request.method, err);
    let code = match err {
        HeartsRewardError::InvalidPlayer { .. } => error_codes::INVALID_PLAYER,
        HeartsRewardError::InvalidSnapshot(_) => error_codes::INVALID_SNAPSHOT,
        _ => error_codes::INVALID_PARAMS,
    };
    Response::error(request.id.clone(), code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestId;
    use hearts_reward_core::ShapingConfig;
    use serde_json::json;

    fn request(method: &str, params: serde_json::Value) -> Request {
        Request {
            jsonrpc: "2.0".into(),
            id: RequestId::Number(1),
            method: method.into(),
            params,
        }
    }

    fn queen_snapshot() -> serde_json::Value {
        json!({
            "prev_played_cards": [{"suit": "spade", "rank": 12}, null, null, null],
            "prev_trick": {"winner": 0, "leader": 0, "penalty": 5.0}
        })
    }

    #[test]
    fn test_compute() {
        let server = RewardServer::new(ShapingConfig::default());
        let req = request(
            "reward/compute",
            json!({"snapshot": queen_snapshot(), "target": 0, "acting": 3, "trickClosed": true}),
        );
        let response = handle_request(&req, &server);
        let result = response.result.unwrap();
        assert_eq!(result["value"], json!(-31.0));
        assert_eq!(result["branch"], json!("trick_outcome"));
        assert_eq!(result["components"]["trick_penalty"], json!(5.0));
    }

    #[test]
    fn test_batch() {
        let server = RewardServer::new(ShapingConfig::default());
        let req = request(
            "reward/batch",
            json!({"snapshot": queen_snapshot(), "targets": [0, 1], "acting": 3}),
        );
        let result = handle_request(&req, &server).result.unwrap();
        let rewards = result["rewards"].as_array().unwrap();
        assert_eq!(rewards.len(), 2);
        assert_eq!(rewards[0]["value"], json!(-31.0));
        assert_eq!(rewards[1]["branch"], json!("no_information"));
    }

    #[test]
    fn test_invalid_player_is_rejected() {
        let server = RewardServer::new(ShapingConfig::default());
        let req = request(
            "reward/compute",
            json!({"snapshot": queen_snapshot(), "target": 9, "acting": 0}),
        );
        let error = handle_request(&req, &server).error.unwrap();
        assert_eq!(error.code, error_codes::INVALID_PLAYER);
    }

    #[test]
    fn test_invalid_snapshot_is_rejected() {
        let server = RewardServer::new(ShapingConfig::default());
        let snapshot = json!({
            "prev_played_cards": [null, null, null, null],
            "prev_trick": {"winner": 6, "leader": 0, "penalty": 1.0}
        });
        let req = request(
            "reward/compute",
            json!({"snapshot": snapshot, "target": 0, "acting": 0}),
        );
        let error = handle_request(&req, &server).error.unwrap();
        assert_eq!(error.code, error_codes::INVALID_SNAPSHOT);
    }

    #[test]
    fn test_broken_rules_are_rejected() {
        let server = RewardServer::new(ShapingConfig::default());
        for rules in [
            json!({"heart_penalty": -1.0}),
            json!({"heart_penalty": 0.0, "queen_of_spades_penalty": 0.0}),
            json!({"max_num_cards_on_hand": 0}),
        ] {
            let snapshot = json!({
                "rules": rules.clone(),
                "prev_played_cards": [null, {"suit": "club", "rank": 7}, null, null],
                "prev_trick": {"winner": 0, "leader": 0, "penalty": 0.0}
            });
            let req = request(
                "reward/compute",
                json!({"snapshot": snapshot, "target": 1, "acting": 0, "trickClosed": true}),
            );
            let response = handle_request(&req, &server);
            assert!(response.result.is_none(), "{} accepted", rules);
            assert_eq!(response.error.unwrap().code, error_codes::INVALID_SNAPSHOT);
        }
    }

    #[test]
    fn test_serialize_failure_is_internal_error() {
        struct Unserializable;
        impl Serialize for Unserializable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not serializable"))
            }
        }

        let response = to_response(&request("config/get", json!({})), &Unserializable);
        assert_eq!(response.error.unwrap().code, error_codes::INTERNAL_ERROR);
    }

    #[test]
    fn test_bad_params_and_unknown_method() {
        let server = RewardServer::new(ShapingConfig::default());
        let error = handle_request(&request("reward/compute", json!({"target": 0})), &server)
            .error
            .unwrap();
        assert_eq!(error.code, error_codes::INVALID_PARAMS);

        let error = handle_request(&request("sim_step", json!({})), &server)
            .error
            .unwrap();
        assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_initialize_and_config() {
        let server = RewardServer::new(ShapingConfig::winner_only());
        let result = handle_request(&request("initialize", json!({})), &server)
            .result
            .unwrap();
        assert_eq!(result["serverInfo"]["name"], json!("hearts-reward-server"));
        assert_eq!(result["config"]["trick_policy"], json!("winner_only"));

        let result = handle_request(&request("reward/components", json!({})), &server)
            .result
            .unwrap();
        assert_eq!(result["components"].as_array().unwrap().len(), 4);
    }
}
