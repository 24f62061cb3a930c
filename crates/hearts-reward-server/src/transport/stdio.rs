//! stdio transport for line-delimited JSON-RPC

use crate::RewardServer;
use crate::handlers::handle_request;
use crate::protocol::{Request, RequestId, Response};
use hearts_reward_core::{HeartsRewardError, Result, error_codes};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

/// Run the server on stdin/stdout
pub async fn run(server: RewardServer) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    info!("Hearts reward server starting on stdio");
    serve(&server, reader, writer).await
}

/// Serve requests from `reader` until EOF, writing one response per line
pub async fn serve<R, W>(server: &RewardServer, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| HeartsRewardError::Ipc(format!("Failed to read input: {}", e)))?;

        if bytes_read == 0 {
            info!("Client disconnected (EOF)");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Received: {}", trimmed);

        let response = match serde_json::from_str::<Request>(trimmed) {
            Ok(request) => handle_request(&request, server),
            Err(e) => {
                error!("Failed to parse request: {}", e);
                match recover_id(trimmed) {
                    Some(id) => Response::error(
                        id,
                        error_codes::PARSE_ERROR,
                        format!("Invalid request: {}", e),
                    ),
                    None => continue,
                }
            }
        };

        let response_json = serde_json::to_string(&response)?;
        debug!("Sending: {}", response_json);

        writer
            .write_all(response_json.as_bytes())
            .await
            .map_err(|e| HeartsRewardError::Ipc(format!("Failed to write output: {}", e)))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| HeartsRewardError::Ipc(format!("Failed to write newline: {}", e)))?;
        writer
            .flush()
            .await
            .map_err(|e| HeartsRewardError::Ipc(format!("Failed to flush output: {}", e)))?;
    }

    Ok(())
}

/// Pull the id out of a request that failed to parse, if it has one
fn recover_id(line: &str) -> Option<RequestId> {
    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    serde_json::from_value(value.get("id")?.clone()).ok()
}
