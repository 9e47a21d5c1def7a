//! Stdio transport: one JSON-RPC message per line on stdin, one response per line on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use super::handler::{handle_message, McpSession, McpState};

/// Serve a single client until EOF or `shutdown`.
pub async fn serve_lines<R, W>(reader: R, mut writer: W, mcp_state: &McpState) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut session = McpSession::new();

    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = handle_message(line, mcp_state, &mut session).await {
            match serde_json::to_string(&response) {
                Ok(mut json) => {
                    json.push('\n');
                    writer
                        .write_all(json.as_bytes())
                        .await
                        .context("Failed to write response")?;
                    writer.flush().await.context("Failed to flush response")?;
                }
                Err(e) => error!("Failed to serialize MCP response: {}", e),
            }
        }

        if session.shutdown_requested() {
            debug!("Shutdown requested, closing stdio transport");
            break;
        }
    }

    Ok(())
}

/// Serve MCP over the process' stdin and stdout.
pub async fn serve_stdio(mcp_state: Arc<McpState>) -> Result<()> {
    info!("Serving MCP over stdio");
    serve_lines(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &mcp_state,
    )
    .await?;
    info!("Stdio client disconnected");
    Ok(())
}
