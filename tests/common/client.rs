//! MCP client for end-to-end tests
//!
//! Speaks JSON-RPC over the WebSocket endpoint and assigns request ids itself.

use super::constants::*;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct McpClient {
    ws: WsStream,
    next_id: i64,
}

impl McpClient {
    pub async fn connect(ws_url: &str) -> Self {
        let (ws, _) = connect_async(ws_url)
            .await
            .expect("Failed to connect to MCP endpoint");
        Self { ws, next_id: 1 }
    }

    /// Connects and completes the initialize handshake
    pub async fn connect_initialized(ws_url: &str) -> Self {
        let mut client = Self::connect(ws_url).await;
        client.initialize().await;
        client
    }

    pub async fn initialize(&mut self) -> Value {
        let response = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "e2e-tests", "version": "0.0.0"}
                }),
            )
            .await;
        assert!(response.get("error").is_none(), "initialize failed: {}", response);

        self.notify("notifications/initialized", json!({})).await;
        response
    }

    /// Sends a request and waits for the response carrying the same id
    pub async fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;

        self.send_raw(
            &json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string(),
        )
        .await;

        loop {
            let response = self
                .next_message(Duration::from_millis(RESPONSE_TIMEOUT_MS))
                .await
                .unwrap_or_else(|| panic!("No response to {} (id {})", method, id));
            if response["id"] == id {
                return response;
            }
        }
    }

    /// Sends a notification; the server must not answer it
    pub async fn notify(&mut self, method: &str, params: Value) {
        self.send_raw(&json!({"jsonrpc": "2.0", "method": method, "params": params}).to_string())
            .await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send MCP message");
    }

    /// Next JSON text frame, or None on timeout or close
    pub async fn next_message(&mut self, wait: Duration) -> Option<Value> {
        let result = timeout(wait, async {
            while let Some(Ok(msg)) = self.ws.next().await {
                if let Message::Text(text) = msg {
                    return serde_json::from_str::<Value>(&text).ok();
                }
            }
            None
        })
        .await;

        result.ok().flatten()
    }

    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        self.request("tools/call", json!({"name": name, "arguments": arguments}))
            .await
    }

    pub async fn read_resource(&mut self, uri: &str) -> Value {
        self.request("resources/read", json!({"uri": uri})).await
    }
}

/// Parses the JSON text block of a successful `tools/call` response
pub fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("Not a tool result: {}", response));
    serde_json::from_str(text).expect("Tool text is not JSON")
}
