#![forbid(unsafe_code)]

use crate::{McpServer, McpServerConfig};
use serde_json::{Value, json};

impl McpServer {
    pub(crate) fn new(store: gl_storage::SqliteStore, cfg: McpServerConfig) -> Self {
        Self {
            initialized: false,
            store,
            history_limit: cfg.history_limit,
        }
    }

    pub(crate) fn handle(&mut self, request: crate::JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();
        let expects_response = !matches!(request.id.as_ref(), None | Some(Value::Null));
        tracing::debug!(method, "request");

        if method == "initialize" {
            // Echo the client's protocol version when it sends one.
            let protocol_version = request
                .params
                .as_ref()
                .and_then(|v| v.get("protocolVersion"))
                .and_then(|v| v.as_str())
                .unwrap_or(crate::MCP_VERSION);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": protocol_version,
                    "serverInfo": {
                        "name": crate::SERVER_NAME,
                        "version": crate::SERVER_VERSION
                    },
                    "capabilities": { "tools": {} }
                }),
            ));
        }

        if method == "notifications/initialized" || method == "initialized" {
            self.initialized = true;
            return None;
        }

        if !self.initialized {
            // First real request initializes implicitly.
            if matches!(method, "tools/call" | "tools/list" | "ping") {
                self.initialized = true;
            } else if expects_response {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32002,
                    "Server not initialized",
                ));
            } else {
                return None;
            }
        }

        if method == "ping" {
            return Some(crate::json_rpc_response(request.id, json!({})));
        }

        if method == "tools/list" {
            let tools = crate::handlers::tool_definitions();
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "tools": tools }),
            ));
        }

        if method == "tools/call" {
            let Some(params_obj) = request.params.as_ref().and_then(|v| v.as_object()) else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params must be an object",
                ));
            };

            let tool_name = params_obj
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            // `"arguments": null` is treated as `{}`.
            let args = match params_obj.get("arguments") {
                None | Some(Value::Null) => json!({}),
                Some(v) => v.clone(),
            };
            let response_body = self.call_tool(&tool_name, args);
            let is_error = !response_body
                .get("success")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "content": [crate::tool_text_content(&response_body)],
                    "isError": is_error
                }),
            ));
        }

        if !expects_response {
            return None;
        }

        tracing::warn!(method, "unknown method");
        Some(crate::json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }

    pub(crate) fn call_tool(&mut self, name: &str, args: Value) -> Value {
        let name = normalize_tool_name(name);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            crate::handlers::dispatch_tool(self, name, args)
        }));

        let resp = match result {
            Ok(Some(resp)) => resp,
            Ok(None) => crate::ai_error_with(
                "UNKNOWN_TOOL",
                &format!("Unknown tool: {name}"),
                Some("Call tools/list to see the available tools."),
            ),
            Err(_) => {
                tracing::warn!(tool = name, "tool handler panicked");
                crate::ai_error("STORE_ERROR", &format!("Internal error while handling {name}"))
            }
        };
        let success = resp.get("success").and_then(|v| v.as_bool()).unwrap_or(false);
        tracing::info!(tool = name, success, "tool call");
        resp
    }
}

/// Accepts `gamelab/save_code` and `gamelab.save_code` as `save_code`.
pub(crate) fn normalize_tool_name(name: &str) -> &str {
    let name = name.trim();
    if let Some((_, suffix)) = name.rsplit_once('/') {
        return suffix;
    }
    if let Some((prefix, suffix)) = name.split_once('.')
        && prefix == "gamelab"
    {
        return suffix;
    }
    name
}
