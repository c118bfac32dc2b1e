//! End-to-end protocol flow over the request handler: an MCP client
//! initializes, lists tools, searches, and polls for a selection.

use std::sync::Arc;

use serde_json::{json, Value};

use glyphpick_catalog::{CatalogBackend, MockCatalog};
use glyphpick_mcp::{IconServer, JsonRpcRequest, ServerConfig, MCP_PROTOCOL_VERSION};
use glyphpick_types::IconRecord;

fn test_server() -> IconServer {
    let backend: Arc<dyn CatalogBackend> = Arc::new(MockCatalog::with_generated(3));
    IconServer::with_backend(ServerConfig::default().with_auto_start_web(false), backend)
}

fn request(id: u64, method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(id)),
        method: method.to_string(),
        params: Some(params),
    }
}

/// Tool results wrap their payload as a JSON string in text content.
fn tool_payload(result: &Value) -> Value {
    let text = result["content"][0]["text"].as_str().expect("text content");
    serde_json::from_str(text).expect("payload is JSON")
}

#[tokio::test]
async fn test_initialize_then_list_then_call() {
    let server = test_server();

    let response = server
        .handle_request(request(1, "initialize", json!({})))
        .await
        .expect("response");
    let result = response.result.expect("success");
    assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
    assert_eq!(result["serverInfo"]["name"], "glyphpick");

    // The initialized notification gets no response.
    let notification = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: None,
        method: "notifications/initialized".to_string(),
        params: None,
    };
    assert!(server.handle_request(notification).await.is_none());

    let response = server
        .handle_request(request(2, "tools/list", json!({})))
        .await
        .expect("response");
    let tools = response.result.expect("success");
    assert_eq!(tools["tools"].as_array().unwrap().len(), 7);

    let response = server
        .handle_request(request(
            3,
            "tools/call",
            json!({ "name": "search_icons", "arguments": { "q": "home" } }),
        ))
        .await
        .expect("response");
    let result = response.result.expect("success");
    assert_eq!(result["isError"], false);
    assert_eq!(tool_payload(&result)["count"], 3);
}

#[tokio::test]
async fn test_selection_handoff_round_trip() {
    let server = test_server();

    // Agent searches, human-facing picker comes up, human submits.
    server
        .handle_request(request(
            1,
            "tools/call",
            json!({ "name": "search_icons", "arguments": { "q": "arrow" } }),
        ))
        .await
        .expect("response");

    let sid = server.registry().start();
    server
        .registry()
        .submit(sid, vec![IconRecord::new(9, "arrow-up")])
        .expect("submit");

    // First poll delivers the selection.
    let response = server
        .handle_request(request(
            2,
            "tools/call",
            json!({ "name": "check_selection_status" }),
        ))
        .await
        .expect("response");
    let status = tool_payload(&response.result.expect("success"));
    assert_eq!(status["state"], "selected");
    assert_eq!(status["icons"][0]["name"], "arrow-up");

    // Second poll reports it as already consumed.
    let response = server
        .handle_request(request(
            3,
            "tools/call",
            json!({ "name": "check_selection_status" }),
        ))
        .await
        .expect("response");
    let status = tool_payload(&response.result.expect("success"));
    assert_eq!(status["state"], "consumed");
}

#[tokio::test]
async fn test_unknown_method_and_failed_tool() {
    let server = test_server();

    let response = server
        .handle_request(request(1, "resources/list", json!({})))
        .await
        .expect("response");
    assert_eq!(response.error.expect("error").code, -32601);

    // An unknown tool is a tool-level error, not a protocol fault.
    let response = server
        .handle_request(request(
            2,
            "tools/call",
            json!({ "name": "bogus", "arguments": {} }),
        ))
        .await
        .expect("response");
    let result = response.result.expect("success envelope");
    assert_eq!(result["isError"], true);
}
