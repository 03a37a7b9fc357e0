//! Shared utilities for integration tests.
//!
//! [`MockNode`] is an in-process JSON-RPC 2.0 node: each method answers from a
//! programmable table and every request is logged for later assertions.

#![allow(dead_code)]

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use multichain_wallet::config::GatewayConfig;
use multichain_wallet::{HttpServer, WalletService};

/// Computes a method's result from its params; `Err` becomes a JSON-RPC error.
pub type MethodHandler = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

#[derive(Clone, Default)]
struct NodeState {
    methods: Arc<HashMap<String, MethodHandler>>,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

#[derive(Default)]
pub struct MockNodeBuilder {
    methods: HashMap<String, MethodHandler>,
}

impl MockNodeBuilder {
    /// Answer `method` with a fixed result.
    pub fn result(self, method: &str, result: Value) -> Self {
        self.handler(method, move |_| Ok(result.clone()))
    }

    /// Answer `method` by running `f` on the request params.
    pub fn handler<F>(mut self, method: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.methods.insert(method.to_string(), Arc::new(f));
        self
    }

    pub async fn start(self) -> MockNode {
        let state = NodeState {
            methods: Arc::new(self.methods),
            calls: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/", post(handle_rpc))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        MockNode { addr, state }
    }
}

pub struct MockNode {
    addr: SocketAddr,
    state: NodeState,
}

impl MockNode {
    pub fn builder() -> MockNodeBuilder {
        MockNodeBuilder::default()
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Methods called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }

    /// Params of every call to `method`.
    pub fn params(&self, method: &str) -> Vec<Value> {
        self.state
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.calls().iter().any(|m| m == method)
    }
}

fn answer(state: &NodeState, request: &Value) -> Value {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    state.calls.lock().unwrap().push((method.clone(), params.clone()));

    match state.methods.get(&method) {
        Some(handler) => match handler(&params) {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(message) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32000, "message": message }
            }),
        },
        None => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": format!("Method not found: {}", method) }
        }),
    }
}

async fn handle_rpc(State(state): State<NodeState>, Json(body): Json<Value>) -> Json<Value> {
    match body {
        Value::Array(batch) => Json(Value::Array(
            batch.iter().map(|request| answer(&state, request)).collect(),
        )),
        request => Json(answer(&state, &request)),
    }
}

/// Hex quantity as EVM nodes return it.
pub fn quantity(value: u128) -> Value {
    Value::String(format!("0x{:x}", value))
}

/// ABI-encoded single uint word.
pub fn abi_word(value: u128) -> Value {
    Value::String(format!("0x{:064x}", value))
}

/// Serve the gateway on an ephemeral port; returns its base URL.
pub async fn start_gateway(config: GatewayConfig, wallet: WalletService) -> String {
    let server = HttpServer::new(config, Arc::new(wallet));
    let app = server.router();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{}", addr)
}
