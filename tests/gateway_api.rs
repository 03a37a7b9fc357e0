//! End-to-end tests of the HTTP gateway.

use reqwest::StatusCode;
use serde_json::{json, Value};

use multichain_wallet::blockchain::Network;
use multichain_wallet::config::{GatewayConfig, NetworksConfig};
use multichain_wallet::WalletService;

mod common;
use common::{quantity, start_gateway, MockNode};

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const ANVIL_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ANVIL_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

async fn gateway() -> String {
    start_gateway(GatewayConfig::default(), WalletService::with_default_chains()).await
}

async fn post(base: &str, path: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_then_recover_over_http() {
    let base = gateway().await;

    for network in ["ethereum", "solana"] {
        let res = post(&base, "/wallet/create", json!({ "network": network })).await;
        assert_eq!(res.status(), StatusCode::OK);
        let created: Value = res.json().await.unwrap();
        assert_eq!(created["success"], true);

        let res = post(
            &base,
            "/wallet/mnemonic",
            json!({ "network": network, "mnemonic": created["data"]["mnemonic"] }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let recovered: Value = res.json().await.unwrap();
        assert_eq!(recovered["data"], created["data"], "{}", network);
    }
}

#[tokio::test]
async fn test_address_from_private_key() {
    let base = gateway().await;
    let res = post(
        &base,
        "/wallet/address",
        json!({ "network": "ethereum", "privateKey": ANVIL_KEY }),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "data": { "address": ANVIL_ADDRESS } }));
}

#[tokio::test]
async fn test_unknown_network_is_no_content() {
    let base = gateway().await;
    let res = post(&base, "/wallet/create", json!({ "network": "bitcoin" })).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_disabled_network_is_no_content() {
    let mut config = GatewayConfig::default();
    config.networks = NetworksConfig {
        enabled: vec![Network::Ethereum],
    };
    let base = start_gateway(config.clone(), WalletService::from_config(&config.networks)).await;

    let res = post(&base, "/wallet/mnemonic", json!({ "network": "solana", "mnemonic": ABANDON })).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let health: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({ "status": "ok", "networks": ["ethereum"] }));
}

#[tokio::test]
async fn test_invalid_input_is_bad_request() {
    let base = gateway().await;
    let res = post(
        &base,
        "/wallet/mnemonic",
        json!({ "network": "ethereum", "mnemonic": "definitely not valid" }),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid mnemonic"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let base = gateway().await;
    let res = post(&base, "/wallet/address", json!({ "network": "ethereum" })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("privateKey"));
}

#[tokio::test]
async fn test_balance_through_mock_node() {
    let node = MockNode::builder()
        .result("eth_gasPrice", quantity(1_000_000_000))
        .result("eth_getBalance", quantity(250_000_000_000_000_000))
        .start()
        .await;
    let base = gateway().await;

    let res = post(
        &base,
        "/wallet/balance",
        json!({ "network": "ethereum", "rpcUrl": node.url(), "address": ANVIL_ADDRESS }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["balance"], 0.25);
}

#[tokio::test]
async fn test_unreachable_node_is_bad_gateway() {
    let base = gateway().await;
    let res = post(
        &base,
        "/wallet/balance",
        json!({ "network": "solana", "rpcUrl": "http://127.0.0.1:1", "address": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM" }),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("RPC error"));
}

#[tokio::test]
async fn test_request_id_generated_and_echoed() {
    let base = gateway().await;

    let res = reqwest::get(format!("{}/health", base)).await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&generated).is_ok());

    let res = reqwest::Client::new()
        .get(format!("{}/health", base))
        .header("x-request-id", "client-supplied-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "client-supplied-42");
}

#[tokio::test]
async fn test_body_limit_enforced() {
    let mut config = GatewayConfig::default();
    config.security.max_body_size = 128;
    let base = start_gateway(config, WalletService::with_default_chains()).await;

    let res = post(
        &base,
        "/wallet/mnemonic",
        json!({ "network": "ethereum", "mnemonic": "word ".repeat(100) }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
