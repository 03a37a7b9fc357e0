//! Ethereum helper against an in-process JSON-RPC node.

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{address, hex, keccak256, Address, U256};
use serde_json::{json, Value};

use multichain_wallet::blockchain::types::{BalancePayload, TransferPayload};
use multichain_wallet::blockchain::{ChainHelper, EthereumHelper};
use multichain_wallet::WalletError;

mod common;
use common::{abi_word, quantity, MockNode};

const PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const SENDER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const RECIPIENT: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
const TOKEN: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

const NODE_GAS_PRICE: u128 = 20_000_000_000;
const NODE_NONCE: u128 = 7;
const DECIMALS_SELECTOR: &str = "0x313ce567";
const BALANCE_OF_SELECTOR: &str = "0x70a08231";

/// Calldata of an `eth_call`, whichever field name the client used.
fn call_input(params: &Value) -> String {
    let call = &params[0];
    call.get("input")
        .or_else(|| call.get("data"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

async fn evm_node() -> MockNode {
    MockNode::builder()
        .result("eth_chainId", json!("0x7a69"))
        .result("eth_gasPrice", quantity(NODE_GAS_PRICE))
        .result("eth_getBalance", quantity(1_500_000_000_000_000_000))
        .result("eth_estimateGas", quantity(60_000))
        .result("eth_getTransactionCount", quantity(NODE_NONCE))
        .handler("eth_call", |params| {
            let input = call_input(params);
            if input.starts_with(DECIMALS_SELECTOR) {
                Ok(abi_word(6))
            } else if input.starts_with(BALANCE_OF_SELECTOR) {
                Ok(abi_word(2_500_000))
            } else {
                Err(format!("unexpected call {}", input))
            }
        })
        .handler("eth_sendRawTransaction", |params| {
            let raw = params[0].as_str().ok_or("missing raw transaction")?;
            let bytes = hex::decode(raw).map_err(|e| e.to_string())?;
            Ok(json!(keccak256(bytes).to_string()))
        })
        .start()
        .await
}

/// The single transaction the node received.
fn submitted(node: &MockNode) -> TxEnvelope {
    let params = node.params("eth_sendRawTransaction");
    assert_eq!(params.len(), 1, "expected exactly one submission");
    let bytes = hex::decode(params[0][0].as_str().unwrap()).unwrap();
    TxEnvelope::decode_2718(&mut bytes.as_slice()).unwrap()
}

fn transfer_payload(node: &MockNode) -> TransferPayload {
    TransferPayload {
        network: "ethereum".into(),
        rpc_url: node.url(),
        private_key: PRIVATE_KEY.into(),
        recipient_address: RECIPIENT.to_string(),
        amount: 0.5,
        token_address: None,
        gas_price: None,
        nonce: None,
    }
}

#[tokio::test]
async fn test_native_balance_in_ether() {
    let node = evm_node().await;
    let payload = BalancePayload {
        network: "ethereum".into(),
        rpc_url: node.url(),
        address: SENDER.to_string(),
        token_address: None,
    };

    let response = EthereumHelper::new().get_balance(&payload).await.unwrap();
    assert!(response.success);
    assert_eq!(response.data.balance, 1.5);
    assert!(node.was_called("eth_getBalance"));
    assert!(!node.was_called("eth_call"));
}

#[tokio::test]
async fn test_token_balance_scaled_by_decimals() {
    let node = evm_node().await;
    let payload = BalancePayload {
        network: "ethereum".into(),
        rpc_url: node.url(),
        address: SENDER.to_string(),
        token_address: Some(TOKEN.to_string()),
    };

    let response = EthereumHelper::new().get_balance(&payload).await.unwrap();
    assert_eq!(response.data.balance, 2.5);
    assert!(!node.was_called("eth_getBalance"));

    let calls = node.params("eth_call");
    assert_eq!(calls.len(), 2);
    assert!(call_input(&calls[0]).starts_with(DECIMALS_SELECTOR));
    assert!(call_input(&calls[1]).starts_with(BALANCE_OF_SELECTOR));
}

#[tokio::test]
async fn test_transfer_honors_zero_nonce_and_gas_override() {
    let node = evm_node().await;
    let payload = TransferPayload {
        gas_price: Some(3.0),
        nonce: Some(0),
        ..transfer_payload(&node)
    };

    let response = EthereumHelper::new().transfer(&payload).await.unwrap();
    let receipt = response.data.receipt;
    assert_eq!(receipt.nonce, Some(0));
    assert_eq!(receipt.gas_price.as_deref(), Some("3000000000"));
    assert_eq!(receipt.from, SENDER.to_checksum(None));
    assert_eq!(receipt.to, RECIPIENT.to_checksum(None));
    assert!(!node.was_called("eth_getTransactionCount"));

    let tx = submitted(&node);
    assert_eq!(tx.nonce(), 0);
    assert_eq!(tx.gas_price(), Some(3_000_000_000));
    assert_eq!(tx.gas_limit(), 21_000);
    assert_eq!(tx.value(), U256::from(500_000_000_000_000_000u128));
    assert_eq!(tx.to(), Some(RECIPIENT));
    assert_eq!(receipt.hash, tx.tx_hash().to_string());
}

#[tokio::test]
async fn test_transfer_without_overrides_uses_node_values() {
    let node = evm_node().await;
    let response = EthereumHelper::new()
        .transfer(&transfer_payload(&node))
        .await
        .unwrap();

    let receipt = response.data.receipt;
    assert_eq!(receipt.nonce, Some(NODE_NONCE as u64));
    assert_eq!(receipt.gas_price, Some(NODE_GAS_PRICE.to_string()));
    assert_eq!(node.params("eth_getTransactionCount").len(), 1);

    let tx = submitted(&node);
    assert_eq!(tx.nonce(), NODE_NONCE as u64);
    assert_eq!(tx.gas_price(), Some(NODE_GAS_PRICE));
}

#[tokio::test]
async fn test_token_transfer_calls_contract() {
    let node = evm_node().await;
    let payload = TransferPayload {
        amount: 1.25,
        token_address: Some(TOKEN.to_string()),
        gas_price: Some(2.5),
        nonce: Some(4),
        ..transfer_payload(&node)
    };

    let response = EthereumHelper::new().transfer(&payload).await.unwrap();
    assert_eq!(response.data.receipt.token_address, Some(TOKEN.to_string()));
    assert_eq!(response.data.receipt.gas_price.as_deref(), Some("2500000000"));

    let tx = submitted(&node);
    assert_eq!(tx.to(), Some(TOKEN));
    assert_eq!(tx.nonce(), 4);
    assert_eq!(tx.gas_price(), Some(2_500_000_000));
    assert_eq!(tx.value(), U256::ZERO);

    // transfer(address,uint256)
    let input = tx.input();
    assert_eq!(&input[..4], &hex::decode("a9059cbb").unwrap()[..]);
    assert_eq!(&input[16..36], RECIPIENT.as_slice());
    assert_eq!(U256::from_be_slice(&input[36..68]), U256::from(1_250_000u64));
}

#[tokio::test]
async fn test_rpc_error_propagates() {
    let node = MockNode::builder()
        .handler("eth_gasPrice", |_| Err("node is syncing".into()))
        .start()
        .await;

    let err = EthereumHelper::new()
        .transfer(&transfer_payload(&node))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Rpc(ref m) if m.contains("node is syncing")));
    assert!(!node.was_called("eth_sendRawTransaction"));
}
