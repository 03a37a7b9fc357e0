//! Minimal Solana JSON-RPC 2.0 client over reqwest.
//!
//! Only the handful of methods the helper needs. One client per call, no
//! retries.

use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::blockchain::solana::pubkey::Pubkey;
use crate::blockchain::types::{WalletError, WalletResult};

const COMMITMENT: &str = "confirmed";

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// `{ context, value }` wrapper most account queries return.
#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

/// Raw token amount as reported by `getTokenSupply` and parsed token accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenAmount {
    pub amount: String,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn raw(&self) -> WalletResult<u64> {
        self.amount
            .parse()
            .map_err(|e| WalletError::Rpc(format!("Malformed token amount '{}': {}", self.amount, e)))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
}

pub struct SolanaRpcClient {
    client: reqwest::Client,
    url: url::Url,
    request_id: AtomicU64,
}

impl SolanaRpcClient {
    pub fn new(rpc_url: &str) -> WalletResult<Self> {
        let url = rpc_url.parse().map_err(|e: url::ParseError| WalletError::InvalidRpcUrl {
            url: rpc_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            url,
            request_id: AtomicU64::new(1),
        })
    }

    /// POST one request and decode `result` into `T`.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> WalletResult<T> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| WalletError::Rpc(format!("{} request failed: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WalletError::Rpc(format!("{} returned HTTP {}", method, status)));
        }

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| WalletError::Rpc(format!("{} returned invalid JSON: {}", method, e)))?;

        if let Some(error) = body.error {
            return Err(WalletError::Rpc(format!(
                "{} failed ({}): {}",
                method, error.code, error.message
            )));
        }

        let result = body
            .result
            .ok_or_else(|| WalletError::Rpc(format!("{} returned no result", method)))?;
        serde_json::from_value(result)
            .map_err(|e| WalletError::Rpc(format!("{} returned unexpected result: {}", method, e)))
    }

    /// Lamports held by `address`.
    pub async fn get_balance(&self, address: &Pubkey) -> WalletResult<u64> {
        let balance: WithContext<u64> = self
            .call(
                "getBalance",
                json!([address.to_string(), { "commitment": COMMITMENT }]),
            )
            .await?;
        Ok(balance.value)
    }

    /// Total supply of a mint; used for its declared decimals.
    pub async fn get_token_supply(&self, mint: &Pubkey) -> WalletResult<TokenAmount> {
        let supply: WithContext<TokenAmount> = self
            .call(
                "getTokenSupply",
                json!([mint.to_string(), { "commitment": COMMITMENT }]),
            )
            .await?;
        Ok(supply.value)
    }

    /// Token amounts of every account `owner` holds for `mint`.
    pub async fn get_token_account_balances(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> WalletResult<Vec<TokenAmount>> {
        let accounts: WithContext<Vec<Value>> = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_string(),
                    { "mint": mint.to_string() },
                    { "encoding": "jsonParsed", "commitment": COMMITMENT }
                ]),
            )
            .await?;

        accounts
            .value
            .into_iter()
            .map(|entry| {
                let amount = entry
                    .pointer("/account/data/parsed/info/tokenAmount")
                    .cloned()
                    .ok_or_else(|| {
                        WalletError::Rpc("token account is missing parsed tokenAmount".to_string())
                    })?;
                serde_json::from_value(amount)
                    .map_err(|e| WalletError::Rpc(format!("Malformed tokenAmount: {}", e)))
            })
            .collect()
    }

    pub async fn get_latest_blockhash(&self) -> WalletResult<[u8; 32]> {
        let latest: WithContext<LatestBlockhash> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": COMMITMENT }]),
            )
            .await?;

        let bytes = bs58::decode(&latest.value.blockhash)
            .into_vec()
            .map_err(|e| WalletError::Rpc(format!("Malformed blockhash: {}", e)))?;
        bytes
            .try_into()
            .map_err(|_| WalletError::Rpc(format!("Malformed blockhash: {}", latest.value.blockhash)))
    }

    /// Submit a signed transaction; returns the node's signature string.
    pub async fn send_transaction(&self, wire: &[u8]) -> WalletResult<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(wire);
        self.call(
            "sendTransaction",
            json!([encoded, { "encoding": "base64", "preflightCommitment": COMMITMENT }]),
        )
        .await
    }
}

impl std::fmt::Debug for SolanaRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaRpcClient")
            .field("url", &self.url.as_str())
            .finish()
    }
}
