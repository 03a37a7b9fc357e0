//! Chain-agnostic payloads, response envelopes and error definitions.
//!
//! Payloads carry `network` as a plain string so that an unrecognized network
//! still reaches the facade, which answers it with an empty result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported blockchain networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Solana,
}

impl Network {
    /// Every network this crate ships a helper for.
    pub const ALL: [Network; 2] = [Network::Ethereum, Network::Solana];

    /// Wire name of the network (`"ethereum"`, `"solana"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Solana => "solana",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ethereum" => Ok(Network::Ethereum),
            "solana" => Ok(Network::Solana),
            other => Err(WalletError::UnsupportedNetwork(other.to_string())),
        }
    }
}

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Token contract call or transaction submission failed.
    #[error("Contract error: {0}")]
    Contract(String),

    /// The RPC endpoint could not be parsed.
    #[error("Invalid RPC URL '{url}': {reason}")]
    InvalidRpcUrl { url: String, reason: String },

    /// Invalid private key format or derivation error.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Mnemonic phrase failed validation or derivation.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Address (account, token, recipient) failed to parse.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Amount or fee value could not be converted to chain units.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Local signing failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// No helper is registered for the requested network.
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),
}

impl WalletError {
    /// True for errors caused by the caller's input rather than the chain.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidRpcUrl { .. }
                | WalletError::InvalidPrivateKey(_)
                | WalletError::InvalidMnemonic(_)
                | WalletError::InvalidAddress { .. }
                | WalletError::InvalidAmount(_)
                | WalletError::UnsupportedNetwork(_)
        )
    }

    pub(crate) fn invalid_address(address: &str, reason: impl fmt::Display) -> Self {
        WalletError::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Balance query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePayload {
    pub network: String,
    pub rpc_url: String,
    pub address: String,
    /// ERC-20 contract or SPL mint; native currency when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWalletPayload {
    pub network: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFromPrivateKeyPayload {
    pub network: String,
    pub private_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MnemonicPayload {
    pub network: String,
    pub mnemonic: String,
}

/// Value or token transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPayload {
    pub network: String,
    pub rpc_url: String,
    pub private_key: String,
    pub recipient_address: String,
    /// Amount in human-readable units (ether, SOL, or whole tokens).
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    /// Gas price override: gwei on ethereum, micro-lamports per compute unit on solana.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<f64>,
    /// Nonce override. `Some(0)` is a real nonce, not an absent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

/// Uniform success wrapper returned by every helper operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Wrap an operation result in the success envelope.
pub fn success_response<T>(data: T) -> SuccessResponse<T> {
    SuccessResponse {
        success: true,
        data,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub balance: f64,
}

/// A freshly created or recovered wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    pub address: String,
    pub private_key: String,
    pub mnemonic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub address: String,
}

/// Submitted transfer, identical in shape across networks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub network: Network,
    /// Transaction hash (ethereum) or transaction signature (solana).
    pub hash: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Fee price used, in wei or micro-lamports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub receipt: TransferReceipt,
}
