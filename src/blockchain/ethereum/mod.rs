//! Ethereum chain helper backed by alloy.
//!
//! # Responsibilities
//! - Native and ERC-20 balances scaled to human-readable units
//! - Wallet creation and recovery at `m/44'/60'/0'/0/0`
//! - Native and ERC-20 transfers with optional gas price / nonce overrides

pub mod contract;
pub mod erc20;
pub mod wallet;

use alloy::network::TransactionBuilder;
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::blockchain::mnemonic;
use crate::blockchain::types::{
    success_response, AddressInfo, Balance, BalancePayload, Network, SuccessResponse, Transfer,
    TransferPayload, TransferReceipt, WalletError, WalletInfo, WalletResult,
};
use crate::blockchain::units::{from_base_units, to_base_units, to_u128, ETHER_DECIMALS};
use crate::blockchain::ChainHelper;

use self::contract::{get_contract, Access};
use self::wallet::{parse_address, signer_from_mnemonic, signer_from_private_key, wallet_info};

/// Gas price overrides are given in gwei.
const GWEI_DECIMALS: u8 = 9;

/// Stateless helper; every call builds its own provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthereumHelper;

impl EthereumHelper {
    pub fn new() -> Self {
        Self
    }
}

fn contract_error(e: alloy::contract::Error) -> WalletError {
    WalletError::Contract(e.to_string())
}

#[async_trait]
impl ChainHelper for EthereumHelper {
    fn network(&self) -> Network {
        Network::Ethereum
    }

    async fn get_balance(&self, payload: &BalancePayload) -> WalletResult<SuccessResponse<Balance>> {
        let owner = parse_address(&payload.address)?;
        let handle = get_contract(&payload.rpc_url, None, payload.token_address.as_deref()).await?;

        let balance = match handle.access.contract() {
            Some(contract) => {
                let decimals = contract.decimals().call().await.map_err(contract_error)?;
                let raw = contract.balanceOf(owner).call().await.map_err(contract_error)?;
                from_base_units(raw, decimals)?
            }
            None => {
                let raw = handle
                    .provider
                    .get_balance(owner)
                    .await
                    .map_err(|e| WalletError::Rpc(format!("Failed to get balance: {}", e)))?;
                from_base_units(raw, ETHER_DECIMALS)?
            }
        };

        tracing::debug!(
            address = %owner,
            token = ?payload.token_address,
            balance,
            "Fetched ethereum balance"
        );
        Ok(success_response(Balance { balance }))
    }

    async fn create_wallet(&self) -> WalletResult<SuccessResponse<WalletInfo>> {
        let phrase = mnemonic::generate()?;
        let signer = signer_from_mnemonic(&phrase)?;

        tracing::info!(address = %signer.address(), "Created ethereum wallet");
        Ok(success_response(wallet_info(&signer, &phrase)))
    }

    async fn get_address_from_private_key(
        &self,
        private_key: &str,
    ) -> WalletResult<SuccessResponse<AddressInfo>> {
        let signer = signer_from_private_key(private_key)?;
        Ok(success_response(AddressInfo {
            address: signer.address().to_checksum(None),
        }))
    }

    async fn generate_wallet_from_mnemonic(
        &self,
        phrase: &str,
    ) -> WalletResult<SuccessResponse<WalletInfo>> {
        let phrase = mnemonic::parse(phrase)?;
        let signer = signer_from_mnemonic(&phrase)?;
        Ok(success_response(wallet_info(&signer, &phrase)))
    }

    async fn transfer(&self, payload: &TransferPayload) -> WalletResult<SuccessResponse<Transfer>> {
        let handle = get_contract(
            &payload.rpc_url,
            Some(&payload.private_key),
            payload.token_address.as_deref(),
        )
        .await?;

        let (from, contract) = match &handle.access {
            Access::KeyOnly { signer } => (signer.address(), None),
            Access::KeyAndToken { signer, contract } => (signer.address(), Some(contract)),
            Access::NoKeyNoToken | Access::TokenOnly { .. } => {
                return Err(WalletError::InvalidPrivateKey(
                    "transfer requires a signing key".to_string(),
                ))
            }
        };
        let to = parse_address(&payload.recipient_address)?;

        let gas_price = match payload.gas_price {
            Some(gwei) => to_u128(to_base_units(gwei, GWEI_DECIMALS)?)?,
            None => handle.gas_price,
        };
        let nonce = handle.next_nonce(from, payload.nonce).await?;

        let tx_hash = match contract {
            Some(contract) => {
                let decimals = contract.decimals().call().await.map_err(contract_error)?;
                let amount = to_base_units(payload.amount, decimals)?;
                let pending = contract
                    .transfer(to, amount)
                    .gas_price(gas_price)
                    .nonce(nonce)
                    .send()
                    .await
                    .map_err(contract_error)?;
                *pending.tx_hash()
            }
            None => {
                let value = to_base_units(payload.amount, ETHER_DECIMALS)?;
                let tx = TransactionRequest::default()
                    .with_to(to)
                    .with_value(value)
                    .with_gas_price(gas_price)
                    .with_gas_limit(handle.gas_limit)
                    .with_nonce(nonce);
                let pending = handle
                    .provider
                    .send_transaction(tx)
                    .await
                    .map_err(|e| WalletError::Rpc(format!("Failed to send transaction: {}", e)))?;
                *pending.tx_hash()
            }
        };

        tracing::info!(
            from = %from,
            to = %to,
            tx_hash = %tx_hash,
            nonce,
            gas_price,
            token = ?payload.token_address,
            "Ethereum transfer submitted"
        );

        Ok(success_response(Transfer {
            receipt: TransferReceipt {
                network: Network::Ethereum,
                hash: tx_hash.to_string(),
                from: from.to_checksum(None),
                to: to.to_checksum(None),
                amount: payload.amount,
                token_address: payload.token_address.clone(),
                nonce: Some(nonce),
                gas_price: Some(gas_price.to_string()),
            },
        }))
    }
}
