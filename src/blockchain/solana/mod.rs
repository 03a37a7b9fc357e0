//! Solana chain helper.
//!
//! # Responsibilities
//! - Native (lamports) and SPL token balances
//! - Wallet creation and recovery at `m/44'/501'/0'/0'`
//! - Native and SPL transfers as signed legacy transactions
//!
//! # Data Flow
//! ```text
//! payload → SolanaRpcClient (blockhash, decimals)
//!         → instructions → Message::compile → sign_transaction
//!         → sendTransaction → signature as receipt hash
//! ```

pub mod keypair;
pub mod pubkey;
pub mod rpc;
pub mod transaction;

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::blockchain::mnemonic;
use crate::blockchain::types::{
    success_response, AddressInfo, Balance, BalancePayload, Network, SuccessResponse, Transfer,
    TransferPayload, TransferReceipt, WalletError, WalletInfo, WalletResult,
};
use crate::blockchain::units::{from_base_units, to_base_units, to_u64, SOL_DECIMALS};
use crate::blockchain::ChainHelper;

use self::keypair::SolanaKeypair;
use self::pubkey::{associated_token_address, Pubkey};
use self::rpc::SolanaRpcClient;
use self::transaction::{
    create_associated_token_account_idempotent, set_compute_unit_price, sign_transaction,
    system_transfer, transfer_checked, Instruction, Message,
};

/// Stateless helper; every call builds its own RPC client.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolanaHelper;

impl SolanaHelper {
    pub fn new() -> Self {
        Self
    }
}

/// Priority fee override, truncated to whole micro-lamports.
fn compute_unit_price(gas_price: f64) -> WalletResult<u64> {
    if !gas_price.is_finite() || gas_price < 0.0 {
        return Err(WalletError::InvalidAmount(format!(
            "gas price must be a non-negative number, got {}",
            gas_price
        )));
    }
    Ok(gas_price.floor() as u64)
}

/// Instructions moving an SPL token between the parties' associated accounts.
fn token_transfer_instructions(
    owner: &Pubkey,
    recipient: &Pubkey,
    mint: &Pubkey,
    amount: u64,
    decimals: u8,
) -> WalletResult<Vec<Instruction>> {
    let source = associated_token_address(owner, mint)?;
    let destination = associated_token_address(recipient, mint)?;

    Ok(vec![
        create_associated_token_account_idempotent(owner, recipient, mint)?,
        transfer_checked(&source, mint, &destination, owner, amount, decimals)?,
    ])
}

#[async_trait]
impl ChainHelper for SolanaHelper {
    fn network(&self) -> Network {
        Network::Solana
    }

    async fn get_balance(&self, payload: &BalancePayload) -> WalletResult<SuccessResponse<Balance>> {
        let owner = Pubkey::parse(&payload.address)?;
        let mint = payload.token_address.as_deref().map(Pubkey::parse).transpose()?;
        let client = SolanaRpcClient::new(&payload.rpc_url)?;

        let balance = match mint {
            Some(mint) => {
                let decimals = client.get_token_supply(&mint).await?.decimals;
                let mut total: u128 = 0;
                for account in client.get_token_account_balances(&owner, &mint).await? {
                    total += u128::from(account.raw()?);
                }
                from_base_units(U256::from(total), decimals)?
            }
            None => {
                let lamports = client.get_balance(&owner).await?;
                from_base_units(U256::from(lamports), SOL_DECIMALS)?
            }
        };

        tracing::debug!(
            address = %owner,
            token = ?payload.token_address,
            balance,
            "Fetched solana balance"
        );
        Ok(success_response(Balance { balance }))
    }

    async fn create_wallet(&self) -> WalletResult<SuccessResponse<WalletInfo>> {
        let phrase = mnemonic::generate()?;
        let keypair = SolanaKeypair::from_mnemonic(&phrase)?;

        tracing::info!(address = %keypair.pubkey(), "Created solana wallet");
        Ok(success_response(keypair.wallet_info(&phrase)))
    }

    async fn get_address_from_private_key(
        &self,
        private_key: &str,
    ) -> WalletResult<SuccessResponse<AddressInfo>> {
        let keypair = SolanaKeypair::from_base58(private_key)?;
        Ok(success_response(AddressInfo {
            address: keypair.pubkey().to_string(),
        }))
    }

    async fn generate_wallet_from_mnemonic(
        &self,
        phrase: &str,
    ) -> WalletResult<SuccessResponse<WalletInfo>> {
        let phrase = mnemonic::parse(phrase)?;
        let keypair = SolanaKeypair::from_mnemonic(&phrase)?;
        Ok(success_response(keypair.wallet_info(&phrase)))
    }

    async fn transfer(&self, payload: &TransferPayload) -> WalletResult<SuccessResponse<Transfer>> {
        let keypair = SolanaKeypair::from_base58(&payload.private_key)?;
        let from = keypair.pubkey();
        let to = Pubkey::parse(&payload.recipient_address)?;
        let mint = payload.token_address.as_deref().map(Pubkey::parse).transpose()?;
        let unit_price = payload.gas_price.map(compute_unit_price).transpose()?;
        let client = SolanaRpcClient::new(&payload.rpc_url)?;

        if let Some(nonce) = payload.nonce {
            tracing::debug!(nonce, "Ignoring nonce override; solana uses the recent blockhash");
        }

        let mut instructions = Vec::new();
        if let Some(price) = unit_price {
            instructions.push(set_compute_unit_price(price)?);
        }

        match mint {
            Some(mint) => {
                let decimals = client.get_token_supply(&mint).await?.decimals;
                let amount = to_u64(to_base_units(payload.amount, decimals)?)?;
                instructions.extend(token_transfer_instructions(&from, &to, &mint, amount, decimals)?);
            }
            None => {
                let lamports = to_u64(to_base_units(payload.amount, SOL_DECIMALS)?)?;
                instructions.push(system_transfer(&from, &to, lamports)?);
            }
        }

        let blockhash = client.get_latest_blockhash().await?;
        let message = Message::compile(&instructions, &from, blockhash)?;
        let signed = sign_transaction(&message, &keypair)?;
        let signature = client.send_transaction(&signed.wire).await?;

        if signature != signed.signature {
            tracing::warn!(
                expected = %signed.signature,
                returned = %signature,
                "Node returned a different transaction signature"
            );
        }

        tracing::info!(
            from = %from,
            to = %to,
            tx_hash = %signature,
            compute_unit_price = ?unit_price,
            token = ?payload.token_address,
            "Solana transfer submitted"
        );

        Ok(success_response(Transfer {
            receipt: TransferReceipt {
                network: Network::Solana,
                hash: signature,
                from: from.to_string(),
                to: to.to_string(),
                amount: payload.amount,
                token_address: payload.token_address.clone(),
                nonce: None,
                gas_price: unit_price.map(|p| p.to_string()),
            },
        }))
    }
}
