//! Chain helpers.
//!
//! # Data Flow
//! ```text
//! WalletService (network lookup)
//!     → ChainHelper impl for that network
//!         ethereum/ (alloy provider, signer, ERC-20 contract)
//!         solana/   (ed25519 keys, message compiler, JSON-RPC)
//!     → SuccessResponse<T> back to the facade
//! ```
//!
//! # Security Constraints
//! - Never log private keys or mnemonics
//! - Every call builds its own client; nothing is cached between calls

pub mod ethereum;
pub mod mnemonic;
pub mod solana;
pub mod types;
pub mod units;

use async_trait::async_trait;

pub use ethereum::EthereumHelper;
pub use solana::SolanaHelper;
pub use types::{
    AddressInfo, Balance, BalancePayload, Network, SuccessResponse, Transfer, TransferPayload,
    TransferReceipt, WalletError, WalletInfo, WalletResult,
};

/// The operation set every supported network implements.
///
/// The facade treats implementations as interchangeable: payload and response
/// shapes are identical across networks, only unit precision and key formats
/// differ.
#[async_trait]
pub trait ChainHelper: Send + Sync {
    /// Network this helper serves.
    fn network(&self) -> Network;

    /// Native or token balance of `payload.address`, in human-readable units.
    async fn get_balance(&self, payload: &BalancePayload) -> WalletResult<SuccessResponse<Balance>>;

    /// Generate a new random wallet with its mnemonic.
    async fn create_wallet(&self) -> WalletResult<SuccessResponse<WalletInfo>>;

    /// Derive the address for a private key. Never touches the network.
    async fn get_address_from_private_key(
        &self,
        private_key: &str,
    ) -> WalletResult<SuccessResponse<AddressInfo>>;

    /// Recover the wallet for a mnemonic phrase.
    async fn generate_wallet_from_mnemonic(
        &self,
        mnemonic: &str,
    ) -> WalletResult<SuccessResponse<WalletInfo>>;

    /// Sign and submit a native or token transfer.
    async fn transfer(&self, payload: &TransferPayload) -> WalletResult<SuccessResponse<Transfer>>;
}
