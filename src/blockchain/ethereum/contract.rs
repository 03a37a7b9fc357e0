//! Per-call client construction.
//!
//! # Responsibilities
//! - Build a provider for the caller's RPC endpoint
//! - Attach a signer and/or ERC-20 contract depending on which optional
//!   inputs are present
//! - Fetch the current gas price
//!
//! Nothing here is cached: every operation builds its own handle.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::ethereum::erc20::IERC20;
use crate::blockchain::ethereum::wallet::{parse_address, signer_from_private_key};
use crate::blockchain::types::{WalletError, WalletResult};

/// Gas limit for plain value transfers.
pub const NATIVE_TRANSFER_GAS_LIMIT: u64 = 21_000;

/// ERC-20 contract bound to a per-call provider.
pub type Erc20Contract = IERC20::IERC20Instance<DynProvider>;

/// What the handle can do, decided by which optional inputs were supplied.
pub enum Access {
    /// Read-only native queries.
    NoKeyNoToken,
    /// Native transfers.
    KeyOnly { signer: PrivateKeySigner },
    /// Read-only token queries.
    TokenOnly { contract: Erc20Contract },
    /// Token transfers; the contract is bound to the signing provider.
    KeyAndToken {
        signer: PrivateKeySigner,
        contract: Erc20Contract,
    },
}

impl Access {
    /// Pick the variant for the given inputs. `provider` must already carry
    /// the signer when one is present.
    pub fn select(
        signer: Option<PrivateKeySigner>,
        token: Option<Address>,
        provider: &DynProvider,
    ) -> Self {
        match (signer, token) {
            (None, None) => Access::NoKeyNoToken,
            (Some(signer), None) => Access::KeyOnly { signer },
            (None, Some(token)) => Access::TokenOnly {
                contract: IERC20::new(token, provider.clone()),
            },
            (Some(signer), Some(token)) => Access::KeyAndToken {
                signer,
                contract: IERC20::new(token, provider.clone()),
            },
        }
    }

    pub fn signer(&self) -> Option<&PrivateKeySigner> {
        match self {
            Access::KeyOnly { signer } | Access::KeyAndToken { signer, .. } => Some(signer),
            Access::NoKeyNoToken | Access::TokenOnly { .. } => None,
        }
    }

    pub fn contract(&self) -> Option<&Erc20Contract> {
        match self {
            Access::TokenOnly { contract } | Access::KeyAndToken { contract, .. } => Some(contract),
            Access::NoKeyNoToken | Access::KeyOnly { .. } => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Access::NoKeyNoToken => "NoKeyNoToken",
            Access::KeyOnly { .. } => "KeyOnly",
            Access::TokenOnly { .. } => "TokenOnly",
            Access::KeyAndToken { .. } => "KeyAndToken",
        }
    }
}

/// Ephemeral bundle of everything one operation needs.
pub struct ContractHandle {
    pub access: Access,
    /// Live gas price estimate in wei.
    pub gas_price: u128,
    pub gas_limit: u64,
    pub provider: DynProvider,
}

impl ContractHandle {
    /// Nonce for the next transaction from `address`.
    ///
    /// An explicit override always wins; the chain is queried only when it is
    /// absent.
    pub async fn next_nonce(&self, address: Address, override_nonce: Option<u64>) -> WalletResult<u64> {
        match override_nonce {
            Some(nonce) => Ok(nonce),
            None => self
                .provider
                .get_transaction_count(address)
                .await
                .map_err(|e| WalletError::Rpc(format!("Failed to get transaction count: {}", e))),
        }
    }
}

impl std::fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractHandle")
            .field("access", &self.access.name())
            .field("gas_price", &self.gas_price)
            .field("gas_limit", &self.gas_limit)
            .finish()
    }
}

/// Build a provider from the endpoint, optionally signing with `private_key`.
pub fn connect(rpc_url: &str, signer: Option<&PrivateKeySigner>) -> WalletResult<DynProvider> {
    let url: url::Url = rpc_url.parse().map_err(|e: url::ParseError| WalletError::InvalidRpcUrl {
        url: rpc_url.to_string(),
        reason: e.to_string(),
    })?;

    let provider = match signer {
        Some(signer) => ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(url)
            .erased(),
        None => ProviderBuilder::new().connect_http(url).erased(),
    };
    Ok(provider)
}

/// Construct the handle for one operation.
///
/// Inputs are validated before any network traffic; the gas price is always
/// fetched.
pub async fn get_contract(
    rpc_url: &str,
    private_key: Option<&str>,
    token_address: Option<&str>,
) -> WalletResult<ContractHandle> {
    let signer = private_key.map(signer_from_private_key).transpose()?;
    let token = token_address.map(parse_address).transpose()?;
    let provider = connect(rpc_url, signer.as_ref())?;

    let gas_price = provider
        .get_gas_price()
        .await
        .map_err(|e| WalletError::Rpc(format!("Failed to get gas price: {}", e)))?;

    let access = Access::select(signer, token, &provider);
    tracing::debug!(access = access.name(), gas_price, "Built ethereum client handle");

    Ok(ContractHandle {
        access,
        gas_price,
        gas_limit: NATIVE_TRANSFER_GAS_LIMIT,
        provider,
    })
}
