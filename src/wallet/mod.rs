//! Network-dispatching wallet facade.
//!
//! # Responsibilities
//! - Resolve the chain helper for a payload's `network`
//! - Forward the call and hand back the helper's result untouched
//! - Answer unrecognized networks with `Ok(None)` instead of an error
//! - Record per-operation metrics
//!
//! # Design Decisions
//! - The registry is built once and never mutated; share it via `Arc`
//! - Networks are resolved from the payload's free-form string so that an
//!   unknown value is a soft miss, not a deserialization failure

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::blockchain::types::{
    AddressFromPrivateKeyPayload, CreateWalletPayload, MnemonicPayload,
};
use crate::blockchain::{
    AddressInfo, Balance, BalancePayload, ChainHelper, EthereumHelper, Network, SolanaHelper,
    SuccessResponse, Transfer, TransferPayload, WalletInfo, WalletResult,
};
use crate::config::NetworksConfig;
use crate::observability::metrics;

/// Result of a dispatched call: `None` when no helper serves the network.
pub type Dispatch<T> = WalletResult<Option<SuccessResponse<T>>>;

/// Registry of chain helpers keyed by network.
#[derive(Clone, Default)]
pub struct WalletService {
    helpers: HashMap<Network, Arc<dyn ChainHelper>>,
}

impl WalletService {
    /// Empty registry; every request is answered with `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a helper under the network it reports. Replaces any earlier
    /// helper for that network.
    pub fn with_helper(mut self, helper: Arc<dyn ChainHelper>) -> Self {
        self.helpers.insert(helper.network(), helper);
        self
    }

    /// Registry with the built-in helper for each enabled network.
    pub fn from_config(config: &NetworksConfig) -> Self {
        config
            .enabled
            .iter()
            .fold(Self::new(), |service, network| {
                service.with_helper(builtin_helper(*network))
            })
    }

    /// Registry serving every built-in network.
    pub fn with_default_chains() -> Self {
        Self::from_config(&NetworksConfig::default())
    }

    /// Networks with a registered helper, in a stable order.
    pub fn networks(&self) -> Vec<Network> {
        Network::ALL
            .into_iter()
            .filter(|n| self.helpers.contains_key(n))
            .collect()
    }

    fn resolve(&self, network: &str, operation: &'static str) -> Option<(Network, &Arc<dyn ChainHelper>)> {
        let resolved = network
            .parse::<Network>()
            .ok()
            .and_then(|n| self.helpers.get(&n).map(|helper| (n, helper)));

        if resolved.is_none() {
            tracing::warn!(network = %network, operation, "No helper registered for network");
            metrics::record_operation("unsupported", operation, "unsupported", Instant::now());
        }
        resolved
    }

    /// Run `call` against the resolved helper, timing it.
    async fn dispatch<'a, T, F, Fut>(&'a self, network: &str, operation: &'static str, call: F) -> Dispatch<T>
    where
        F: FnOnce(&'a Arc<dyn ChainHelper>) -> Fut,
        Fut: Future<Output = WalletResult<SuccessResponse<T>>>,
    {
        let Some((network, helper)) = self.resolve(network, operation) else {
            return Ok(None);
        };

        let start = Instant::now();
        let result = call(helper).await;
        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::record_operation(network.as_str(), operation, outcome, start);

        if let Err(e) = &result {
            tracing::debug!(network = %network, operation, error = %e, "Wallet operation failed");
        }
        result.map(Some)
    }

    pub async fn get_balance(&self, payload: &BalancePayload) -> Dispatch<Balance> {
        self.dispatch(&payload.network, "get_balance", |h| h.get_balance(payload))
            .await
    }

    pub async fn create_wallet(&self, payload: &CreateWalletPayload) -> Dispatch<WalletInfo> {
        self.dispatch(&payload.network, "create_wallet", |h| h.create_wallet())
            .await
    }

    pub async fn get_address_from_private_key(
        &self,
        payload: &AddressFromPrivateKeyPayload,
    ) -> Dispatch<AddressInfo> {
        self.dispatch(&payload.network, "get_address_from_private_key", |h| {
            h.get_address_from_private_key(&payload.private_key)
        })
        .await
    }

    pub async fn generate_wallet_from_mnemonic(&self, payload: &MnemonicPayload) -> Dispatch<WalletInfo> {
        self.dispatch(&payload.network, "generate_wallet_from_mnemonic", |h| {
            h.generate_wallet_from_mnemonic(&payload.mnemonic)
        })
        .await
    }

    pub async fn transfer(&self, payload: &TransferPayload) -> Dispatch<Transfer> {
        self.dispatch(&payload.network, "transfer", |h| h.transfer(payload))
            .await
    }
}

impl std::fmt::Debug for WalletService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletService")
            .field("networks", &self.networks())
            .finish()
    }
}

fn builtin_helper(network: Network) -> Arc<dyn ChainHelper> {
    match network {
        Network::Ethereum => Arc::new(EthereumHelper::new()),
        Network::Solana => Arc::new(SolanaHelper::new()),
    }
}
