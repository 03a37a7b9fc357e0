//! Multi-chain wallet facade with an HTTP gateway.
//!
//! `WalletService` dispatches balance, wallet creation, key derivation,
//! mnemonic recovery and transfer requests to the helper for the requested
//! network (ethereum via alloy, solana via ed25519 primitives and JSON-RPC).

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod wallet;

pub use blockchain::{ChainHelper, Network, WalletError, WalletResult};
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use wallet::WalletService;
