//! Wallet API handlers.
//!
//! Each handler deserializes its payload, calls the facade, and shapes the
//! result with [`reply`]. Malformed JSON is answered in the same error
//! envelope as wallet failures.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::blockchain::types::{
    AddressFromPrivateKeyPayload, BalancePayload, CreateWalletPayload, MnemonicPayload,
    TransferPayload,
};
use crate::blockchain::Network;
use crate::http::request::RequestId;
use crate::http::response::{reply, ApiError};
use crate::observability::metrics;
use crate::wallet::WalletService;

pub const BALANCE_ROUTE: &str = "/wallet/balance";
pub const CREATE_ROUTE: &str = "/wallet/create";
pub const ADDRESS_ROUTE: &str = "/wallet/address";
pub const MNEMONIC_ROUTE: &str = "/wallet/mnemonic";
pub const TRANSFER_ROUTE: &str = "/wallet/transfer";
pub const HEALTH_ROUTE: &str = "/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub wallet: Arc<WalletService>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub networks: Vec<Network>,
}

fn finish(route: &'static str, response: Response) -> Response {
    metrics::record_request(route, response.status().as_u16());
    response
}

fn rejected(route: &'static str, request_id: &RequestId, rejection: JsonRejection) -> Response {
    tracing::debug!(request_id = %request_id, route, error = %rejection, "Rejected request body");
    finish(route, ApiError::bad_request(rejection.body_text()).into_response())
}

pub async fn get_balance(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<BalancePayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(e) => return rejected(BALANCE_ROUTE, &request_id, e),
    };
    tracing::debug!(request_id = %request_id, network = %payload.network, address = %payload.address, "Balance request");
    finish(BALANCE_ROUTE, reply(state.wallet.get_balance(&payload).await))
}

pub async fn create_wallet(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<CreateWalletPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(e) => return rejected(CREATE_ROUTE, &request_id, e),
    };
    tracing::debug!(request_id = %request_id, network = %payload.network, "Create wallet request");
    finish(CREATE_ROUTE, reply(state.wallet.create_wallet(&payload).await))
}

pub async fn get_address(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<AddressFromPrivateKeyPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(e) => return rejected(ADDRESS_ROUTE, &request_id, e),
    };
    tracing::debug!(request_id = %request_id, network = %payload.network, "Address request");
    finish(
        ADDRESS_ROUTE,
        reply(state.wallet.get_address_from_private_key(&payload).await),
    )
}

pub async fn generate_from_mnemonic(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<MnemonicPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(e) => return rejected(MNEMONIC_ROUTE, &request_id, e),
    };
    tracing::debug!(request_id = %request_id, network = %payload.network, "Mnemonic recovery request");
    finish(
        MNEMONIC_ROUTE,
        reply(state.wallet.generate_wallet_from_mnemonic(&payload).await),
    )
}

pub async fn transfer(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<TransferPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(e) => return rejected(TRANSFER_ROUTE, &request_id, e),
    };
    tracing::info!(
        request_id = %request_id,
        network = %payload.network,
        to = %payload.recipient_address,
        amount = payload.amount,
        token = ?payload.token_address,
        "Transfer request"
    );
    finish(TRANSFER_ROUTE, reply(state.wallet.transfer(&payload).await))
}

pub async fn health(State(state): State<AppState>) -> Response {
    let status = HealthStatus {
        status: "ok",
        networks: state.wallet.networks(),
    };
    finish(HEALTH_ROUTE, Json(status).into_response())
}
