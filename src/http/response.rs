//! Response shaping for the wallet API.
//!
//! # Status Mapping
//! - `Ok(Some(envelope))` → 200 with the envelope
//! - `Ok(None)` (no helper for the network) → 204 No Content
//! - invalid caller input → 400
//! - RPC, contract or signing failures → 502
//!
//! Every error body is `{ "success": false, "message": "..." }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::blockchain::WalletError;
use crate::wallet::Dispatch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        let status = if err.is_invalid_input() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::BAD_GATEWAY
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Turn a facade result into a response.
pub fn reply<T: Serialize>(result: Dispatch<T>) -> Response {
    match result {
        Ok(Some(envelope)) => (StatusCode::OK, Json(envelope)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::{success_response, Balance};

    #[test]
    fn test_status_mapping() {
        let ok: Dispatch<Balance> = Ok(Some(success_response(Balance { balance: 1.0 })));
        assert_eq!(reply(ok).status(), StatusCode::OK);

        let none: Dispatch<Balance> = Ok(None);
        assert_eq!(reply(none).status(), StatusCode::NO_CONTENT);

        let invalid: Dispatch<Balance> = Err(WalletError::InvalidMnemonic("checksum".into()));
        assert_eq!(reply(invalid).status(), StatusCode::BAD_REQUEST);

        let upstream: Dispatch<Balance> = Err(WalletError::Rpc("connection refused".into()));
        assert_eq!(reply(upstream).status(), StatusCode::BAD_GATEWAY);

        let signing: Dispatch<Balance> = Err(WalletError::Signing("too many accounts".into()));
        assert_eq!(reply(signing).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_error_message_is_wallet_error_display() {
        let err = ApiError::from(WalletError::UnsupportedNetwork("tron".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Unsupported network: tron");
    }
}
