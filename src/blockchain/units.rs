//! Conversion between human-readable amounts and integer base units.
//!
//! Both chains go through `alloy::primitives::utils` so that decimal handling
//! (rounding, precision limits) is the same everywhere.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

use crate::blockchain::types::{WalletError, WalletResult};

/// Decimals of ether.
pub const ETHER_DECIMALS: u8 = 18;
/// Decimals of SOL (lamports).
pub const SOL_DECIMALS: u8 = 9;

/// Convert a human-readable amount into base units with `decimals` precision.
pub fn to_base_units(amount: f64, decimals: u8) -> WalletResult<U256> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(WalletError::InvalidAmount(format!(
            "amount must be a finite non-negative number, got {}",
            amount
        )));
    }

    // f64 Display never uses exponent notation
    parse_units(&amount.to_string(), decimals)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| WalletError::InvalidAmount(format!("{}: {}", amount, e)))
}

/// Convert base units into a floating-point amount with `decimals` precision.
pub fn from_base_units(raw: U256, decimals: u8) -> WalletResult<f64> {
    let formatted =
        format_units(raw, decimals).map_err(|e| WalletError::InvalidAmount(e.to_string()))?;
    formatted
        .parse::<f64>()
        .map_err(|e| WalletError::InvalidAmount(format!("{}: {}", formatted, e)))
}

/// Narrow a base-unit amount to `u64` (lamports, SPL token amounts).
pub fn to_u64(raw: U256) -> WalletResult<u64> {
    u64::try_from(raw).map_err(|_| WalletError::InvalidAmount(format!("{} exceeds u64", raw)))
}

/// Narrow a base-unit amount to `u128` (wei gas prices).
pub fn to_u128(raw: U256) -> WalletResult<u128> {
    u128::try_from(raw).map_err(|_| WalletError::InvalidAmount(format!("{} exceeds u128", raw)))
}
