//! Ethereum key handling.
//!
//! # Security
//! - Keys are parsed into alloy signers and never logged
//! - Private keys are rendered only into the returned `WalletInfo`

use alloy::primitives::Address;
use alloy::signers::local::coins_bip39::English;
use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};
use bip39::Mnemonic;

use crate::blockchain::types::{WalletError, WalletInfo, WalletResult};

/// BIP-44 path of the first Ethereum account.
pub const DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Parse a hex-encoded private key (with or without 0x prefix).
pub fn signer_from_private_key(private_key_hex: &str) -> WalletResult<PrivateKeySigner> {
    let key_hex = private_key_hex
        .trim()
        .strip_prefix("0x")
        .unwrap_or(private_key_hex.trim());

    key_hex
        .parse()
        .map_err(|e| WalletError::InvalidPrivateKey(format!("Invalid private key format: {}", e)))
}

/// Derive the signer at [`DERIVATION_PATH`] from a validated mnemonic.
pub fn signer_from_mnemonic(mnemonic: &Mnemonic) -> WalletResult<PrivateKeySigner> {
    MnemonicBuilder::<English>::default()
        .phrase(mnemonic.to_string())
        .derivation_path(DERIVATION_PATH)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?
        .build()
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
}

/// Parse a 20-byte hex address.
pub fn parse_address(address: &str) -> WalletResult<Address> {
    address
        .trim()
        .parse()
        .map_err(|e| WalletError::invalid_address(address, e))
}

/// Render a signer and its phrase as the public wallet shape.
pub fn wallet_info(signer: &PrivateKeySigner, mnemonic: &Mnemonic) -> WalletInfo {
    WalletInfo {
        address: signer.address().to_checksum(None),
        private_key: signer.to_bytes().to_string(),
        mnemonic: mnemonic.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mnemonic;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_signer_from_private_key() {
        let signer = signer_from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(signer.address().to_checksum(None), TEST_ADDRESS);
    }

    #[test]
    fn test_signer_with_0x_prefix() {
        let signer = signer_from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(signer.address().to_checksum(None), TEST_ADDRESS);
    }

    #[test]
    fn test_invalid_private_key() {
        let result = signer_from_private_key("invalid_key");
        assert!(matches!(result, Err(WalletError::InvalidPrivateKey(_))));
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_signer_from_mnemonic_matches_anvil() {
        let phrase = mnemonic::parse(TEST_MNEMONIC).unwrap();
        let signer = signer_from_mnemonic(&phrase).unwrap();

        let info = wallet_info(&signer, &phrase);
        assert_eq!(info.address, TEST_ADDRESS);
        assert_eq!(info.private_key, format!("0x{}", TEST_PRIVATE_KEY));
        assert_eq!(info.mnemonic, TEST_MNEMONIC);
    }

    #[test]
    fn test_parse_address() {
        let address = parse_address(TEST_ADDRESS).unwrap();
        assert_eq!(address.to_checksum(None), TEST_ADDRESS);

        let err = parse_address("0xabc").unwrap_err();
        assert!(matches!(err, WalletError::InvalidAddress { .. }));
    }
}
