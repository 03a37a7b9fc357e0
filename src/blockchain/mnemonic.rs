//! BIP-39 mnemonic generation and parsing shared by all chains.

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::blockchain::types::{WalletError, WalletResult};

/// 128 bits of entropy → 12 words.
const ENTROPY_BYTES: usize = 16;

/// Generate a fresh 12-word English mnemonic from OS randomness.
pub fn generate() -> WalletResult<Mnemonic> {
    let mut entropy = [0u8; ENTROPY_BYTES];
    OsRng.fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()));
    entropy.zeroize();
    mnemonic
}

/// Parse and checksum-validate an English phrase.
///
/// Surrounding and repeated whitespace is tolerated.
pub fn parse(phrase: &str) -> WalletResult<Mnemonic> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
}
