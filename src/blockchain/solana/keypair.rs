//! Solana keypairs and SLIP-0010 ed25519 derivation.
//!
//! Private keys are exchanged as base58 of the 64-byte keypair
//! (`secret || public`), the format wallets and the CLI use.

use bip39::Mnemonic;
use ed25519_dalek::{Signer, SigningKey};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::blockchain::solana::pubkey::Pubkey;
use crate::blockchain::types::{WalletError, WalletInfo, WalletResult};

type HmacSha512 = Hmac<Sha512>;

const ED25519_CURVE: &[u8] = b"ed25519 seed";
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// `m/44'/501'/0'/0'`, every level hardened.
pub const DERIVATION_PATH: [u32; 4] = [44, 501, 0, 0];

/// SLIP-0010 node: private key and chain code.
struct ExtendedKey {
    key: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl ExtendedKey {
    fn master(seed: &[u8]) -> WalletResult<Self> {
        let mut mac = HmacSha512::new_from_slice(ED25519_CURVE)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        mac.update(seed);
        Ok(Self::from_output(&mac.finalize().into_bytes()))
    }

    /// Ed25519 only supports hardened children.
    fn derive_hardened(&self, index: u32) -> WalletResult<Self> {
        let mut mac = HmacSha512::new_from_slice(&*self.chain_code)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        mac.update(&[0x00]);
        mac.update(&*self.key);
        mac.update(&(index | HARDENED_OFFSET).to_be_bytes());
        Ok(Self::from_output(&mac.finalize().into_bytes()))
    }

    fn from_output(output: &[u8]) -> Self {
        let mut key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&output[..32]);
        chain_code.copy_from_slice(&output[32..]);
        Self { key, chain_code }
    }
}

/// Derive the ed25519 secret at `path` (indices are hardened implicitly).
fn derive_secret(seed: &[u8], path: &[u32]) -> WalletResult<Zeroizing<[u8; 32]>> {
    let mut node = ExtendedKey::master(seed)?;
    for index in path {
        node = node.derive_hardened(*index)?;
    }
    Ok(node.key)
}

/// An ed25519 signing key with Solana encodings.
pub struct SolanaKeypair {
    signing_key: SigningKey,
}

impl SolanaKeypair {
    /// Derive the first account of a mnemonic (empty BIP-39 passphrase).
    pub fn from_mnemonic(mnemonic: &Mnemonic) -> WalletResult<Self> {
        let seed = Zeroizing::new(mnemonic.to_seed(""));
        let secret = derive_secret(&*seed, &DERIVATION_PATH)?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&secret),
        })
    }

    /// Parse a base58 64-byte keypair or 32-byte secret.
    pub fn from_base58(encoded: &str) -> WalletResult<Self> {
        let bytes = Zeroizing::new(
            bs58::decode(encoded.trim())
                .into_vec()
                .map_err(|e| WalletError::InvalidPrivateKey(format!("Invalid base58: {}", e)))?,
        );

        let mut secret = Zeroizing::new([0u8; 32]);
        match bytes.len() {
            64 => {
                secret.copy_from_slice(&bytes[..32]);
                let keypair = Self {
                    signing_key: SigningKey::from_bytes(&secret),
                };
                if keypair.pubkey().as_bytes()[..] != bytes[32..] {
                    return Err(WalletError::InvalidPrivateKey(
                        "public half does not match secret half".to_string(),
                    ));
                }
                Ok(keypair)
            }
            32 => {
                secret.copy_from_slice(&bytes);
                Ok(Self {
                    signing_key: SigningKey::from_bytes(&secret),
                })
            }
            n => Err(WalletError::InvalidPrivateKey(format!(
                "expected 32 or 64 bytes, got {}",
                n
            ))),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Base58 of the 64-byte keypair.
    pub fn to_base58(&self) -> String {
        let bytes = Zeroizing::new(self.signing_key.to_keypair_bytes());
        bs58::encode(&*bytes).into_string()
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    pub fn wallet_info(&self, mnemonic: &Mnemonic) -> WalletInfo {
        WalletInfo {
            address: self.pubkey().to_string(),
            private_key: self.to_base58(),
            mnemonic: mnemonic.to_string(),
        }
    }
}

impl std::fmt::Debug for SolanaKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaKeypair")
            .field("pubkey", &self.pubkey())
            .finish()
    }
}
