//! Solana public keys and program-derived addresses.

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::blockchain::types::{WalletError, WalletResult};

pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
pub const COMPUTE_BUDGET_PROGRAM_ID: &str = "ComputeBudget111111111111111111111111111111";

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";
const MAX_SEED_LEN: usize = 32;

/// 32-byte ed25519 public key, displayed as base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a base58 address, reporting failures as [`WalletError::InvalidAddress`].
    pub fn parse(address: &str) -> WalletResult<Self> {
        address.trim().parse()
    }

    /// Whether the bytes decode to a point on the ed25519 curve.
    ///
    /// Program-derived addresses must not, so no private key can sign for them.
    pub fn is_on_curve(&self) -> bool {
        CompressedEdwardsY(self.0).decompress().is_some()
    }

    /// Search bump seeds from 255 down for the first off-curve address.
    pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> WalletResult<(Pubkey, u8)> {
        if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
            return Err(WalletError::invalid_address(
                &program_id.to_string(),
                format!("seed of {} bytes exceeds {}", seed.len(), MAX_SEED_LEN),
            ));
        }

        for bump in (0..=u8::MAX).rev() {
            let mut hasher = Sha256::new();
            for seed in seeds {
                hasher.update(seed);
            }
            hasher.update([bump]);
            hasher.update(program_id.as_bytes());
            hasher.update(PDA_MARKER);

            let candidate = Pubkey(hasher.finalize().into());
            if !candidate.is_on_curve() {
                return Ok((candidate, bump));
            }
        }

        Err(WalletError::invalid_address(
            &program_id.to_string(),
            "no viable bump seed",
        ))
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| WalletError::invalid_address(s, e))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            WalletError::invalid_address(s, format!("expected 32 bytes, got {}", b.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

/// Associated token account of `owner` for `mint` under the classic token program.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> WalletResult<Pubkey> {
    let token_program = Pubkey::parse(TOKEN_PROGRAM_ID)?;
    let ata_program = Pubkey::parse(ASSOCIATED_TOKEN_PROGRAM_ID)?;

    Pubkey::find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ata_program,
    )
    .map(|(address, _bump)| address)
}
