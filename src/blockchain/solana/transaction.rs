//! Legacy transaction building: instructions, message compilation, signing.
//!
//! # Wire format
//! ```text
//! transaction = compact(n_sigs) || sig[64] * n_sigs || message
//! message     = header[3] || compact(n_keys) || key[32] * n_keys
//!               || blockhash[32] || compact(n_ix) || instruction * n_ix
//! instruction = program_idx[1] || compact(n_acc) || acc_idx * n_acc
//!               || compact(len) || data
//! ```
//! Account keys are ordered writable signers, readonly signers, writable
//! non-signers, readonly non-signers, with the fee payer first.

use crate::blockchain::solana::keypair::SolanaKeypair;
use crate::blockchain::solana::pubkey::{
    associated_token_address, Pubkey, ASSOCIATED_TOKEN_PROGRAM_ID, COMPUTE_BUDGET_PROGRAM_ID,
    SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use crate::blockchain::types::{WalletError, WalletResult};

/// System program `Transfer` discriminant (u32 LE).
const SYSTEM_TRANSFER: u32 = 2;
/// Compute budget `SetComputeUnitPrice` discriminant.
const SET_COMPUTE_UNIT_PRICE: u8 = 3;
/// Associated token account `CreateIdempotent` discriminant.
const ATA_CREATE_IDEMPOTENT: u8 = 1;
/// SPL token `TransferChecked` discriminant.
const TOKEN_TRANSFER_CHECKED: u8 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }

    fn rank(&self) -> u8 {
        match (self.is_signer, self.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Move `lamports` from `from` to `to`.
pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> WalletResult<Instruction> {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Ok(Instruction {
        program_id: Pubkey::parse(SYSTEM_PROGRAM_ID)?,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    })
}

/// Priority fee in micro-lamports per compute unit.
pub fn set_compute_unit_price(micro_lamports: u64) -> WalletResult<Instruction> {
    let mut data = vec![SET_COMPUTE_UNIT_PRICE];
    data.extend_from_slice(&micro_lamports.to_le_bytes());

    Ok(Instruction {
        program_id: Pubkey::parse(COMPUTE_BUDGET_PROGRAM_ID)?,
        accounts: Vec::new(),
        data,
    })
}

/// Create `owner`'s associated token account for `mint` unless it exists.
pub fn create_associated_token_account_idempotent(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> WalletResult<Instruction> {
    let associated = associated_token_address(owner, mint)?;

    Ok(Instruction {
        program_id: Pubkey::parse(ASSOCIATED_TOKEN_PROGRAM_ID)?,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(associated, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(Pubkey::parse(SYSTEM_PROGRAM_ID)?, false),
            AccountMeta::new_readonly(Pubkey::parse(TOKEN_PROGRAM_ID)?, false),
        ],
        data: vec![ATA_CREATE_IDEMPOTENT],
    })
}

/// SPL `TransferChecked`: the program verifies `decimals` against the mint.
pub fn transfer_checked(
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
    decimals: u8,
) -> WalletResult<Instruction> {
    let mut data = Vec::with_capacity(10);
    data.push(TOKEN_TRANSFER_CHECKED);
    data.extend_from_slice(&amount.to_le_bytes());
    data.push(decimals);

    Ok(Instruction {
        program_id: Pubkey::parse(TOKEN_PROGRAM_ID)?,
        accounts: vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile instructions into a legacy message paid for by `payer`.
    pub fn compile(
        instructions: &[Instruction],
        payer: &Pubkey,
        recent_blockhash: [u8; 32],
    ) -> WalletResult<Self> {
        let mut metas = vec![AccountMeta::new(*payer, true)];
        for ix in instructions {
            for account in &ix.accounts {
                merge_meta(&mut metas, account);
            }
            merge_meta(&mut metas, &AccountMeta::new_readonly(ix.program_id, false));
        }

        // Stable: the payer stays first among writable signers.
        metas.sort_by_key(AccountMeta::rank);

        if metas.len() > usize::from(u8::MAX) + 1 {
            return Err(WalletError::Signing(format!(
                "too many accounts in message: {}",
                metas.len()
            )));
        }

        let count = |rank: u8| metas.iter().filter(|m| m.rank() == rank).count() as u8;
        let header = MessageHeader {
            num_required_signatures: count(0) + count(1),
            num_readonly_signed_accounts: count(1),
            num_readonly_unsigned_accounts: count(3),
        };

        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> u8 {
            // Every key was merged above, and there are at most 256 of them.
            account_keys.iter().position(|k| k == key).unwrap_or_default() as u8
        };

        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|a| index_of(&a.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    pub fn serialize(&self) -> WalletResult<Vec<u8>> {
        let mut buf = vec![
            self.header.num_required_signatures,
            self.header.num_readonly_signed_accounts,
            self.header.num_readonly_unsigned_accounts,
        ];

        encode_length(&mut buf, self.account_keys.len())?;
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }
        buf.extend_from_slice(&self.recent_blockhash);

        encode_length(&mut buf, self.instructions.len())?;
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            encode_length(&mut buf, ix.accounts.len())?;
            buf.extend_from_slice(&ix.accounts);
            encode_length(&mut buf, ix.data.len())?;
            buf.extend_from_slice(&ix.data);
        }
        Ok(buf)
    }
}

fn merge_meta(metas: &mut Vec<AccountMeta>, meta: &AccountMeta) {
    match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
        Some(existing) => {
            existing.is_signer |= meta.is_signer;
            existing.is_writable |= meta.is_writable;
        }
        None => metas.push(meta.clone()),
    }
}

/// Solana's "shortvec" length prefix: 7 bits per byte, high bit continues.
pub fn encode_compact_u16(buf: &mut Vec<u8>, mut value: u16) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

fn encode_length(buf: &mut Vec<u8>, len: usize) -> WalletResult<()> {
    let len = u16::try_from(len)
        .map_err(|_| WalletError::Signing(format!("length {} exceeds shortvec range", len)))?;
    encode_compact_u16(buf, len);
    Ok(())
}

/// A signed transaction ready for `sendTransaction`.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// Base58 of the fee payer's signature; this is the transaction id.
    pub signature: String,
    pub wire: Vec<u8>,
}

/// Sign a message whose only required signer is `signer`.
pub fn sign_transaction(message: &Message, signer: &SolanaKeypair) -> WalletResult<SignedTransaction> {
    if message.header.num_required_signatures != 1 {
        return Err(WalletError::Signing(format!(
            "expected exactly one signer, message requires {}",
            message.header.num_required_signatures
        )));
    }
    if message.account_keys.first() != Some(&signer.pubkey()) {
        return Err(WalletError::Signing(
            "fee payer does not match signing key".to_string(),
        ));
    }

    let message_bytes = message.serialize()?;
    let signature = signer.sign(&message_bytes);

    let mut wire = Vec::with_capacity(1 + 64 + message_bytes.len());
    encode_compact_u16(&mut wire, 1);
    wire.extend_from_slice(&signature);
    wire.extend_from_slice(&message_bytes);

    Ok(SignedTransaction {
        signature: bs58::encode(signature).into_string(),
        wire,
    })
}
