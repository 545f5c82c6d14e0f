//! Collaborator seams for running the vesting rules off chain.
//!
//! A [`Ledger`] stores serialized records under derived addresses and keeps SPL-style token
//! balances. Every mutation goes through [`Ledger::commit`], which must apply a whole batch
//! or none of it. Record updates carry the [`Fingerprint`] of the bytes the caller read, so a
//! stale writer is rejected with `ConcurrentModification` instead of overwriting.

use anchor_lang::prelude::Pubkey;

use crate::error::VestingError;

/// blake3 digest of a record's stored bytes; the compare-and-write token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }
}

/// A record as read from the ledger, with the fingerprint to write it back against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRecord {
    pub data: Vec<u8>,
    pub fingerprint: Fingerprint,
}

impl StoredRecord {
    pub fn new(data: Vec<u8>) -> Self {
        let fingerprint = Fingerprint::of(&data);
        Self { data, fingerprint }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenBalance {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerOp {
    /// Fails with `AlreadyExists` if anything is stored at `address`.
    CreateRecord { address: Pubkey, data: Vec<u8> },
    /// Fails with `ConcurrentModification` unless the stored bytes still hash to `expected`.
    UpdateRecord {
        address: Pubkey,
        expected: Fingerprint,
        data: Vec<u8>,
    },
    /// Opens an empty token account. With `if_missing`, an existing account with the same
    /// mint and owner is accepted as is; otherwise any existing account is `AlreadyExists`.
    OpenTokenAccount {
        address: Pubkey,
        mint: Pubkey,
        owner: Pubkey,
        if_missing: bool,
    },
    /// Fails with `InsufficientFunds` if `from` holds less than `amount`.
    Transfer {
        from: Pubkey,
        to: Pubkey,
        mint: Pubkey,
        amount: u64,
    },
}

pub trait Ledger {
    fn load_record(&self, address: &Pubkey) -> Option<StoredRecord>;

    /// Every stored record, in no particular order.
    fn records(&self) -> Vec<(Pubkey, StoredRecord)>;

    /// Decimals of a known mint; `None` if the token layer does not recognize it.
    fn mint_decimals(&self, mint: &Pubkey) -> Option<u8>;

    fn token_balance(&self, account: &Pubkey) -> Option<TokenBalance>;

    /// Applies `ops` in order, all or nothing.
    fn commit(&self, ops: Vec<LedgerOp>) -> Result<(), VestingError>;
}

/// Trusted source of the current Unix time in seconds.
pub trait TimeSource {
    fn unix_timestamp(&self) -> Result<i64, VestingError>;
}
