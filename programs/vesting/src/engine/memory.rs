use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anchor_lang::prelude::Pubkey;

use crate::engine::ledger::{Fingerprint, Ledger, LedgerOp, StoredRecord, TokenBalance};
use crate::error::VestingError;
use crate::utils::pda;

#[derive(Clone, Debug, Default)]
struct LedgerState {
    records: HashMap<Pubkey, Vec<u8>>,
    mints: HashMap<Pubkey, u8>,
    token_accounts: HashMap<Pubkey, TokenBalance>,
}

impl LedgerState {
    fn apply(&mut self, op: LedgerOp) -> Result<(), VestingError> {
        match op {
            LedgerOp::CreateRecord { address, data } => {
                if self.records.contains_key(&address) {
                    return Err(VestingError::AlreadyExists);
                }
                self.records.insert(address, data);
            }
            LedgerOp::UpdateRecord {
                address,
                expected,
                data,
            } => {
                let current = self
                    .records
                    .get_mut(&address)
                    .ok_or(VestingError::RecordNotFound)?;
                if Fingerprint::of(current) != expected {
                    return Err(VestingError::ConcurrentModification);
                }
                *current = data;
            }
            LedgerOp::OpenTokenAccount {
                address,
                mint,
                owner,
                if_missing,
            } => {
                if !self.mints.contains_key(&mint) {
                    return Err(VestingError::InvalidMint);
                }
                match self.token_accounts.get(&address) {
                    Some(existing) if if_missing => {
                        if existing.mint != mint || existing.owner != owner {
                            return Err(VestingError::InvalidTokenAccount);
                        }
                    }
                    Some(_) => return Err(VestingError::AlreadyExists),
                    None => {
                        self.token_accounts.insert(
                            address,
                            TokenBalance {
                                mint,
                                owner,
                                amount: 0,
                            },
                        );
                    }
                }
            }
            LedgerOp::Transfer {
                from,
                to,
                mint,
                amount,
            } => {
                let source = self
                    .token_accounts
                    .get_mut(&from)
                    .ok_or(VestingError::InvalidTokenAccount)?;
                if source.mint != mint {
                    return Err(VestingError::InvalidTokenAccount);
                }
                source.amount = source
                    .amount
                    .checked_sub(amount)
                    .ok_or(VestingError::InsufficientFunds)?;

                let destination = self
                    .token_accounts
                    .get_mut(&to)
                    .ok_or(VestingError::InvalidTokenAccount)?;
                if destination.mint != mint {
                    return Err(VestingError::InvalidTokenAccount);
                }
                destination.amount = destination
                    .amount
                    .checked_add(amount)
                    .ok_or(VestingError::MathOverflow)?;
            }
        }
        Ok(())
    }
}

/// In-process ledger. Commits are serialized by a mutex and applied to a copy of the state,
/// which replaces the live state only when every op in the batch succeeded.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_mint(&self, mint: Pubkey, decimals: u8) {
        self.lock().mints.insert(mint, decimals);
    }

    /// Opens `owner`'s associated token account for `mint` if it does not exist yet.
    pub fn open_token_account(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Pubkey, VestingError> {
        let address = pda::token_account_address(owner, mint);
        self.commit(vec![LedgerOp::OpenTokenAccount {
            address,
            mint: *mint,
            owner: *owner,
            if_missing: true,
        }])?;
        Ok(address)
    }

    /// Credits newly issued tokens to an existing token account; returns its new balance.
    pub fn mint_to(&self, account: &Pubkey, amount: u64) -> Result<u64, VestingError> {
        let mut state = self.lock();
        let balance = state
            .token_accounts
            .get_mut(account)
            .ok_or(VestingError::InvalidTokenAccount)?;
        balance.amount = balance
            .amount
            .checked_add(amount)
            .ok_or(VestingError::MathOverflow)?;
        Ok(balance.amount)
    }

    pub fn balance_of(&self, account: &Pubkey) -> u64 {
        self.token_balance(account).map_or(0, |b| b.amount)
    }
}

impl Ledger for MemoryLedger {
    fn load_record(&self, address: &Pubkey) -> Option<StoredRecord> {
        self.lock()
            .records
            .get(address)
            .map(|data| StoredRecord::new(data.clone()))
    }

    fn records(&self) -> Vec<(Pubkey, StoredRecord)> {
        self.lock()
            .records
            .iter()
            .map(|(address, data)| (*address, StoredRecord::new(data.clone())))
            .collect()
    }

    fn mint_decimals(&self, mint: &Pubkey) -> Option<u8> {
        self.lock().mints.get(mint).copied()
    }

    fn token_balance(&self, account: &Pubkey) -> Option<TokenBalance> {
        self.lock().token_accounts.get(account).copied()
    }

    fn commit(&self, ops: Vec<LedgerOp>) -> Result<(), VestingError> {
        let mut state = self.lock();
        let mut next = state.clone();
        for op in ops {
            next.apply(op)?;
        }
        *state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded_pair(ledger: &MemoryLedger, amount: u64) -> (Pubkey, Pubkey, Pubkey) {
        let mint = Pubkey::new_unique();
        ledger.add_mint(mint, 6);
        let from = ledger.open_token_account(&Pubkey::new_unique(), &mint).unwrap();
        let to = ledger.open_token_account(&Pubkey::new_unique(), &mint).unwrap();
        ledger.mint_to(&from, amount).unwrap();
        (mint, from, to)
    }

    #[test]
    fn create_record_once() {
        let ledger = MemoryLedger::new();
        let address = Pubkey::new_unique();
        ledger
            .commit(vec![LedgerOp::CreateRecord {
                address,
                data: vec![1],
            }])
            .unwrap();
        let err = ledger
            .commit(vec![LedgerOp::CreateRecord {
                address,
                data: vec![2],
            }])
            .unwrap_err();
        assert!(matches!(err, VestingError::AlreadyExists));
        assert_eq!(ledger.load_record(&address).unwrap().data, vec![1]);
    }

    #[test]
    fn stale_update_is_rejected_and_batch_discarded() {
        let ledger = MemoryLedger::new();
        let (mint, from, to) = funded_pair(&ledger, 100);
        let address = Pubkey::new_unique();
        ledger
            .commit(vec![LedgerOp::CreateRecord {
                address,
                data: vec![0],
            }])
            .unwrap();
        let read = ledger.load_record(&address).unwrap();

        // Another writer gets in first.
        ledger
            .commit(vec![LedgerOp::UpdateRecord {
                address,
                expected: read.fingerprint,
                data: vec![1],
            }])
            .unwrap();

        let err = ledger
            .commit(vec![
                LedgerOp::Transfer {
                    from,
                    to,
                    mint,
                    amount: 40,
                },
                LedgerOp::UpdateRecord {
                    address,
                    expected: read.fingerprint,
                    data: vec![2],
                },
            ])
            .unwrap_err();
        assert!(matches!(err, VestingError::ConcurrentModification));
        assert_eq!(ledger.load_record(&address).unwrap().data, vec![1]);
        assert_eq!(ledger.balance_of(&from), 100);
        assert_eq!(ledger.balance_of(&to), 0);
    }

    #[test]
    fn overdraft_leaves_everything_untouched() {
        let ledger = MemoryLedger::new();
        let (mint, from, to) = funded_pair(&ledger, 40);
        let err = ledger
            .commit(vec![LedgerOp::Transfer {
                from,
                to,
                mint,
                amount: 41,
            }])
            .unwrap_err();
        assert!(matches!(err, VestingError::InsufficientFunds));
        assert_eq!(ledger.balance_of(&from), 40);
        assert_eq!(ledger.balance_of(&to), 0);
    }

    #[test]
    fn transfer_checks_mint() {
        let ledger = MemoryLedger::new();
        let (_, from, to) = funded_pair(&ledger, 10);
        let other = Pubkey::new_unique();
        ledger.add_mint(other, 0);
        let err = ledger
            .commit(vec![LedgerOp::Transfer {
                from,
                to,
                mint: other,
                amount: 1,
            }])
            .unwrap_err();
        assert!(matches!(err, VestingError::InvalidTokenAccount));
    }

    #[test]
    fn open_token_account_requires_known_mint() {
        let ledger = MemoryLedger::new();
        let err = ledger
            .open_token_account(&Pubkey::new_unique(), &Pubkey::new_unique())
            .unwrap_err();
        assert!(matches!(err, VestingError::InvalidMint));
    }

    #[test]
    fn open_if_missing_is_idempotent() {
        let ledger = MemoryLedger::new();
        let mint = Pubkey::new_unique();
        ledger.add_mint(mint, 0);
        let owner = Pubkey::new_unique();
        let a = ledger.open_token_account(&owner, &mint).unwrap();
        ledger.mint_to(&a, 5).unwrap();
        let b = ledger.open_token_account(&owner, &mint).unwrap();
        assert_eq!(a, b);
        assert_eq!(ledger.balance_of(&a), 5);
    }
}
