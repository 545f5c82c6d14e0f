//! The vesting rules run against any [`Ledger`] and [`TimeSource`].
//!
//! On chain the Solana runtime supplies storage, time, signer identity and atomic commits.
//! Off chain this engine takes those from its collaborators: callers arrive already
//! authenticated, records are read together with their fingerprint, and every state change
//! is a single [`Ledger::commit`] batch. A claim therefore either moves the tokens and bumps
//! `claimed_amount` together, or leaves both untouched.

pub mod clock;
pub mod ledger;
pub mod memory;

pub use clock::{ManualClock, SystemClock};
pub use ledger::{Fingerprint, Ledger, LedgerOp, StoredRecord, TimeSource, TokenBalance};
pub use memory::MemoryLedger;

use anchor_lang::prelude::{emit, msg, AccountDeserialize, AccountSerialize, Pubkey};

use crate::constants::DEFAULT_CLAIM_ATTEMPTS;
use crate::error::VestingError;
use crate::events::{
    ProgramCreated, ScheduleCreated, TokensClaimed, TreasuryFunded, VestingQuoted,
};
use crate::state::{BeneficiarySchedule, ScheduleTerms, VestingProgram};
use crate::utils::pda;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramAddresses {
    pub vesting_program: Pubkey,
    pub treasury: Pubkey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub schedule: Pubkey,
    /// Transferred by this claim.
    pub amount: u64,
    /// Cumulative claimed after this claim.
    pub claimed_amount: u64,
    /// Grant not yet claimed.
    pub remaining: u64,
}

fn encode<T: AccountSerialize>(record: &T) -> Result<Vec<u8>, VestingError> {
    let mut data = Vec::new();
    record
        .try_serialize(&mut data)
        .map_err(|_| VestingError::CorruptRecord)?;
    Ok(data)
}

fn decode<T: AccountDeserialize>(data: &[u8]) -> Result<T, VestingError> {
    let mut buf = data;
    T::try_deserialize(&mut buf).map_err(|_| VestingError::CorruptRecord)
}

pub struct VestingEngine<L, T> {
    ledger: L,
    clock: T,
}

impl<L: Ledger, T: TimeSource> VestingEngine<L, T> {
    pub fn new(ledger: L, clock: T) -> Self {
        Self { ledger, clock }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Registers `company_name` with an empty treasury for `mint`. No tokens move.
    pub fn create_program(
        &self,
        administrator: &Pubkey,
        company_name: &str,
        mint: &Pubkey,
    ) -> Result<ProgramAddresses, VestingError> {
        let (program_key, bump) = pda::program_address(company_name)?;
        let (treasury, treasury_bump) = pda::treasury_address(company_name)?;
        if self.ledger.load_record(&program_key).is_some() {
            return Err(VestingError::AlreadyExists);
        }
        if *mint == Pubkey::default() || self.ledger.mint_decimals(mint).is_none() {
            return Err(VestingError::InvalidMint);
        }

        let program = VestingProgram {
            administrator: *administrator,
            mint: *mint,
            treasury,
            company_name: company_name.to_string(),
            treasury_bump,
            bump,
        };
        self.ledger.commit(vec![
            LedgerOp::CreateRecord {
                address: program_key,
                data: encode(&program)?,
            },
            LedgerOp::OpenTokenAccount {
                address: treasury,
                mint: *mint,
                owner: treasury,
                if_missing: false,
            },
        ])?;

        msg!(
            "Vesting program created: company={}, program={}, treasury={}",
            company_name,
            program_key,
            treasury,
        );
        emit!(ProgramCreated {
            vesting_program: program_key,
            administrator: *administrator,
            mint: *mint,
            treasury,
            company_name: company_name.to_string(),
        });

        Ok(ProgramAddresses {
            vesting_program: program_key,
            treasury,
        })
    }

    /// Enrolls `beneficiary`. The treasury balance is not checked; a shortfall shows up at
    /// claim time.
    pub fn create_schedule(
        &self,
        administrator: &Pubkey,
        program_key: &Pubkey,
        beneficiary: &Pubkey,
        terms: ScheduleTerms,
    ) -> Result<Pubkey, VestingError> {
        let program = self.fetch_program(program_key)?;
        program.authorize_admin(administrator)?;
        terms.validate()?;

        let (schedule_key, bump) = pda::schedule_address(beneficiary, program_key);
        if self.ledger.load_record(&schedule_key).is_some() {
            return Err(VestingError::DuplicateSchedule);
        }
        let schedule = BeneficiarySchedule::new(*beneficiary, *program_key, terms, bump)?;
        self.ledger
            .commit(vec![LedgerOp::CreateRecord {
                address: schedule_key,
                data: encode(&schedule)?,
            }])
            .map_err(|e| match e {
                VestingError::AlreadyExists => VestingError::DuplicateSchedule,
                other => other,
            })?;

        msg!(
            "Schedule created: beneficiary={}, amount={}, start={}, cliff={}, end={}",
            beneficiary,
            terms.total_amount,
            terms.start_time,
            terms.cliff_time,
            terms.end_time,
        );
        emit!(ScheduleCreated {
            vesting_program: *program_key,
            schedule: schedule_key,
            beneficiary: *beneficiary,
            start_time: terms.start_time,
            cliff_time: terms.cliff_time,
            end_time: terms.end_time,
            total_amount: terms.total_amount,
        });

        Ok(schedule_key)
    }

    /// Moves `amount` from the administrator's token account into the treasury and returns
    /// the treasury balance afterwards.
    pub fn fund_treasury(
        &self,
        administrator: &Pubkey,
        program_key: &Pubkey,
        amount: u64,
    ) -> Result<u64, VestingError> {
        if amount == 0 {
            return Err(VestingError::InvalidAmount);
        }
        let program = self.fetch_program(program_key)?;
        program.authorize_admin(administrator)?;

        let source = pda::token_account_address(administrator, &program.mint);
        self.ledger.commit(vec![LedgerOp::Transfer {
            from: source,
            to: program.treasury,
            mint: program.mint,
            amount,
        }])?;

        let treasury_balance = self.treasury_balance(&program);
        msg!(
            "Treasury funded: amount={}, balance={}",
            amount,
            treasury_balance
        );
        emit!(TreasuryFunded {
            vesting_program: *program_key,
            administrator: *administrator,
            amount,
            treasury_balance,
        });

        Ok(treasury_balance)
    }

    /// Settles everything unlocked and unclaimed on `schedule_key` to `caller`.
    pub fn claim(
        &self,
        caller: &Pubkey,
        schedule_key: &Pubkey,
    ) -> Result<ClaimReceipt, VestingError> {
        self.settle(caller, schedule_key, None)
    }

    /// Claims from the caller's own schedule under `company_name`.
    pub fn claim_for_company(
        &self,
        caller: &Pubkey,
        company_name: &str,
    ) -> Result<ClaimReceipt, VestingError> {
        let (program_key, _) = pda::program_address(company_name)?;
        let (schedule_key, _) = pda::schedule_address(caller, &program_key);
        self.settle(caller, &schedule_key, Some(&program_key))
    }

    /// Like [`Self::claim`], re-reading and retrying while the schedule keeps changing under us.
    /// Every other error is returned at once. `None` means [`DEFAULT_CLAIM_ATTEMPTS`].
    pub fn claim_with_retry(
        &self,
        caller: &Pubkey,
        schedule_key: &Pubkey,
        max_attempts: Option<u32>,
    ) -> Result<ClaimReceipt, VestingError> {
        let attempts = max_attempts.unwrap_or(DEFAULT_CLAIM_ATTEMPTS).max(1);
        let mut attempt = 1;
        loop {
            match self.settle(caller, schedule_key, None) {
                Err(VestingError::ConcurrentModification) if attempt < attempts => {
                    msg!(
                        "Schedule {} changed during claim, retrying ({}/{})",
                        schedule_key,
                        attempt,
                        attempts
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn settle(
        &self,
        caller: &Pubkey,
        schedule_key: &Pubkey,
        expected_program: Option<&Pubkey>,
    ) -> Result<ClaimReceipt, VestingError> {
        let now = self.clock.unix_timestamp()?;

        let record = self
            .ledger
            .load_record(schedule_key)
            .ok_or(VestingError::RecordNotFound)?;
        let schedule: BeneficiarySchedule = decode(&record.data)?;
        if let Some(program_key) = expected_program {
            if schedule.vesting_program != *program_key {
                return Err(VestingError::ProgramMismatch);
            }
        }
        let program = self.fetch_program(&schedule.vesting_program)?;

        // The treasury is checked by the transfer inside the batch, not by an earlier read.
        let amount = schedule.claimable_by(caller, now)?;
        let mut updated = schedule.clone();
        updated.record_claim(amount)?;

        // The schedule write goes first so a stale read fails as ConcurrentModification.
        let destination = pda::token_account_address(caller, &program.mint);
        self.ledger
            .commit(vec![
                LedgerOp::UpdateRecord {
                    address: *schedule_key,
                    expected: record.fingerprint,
                    data: encode(&updated)?,
                },
                LedgerOp::OpenTokenAccount {
                    address: destination,
                    mint: program.mint,
                    owner: *caller,
                    if_missing: true,
                },
                LedgerOp::Transfer {
                    from: program.treasury,
                    to: destination,
                    mint: program.mint,
                    amount,
                },
            ])
            .map_err(|e| match e {
                VestingError::InsufficientFunds => VestingError::InsufficientTreasury,
                other => other,
            })?;

        msg!(
            "Claimed {} tokens. Total claimed: {}/{}",
            amount,
            updated.claimed_amount,
            updated.total_amount,
        );
        if updated.is_fully_claimed() {
            msg!("Schedule {} fully claimed", schedule_key);
        }
        emit!(TokensClaimed {
            schedule: *schedule_key,
            beneficiary: updated.beneficiary,
            amount,
            claimed_amount: updated.claimed_amount,
            total_amount: updated.total_amount,
        });

        Ok(ClaimReceipt {
            schedule: *schedule_key,
            amount,
            claimed_amount: updated.claimed_amount,
            remaining: updated.remaining(),
        })
    }

    pub fn quote(&self, schedule_key: &Pubkey) -> Result<VestingQuoted, VestingError> {
        let now = self.clock.unix_timestamp()?;
        self.fetch_schedule(schedule_key)?.quote(*schedule_key, now)
    }

    pub fn fetch_program(&self, program_key: &Pubkey) -> Result<VestingProgram, VestingError> {
        let record = self
            .ledger
            .load_record(program_key)
            .ok_or(VestingError::RecordNotFound)?;
        decode(&record.data)
    }

    pub fn fetch_schedule(
        &self,
        schedule_key: &Pubkey,
    ) -> Result<BeneficiarySchedule, VestingError> {
        let record = self
            .ledger
            .load_record(schedule_key)
            .ok_or(VestingError::RecordNotFound)?;
        decode(&record.data)
    }

    /// All vesting programs, ordered by company name.
    pub fn programs(&self) -> Vec<(Pubkey, VestingProgram)> {
        let mut programs: Vec<(Pubkey, VestingProgram)> = self
            .ledger
            .records()
            .into_iter()
            .filter_map(|(address, record)| decode(&record.data).ok().map(|p| (address, p)))
            .collect();
        programs.sort_by(|a, b| a.1.company_name.cmp(&b.1.company_name));
        programs
    }

    /// Schedules enrolled under `program_key`, ordered by beneficiary.
    pub fn schedules_for(&self, program_key: &Pubkey) -> Vec<(Pubkey, BeneficiarySchedule)> {
        let mut schedules: Vec<(Pubkey, BeneficiarySchedule)> = self
            .ledger
            .records()
            .into_iter()
            .filter_map(|(address, record)| {
                decode::<BeneficiarySchedule>(&record.data)
                    .ok()
                    .filter(|s| s.vesting_program == *program_key)
                    .map(|s| (address, s))
            })
            .collect();
        schedules.sort_by(|a, b| a.1.beneficiary.cmp(&b.1.beneficiary));
        schedules
    }

    fn treasury_balance(&self, program: &VestingProgram) -> u64 {
        self.ledger
            .token_balance(&program.treasury)
            .map_or(0, |b| b.amount)
    }
}
