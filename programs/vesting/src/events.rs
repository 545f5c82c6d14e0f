use anchor_lang::prelude::*;

#[event]
pub struct ProgramCreated {
    pub vesting_program: Pubkey,
    pub administrator: Pubkey,
    pub mint: Pubkey,
    pub treasury: Pubkey,
    pub company_name: String,
}

#[event]
pub struct ScheduleCreated {
    pub vesting_program: Pubkey,
    pub schedule: Pubkey,
    pub beneficiary: Pubkey,
    pub start_time: i64,
    pub cliff_time: i64,
    pub end_time: i64,
    pub total_amount: u64,
}

#[event]
pub struct TreasuryFunded {
    pub vesting_program: Pubkey,
    pub administrator: Pubkey,
    pub amount: u64,
    pub treasury_balance: u64,
}

#[event]
pub struct TokensClaimed {
    pub schedule: Pubkey,
    pub beneficiary: Pubkey,
    pub amount: u64,
    pub claimed_amount: u64,
    pub total_amount: u64,
}

/// Read-only snapshot of a schedule at `now`.
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VestingQuoted {
    pub schedule: Pubkey,
    pub beneficiary: Pubkey,
    pub now: i64,
    pub unlocked_amount: u64,
    pub claimed_amount: u64,
    pub claimable: u64,
    pub total_amount: u64,
}
