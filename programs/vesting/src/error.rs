use anchor_lang::prelude::*;

/// Error codes shared by the on-chain instructions and the off-chain engine.
#[error_code]
pub enum VestingError {
    #[msg("A vesting program already exists for this company name")]
    AlreadyExists,

    #[msg("Invalid token mint")]
    InvalidMint,

    #[msg("Company name must be 1 to 32 bytes")]
    InvalidCompanyName,

    #[msg("Unauthorized: signer does not hold the required role")]
    Unauthorized,

    #[msg("Invalid schedule: need start <= cliff <= end, start < end, start >= 0 and amount > 0")]
    InvalidSchedule,

    #[msg("A schedule already exists for this beneficiary under this program")]
    DuplicateSchedule,

    #[msg("There is nothing to claim")]
    NothingToClaim,

    #[msg("Treasury balance is too low for this claim")]
    InsufficientTreasury,

    #[msg("Schedule changed since it was read; retry the claim")]
    ConcurrentModification,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Source token account balance is too low")]
    InsufficientFunds,

    #[msg("Token account does not match the expected mint or owner")]
    InvalidTokenAccount,

    #[msg("Record not found")]
    RecordNotFound,

    #[msg("Record could not be decoded")]
    CorruptRecord,

    #[msg("Schedule does not belong to this vesting program")]
    ProgramMismatch,

    #[msg("Clock is unavailable")]
    ClockUnavailable,

    #[msg("Math overflow")]
    MathOverflow,
}
