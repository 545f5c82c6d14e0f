//! Program-wide constants.

/// Seed prefix of the treasury token account PDA (`[TREASURY_SEED, company_name]`).
pub const TREASURY_SEED: &[u8] = b"vesting_treasury";

/// Seed prefix of a beneficiary schedule PDA (`[SCHEDULE_SEED, beneficiary, program]`).
pub const SCHEDULE_SEED: &[u8] = b"employee_vesting";

/// The company name is used verbatim as a PDA seed, and a single seed is capped at 32 bytes.
pub const MAX_COMPANY_NAME_LEN: usize = 32;

/// Attempts made by `VestingEngine::claim_with_retry` callers that have no preference.
pub const DEFAULT_CLAIM_ATTEMPTS: u32 = 3;
