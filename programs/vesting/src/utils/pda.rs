//! Deterministic addresses. Anyone holding the inputs can recompute them; no directory needed.
//! - program:  [company_name]
//! - treasury: [TREASURY_SEED, company_name]
//! - schedule: [SCHEDULE_SEED, beneficiary, program]

use anchor_lang::prelude::*;

use crate::constants::{MAX_COMPANY_NAME_LEN, SCHEDULE_SEED, TREASURY_SEED};
use crate::error::VestingError;

pub fn validate_company_name(company_name: &str) -> std::result::Result<(), VestingError> {
    if company_name.is_empty() || company_name.len() > MAX_COMPANY_NAME_LEN {
        return Err(VestingError::InvalidCompanyName);
    }
    Ok(())
}

pub fn program_address(company_name: &str) -> std::result::Result<(Pubkey, u8), VestingError> {
    validate_company_name(company_name)?;
    Pubkey::try_find_program_address(&[company_name.as_bytes()], &crate::ID)
        .ok_or(VestingError::InvalidCompanyName)
}

pub fn treasury_address(company_name: &str) -> std::result::Result<(Pubkey, u8), VestingError> {
    validate_company_name(company_name)?;
    Pubkey::try_find_program_address(&[TREASURY_SEED, company_name.as_bytes()], &crate::ID)
        .ok_or(VestingError::InvalidCompanyName)
}

pub fn schedule_address(beneficiary: &Pubkey, program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[SCHEDULE_SEED, beneficiary.as_ref(), program.as_ref()],
        &crate::ID,
    )
}

/// Associated token account of `owner` for `mint` under the SPL Token program.
pub fn token_account_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let seeds: &[&[u8]] = &[
        owner.as_ref(),
        anchor_spl::token::ID.as_ref(),
        mint.as_ref(),
    ];
    let (ata, _) = Pubkey::find_program_address(seeds, &anchor_spl::associated_token::ID);
    ata
}
