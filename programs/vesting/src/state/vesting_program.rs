use anchor_lang::prelude::*;

use crate::error::VestingError;

/// A company's vesting program PDA (`[company_name]`).
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct VestingProgram {
    /// Signs schedule creation and treasury top-ups.
    pub administrator: Pubkey,
    /// Token mint being vested.
    pub mint: Pubkey,
    /// Treasury token account PDA (`[TREASURY_SEED, company_name]`), its own authority.
    pub treasury: Pubkey,
    #[max_len(32)]
    pub company_name: String,
    pub treasury_bump: u8,
    pub bump: u8,
}

impl VestingProgram {
    pub fn authorize_admin(&self, caller: &Pubkey) -> std::result::Result<(), VestingError> {
        if *caller != self.administrator {
            return Err(VestingError::Unauthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_administrator_is_authorized() {
        let administrator = Pubkey::new_unique();
        let program = VestingProgram {
            administrator,
            mint: Pubkey::new_unique(),
            treasury: Pubkey::new_unique(),
            company_name: "Company".to_string(),
            treasury_bump: 254,
            bump: 255,
        };
        assert!(program.authorize_admin(&administrator).is_ok());
        assert!(matches!(
            program.authorize_admin(&Pubkey::new_unique()),
            Err(VestingError::Unauthorized)
        ));
    }
}
