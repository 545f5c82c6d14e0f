use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::TREASURY_SEED;
use crate::events::ProgramCreated;
use crate::state::VestingProgram;
use crate::utils::pda;

pub fn create_program_handler(ctx: Context<CreateProgram>, company_name: String) -> Result<()> {
    pda::validate_company_name(&company_name)?;

    let program_key = ctx.accounts.vesting_program.key();
    let treasury_key = ctx.accounts.treasury.key();
    ctx.accounts.vesting_program.set_inner(VestingProgram {
        administrator: ctx.accounts.administrator.key(),
        mint: ctx.accounts.mint.key(),
        treasury: treasury_key,
        company_name: company_name.clone(),
        treasury_bump: ctx.bumps.treasury,
        bump: ctx.bumps.vesting_program,
    });

    msg!(
        "Vesting program created: company={}, program={}, treasury={}",
        company_name,
        program_key,
        treasury_key,
    );
    emit!(ProgramCreated {
        vesting_program: program_key,
        administrator: ctx.accounts.administrator.key(),
        mint: ctx.accounts.mint.key(),
        treasury: treasury_key,
        company_name,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(company_name: String)]
pub struct CreateProgram<'info> {
    #[account(mut)]
    pub administrator: Signer<'info>,

    // `init` rejects a second program for the same company name.
    #[account(
        init,
        payer = administrator,
        space = 8 + VestingProgram::INIT_SPACE,
        seeds = [company_name.as_bytes()],
        bump
    )]
    pub vesting_program: Account<'info, VestingProgram>,

    pub mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = administrator,
        token::mint = mint,
        token::authority = treasury,
        seeds = [TREASURY_SEED, company_name.as_bytes()],
        bump
    )]
    pub treasury: InterfaceAccount<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Interface<'info, TokenInterface>,
}
