use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::constants::{SCHEDULE_SEED, TREASURY_SEED};
use crate::error::VestingError;
use crate::events::TokensClaimed;
use crate::state::{BeneficiarySchedule, VestingProgram};

pub fn claim_handler(ctx: Context<ClaimTokens>, _company_name: String) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let amount = ctx.accounts.schedule.plan_claim(
        &ctx.accounts.beneficiary.key(),
        now,
        ctx.accounts.treasury.amount,
    )?;

    // Treasury is its own authority, signed for by its PDA seeds.
    let program = &ctx.accounts.vesting_program;
    let signer_seeds: &[&[&[u8]]] = &[&[
        TREASURY_SEED,
        program.company_name.as_bytes(),
        &[program.treasury_bump],
    ]];
    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.treasury.to_account_info(),
                mint: ctx.accounts.mint.to_account_info(),
                to: ctx.accounts.beneficiary_token_account.to_account_info(),
                authority: ctx.accounts.treasury.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
        ctx.accounts.mint.decimals,
    )?;

    // Same transaction as the transfer: both commit or neither does.
    let schedule = &mut ctx.accounts.schedule;
    schedule.record_claim(amount)?;

    msg!(
        "Claimed {} tokens. Total claimed: {}/{}",
        amount,
        schedule.claimed_amount,
        schedule.total_amount,
    );
    if schedule.is_fully_claimed() {
        msg!("Schedule {} fully claimed", schedule.key());
    }
    emit!(TokensClaimed {
        schedule: schedule.key(),
        beneficiary: schedule.beneficiary,
        amount,
        claimed_amount: schedule.claimed_amount,
        total_amount: schedule.total_amount,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(company_name: String)]
pub struct ClaimTokens<'info> {
    #[account(mut)]
    pub beneficiary: Signer<'info>,

    #[account(
        mut,
        seeds = [SCHEDULE_SEED, beneficiary.key().as_ref(), vesting_program.key().as_ref()],
        bump = schedule.bump,
        has_one = beneficiary @ VestingError::Unauthorized,
        has_one = vesting_program @ VestingError::ProgramMismatch,
    )]
    pub schedule: Account<'info, BeneficiarySchedule>,

    #[account(
        seeds = [company_name.as_bytes()],
        bump = vesting_program.bump,
        has_one = treasury,
        has_one = mint @ VestingError::InvalidMint,
    )]
    pub vesting_program: Account<'info, VestingProgram>,

    pub mint: InterfaceAccount<'info, Mint>,

    #[account(mut)]
    pub treasury: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = beneficiary,
        associated_token::mint = mint,
        associated_token::authority = beneficiary,
        associated_token::token_program = token_program,
    )]
    pub beneficiary_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}
