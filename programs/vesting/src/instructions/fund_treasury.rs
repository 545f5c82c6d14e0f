use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::error::VestingError;
use crate::events::TreasuryFunded;
use crate::state::VestingProgram;

pub fn fund_treasury_handler(ctx: Context<FundTreasury>, amount: u64) -> Result<()> {
    require!(amount > 0, VestingError::InvalidAmount);
    require!(
        ctx.accounts.administrator_token_account.amount >= amount,
        VestingError::InsufficientFunds
    );

    token_interface::transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.administrator_token_account.to_account_info(),
                mint: ctx.accounts.mint.to_account_info(),
                to: ctx.accounts.treasury.to_account_info(),
                authority: ctx.accounts.administrator.to_account_info(),
            },
        ),
        amount,
        ctx.accounts.mint.decimals,
    )?;

    ctx.accounts.treasury.reload()?;
    let treasury_balance = ctx.accounts.treasury.amount;

    msg!(
        "Treasury funded: amount={}, balance={}",
        amount,
        treasury_balance
    );
    emit!(TreasuryFunded {
        vesting_program: ctx.accounts.vesting_program.key(),
        administrator: ctx.accounts.administrator.key(),
        amount,
        treasury_balance,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct FundTreasury<'info> {
    pub administrator: Signer<'info>,

    #[account(
        has_one = administrator @ VestingError::Unauthorized,
        has_one = treasury,
        has_one = mint @ VestingError::InvalidMint,
    )]
    pub vesting_program: Account<'info, VestingProgram>,

    pub mint: InterfaceAccount<'info, Mint>,

    #[account(mut)]
    pub treasury: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = administrator,
        token::token_program = token_program,
    )]
    pub administrator_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}
