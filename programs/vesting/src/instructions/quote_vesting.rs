use anchor_lang::prelude::*;

use crate::state::BeneficiarySchedule;

pub fn quote_vesting_handler(ctx: Context<QuoteVesting>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let quote = ctx.accounts.schedule.quote(ctx.accounts.schedule.key(), now)?;
    msg!(
        "Quote: unlocked={}, claimed={}, claimable={}",
        quote.unlocked_amount,
        quote.claimed_amount,
        quote.claimable,
    );
    emit!(quote);
    Ok(())
}

#[derive(Accounts)]
pub struct QuoteVesting<'info> {
    pub schedule: Account<'info, BeneficiarySchedule>,
}
