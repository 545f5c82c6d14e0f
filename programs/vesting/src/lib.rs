#![allow(clippy::result_large_err)]

use anchor_lang::prelude::*;

declare_id!("EZjEf9iwX4K5U6y8XU8tbgWDLA3TBWRGZ53WceATdCHM");

pub mod constants;
#[cfg(not(target_os = "solana"))]
pub mod engine;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

pub use constants::*;
pub use events::*;
pub use instructions::*;
pub use state::*;

#[program]
pub mod token_vesting {
    use super::*;

    pub fn create_program(ctx: Context<CreateProgram>, company_name: String) -> Result<()> {
        instructions::create_program::create_program_handler(ctx, company_name)
    }

    pub fn create_schedule(
        ctx: Context<CreateSchedule>,
        start_time: i64,
        end_time: i64,
        total_amount: u64,
        cliff_time: i64,
    ) -> Result<()> {
        instructions::create_schedule::create_schedule_handler(
            ctx,
            start_time,
            end_time,
            total_amount,
            cliff_time,
        )
    }

    pub fn fund_treasury(ctx: Context<FundTreasury>, amount: u64) -> Result<()> {
        instructions::fund_treasury::fund_treasury_handler(ctx, amount)
    }

    pub fn claim(ctx: Context<ClaimTokens>, company_name: String) -> Result<()> {
        instructions::claim::claim_handler(ctx, company_name)
    }

    pub fn quote_vesting(ctx: Context<QuoteVesting>) -> Result<()> {
        instructions::quote_vesting::quote_vesting_handler(ctx)
    }
}
