use anchor_lang::prelude::*;

use crate::constants::SCHEDULE_SEED;
use crate::error::VestingError;
use crate::events::ScheduleCreated;
use crate::state::{BeneficiarySchedule, ScheduleTerms, VestingProgram};

// Treasury balance is not checked here; an underfunded treasury surfaces at claim time.
pub fn create_schedule_handler(
    ctx: Context<CreateSchedule>,
    start_time: i64,
    end_time: i64,
    total_amount: u64,
    cliff_time: i64,
) -> Result<()> {
    let terms = ScheduleTerms {
        start_time,
        cliff_time,
        end_time,
        total_amount,
    };
    let schedule = BeneficiarySchedule::new(
        ctx.accounts.beneficiary.key(),
        ctx.accounts.vesting_program.key(),
        terms,
        ctx.bumps.schedule,
    )?;
    ctx.accounts.schedule.set_inner(schedule);

    msg!(
        "Schedule created: beneficiary={}, amount={}, start={}, cliff={}, end={}",
        ctx.accounts.beneficiary.key(),
        total_amount,
        start_time,
        cliff_time,
        end_time,
    );
    emit!(ScheduleCreated {
        vesting_program: ctx.accounts.vesting_program.key(),
        schedule: ctx.accounts.schedule.key(),
        beneficiary: ctx.accounts.beneficiary.key(),
        start_time,
        cliff_time,
        end_time,
        total_amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CreateSchedule<'info> {
    #[account(mut)]
    pub administrator: Signer<'info>,

    pub beneficiary: SystemAccount<'info>,

    #[account(has_one = administrator @ VestingError::Unauthorized)]
    pub vesting_program: Account<'info, VestingProgram>,

    #[account(
        init,
        payer = administrator,
        space = 8 + BeneficiarySchedule::INIT_SPACE,
        seeds = [SCHEDULE_SEED, beneficiary.key().as_ref(), vesting_program.key().as_ref()],
        bump
    )]
    pub schedule: Account<'info, BeneficiarySchedule>,

    pub system_program: Program<'info, System>,
}
