pub mod beneficiary_schedule;
pub mod vesting_program;

pub use beneficiary_schedule::*;
pub use vesting_program::*;
