pub mod claim;
pub mod create_program;
pub mod create_schedule;
pub mod fund_treasury;
pub mod quote_vesting;

pub use claim::*;
pub use create_program::*;
pub use create_schedule::*;
pub use fund_treasury::*;
pub use quote_vesting::*;
