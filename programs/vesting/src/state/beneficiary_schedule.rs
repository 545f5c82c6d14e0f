use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::events::VestingQuoted;
use crate::utils::vesting_math;

/// Schedule parameters supplied by the administrator.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleTerms {
    pub start_time: i64,
    pub cliff_time: i64,
    pub end_time: i64,
    pub total_amount: u64,
}

impl ScheduleTerms {
    /// 0 <= start <= cliff <= end, start < end, total > 0.
    pub fn validate(&self) -> std::result::Result<(), VestingError> {
        let ordered = self.start_time >= 0
            && self.start_time <= self.cliff_time
            && self.cliff_time <= self.end_time
            && self.start_time < self.end_time;
        if !ordered || self.total_amount == 0 {
            return Err(VestingError::InvalidSchedule);
        }
        Ok(())
    }
}

/// One beneficiary's grant under a vesting program.
/// PDA: `[SCHEDULE_SEED, beneficiary, vesting_program]`, so at most one per pair.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct BeneficiarySchedule {
    /// The only key allowed to claim.
    pub beneficiary: Pubkey,
    /// Program this grant draws from.
    pub vesting_program: Pubkey,
    pub start_time: i64,
    pub cliff_time: i64,
    pub end_time: i64,
    /// Full grant in base units.
    pub total_amount: u64,
    /// Cumulative amount transferred out; only ever increases.
    pub claimed_amount: u64,
    pub bump: u8,
}

impl BeneficiarySchedule {
    pub fn new(
        beneficiary: Pubkey,
        vesting_program: Pubkey,
        terms: ScheduleTerms,
        bump: u8,
    ) -> std::result::Result<Self, VestingError> {
        terms.validate()?;
        Ok(Self {
            beneficiary,
            vesting_program,
            start_time: terms.start_time,
            cliff_time: terms.cliff_time,
            end_time: terms.end_time,
            total_amount: terms.total_amount,
            claimed_amount: 0,
            bump,
        })
    }

    pub fn unlocked_amount(&self, now: i64) -> std::result::Result<u64, VestingError> {
        vesting_math::unlocked_amount(
            self.total_amount,
            self.start_time,
            self.cliff_time,
            self.end_time,
            now,
        )
    }

    pub fn claimable(&self, now: i64) -> std::result::Result<u64, VestingError> {
        let unlocked = self.unlocked_amount(now)?;
        Ok(vesting_math::claimable_amount(unlocked, self.claimed_amount))
    }

    /// Amount `caller` may claim at `now`. Checks the caller, then that something is left.
    pub fn claimable_by(
        &self,
        caller: &Pubkey,
        now: i64,
    ) -> std::result::Result<u64, VestingError> {
        if *caller != self.beneficiary {
            return Err(VestingError::Unauthorized);
        }
        let claimable = self.claimable(now)?;
        if claimable == 0 {
            return Err(VestingError::NothingToClaim);
        }
        Ok(claimable)
    }

    /// [`Self::claimable_by`] plus a check against a treasury holding `treasury_balance`.
    /// Nothing is mutated.
    pub fn plan_claim(
        &self,
        caller: &Pubkey,
        now: i64,
        treasury_balance: u64,
    ) -> std::result::Result<u64, VestingError> {
        let claimable = self.claimable_by(caller, now)?;
        if treasury_balance < claimable {
            return Err(VestingError::InsufficientTreasury);
        }
        Ok(claimable)
    }

    /// Applies a settled transfer of `amount` to the claimed counter.
    pub fn record_claim(
        &mut self,
        amount: u64,
    ) -> std::result::Result<(), VestingError> {
        let claimed = self
            .claimed_amount
            .checked_add(amount)
            .ok_or(VestingError::MathOverflow)?;
        if claimed > self.total_amount {
            return Err(VestingError::MathOverflow);
        }
        self.claimed_amount = claimed;
        Ok(())
    }

    /// Snapshot for the schedule stored at `address`.
    pub fn quote(
        &self,
        address: Pubkey,
        now: i64,
    ) -> std::result::Result<VestingQuoted, VestingError> {
        let unlocked_amount = self.unlocked_amount(now)?;
        Ok(VestingQuoted {
            schedule: address,
            beneficiary: self.beneficiary,
            now,
            unlocked_amount,
            claimed_amount: self.claimed_amount,
            claimable: vesting_math::claimable_amount(unlocked_amount, self.claimed_amount),
            total_amount: self.total_amount,
        })
    }

    pub fn remaining(&self) -> u64 {
        self.total_amount.saturating_sub(self.claimed_amount)
    }

    pub fn is_fully_claimed(&self) -> bool {
        self.claimed_amount == self.total_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(start: i64, cliff: i64, end: i64, total: u64) -> ScheduleTerms {
        ScheduleTerms {
            start_time: start,
            cliff_time: cliff,
            end_time: end,
            total_amount: total,
        }
    }

    fn schedule(t: ScheduleTerms) -> BeneficiarySchedule {
        BeneficiarySchedule::new(Pubkey::new_unique(), Pubkey::new_unique(), t, 255).unwrap()
    }

    #[test]
    fn terms_validation() {
        assert!(terms(0, 0, 3_600, 1).validate().is_ok());
        assert!(terms(0, 3_600, 3_600, 1).validate().is_ok());
        assert!(terms(10, 20, 30, 100).validate().is_ok());

        let bad = [
            terms(0, 0, 3_600, 0),     // zero grant
            terms(100, 50, 200, 1),    // cliff before start
            terms(0, 4_000, 3_600, 1), // cliff after end
            terms(100, 100, 100, 1),   // zero-length window
            terms(200, 200, 100, 1),   // end before start
            terms(-1, 0, 100, 1),      // negative start
        ];
        for t in bad {
            assert!(
                matches!(t.validate(), Err(VestingError::InvalidSchedule)),
                "{t:?} should be rejected"
            );
        }
    }

    #[test]
    fn new_schedule_starts_unclaimed() {
        let s = schedule(terms(0, 0, 3_600, 100_000));
        assert_eq!(s.claimed_amount, 0);
        assert_eq!(s.remaining(), 100_000);
        assert!(!s.is_fully_claimed());
        assert_eq!((s.start_time, s.end_time, s.total_amount), (0, 3_600, 100_000));
    }

    #[test]
    fn plan_claim_checks_caller_first() {
        let s = schedule(terms(0, 0, 3_600, 100_000));
        let stranger = Pubkey::new_unique();
        assert!(matches!(
            s.plan_claim(&stranger, 3_600, u64::MAX),
            Err(VestingError::Unauthorized)
        ));
    }

    #[test]
    fn plan_claim_midpoint_then_nothing_left() {
        let mut s = schedule(terms(0, 0, 3_600, 100_000));
        let who = s.beneficiary;
        let amount = s.plan_claim(&who, 1_800, 100_000).unwrap();
        assert_eq!(amount, 50_000);
        s.record_claim(amount).unwrap();
        assert_eq!(s.claimed_amount, 50_000);
        assert!(matches!(
            s.plan_claim(&who, 1_800, 100_000),
            Err(VestingError::NothingToClaim)
        ));
    }

    #[test]
    fn plan_claim_before_cliff() {
        let s = schedule(terms(0, 1_800, 3_600, 100_000));
        assert!(matches!(
            s.plan_claim(&s.beneficiary, 900, 100_000),
            Err(VestingError::NothingToClaim)
        ));
    }

    #[test]
    fn plan_claim_overdraft() {
        let s = schedule(terms(0, 0, 3_600, 100_000));
        assert!(matches!(
            s.plan_claim(&s.beneficiary, 3_600, 40_000),
            Err(VestingError::InsufficientTreasury)
        ));
    }

    #[test]
    fn claimable_by_ignores_treasury() {
        let s = schedule(terms(0, 0, 3_600, 100_000));
        assert_eq!(s.claimable_by(&s.beneficiary, 3_600).unwrap(), 100_000);
        assert!(matches!(
            s.claimable_by(&Pubkey::new_unique(), 3_600),
            Err(VestingError::Unauthorized)
        ));
        assert!(matches!(
            s.claimable_by(&s.beneficiary, 0),
            Err(VestingError::NothingToClaim)
        ));
    }

    #[test]
    fn partial_claims_add_up_to_total() {
        let mut s = schedule(terms(0, 0, 3_600, 100_000));
        let who = s.beneficiary;
        let mut transferred = 0u64;
        for now in [600, 601, 1_200, 2_999, 3_600, 9_999] {
            match s.plan_claim(&who, now, u64::MAX) {
                Ok(amount) => {
                    s.record_claim(amount).unwrap();
                    transferred += amount;
                }
                Err(VestingError::NothingToClaim) => {}
                Err(e) => panic!("unexpected {e:?}"),
            }
            assert!(s.claimed_amount <= s.unlocked_amount(now).unwrap());
            assert!(s.claimed_amount <= s.total_amount);
        }
        assert_eq!(transferred, 100_000);
        assert!(s.is_fully_claimed());
    }

    #[test]
    fn quote_reports_claimable() {
        let mut s = schedule(terms(0, 0, 3_600, 100_000));
        s.record_claim(20_000).unwrap();
        let address = Pubkey::new_unique();
        let q = s.quote(address, 1_800).unwrap();
        assert_eq!(q.schedule, address);
        assert_eq!(q.unlocked_amount, 50_000);
        assert_eq!(q.claimed_amount, 20_000);
        assert_eq!(q.claimable, 30_000);
        assert_eq!(q.total_amount, 100_000);
    }

    #[test]
    fn record_claim_cannot_exceed_grant() {
        let mut s = schedule(terms(0, 0, 10, 10));
        s.record_claim(10).unwrap();
        assert!(matches!(s.record_claim(1), Err(VestingError::MathOverflow)));
        assert_eq!(s.claimed_amount, 10);
    }
}
