//! Linear vesting with a cliff (no drift; truncating integer math):
//! - unlocked = 0 while now < cliff (or now < start)
//! - unlocked = total once now >= end
//! - otherwise unlocked = floor(total * (now - start) / (end - start)), computed in u128

use crate::error::VestingError;

/// Cumulative amount unlocked at `now`, independent of what was already claimed.
pub fn unlocked_amount(
    total_amount: u64,
    start_time: i64,
    cliff_time: i64,
    end_time: i64,
    now: i64,
) -> Result<u64, VestingError> {
    // Strict: at now == cliff the share accrued since start unlocks in one step.
    if now < cliff_time || now < start_time {
        return Ok(0);
    }
    if now >= end_time {
        return Ok(total_amount);
    }

    // start <= now < end, so both differences are positive.
    let elapsed = now
        .checked_sub(start_time)
        .ok_or(VestingError::MathOverflow)?;
    let duration = end_time
        .checked_sub(start_time)
        .ok_or(VestingError::MathOverflow)?;
    if duration <= 0 {
        return Err(VestingError::InvalidSchedule);
    }

    let v = (total_amount as u128)
        .checked_mul(elapsed as u128)
        .ok_or(VestingError::MathOverflow)?
        / (duration as u128);
    u64::try_from(v).map_err(|_| VestingError::MathOverflow)
}

/// Unlocked but not yet claimed.
pub fn claimable_amount(unlocked: u64, claimed: u64) -> u64 {
    unlocked.saturating_sub(claimed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600;

    #[test]
    fn linear_midpoint() {
        assert_eq!(unlocked_amount(100_000, 0, 0, HOUR, 1_800).unwrap(), 50_000);
        assert_eq!(unlocked_amount(100_000, 0, 0, HOUR, 900).unwrap(), 25_000);
    }

    #[test]
    fn nothing_before_cliff() {
        for now in [-1, 0, 1, 900, 1_799] {
            assert_eq!(unlocked_amount(100_000, 0, 1_800, HOUR, now).unwrap(), 0);
        }
        // At the cliff the linear share accrued since start becomes available.
        assert_eq!(unlocked_amount(100_000, 0, 1_800, HOUR, 1_800).unwrap(), 50_000);
    }

    #[test]
    fn everything_at_and_after_end() {
        for now in [HOUR, HOUR + 1, i64::MAX] {
            assert_eq!(unlocked_amount(100_000, 0, 1_800, HOUR, now).unwrap(), 100_000);
        }
    }

    #[test]
    fn before_start_is_zero_even_without_cliff_guard() {
        // cliff < start never passes validation, but the formula still refuses to unlock.
        assert_eq!(unlocked_amount(1_000, 100, 50, 200, 75).unwrap(), 0);
    }

    #[test]
    fn truncates_toward_zero() {
        // 10 * 1 / 3 = 3.33 -> 3, 10 * 2 / 3 = 6.66 -> 6
        assert_eq!(unlocked_amount(10, 0, 0, 3, 1).unwrap(), 3);
        assert_eq!(unlocked_amount(10, 0, 0, 3, 2).unwrap(), 6);
        assert_eq!(unlocked_amount(1, 0, 0, 1_000, 999).unwrap(), 0);
    }

    #[test]
    fn wide_intermediate_does_not_overflow() {
        let end = i64::MAX;
        let now = end / 2;
        let v = unlocked_amount(u64::MAX, 0, 0, end, now).unwrap();
        assert!(v <= u64::MAX / 2 + 1);
        assert!(v >= u64::MAX / 2 - 1);
    }

    #[test]
    fn monotonic_in_time() {
        let schedules = [
            (100_000u64, 0i64, 0i64, HOUR),
            (100_000, 0, 1_800, HOUR),
            (7, 10, 10, 23),
            (u64::MAX, 1_000, 5_000, 1_000_000),
        ];
        for (total, start, cliff, end) in schedules {
            let mut prev = 0u64;
            let mut now = start - 5;
            while now <= end + 5 {
                let v = unlocked_amount(total, start, cliff, end, now).unwrap();
                assert!(v >= prev, "unlocked decreased at t={now}");
                assert!(v <= total);
                prev = v;
                now += ((end - start) / 97).max(1);
            }
            assert_eq!(unlocked_amount(total, start, cliff, end, end).unwrap(), total);
        }
    }

    #[test]
    fn claimable_saturates() {
        assert_eq!(claimable_amount(50, 20), 30);
        assert_eq!(claimable_amount(20, 20), 0);
        assert_eq!(claimable_amount(10, 20), 0);
    }
}
