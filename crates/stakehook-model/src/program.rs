use typed_builder::TypedBuilder;

use crate::{Identifier, U256};

/// Funding parameters of a reward program.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FundingParams<T> {
    /// Token paid out as rewards.
    reward_token: T,
    /// Total amount to distribute.
    amount: u128,
    /// Distribution duration in seconds.
    duration: u64,
}

impl<T> FundingParams<T> {
    /// Get reward token.
    pub fn reward_token(&self) -> &T {
        &self.reward_token
    }

    /// Get funding amount.
    pub fn amount(&self) -> u128 {
        self.amount
    }

    /// Get duration in seconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }
}

impl<T: Identifier> FundingParams<T> {
    /// Validate the params.
    pub fn validate(&self) -> crate::Result<()> {
        if self.reward_token.is_zero() {
            return Err(crate::Error::RewardTokenNotSet);
        }
        if self.amount == 0 {
            return Err(crate::Error::ZeroFundingAmount);
        }
        if self.duration == 0 {
            return Err(crate::Error::ZeroDuration);
        }
        Ok(())
    }
}

/// Status of a funded reward program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "strum",
    derive(strum::EnumIter, strum::EnumString, strum::Display)
)]
#[cfg_attr(feature = "strum", strum(serialize_all = "snake_case"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProgramStatus {
    /// Rewards are accruing.
    Funded,
    /// `finish_at` has passed; rewards no longer accrue.
    Depleted,
}

/// Reward program of a pool.
///
/// Parameters are fixed at funding; only the accumulator, the update time and
/// the totals move afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardProgram<T> {
    reward_token: T,
    duration: u64,
    initialized_at: u64,
    finish_at: u64,
    updated_at: u64,
    reward_rate: u128,
    reward_per_token_stored: U256,
    total_staked: u128,
    funded_amount: u128,
    total_claimed: u128,
}

impl<T: Identifier> RewardProgram<T> {
    /// Derive the program funded by `params` at `now`.
    pub(crate) fn try_new(params: &FundingParams<T>, now: u64) -> crate::Result<Self> {
        params.validate()?;
        let finish_at = now
            .checked_add(params.duration)
            .ok_or(crate::Error::Overflow)?;
        let reward_rate = params
            .amount
            .checked_div(u128::from(params.duration))
            .ok_or(crate::Error::DividedByZero)?;
        Ok(Self {
            reward_token: params.reward_token.clone(),
            duration: params.duration,
            initialized_at: now,
            finish_at,
            updated_at: now,
            reward_rate,
            reward_per_token_stored: U256::ZERO,
            total_staked: 0,
            funded_amount: params.amount,
            total_claimed: 0,
        })
    }
}

impl<T> RewardProgram<T> {
    /// Get reward token.
    pub fn reward_token(&self) -> &T {
        &self.reward_token
    }

    /// Get duration in seconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Get the funding time.
    pub fn initialized_at(&self) -> u64 {
        self.initialized_at
    }

    /// Get the time after which no rewards accrue.
    pub fn finish_at(&self) -> u64 {
        self.finish_at
    }

    /// Get the last time the accumulator was brought current.
    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Get reward emitted per second.
    pub fn reward_rate(&self) -> u128 {
        self.reward_rate
    }

    /// Get the stored reward-per-token accumulator, scaled by [`SCALE`](crate::SCALE).
    pub fn reward_per_token_stored(&self) -> U256 {
        self.reward_per_token_stored
    }

    /// Get total staked amount.
    pub fn total_staked(&self) -> u128 {
        self.total_staked
    }

    /// Get the amount pulled in at funding.
    pub fn funded_amount(&self) -> u128 {
        self.funded_amount
    }

    /// Get the total amount paid out by claims.
    pub fn total_claimed(&self) -> u128 {
        self.total_claimed
    }

    /// Get the status at `now`.
    pub fn status(&self, now: u64) -> ProgramStatus {
        if now >= self.finish_at {
            ProgramStatus::Depleted
        } else {
            ProgramStatus::Funded
        }
    }

    /// Returns `min(finish_at, now)`.
    pub fn last_applicable_time(&self, now: u64) -> u64 {
        self.finish_at.min(now)
    }

    /// Get the amount the emission schedule can ever distribute,
    /// i.e. `reward_rate * duration`.
    pub fn distributable(&self) -> crate::Result<u128> {
        self.reward_rate
            .checked_mul(u128::from(self.duration))
            .ok_or(crate::Error::Overflow)
    }

    /// Get the part of the funded amount lost to the truncation of `reward_rate`.
    pub fn dust(&self) -> crate::Result<u128> {
        self.funded_amount
            .checked_sub(self.distributable()?)
            .ok_or(crate::Error::Computation("distributable exceeds funded amount"))
    }

    pub(crate) fn set_accumulator(&mut self, reward_per_token_stored: U256, updated_at: u64) {
        debug_assert!(reward_per_token_stored >= self.reward_per_token_stored);
        debug_assert!(updated_at >= self.updated_at);
        self.reward_per_token_stored = reward_per_token_stored;
        self.updated_at = updated_at;
    }

    pub(crate) fn set_total_staked(&mut self, total_staked: u128) {
        self.total_staked = total_staked;
    }

    pub(crate) fn set_total_claimed(&mut self, total_claimed: u128) {
        self.total_claimed = total_claimed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;

    #[test]
    fn funding_params_validation() {
        let params = FundingParams::builder()
            .reward_token(String::new())
            .amount(1)
            .duration(1)
            .build();
        assert_eq!(params.validate(), Err(crate::Error::RewardTokenNotSet));

        let params = FundingParams::builder()
            .reward_token("RWD".to_string())
            .amount(0)
            .duration(1)
            .build();
        assert_eq!(params.validate(), Err(crate::Error::ZeroFundingAmount));

        let params = FundingParams::builder()
            .reward_token("RWD".to_string())
            .amount(1)
            .duration(0)
            .build();
        assert_eq!(params.validate(), Err(crate::Error::ZeroDuration));
    }

    #[test]
    fn reward_rate_truncates() -> crate::Result<()> {
        let params = FundingParams::builder()
            .reward_token("RWD")
            .amount(1_000)
            .duration(3 * DAY)
            .build();
        let program = RewardProgram::try_new(&params, 100)?;
        assert_eq!(program.reward_rate(), 0);
        assert_eq!(program.dust()?, 1_000);

        let params = FundingParams::builder()
            .reward_token("RWD")
            .amount(1_000_000)
            .duration(7)
            .build();
        let program = RewardProgram::try_new(&params, 100)?;
        assert_eq!(program.reward_rate(), 142_857);
        assert_eq!(program.distributable()?, 999_999);
        assert_eq!(program.dust()?, 1);
        assert_eq!(program.finish_at(), 107);
        assert_eq!(program.updated_at(), 100);
        Ok(())
    }

    #[test]
    fn status_and_last_applicable_time() -> crate::Result<()> {
        let params = FundingParams::builder()
            .reward_token("RWD")
            .amount(30 * DAY as u128)
            .duration(30 * DAY)
            .build();
        let program = RewardProgram::try_new(&params, 0)?;
        assert_eq!(program.status(DAY), ProgramStatus::Funded);
        assert_eq!(program.status(30 * DAY), ProgramStatus::Depleted);
        assert_eq!(program.last_applicable_time(DAY), DAY);
        assert_eq!(program.last_applicable_time(31 * DAY), 30 * DAY);
        Ok(())
    }

    #[test]
    fn finish_at_overflow_is_reported() {
        let params = FundingParams::builder()
            .reward_token("RWD")
            .amount(1)
            .duration(u64::MAX)
            .build();
        assert_eq!(
            RewardProgram::try_new(&params, 1),
            Err(crate::Error::Overflow)
        );
    }
}
