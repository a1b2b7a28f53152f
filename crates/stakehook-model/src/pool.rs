use std::collections::HashMap;

use crate::{
    action::{
        checkpoint::{Checkpoint, CheckpointReport},
        claim::Claim,
        stake::{DecreaseStake, IncreaseStake},
    },
    num::MulDiv,
    AccountStake, Identifier, RewardProgram, SCALE, U256,
};

/// Rewards ledger of one pool: its program and every account's stake.
#[derive(Debug, Clone)]
pub struct PoolRewards<A, T> {
    program: RewardProgram<T>,
    stakes: HashMap<A, AccountStake>,
}

impl<A, T> PoolRewards<A, T> {
    pub(crate) fn new(program: RewardProgram<T>) -> Self {
        Self {
            program,
            stakes: HashMap::default(),
        }
    }

    /// Get the reward program.
    pub fn program(&self) -> &RewardProgram<T> {
        &self.program
    }

    /// Get the reward token.
    pub fn reward_token(&self) -> &T {
        self.program.reward_token()
    }

    /// Get total staked amount.
    pub fn total_staked(&self) -> u128 {
        self.program.total_staked()
    }

    /// Iterate over every account that has ever staked.
    pub fn stakes(&self) -> impl Iterator<Item = (&A, &AccountStake)> {
        self.stakes.iter()
    }
}

impl<A: Identifier, T: Identifier> PoolRewards<A, T> {
    /// Get the stake of the given account (all-zero if it never staked).
    pub fn stake(&self, account: &A) -> AccountStake {
        self.stakes.get(account).copied().unwrap_or_default()
    }

    /// Get the staked balance of the given account.
    pub fn balance_of(&self, account: &A) -> u128 {
        self.stake(account).balance()
    }

    /// Returns `min(finish_at, now)`.
    pub fn last_applicable_time(&self, now: u64) -> u64 {
        self.program.last_applicable_time(now)
    }

    /// Get the reward-per-token accumulator as of `now`.
    ///
    /// Nothing accrues while nothing is staked; that time is not credited later.
    /// The accumulator is 256-bit wide: a dust-sized stake against a large
    /// emission pushes it far beyond `u128`.
    pub fn reward_per_token(&self, now: u64) -> crate::Result<U256> {
        let stored = self.program.reward_per_token_stored();
        let total_staked = self.program.total_staked();
        let elapsed = self.elapsed(now)?;
        if total_staked == 0 || elapsed == 0 {
            return Ok(stored);
        }
        // `rate * elapsed <= rate * duration <= funded amount`, so this cannot overflow.
        let emitted = self
            .program
            .reward_rate()
            .checked_mul(u128::from(elapsed))
            .ok_or(crate::Error::Overflow)?;
        let delta = U256::from(emitted).mul_div(&U256::from(SCALE), &U256::from(total_staked))?;
        stored.checked_add(delta).ok_or(crate::Error::Overflow)
    }

    /// Get the rewards earned by `account` as of `now`, claimed rewards excluded.
    pub fn earned(&self, account: &A, now: u64) -> crate::Result<u128> {
        let reward_per_token = self.reward_per_token(now)?;
        self.earned_with(&self.stake(account), reward_per_token)
    }

    fn earned_with(&self, stake: &AccountStake, reward_per_token: U256) -> crate::Result<u128> {
        let delta = reward_per_token
            .checked_sub(stake.reward_per_token_paid())
            .ok_or(crate::Error::Computation(
                "reward per token paid exceeds reward per token",
            ))?;
        let accrued = if delta.is_zero() || stake.balance() == 0 {
            0
        } else {
            let accrued = U256::from(stake.balance()).mul_div(&delta, &U256::from(SCALE))?;
            u128::try_from(accrued).map_err(|_| crate::Error::Overflow)?
        };
        accrued
            .checked_add(stake.rewards_owed())
            .ok_or(crate::Error::Overflow)
    }

    fn elapsed(&self, now: u64) -> crate::Result<u64> {
        let updated_at = self.program.updated_at();
        self.last_applicable_time(now)
            .checked_sub(updated_at)
            .ok_or(crate::Error::StaleTimestamp { now, updated_at })
    }

    /// Compute the checkpoint of `account` at `now` without applying it.
    ///
    /// `None` or the zero account only brings the program-global fields current.
    pub fn prepare_checkpoint(
        &self,
        account: Option<&A>,
        now: u64,
    ) -> crate::Result<CheckpointReport<A>> {
        let reward_per_token = self.reward_per_token(now)?;
        let updated_at = self.last_applicable_time(now);
        let account = match account.filter(|account| !account.is_zero()) {
            Some(account) => {
                let rewards_owed = self.earned_with(&self.stake(account), reward_per_token)?;
                Some((account.clone(), rewards_owed))
            }
            None => None,
        };
        Ok(CheckpointReport::new(
            now,
            updated_at,
            self.program.reward_per_token_stored(),
            reward_per_token,
            account,
        ))
    }

    /// Apply a checkpoint computed by [`PoolRewards::prepare_checkpoint`].
    ///
    /// Must be applied before any other mutation of this pool.
    pub(crate) fn apply_checkpoint(&mut self, report: &CheckpointReport<A>) {
        self.program
            .set_accumulator(report.reward_per_token(), report.updated_at());
        if let Some((account, rewards_owed)) = report.account() {
            self.stakes
                .entry(account.clone())
                .or_default()
                .set_checkpoint(*rewards_owed, report.reward_per_token());
        }
    }

    pub(crate) fn set_balance(&mut self, account: &A, balance: u128, total_staked: u128) {
        self.stakes
            .entry(account.clone())
            .or_default()
            .set_balance(balance);
        self.program.set_total_staked(total_staked);
    }

    pub(crate) fn settle_claim(&mut self, account: &A, total_claimed: u128) {
        if let Some(stake) = self.stakes.get_mut(account) {
            stake.clear_rewards_owed();
        }
        self.program.set_total_claimed(total_claimed);
    }

    /// Create a [`Checkpoint`] action.
    pub fn checkpoint(&mut self, account: Option<&A>, now: u64) -> Checkpoint<'_, A, T> {
        Checkpoint::new(self, account.cloned(), now)
    }

    /// Create an [`IncreaseStake`] action.
    pub fn increase_stake(
        &mut self,
        account: &A,
        delta: u128,
        now: u64,
    ) -> crate::Result<IncreaseStake<'_, A, T>> {
        IncreaseStake::try_new(self, account.clone(), delta, now)
    }

    /// Create a [`DecreaseStake`] action.
    pub fn decrease_stake(
        &mut self,
        account: &A,
        delta: u128,
        now: u64,
    ) -> crate::Result<DecreaseStake<'_, A, T>> {
        DecreaseStake::try_new(self, account.clone(), delta, now)
    }

    /// Create a [`Claim`] action.
    pub fn claim(&mut self, account: &A, now: u64) -> crate::Result<Claim<'_, A, T>> {
        Claim::try_new(self, account.clone(), now)
    }
}
