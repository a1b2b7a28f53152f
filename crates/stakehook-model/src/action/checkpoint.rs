use crate::{Identifier, PoolRewards, U256};

/// Bring the accumulator, and optionally one account, current.
#[must_use]
pub struct Checkpoint<'a, A, T> {
    pool: &'a mut PoolRewards<A, T>,
    account: Option<A>,
    now: u64,
}

impl<'a, A: Identifier, T: Identifier> Checkpoint<'a, A, T> {
    pub(crate) fn new(pool: &'a mut PoolRewards<A, T>, account: Option<A>, now: u64) -> Self {
        Self { pool, account, now }
    }

    /// Execute.
    pub fn execute(self) -> crate::Result<CheckpointReport<A>> {
        let report = self.pool.prepare_checkpoint(self.account.as_ref(), self.now)?;
        self.pool.apply_checkpoint(&report);
        Ok(report)
    }
}

/// Report of a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointReport<A> {
    now: u64,
    updated_at: u64,
    previous_reward_per_token: U256,
    reward_per_token: U256,
    account: Option<(A, u128)>,
}

impl<A> CheckpointReport<A> {
    pub(crate) fn new(
        now: u64,
        updated_at: u64,
        previous_reward_per_token: U256,
        reward_per_token: U256,
        account: Option<(A, u128)>,
    ) -> Self {
        Self {
            now,
            updated_at,
            previous_reward_per_token,
            reward_per_token,
            account,
        }
    }

    /// Get the timestamp the checkpoint was taken at.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Get the new `updated_at`, i.e. `min(now, finish_at)`.
    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Get the accumulator before the checkpoint.
    pub fn previous_reward_per_token(&self) -> U256 {
        self.previous_reward_per_token
    }

    /// Get the accumulator after the checkpoint.
    pub fn reward_per_token(&self) -> U256 {
        self.reward_per_token
    }

    /// Get the checkpointed account and its rewards owed, if any.
    pub fn account(&self) -> Option<&(A, u128)> {
        self.account.as_ref()
    }

    /// Get the rewards owed to the checkpointed account.
    pub fn rewards_owed(&self) -> Option<u128> {
        self.account.as_ref().map(|(_, owed)| *owed)
    }
}
