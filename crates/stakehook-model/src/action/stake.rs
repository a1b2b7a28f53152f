use crate::{CheckpointReport, Identifier, PoolRewards};

/// Increase the stake of an account.
#[must_use]
pub struct IncreaseStake<'a, A, T> {
    pool: &'a mut PoolRewards<A, T>,
    account: A,
    delta: u128,
    now: u64,
}

impl<'a, A: Identifier, T: Identifier> IncreaseStake<'a, A, T> {
    /// Create a new [`IncreaseStake`] action.
    pub fn try_new(
        pool: &'a mut PoolRewards<A, T>,
        account: A,
        delta: u128,
        now: u64,
    ) -> crate::Result<Self> {
        validate_account(&account)?;
        if delta == 0 {
            return Err(crate::Error::ZeroDelta);
        }
        Ok(Self {
            pool,
            account,
            delta,
            now,
        })
    }

    /// Execute.
    pub fn execute(self) -> crate::Result<StakeReport<A>> {
        let checkpoint = self
            .pool
            .prepare_checkpoint(Some(&self.account), self.now)?;
        let previous_balance = self.pool.balance_of(&self.account);
        let balance = previous_balance
            .checked_add(self.delta)
            .ok_or(crate::Error::Overflow)?;
        let total_staked = self
            .pool
            .total_staked()
            .checked_add(self.delta)
            .ok_or(crate::Error::Overflow)?;

        self.pool.apply_checkpoint(&checkpoint);
        self.pool.set_balance(&self.account, balance, total_staked);

        Ok(StakeReport {
            account: self.account,
            previous_balance,
            balance,
            total_staked,
            checkpoint,
        })
    }
}

/// Decrease the stake of an account.
#[must_use]
pub struct DecreaseStake<'a, A, T> {
    pool: &'a mut PoolRewards<A, T>,
    account: A,
    delta: u128,
    now: u64,
}

impl<'a, A: Identifier, T: Identifier> DecreaseStake<'a, A, T> {
    /// Create a new [`DecreaseStake`] action.
    pub fn try_new(
        pool: &'a mut PoolRewards<A, T>,
        account: A,
        delta: u128,
        now: u64,
    ) -> crate::Result<Self> {
        validate_account(&account)?;
        if delta == 0 {
            return Err(crate::Error::ZeroDelta);
        }
        let available = pool.balance_of(&account);
        if delta > available {
            return Err(crate::Error::InsufficientStake {
                requested: delta,
                available,
            });
        }
        Ok(Self {
            pool,
            account,
            delta,
            now,
        })
    }

    /// Execute.
    pub fn execute(self) -> crate::Result<StakeReport<A>> {
        let checkpoint = self
            .pool
            .prepare_checkpoint(Some(&self.account), self.now)?;
        let previous_balance = self.pool.balance_of(&self.account);
        let balance = previous_balance
            .checked_sub(self.delta)
            .ok_or(crate::Error::InsufficientStake {
                requested: self.delta,
                available: previous_balance,
            })?;
        let total_staked = self
            .pool
            .total_staked()
            .checked_sub(self.delta)
            .ok_or(crate::Error::Computation(
                "total staked is less than an account balance",
            ))?;

        self.pool.apply_checkpoint(&checkpoint);
        self.pool.set_balance(&self.account, balance, total_staked);

        Ok(StakeReport {
            account: self.account,
            previous_balance,
            balance,
            total_staked,
            checkpoint,
        })
    }
}

fn validate_account<A: Identifier>(account: &A) -> crate::Result<()> {
    if account.is_zero() {
        return Err(crate::Error::InvalidArgument(
            "the zero account cannot hold a stake",
        ));
    }
    Ok(())
}

/// Report of a stake change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeReport<A> {
    account: A,
    previous_balance: u128,
    balance: u128,
    total_staked: u128,
    checkpoint: CheckpointReport<A>,
}

impl<A> StakeReport<A> {
    /// Get the account.
    pub fn account(&self) -> &A {
        &self.account
    }

    /// Get the balance before the change.
    pub fn previous_balance(&self) -> u128 {
        self.previous_balance
    }

    /// Get the balance after the change.
    pub fn balance(&self) -> u128 {
        self.balance
    }

    /// Get the size of the change.
    pub fn delta(&self) -> u128 {
        self.balance.abs_diff(self.previous_balance)
    }

    /// Get total staked after the change.
    pub fn total_staked(&self) -> u128 {
        self.total_staked
    }

    /// Get the checkpoint taken before the change.
    pub fn checkpoint(&self) -> &CheckpointReport<A> {
        &self.checkpoint
    }
}
