use crate::{Bank, CheckpointReport, Identifier, PoolRewards};

/// Claim the rewards owed to an account.
///
/// Nothing is committed unless the payout transfer succeeds. Claiming with
/// nothing owed is not an error; the report then carries a zero amount.
#[must_use]
pub struct Claim<'a, A, T> {
    pool: &'a mut PoolRewards<A, T>,
    account: A,
    now: u64,
}

impl<'a, A: Identifier, T: Identifier> Claim<'a, A, T> {
    /// Create a new [`Claim`] action.
    pub fn try_new(pool: &'a mut PoolRewards<A, T>, account: A, now: u64) -> crate::Result<Self> {
        if account.is_zero() {
            return Err(crate::Error::InvalidArgument(
                "the zero account cannot claim rewards",
            ));
        }
        Ok(Self { pool, account, now })
    }

    /// Execute.
    pub fn execute<B: Bank<T, A>>(self, bank: &mut B) -> crate::Result<ClaimReport<A, T>> {
        let checkpoint = self
            .pool
            .prepare_checkpoint(Some(&self.account), self.now)?;
        let amount = checkpoint
            .rewards_owed()
            .ok_or(crate::Error::Computation("missing account checkpoint"))?;
        let token = self.pool.reward_token().clone();

        if amount == 0 {
            self.pool.apply_checkpoint(&checkpoint);
            return Ok(ClaimReport {
                account: self.account,
                token,
                amount,
                checkpoint,
            });
        }

        let total_claimed = self
            .pool
            .program()
            .total_claimed()
            .checked_add(amount)
            .ok_or(crate::Error::Overflow)?;
        debug_assert!(total_claimed <= self.pool.program().funded_amount());

        bank.transfer_out(&token, &self.account, amount)?;

        self.pool.apply_checkpoint(&checkpoint);
        self.pool.settle_claim(&self.account, total_claimed);

        Ok(ClaimReport {
            account: self.account,
            token,
            amount,
            checkpoint,
        })
    }
}

/// Report of a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReport<A, T> {
    account: A,
    token: T,
    amount: u128,
    checkpoint: CheckpointReport<A>,
}

impl<A, T> ClaimReport<A, T> {
    /// Get the claiming account.
    pub fn account(&self) -> &A {
        &self.account
    }

    /// Get the token paid out.
    pub fn token(&self) -> &T {
        &self.token
    }

    /// Get the amount paid out.
    pub fn amount(&self) -> u128 {
        self.amount
    }

    /// Get the checkpoint taken before paying out.
    pub fn checkpoint(&self) -> &CheckpointReport<A> {
        &self.checkpoint
    }
}
