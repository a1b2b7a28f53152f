use crate::{Bank, FundingParams, Identifier, PoolRewards, RewardProgram};

/// Fund a pool's reward program.
///
/// The slot is the one-shot guard: funding is rejected when it already holds
/// a program, and it is only filled after the funding transfer succeeded.
#[must_use]
pub struct InitializeFunding<'a, A, T> {
    slot: &'a mut Option<PoolRewards<A, T>>,
    funder: A,
    params: FundingParams<T>,
    now: u64,
}

impl<'a, A: Identifier, T: Identifier> InitializeFunding<'a, A, T> {
    /// Create a new [`InitializeFunding`] action.
    pub fn try_new(
        slot: &'a mut Option<PoolRewards<A, T>>,
        funder: A,
        params: FundingParams<T>,
        now: u64,
    ) -> crate::Result<Self> {
        if slot.is_some() {
            return Err(crate::Error::AlreadyInitialized);
        }
        params.validate()?;
        Ok(Self {
            slot,
            funder,
            params,
            now,
        })
    }

    /// Execute.
    pub fn execute<B: Bank<T, A>>(self, bank: &mut B) -> crate::Result<FundingReport<T>> {
        let program = RewardProgram::try_new(&self.params, self.now)?;
        bank.transfer_in(program.reward_token(), &self.funder, self.params.amount())?;
        let report = FundingReport {
            reward_token: program.reward_token().clone(),
            amount: program.funded_amount(),
            duration: program.duration(),
            reward_rate: program.reward_rate(),
            finish_at: program.finish_at(),
            dust: program.dust()?,
        };
        *self.slot = Some(PoolRewards::new(program));
        Ok(report)
    }
}

/// Report of funding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingReport<T> {
    reward_token: T,
    amount: u128,
    duration: u64,
    reward_rate: u128,
    finish_at: u64,
    dust: u128,
}

impl<T> FundingReport<T> {
    /// Get reward token.
    pub fn reward_token(&self) -> &T {
        &self.reward_token
    }

    /// Get the amount pulled in.
    pub fn amount(&self) -> u128 {
        self.amount
    }

    /// Get duration in seconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Get reward rate.
    pub fn reward_rate(&self) -> u128 {
        self.reward_rate
    }

    /// Get finish time.
    pub fn finish_at(&self) -> u64 {
        self.finish_at
    }

    /// Get the amount that will never be distributed.
    pub fn dust(&self) -> u128 {
        self.dust
    }
}
