use stakehook_model::{ClaimReport, FundingParams, FundingReport, StakeReport, TickRange};

/// Liquidity change carried by a liquidity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LiquidityAmount {
    /// The stake delta itself.
    Flat(u128),
    /// The position range whose liquidity changed; the delta is derived
    /// from the position oracle.
    Range(TickRange),
}

/// Pool lifecycle event delivered by the pool manager.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum LifecycleEvent<P, A, T> {
    /// A pool was created and its reward program funded.
    PoolInitialized {
        /// Pool.
        pool: P,
        /// Account paying the funding amount.
        funder: A,
        /// Funding params.
        init: FundingParams<T>,
    },
    /// Liquidity was added to a position.
    LiquidityAdded {
        /// Pool.
        pool: P,
        /// Position owner.
        account: A,
        /// Liquidity added.
        amount: LiquidityAmount,
    },
    /// Liquidity was removed from a position.
    LiquidityRemoved {
        /// Pool.
        pool: P,
        /// Position owner.
        account: A,
        /// Liquidity removed.
        amount: LiquidityAmount,
    },
    /// A swap was executed.
    SwapExecuted {
        /// Pool.
        pool: P,
    },
    /// An account asked for its rewards.
    RewardClaimed {
        /// Pool.
        pool: P,
        /// Claiming account.
        account: A,
    },
}

impl<P, A, T> LifecycleEvent<P, A, T> {
    /// Get the pool the event belongs to.
    pub fn pool(&self) -> &P {
        match self {
            Self::PoolInitialized { pool, .. }
            | Self::LiquidityAdded { pool, .. }
            | Self::LiquidityRemoved { pool, .. }
            | Self::SwapExecuted { pool }
            | Self::RewardClaimed { pool, .. } => pool,
        }
    }

    /// Get the event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PoolInitialized { .. } => "pool_initialized",
            Self::LiquidityAdded { .. } => "liquidity_added",
            Self::LiquidityRemoved { .. } => "liquidity_removed",
            Self::SwapExecuted { .. } => "swap_executed",
            Self::RewardClaimed { .. } => "reward_claimed",
        }
    }
}

/// What handling a lifecycle event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome<A, T> {
    /// The reward program was funded.
    Funded(FundingReport<T>),
    /// A stake changed.
    StakeChanged(StakeReport<A>),
    /// The ledger already matched the position oracle.
    Unchanged,
    /// Rewards were claimed, possibly zero.
    Claimed(ClaimReport<A, T>),
    /// The event does not concern the ledger.
    Ignored,
}

impl<A, T> From<Option<StakeReport<A>>> for HookOutcome<A, T> {
    fn from(report: Option<StakeReport<A>>) -> Self {
        report.map_or(Self::Unchanged, Self::StakeChanged)
    }
}
