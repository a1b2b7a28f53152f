/// Error type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The pool already has a reward program.
    #[error("reward program already initialized")]
    AlreadyInitialized,
    /// Reward token is the zero identifier.
    #[error("reward token not set")]
    RewardTokenNotSet,
    /// Funding amount is zero.
    #[error("funding amount must be greater than zero")]
    ZeroFundingAmount,
    /// Distribution duration is zero.
    #[error("distribution duration must be greater than zero")]
    ZeroDuration,
    /// Stake delta is zero.
    #[error("stake delta must be greater than zero")]
    ZeroDelta,
    /// Decrease exceeds the staked balance.
    #[error("insufficient stake, requested={requested}, available={available}")]
    InsufficientStake {
        /// Requested decrease.
        requested: u128,
        /// Staked balance.
        available: u128,
    },
    /// The given timestamp is before the last update.
    #[error("stale timestamp {now}, program updated at {updated_at}")]
    StaleTimestamp {
        /// The timestamp given.
        now: u64,
        /// Last update of the accumulator.
        updated_at: u64,
    },
    /// Invalid Argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Overflow.
    #[error("overflow")]
    Overflow,
    /// Divided by zero.
    #[error("divided by zero")]
    DividedByZero,
    /// Unknown computation error.
    #[error("unknown computation error: {0}")]
    Computation(&'static str),
    /// Token transfer failed.
    #[error("token transfer failed: {0}")]
    Transfer(String),
    /// Position oracle failed.
    #[error("position oracle error: {0}")]
    Oracle(String),
    /// Time source failed.
    #[error("clock error: {0}")]
    Clock(String),
}
