#![deny(missing_docs)]
#![deny(unreachable_pub)]
#![warn(clippy::arithmetic_side_effects)]

//! Reward-per-token accounting for liquidity providers of a pool.
//!
//! A [`PoolRewards`] holds one pool's [`RewardProgram`] together with the
//! [`AccountStake`] of every account that ever staked in it. Rewards accrue
//! continuously at `reward_rate` per second and are shared pro rata by stake
//! through the `reward_per_token` accumulator, which is brought current by a
//! checkpoint before any balance changes.

/// Identifiers.
pub mod id;

/// Number utils.
pub mod num;

/// Clock.
pub mod clock;

/// Bank.
pub mod bank;

/// Position oracle.
pub mod oracle;

/// Reward program.
pub mod program;

/// Account stake.
pub mod stake;

/// Pool rewards ledger.
pub mod pool;

/// Actions.
pub mod action;

/// Error type.
pub mod error;


pub use action::{
    checkpoint::{Checkpoint, CheckpointReport},
    claim::{Claim, ClaimReport},
    initialize::{FundingReport, InitializeFunding},
    stake::{DecreaseStake, IncreaseStake, StakeReport},
};
pub use bank::Bank;
pub use clock::{Clock, SystemClock};
pub use error::Error;
pub use id::Identifier;
pub use num::U256;
pub use oracle::{PositionOracle, TickRange};
pub use pool::PoolRewards;
pub use program::{FundingParams, ProgramStatus, RewardProgram};
pub use stake::AccountStake;

/// Fixed-point scale of the reward-per-token accumulator (`10^18`).
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Alias for result.
pub type Result<T> = std::result::Result<T, Error>;
