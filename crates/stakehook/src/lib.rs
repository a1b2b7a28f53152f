#![deny(missing_docs)]
#![deny(unreachable_pub)]

//! Staking session manager for liquidity-provider reward hooks.
//!
//! [`RewardsHook`] receives pool lifecycle events from the pool manager,
//! keeps one [`PoolRewards`](stakehook_model::PoolRewards) ledger per pool
//! and serializes every mutation of a pool behind that pool's lock. Different
//! pools are handled concurrently.

/// Hook config.
pub mod config;

/// Lifecycle events.
pub mod event;

/// Pool status.
pub mod status;

/// Rewards hook.
pub mod hook;

/// Error type.
pub mod error;

pub use config::HookConfig;
pub use error::Error;
pub use event::{HookOutcome, LifecycleEvent, LiquidityAmount};
pub use hook::RewardsHook;
pub use status::PoolStatus;

pub use stakehook_model;

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
