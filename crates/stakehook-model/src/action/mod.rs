/// Initialize funding.
pub mod initialize;

/// Checkpoint.
pub mod checkpoint;

/// Increase and decrease stake.
pub mod stake;

/// Claim rewards.
pub mod claim;
