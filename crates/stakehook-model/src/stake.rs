use crate::U256;

/// Stake of one account in one pool.
///
/// Created lazily as all-zero on first use. An account that has withdrawn
/// everything and claimed everything stays at all-zero; it is never removed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountStake {
    balance: u128,
    reward_per_token_paid: U256,
    rewards_owed: u128,
}

impl AccountStake {
    /// Get staked balance.
    pub fn balance(&self) -> u128 {
        self.balance
    }

    /// Get the accumulator value at the last checkpoint of this account.
    pub fn reward_per_token_paid(&self) -> U256 {
        self.reward_per_token_paid
    }

    /// Get claimable rewards as of the last checkpoint.
    pub fn rewards_owed(&self) -> u128 {
        self.rewards_owed
    }

    pub(crate) fn set_balance(&mut self, balance: u128) {
        self.balance = balance;
    }

    pub(crate) fn set_checkpoint(&mut self, rewards_owed: u128, reward_per_token_paid: U256) {
        self.rewards_owed = rewards_owed;
        self.reward_per_token_paid = reward_per_token_paid;
    }

    pub(crate) fn clear_rewards_owed(&mut self) {
        self.rewards_owed = 0;
    }
}
