use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap},
};

use stakehook::stakehook_model::{
    self, Bank, Clock, PositionOracle, TickRange,
};

/// In-memory token balances plus the reward vault.
#[derive(Debug, Default)]
pub struct MemoryBank {
    balances: BTreeMap<(String, String), u128>,
    vault: BTreeMap<String, u128>,
}

impl MemoryBank {
    /// Credit `amount` of `token` to `account`.
    pub fn credit(&mut self, token: &str, account: &str, amount: u128) -> eyre::Result<()> {
        let balance = self
            .balances
            .entry((token.to_string(), account.to_string()))
            .or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| eyre::eyre!("balance of `{account}` overflows"))?;
        Ok(())
    }

    /// Get the balance of `account`.
    pub fn balance(&self, token: &str, account: &str) -> u128 {
        self.balances
            .get(&(token.to_string(), account.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Get the vault balance of `token`.
    pub fn vault(&self, token: &str) -> u128 {
        self.vault.get(token).copied().unwrap_or_default()
    }
}

impl Bank<String, String> for MemoryBank {
    fn transfer_in(&mut self, token: &String, from: &String, amount: u128) -> stakehook_model::Result<()> {
        let balance = self.balance(token, from);
        let Some(next_balance) = balance.checked_sub(amount) else {
            return Err(stakehook_model::Error::Transfer(format!(
                "`{from}` holds {balance} {token}, {amount} required"
            )));
        };
        let next_vault = self
            .vault(token)
            .checked_add(amount)
            .ok_or(stakehook_model::Error::Overflow)?;
        self.balances
            .insert((token.clone(), from.clone()), next_balance);
        self.vault.insert(token.clone(), next_vault);
        Ok(())
    }

    fn transfer_out(&mut self, token: &String, to: &String, amount: u128) -> stakehook_model::Result<()> {
        let vault = self.vault(token);
        let Some(next_vault) = vault.checked_sub(amount) else {
            return Err(stakehook_model::Error::Transfer(format!(
                "vault holds {vault} {token}, {amount} required"
            )));
        };
        let next_balance = self
            .balance(token, to)
            .checked_add(amount)
            .ok_or(stakehook_model::Error::Overflow)?;
        self.vault.insert(token.clone(), next_vault);
        self.balances.insert((token.clone(), to.clone()), next_balance);
        Ok(())
    }
}

/// Clock moved by the replay, in seconds since the scenario start.
#[derive(Debug, Default)]
pub struct ManualClock(Cell<u64>);

impl ManualClock {
    /// Set the time.
    pub fn set(&self, now: u64) {
        self.0.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> stakehook_model::Result<u64> {
        Ok(self.0.get())
    }
}

/// Position liquidity set by `set-position` steps.
#[derive(Debug, Default)]
pub struct PositionBook(RefCell<HashMap<(String, String, TickRange), u128>>);

impl PositionBook {
    /// Set the liquidity of a position.
    pub fn set(&self, pool: &str, account: &str, range: TickRange, liquidity: u128) {
        self.0
            .borrow_mut()
            .insert((pool.to_string(), account.to_string(), range), liquidity);
    }
}

impl PositionOracle<String, String> for PositionBook {
    fn staked_amount(
        &self,
        pool: &String,
        account: &String,
        range: &TickRange,
    ) -> stakehook_model::Result<u128> {
        Ok(self
            .0
            .borrow()
            .get(&(pool.clone(), account.clone(), *range))
            .copied()
            .unwrap_or_default())
    }
}
