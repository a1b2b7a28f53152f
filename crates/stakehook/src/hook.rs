use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, RwLock},
};

use stakehook_model::{
    Bank, CheckpointReport, ClaimReport, Clock, FundingParams, FundingReport, Identifier,
    PoolRewards, PositionOracle, RewardProgram, StakeReport, TickRange,
};

use crate::{
    event::{HookOutcome, LifecycleEvent, LiquidityAmount},
    HookConfig, PoolStatus,
};

/// Per-pool state guarded by the pool lock.
#[derive(Debug)]
struct PoolState<A, T> {
    ledger: Option<PoolRewards<A, T>>,
    /// Liquidity last reconciled for each position of the pool.
    positions: HashMap<(A, TickRange), u128>,
}

impl<A, T> Default for PoolState<A, T> {
    fn default() -> Self {
        Self {
            ledger: None,
            positions: HashMap::default(),
        }
    }
}

type Slot<A, T> = Arc<Mutex<PoolState<A, T>>>;

/// Rewards hook.
///
/// Every mutating operation holds the lock of its pool for its whole
/// duration and reads the clock once, after the lock is taken. A pool lock
/// is never acquired while the bank lock is held.
pub struct RewardsHook<P, A, T, B, O, C> {
    config: HookConfig<A>,
    pools: RwLock<HashMap<P, Slot<A, T>>>,
    bank: Mutex<B>,
    oracle: O,
    clock: C,
}

impl<P, A, T, B, O, C> RewardsHook<P, A, T, B, O, C> {
    /// Create a new [`RewardsHook`].
    pub fn new(config: HookConfig<A>, bank: B, oracle: O, clock: C) -> Self {
        Self {
            config,
            pools: RwLock::default(),
            bank: Mutex::new(bank),
            oracle,
            clock,
        }
    }

    /// Get the config.
    pub fn config(&self) -> &HookConfig<A> {
        &self.config
    }

    /// Get the position oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Get the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run `f` with the bank, without locking any pool.
    pub fn with_bank<R>(&self, f: impl FnOnce(&B) -> R) -> crate::Result<R> {
        Ok(f(&*self.bank.lock()?))
    }

    /// Run `f` with the bank mutably, without locking any pool.
    pub fn with_bank_mut<R>(&self, f: impl FnOnce(&mut B) -> R) -> crate::Result<R> {
        Ok(f(&mut *self.bank.lock()?))
    }

    fn lock_bank(&self) -> crate::Result<MutexGuard<'_, B>> {
        Ok(self.bank.lock()?)
    }
}

impl<P, A, T, B, O, C> RewardsHook<P, A, T, B, O, C>
where
    P: Identifier,
    A: Identifier,
    T: Identifier,
    B: Bank<T, A>,
    O: PositionOracle<P, A>,
    C: Clock,
{
    fn slot(&self, pool: &P) -> crate::Result<Option<Slot<A, T>>> {
        Ok(self.pools.read()?.get(pool).cloned())
    }

    fn slot_or_insert(&self, pool: &P) -> crate::Result<Slot<A, T>> {
        if let Some(slot) = self.slot(pool)? {
            return Ok(slot);
        }
        Ok(self
            .pools
            .write()?
            .entry(pool.clone())
            .or_default()
            .clone())
    }

    /// Remove the entry of `pool` if it is still `slot` and was never funded.
    fn forget_unfunded(&self, pool: &P, slot: &Slot<A, T>) -> crate::Result<()> {
        let mut pools = self.pools.write()?;
        if pools.get(pool).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            pools.remove(pool);
        }
        Ok(())
    }

    fn is_registered(&self, pool: &P, slot: &Slot<A, T>) -> crate::Result<bool> {
        Ok(self
            .slot(pool)?
            .is_some_and(|current| Arc::ptr_eq(&current, slot)))
    }

    /// Fund the ledger held by `slot`.
    ///
    /// Returns `None` if `slot` is no longer the entry of `pool`.
    fn fund_slot(
        &self,
        pool: &P,
        slot: &Slot<A, T>,
        funder: &A,
        params: &FundingParams<T>,
    ) -> crate::Result<Option<FundingReport<T>>> {
        let mut guard = slot.lock()?;
        // The entry may have been dropped by a concurrent failed initialization.
        if !self.is_registered(pool, slot)? {
            return Ok(None);
        }
        let now = self.clock.now()?;
        let result = stakehook_model::InitializeFunding::try_new(
            &mut guard.ledger,
            funder.clone(),
            params.clone(),
            now,
        )
        .map_err(crate::Error::from)
        .and_then(|action| Ok(action.execute(&mut *self.lock_bank()?)?));
        if guard.ledger.is_none() {
            self.forget_unfunded(pool, slot)?;
        }
        result.map(Some)
    }

    /// Run `f` with the state of `pool` locked and the current time.
    fn with_state<R>(
        &self,
        pool: &P,
        f: impl FnOnce(&mut PoolRewards<A, T>, &mut HashMap<(A, TickRange), u128>, u64) -> crate::Result<R>,
    ) -> crate::Result<R> {
        let slot = self.slot(pool)?.ok_or(crate::Error::Uninitialized)?;
        let mut guard = slot.lock()?;
        let PoolState { ledger, positions } = &mut *guard;
        let ledger = ledger.as_mut().ok_or(crate::Error::Uninitialized)?;
        let now = self.clock.now()?;
        f(ledger, positions, now)
    }

    /// Run `f` with the ledger of `pool` locked and the current time.
    fn with_ledger<R>(
        &self,
        pool: &P,
        f: impl FnOnce(&mut PoolRewards<A, T>, u64) -> crate::Result<R>,
    ) -> crate::Result<R> {
        self.with_state(pool, |ledger, _, now| f(ledger, now))
    }

    /// Run `f` with the ledger of `pool` (if any) locked and the current time.
    fn inspect<R>(
        &self,
        pool: &P,
        f: impl FnOnce(Option<&PoolRewards<A, T>>, u64) -> crate::Result<R>,
    ) -> crate::Result<R> {
        match self.slot(pool)? {
            Some(slot) => {
                let guard = slot.lock()?;
                let now = self.clock.now()?;
                f(guard.ledger.as_ref(), now)
            }
            None => f(None, self.clock.now()?),
        }
    }

    /// Fund the reward program of `pool`.
    ///
    /// Fails with [`AlreadyInitialized`](stakehook_model::Error::AlreadyInitialized)
    /// if the pool has already been funded. A failed initialization leaves no
    /// trace of the pool behind.
    #[tracing::instrument(skip(self, params), fields(token = ?params.reward_token(), amount = params.amount()))]
    pub fn on_initialize_funding(
        &self,
        pool: &P,
        funder: &A,
        params: FundingParams<T>,
    ) -> crate::Result<FundingReport<T>> {
        params.validate()?;
        let report = loop {
            let slot = self.slot_or_insert(pool)?;
            if let Some(report) = self.fund_slot(pool, &slot, funder, &params)? {
                break report;
            }
        };
        if report.reward_rate() == 0 {
            tracing::warn!(
                duration = report.duration(),
                "funding amount is smaller than the duration, nothing will be distributed"
            );
        }
        tracing::info!(
            rate = report.reward_rate(),
            finish_at = report.finish_at(),
            dust = report.dust(),
            "funded"
        );
        Ok(report)
    }

    /// Increase the stake of `account` by `delta`.
    #[tracing::instrument(skip(self))]
    pub fn on_stake_increase(
        &self,
        pool: &P,
        account: &A,
        delta: u128,
    ) -> crate::Result<StakeReport<A>> {
        self.with_ledger(pool, |ledger, now| {
            let report = ledger.increase_stake(account, delta, now)?.execute()?;
            tracing::info!(
                balance = report.balance(),
                total = report.total_staked(),
                "stake increased"
            );
            Ok(report)
        })
    }

    /// Decrease the stake of `account` by `delta`.
    ///
    /// Fails with [`InsufficientStake`](stakehook_model::Error::InsufficientStake)
    /// when `delta` exceeds the staked balance.
    #[tracing::instrument(skip(self))]
    pub fn on_stake_decrease(
        &self,
        pool: &P,
        account: &A,
        delta: u128,
    ) -> crate::Result<StakeReport<A>> {
        self.with_ledger(pool, |ledger, now| {
            let report = ledger.decrease_stake(account, delta, now)?.execute()?;
            tracing::info!(
                balance = report.balance(),
                total = report.total_staked(),
                "stake decreased"
            );
            Ok(report)
        })
    }

    /// Pay out the rewards owed to `account`.
    #[tracing::instrument(skip(self))]
    pub fn on_claim(&self, pool: &P, account: &A) -> crate::Result<ClaimReport<A, T>> {
        self.with_ledger(pool, |ledger, now| {
            let report = ledger.claim(account, now)?.execute(&mut *self.lock_bank()?)?;
            if report.amount() == 0 {
                tracing::debug!("nothing to claim");
            } else {
                tracing::info!(amount = report.amount(), "claimed");
            }
            Ok(report)
        })
    }

    /// Reconcile the stake of `account` with the liquidity the position
    /// oracle reports for `range`.
    ///
    /// Only the change since the last reconciliation of that position is
    /// applied, so liquidity in other ranges (or staked flat) is untouched.
    /// Returns `None` when the position is already in sync.
    #[tracing::instrument(skip(self, range), fields(%range))]
    pub fn sync_stake(
        &self,
        pool: &P,
        account: &A,
        range: &TickRange,
    ) -> crate::Result<Option<StakeReport<A>>> {
        self.with_state(pool, |ledger, positions, now| {
            let target = self.oracle.staked_amount(pool, account, range)?;
            let key = (account.clone(), *range);
            let synced = positions.get(&key).copied().unwrap_or_default();
            let report = match target.cmp(&synced) {
                Ordering::Equal => {
                    tracing::debug!(liquidity = synced, "position already in sync");
                    return Ok(None);
                }
                Ordering::Greater => ledger
                    .increase_stake(account, target.abs_diff(synced), now)?
                    .execute()?,
                Ordering::Less => ledger
                    .decrease_stake(account, synced.abs_diff(target), now)?
                    .execute()?,
            };
            if target == 0 {
                positions.remove(&key);
            } else {
                positions.insert(key, target);
            }
            tracing::info!(
                from = synced,
                to = target,
                balance = report.balance(),
                "position synced"
            );
            Ok(Some(report))
        })
    }

    /// Bring the accumulator of `pool` current.
    #[tracing::instrument(skip(self))]
    pub fn checkpoint_pool(&self, pool: &P) -> crate::Result<CheckpointReport<A>> {
        self.with_ledger(pool, |ledger, now| {
            let report = ledger.checkpoint(None, now).execute()?;
            tracing::debug!(
                reward_per_token = %report.reward_per_token(),
                "checkpointed"
            );
            Ok(report)
        })
    }

    /// Handle a lifecycle event delivered by `sender`.
    ///
    /// Events from anyone but the configured pool manager are rejected with
    /// [`Unauthorized`](crate::Error::Unauthorized) before any state is touched.
    pub fn handle(
        &self,
        sender: &A,
        event: LifecycleEvent<P, A, T>,
    ) -> crate::Result<HookOutcome<A, T>> {
        if sender != self.config.pool_manager() {
            tracing::warn!(?sender, event = event.name(), "rejected event from unauthorized sender");
            return Err(crate::Error::Unauthorized);
        }
        let name = event.name();
        let outcome = match event {
            LifecycleEvent::PoolInitialized { pool, funder, init } => {
                self.on_initialize_funding(&pool, &funder, init)
                    .map(HookOutcome::Funded)
            }
            LifecycleEvent::LiquidityAdded {
                pool,
                account,
                amount,
            } => match amount {
                LiquidityAmount::Flat(delta) => self
                    .on_stake_increase(&pool, &account, delta)
                    .map(HookOutcome::StakeChanged),
                LiquidityAmount::Range(range) => {
                    self.sync_stake(&pool, &account, &range).map(Into::into)
                }
            },
            LifecycleEvent::LiquidityRemoved {
                pool,
                account,
                amount,
            } => match amount {
                LiquidityAmount::Flat(delta) => self
                    .on_stake_decrease(&pool, &account, delta)
                    .map(HookOutcome::StakeChanged),
                LiquidityAmount::Range(range) => {
                    self.sync_stake(&pool, &account, &range).map(Into::into)
                }
            },
            LifecycleEvent::SwapExecuted { pool } => {
                tracing::debug!(?pool, "swap ignored");
                Ok(HookOutcome::Ignored)
            }
            LifecycleEvent::RewardClaimed { pool, account } => self
                .on_claim(&pool, &account)
                .map(HookOutcome::Claimed),
        };
        if let Err(err) = &outcome {
            tracing::warn!(%err, event = name, "rejected event");
        }
        outcome
    }

    /// Get the rewards `account` could claim now. Zero for unknown pools.
    pub fn earned(&self, pool: &P, account: &A) -> crate::Result<u128> {
        self.inspect(pool, |ledger, now| match ledger {
            Some(ledger) => Ok(ledger.earned(account, now)?),
            None => Ok(0),
        })
    }

    /// Get the staked balance of `account`. Zero for unknown pools.
    pub fn staked_balance(&self, pool: &P, account: &A) -> crate::Result<u128> {
        self.inspect(pool, |ledger, _| {
            Ok(ledger.map(|ledger| ledger.balance_of(account)).unwrap_or_default())
        })
    }

    /// Get the total staked in `pool`. Zero for unknown pools.
    pub fn total_staked(&self, pool: &P) -> crate::Result<u128> {
        self.inspect(pool, |ledger, _| {
            Ok(ledger.map(PoolRewards::total_staked).unwrap_or_default())
        })
    }

    /// Get the reward token of `pool`, `None` if it has not been funded.
    pub fn reward_token(&self, pool: &P) -> crate::Result<Option<T>> {
        self.inspect(pool, |ledger, _| {
            Ok(ledger.map(|ledger| ledger.reward_token().clone()))
        })
    }

    /// Get the status of `pool`.
    pub fn status(&self, pool: &P) -> crate::Result<PoolStatus> {
        self.inspect(pool, |ledger, now| {
            Ok(ledger.map_or(PoolStatus::Uninitialized, |ledger| {
                ledger.program().status(now).into()
            }))
        })
    }

    /// Get a snapshot of the reward program of `pool`.
    pub fn program(&self, pool: &P) -> crate::Result<RewardProgram<T>> {
        self.inspect(pool, |ledger, _| {
            ledger
                .map(|ledger| ledger.program().clone())
                .ok_or(crate::Error::Uninitialized)
        })
    }

    /// Get a snapshot of the whole ledger of `pool`.
    pub fn ledger(&self, pool: &P) -> crate::Result<PoolRewards<A, T>> {
        self.inspect(pool, |ledger, _| {
            ledger.cloned().ok_or(crate::Error::Uninitialized)
        })
    }

    /// Get every funded pool.
    pub fn pools(&self) -> crate::Result<Vec<P>> {
        let slots = self
            .pools
            .read()?
            .iter()
            .map(|(pool, slot)| (pool.clone(), slot.clone()))
            .collect::<Vec<_>>();
        let mut pools = Vec::with_capacity(slots.len());
        for (pool, slot) in slots {
            if slot.lock()?.ledger.is_some() {
                pools.push(pool);
            }
        }
        Ok(pools)
    }
}
