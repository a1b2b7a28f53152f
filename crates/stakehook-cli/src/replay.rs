use std::time::Duration;

use serde_with::{serde_as, DisplayFromStr};
use stakehook::{stakehook_model::U256, HookConfig, HookOutcome, PoolStatus, RewardsHook};

use crate::{
    config::Config,
    memory::{ManualClock, MemoryBank, PositionBook},
    scenario::{Scenario, StepAction},
};

type Hook = RewardsHook<String, String, String, MemoryBank, PositionBook, ManualClock>;

/// Replay `scenario` against in-memory collaborators.
///
/// Rejected events are recorded and the replay goes on, the way a rejected
/// transaction leaves the pool untouched. The final state is read at `until`,
/// or at the last step when unset.
pub fn replay(
    scenario: &Scenario,
    config: &Config,
    until: Option<Duration>,
) -> eyre::Result<ReplayReport> {
    let end = until.unwrap_or_else(|| scenario.end());
    if end < scenario.end() {
        eyre::bail!(
            "`until` ({}) is before the last step ({})",
            humantime::format_duration(end),
            humantime::format_duration(scenario.end())
        );
    }

    let mut bank = MemoryBank::default();
    for (funder, token, required) in scenario.funding_requirements()? {
        bank.credit(token, funder, config.initial_balance().unwrap_or(required))?;
    }
    let pool_manager = config.pool_manager().to_string();
    let hook: Hook = RewardsHook::new(
        HookConfig::builder().pool_manager(pool_manager.clone()).build(),
        bank,
        PositionBook::default(),
        ManualClock::default(),
    );

    let mut steps = Vec::with_capacity(scenario.steps().len());
    for step in scenario.steps() {
        let at = step.at();
        hook.clock().set(at.as_secs());
        let action = step.action();
        let sender = step.sender().unwrap_or(&pool_manager).to_string();
        let outcome = match action {
            StepAction::SetPosition {
                pool,
                account,
                liquidity,
                ..
            } => {
                let range = action
                    .range()
                    .ok_or_else(|| eyre::eyre!("position without range"))??;
                hook.oracle().set(pool, account, range, liquidity.get());
                Ok(format!("position {range} = {liquidity}"))
            }
            _ => {
                let event = action
                    .to_event()?
                    .ok_or_else(|| eyre::eyre!("step without event"))?;
                hook.handle(&sender, event).map(describe)
            }
        };
        let (ok, outcome) = match outcome {
            Ok(outcome) => (true, outcome),
            Err(err) => (false, format!("rejected: {err}")),
        };
        steps.push(StepRecord {
            at: humantime::format_duration(at).to_string(),
            sender,
            event: action.name(),
            pool: action.pool().to_string(),
            account: action.account().unwrap_or_default().to_string(),
            ok,
            outcome,
        });
    }

    hook.clock().set(end.as_secs());
    let mut pools = hook.pools()?;
    pools.sort();
    let mut pool_rows = Vec::with_capacity(pools.len());
    let mut account_rows = Vec::new();
    for pool in pools {
        let ledger = hook.ledger(&pool)?;
        let program = ledger.program();
        let token = program.reward_token().clone();
        pool_rows.push(PoolRow {
            pool: pool.clone(),
            status: hook.status(&pool)?,
            program: ProgramRow {
                token: token.clone(),
                reward_rate: program.reward_rate(),
                finish_at: program.finish_at(),
                reward_per_token: ledger.reward_per_token(end.as_secs())?,
                total_staked: program.total_staked(),
                funded: program.funded_amount(),
                claimed: program.total_claimed(),
                dust: program.dust()?,
            },
        });

        let mut accounts = ledger.stakes().map(|(account, _)| account.clone()).collect::<Vec<_>>();
        accounts.sort();
        for account in accounts {
            account_rows.push(AccountRow {
                pool: pool.clone(),
                balance: hook.staked_balance(&pool, &account)?,
                earned: hook.earned(&pool, &account)?,
                claimed: hook.with_bank(|bank| bank.balance(&token, &account))?,
                account,
            });
        }
    }

    Ok(ReplayReport {
        end: humantime::format_duration(end).to_string(),
        steps,
        pools: pool_rows,
        accounts: account_rows,
    })
}

fn describe(outcome: HookOutcome<String, String>) -> String {
    match outcome {
        HookOutcome::Funded(report) => format!(
            "funded: rate={} finish_at={} dust={}",
            report.reward_rate(),
            report.finish_at(),
            report.dust()
        ),
        HookOutcome::StakeChanged(report) => format!(
            "stake {} -> {}",
            report.previous_balance(),
            report.balance()
        ),
        HookOutcome::Unchanged => "stake unchanged".to_string(),
        HookOutcome::Claimed(report) => format!("claimed {}", report.amount()),
        HookOutcome::Ignored => "ignored".to_string(),
    }
}

/// Result of a replay.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReplayReport {
    /// Offset the final state was read at.
    pub end: String,
    /// One record per step.
    pub steps: Vec<StepRecord>,
    /// Final state of every funded pool.
    pub pools: Vec<PoolRow>,
    /// Final state of every account that ever staked.
    pub accounts: Vec<AccountRow>,
}

/// What a step did.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StepRecord {
    /// Offset.
    pub at: String,
    /// Sender.
    pub sender: String,
    /// Event kind.
    pub event: &'static str,
    /// Pool.
    pub pool: String,
    /// Account.
    pub account: String,
    /// Whether the event was accepted.
    pub ok: bool,
    /// Outcome.
    pub outcome: String,
}

/// Final state of a pool.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PoolRow {
    /// Pool.
    pub pool: String,
    /// Status.
    pub status: PoolStatus,
    /// Reward program.
    pub program: ProgramRow,
}

/// Final state of a reward program. Amounts are decimal strings.
#[serde_as]
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgramRow {
    /// Reward token.
    pub token: String,
    /// Reward rate.
    #[serde_as(as = "DisplayFromStr")]
    pub reward_rate: u128,
    /// Finish time.
    pub finish_at: u64,
    /// Reward per token at the end.
    #[serde_as(as = "DisplayFromStr")]
    pub reward_per_token: U256,
    /// Total staked.
    #[serde_as(as = "DisplayFromStr")]
    pub total_staked: u128,
    /// Funded amount.
    #[serde_as(as = "DisplayFromStr")]
    pub funded: u128,
    /// Total claimed.
    #[serde_as(as = "DisplayFromStr")]
    pub claimed: u128,
    /// Undistributable remainder.
    #[serde_as(as = "DisplayFromStr")]
    pub dust: u128,
}

/// Final state of an account. Amounts are decimal strings.
#[serde_as]
#[derive(Debug, Clone, serde::Serialize)]
pub struct AccountRow {
    /// Pool.
    pub pool: String,
    /// Account.
    pub account: String,
    /// Staked balance.
    #[serde_as(as = "DisplayFromStr")]
    pub balance: u128,
    /// Claimable rewards.
    #[serde_as(as = "DisplayFromStr")]
    pub earned: u128,
    /// Rewards paid out.
    #[serde_as(as = "DisplayFromStr")]
    pub claimed: u128,
}
