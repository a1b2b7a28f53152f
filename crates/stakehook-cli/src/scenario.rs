use std::{fmt, path::Path, time::Duration};

use serde_with::{serde_as, DisplayFromStr};
use stakehook::{
    stakehook_model::{FundingParams, TickRange},
    LifecycleEvent, LiquidityAmount,
};

use crate::config::Amount;

/// Event of a scenario, keyed by pool, account and reward token names.
pub type Event = LifecycleEvent<String, String, String>;

/// A scenario: lifecycle events at offsets from the scenario start.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    #[serde(rename = "step", default)]
    steps: Vec<Step>,
}

impl Scenario {
    /// Load and validate a scenario file.
    pub fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|err| eyre::eyre!("failed to read `{}`: {err}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a scenario.
    pub fn from_toml(content: &str) -> eyre::Result<Self> {
        let scenario: Self = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.steps.is_empty() {
            eyre::bail!("scenario has no steps");
        }
        let mut last = Duration::ZERO;
        for (idx, step) in self.steps.iter().enumerate() {
            let at = step.at();
            if at < last {
                eyre::bail!(
                    "step #{idx} at `{}` is earlier than the previous step at `{}`",
                    step.at,
                    humantime::format_duration(last)
                );
            }
            last = at;
            step.action
                .range()
                .transpose()
                .map_err(|err| eyre::eyre!("step #{idx}: {err}"))?;
        }
        Ok(())
    }

    /// Get the steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Get the offset of the last step.
    pub fn end(&self) -> Duration {
        self.steps.last().map(Step::at).unwrap_or_default()
    }

    /// Get the total amount each funder needs to pay for its initializations.
    pub fn funding_requirements(&self) -> eyre::Result<Vec<(&str, &str, u128)>> {
        let mut requirements: Vec<(&str, &str, u128)> = Vec::new();
        for step in &self.steps {
            let StepAction::Initialize {
                funder,
                token,
                amount,
                ..
            } = &step.action
            else {
                continue;
            };
            match requirements
                .iter_mut()
                .find(|entry| entry.0 == funder.as_str() && entry.1 == token.as_str())
            {
                Some(entry) => {
                    entry.2 = entry
                        .2
                        .checked_add(amount.get())
                        .ok_or_else(|| eyre::eyre!("funding of `{funder}` overflows"))?;
                }
                None => requirements.push((funder.as_str(), token.as_str(), amount.get())),
            }
        }
        Ok(requirements)
    }
}

/// A scenario step.
#[serde_as]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Step {
    /// Offset from the scenario start.
    #[serde_as(as = "DisplayFromStr")]
    at: humantime::Duration,
    /// Sender of the event, the configured pool manager if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sender: Option<String>,
    #[serde(flatten)]
    action: StepAction,
}

impl Step {
    /// Get the offset from the scenario start.
    pub fn at(&self) -> Duration {
        *self.at
    }

    /// Get the explicit sender.
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Get the action.
    pub fn action(&self) -> &StepAction {
        &self.action
    }
}

/// What a step does.
#[serde_as]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum StepAction {
    /// Fund the reward program of a pool.
    Initialize {
        /// Pool.
        pool: String,
        /// Funder.
        funder: String,
        /// Reward token.
        token: String,
        /// Funding amount.
        amount: Amount,
        /// Distribution duration.
        #[serde_as(as = "DisplayFromStr")]
        duration: humantime::Duration,
    },
    /// Add a flat amount of liquidity.
    Stake {
        /// Pool.
        pool: String,
        /// Liquidity provider.
        account: String,
        /// Amount added.
        amount: Amount,
    },
    /// Remove a flat amount of liquidity.
    Unstake {
        /// Pool.
        pool: String,
        /// Liquidity provider.
        account: String,
        /// Amount removed.
        amount: Amount,
    },
    /// Claim rewards.
    Claim {
        /// Pool.
        pool: String,
        /// Claiming account.
        account: String,
    },
    /// A swap.
    Swap {
        /// Pool.
        pool: String,
    },
    /// Set the liquidity the position oracle reports for a range.
    SetPosition {
        /// Pool.
        pool: String,
        /// Position owner.
        account: String,
        /// Lower tick.
        lower: i32,
        /// Upper tick.
        upper: i32,
        /// Liquidity.
        liquidity: Amount,
    },
    /// Reconcile the stake with the position oracle.
    Sync {
        /// Pool.
        pool: String,
        /// Position owner.
        account: String,
        /// Lower tick.
        lower: i32,
        /// Upper tick.
        upper: i32,
    },
}

impl StepAction {
    /// Get the pool.
    pub fn pool(&self) -> &str {
        match self {
            Self::Initialize { pool, .. }
            | Self::Stake { pool, .. }
            | Self::Unstake { pool, .. }
            | Self::Claim { pool, .. }
            | Self::Swap { pool }
            | Self::SetPosition { pool, .. }
            | Self::Sync { pool, .. } => pool,
        }
    }

    /// Get the account concerned, the funder for initializations.
    pub fn account(&self) -> Option<&str> {
        match self {
            Self::Initialize { funder, .. } => Some(funder),
            Self::Stake { account, .. }
            | Self::Unstake { account, .. }
            | Self::Claim { account, .. }
            | Self::SetPosition { account, .. }
            | Self::Sync { account, .. } => Some(account),
            Self::Swap { .. } => None,
        }
    }

    /// Get the tick range, if the action has one.
    pub fn range(&self) -> Option<stakehook::stakehook_model::Result<TickRange>> {
        match self {
            Self::SetPosition { lower, upper, .. } | Self::Sync { lower, upper, .. } => {
                Some(TickRange::new(*lower, *upper))
            }
            _ => None,
        }
    }

    /// Convert into a lifecycle event.
    ///
    /// Returns `None` for [`StepAction::SetPosition`], which only touches the
    /// position oracle.
    pub fn to_event(&self) -> eyre::Result<Option<Event>> {
        let event = match self {
            Self::Initialize {
                pool,
                funder,
                token,
                amount,
                duration,
            } => LifecycleEvent::PoolInitialized {
                pool: pool.clone(),
                funder: funder.clone(),
                init: FundingParams::builder()
                    .reward_token(token.clone())
                    .amount(amount.get())
                    .duration(duration.as_secs())
                    .build(),
            },
            Self::Stake {
                pool,
                account,
                amount,
            } => LifecycleEvent::LiquidityAdded {
                pool: pool.clone(),
                account: account.clone(),
                amount: LiquidityAmount::Flat(amount.get()),
            },
            Self::Unstake {
                pool,
                account,
                amount,
            } => LifecycleEvent::LiquidityRemoved {
                pool: pool.clone(),
                account: account.clone(),
                amount: LiquidityAmount::Flat(amount.get()),
            },
            Self::Claim { pool, account } => LifecycleEvent::RewardClaimed {
                pool: pool.clone(),
                account: account.clone(),
            },
            Self::Swap { pool } => LifecycleEvent::SwapExecuted { pool: pool.clone() },
            Self::SetPosition { .. } => return Ok(None),
            // A range event reconciles in either direction.
            Self::Sync {
                pool,
                account,
                lower,
                upper,
            } => LifecycleEvent::LiquidityAdded {
                pool: pool.clone(),
                account: account.clone(),
                amount: LiquidityAmount::Range(TickRange::new(*lower, *upper)?),
            },
        };
        Ok(Some(event))
    }

    /// Get the event kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize { .. } => "initialize",
            Self::Stake { .. } => "stake",
            Self::Unstake { .. } => "unstake",
            Self::Claim { .. } => "claim",
            Self::Swap { .. } => "swap",
            Self::SetPosition { .. } => "set-position",
            Self::Sync { .. } => "sync",
        }
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialize {
                token,
                amount,
                duration,
                ..
            } => write!(f, "{amount} {token} over {duration}"),
            Self::Stake { amount, .. } | Self::Unstake { amount, .. } => write!(f, "{amount}"),
            Self::SetPosition {
                lower,
                upper,
                liquidity,
                ..
            } => write!(f, "[{lower}, {upper}) = {liquidity}"),
            Self::Sync { lower, upper, .. } => write!(f, "[{lower}, {upper})"),
            Self::Claim { .. } | Self::Swap { .. } => Ok(()),
        }
    }
}
